//! Spot quote abstractions and core types

use crate::core::error::QuoteError;
use async_trait::async_trait;
use std::fmt::Display;
use std::str::FromStr;

/// Upstream spot-price providers that can back the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Merchant {
    GoldApi,
    MetalPriceApi,
}

impl Merchant {
    pub const ALL: [Merchant; 2] = [Merchant::GoldApi, Merchant::MetalPriceApi];

    pub fn id(&self) -> &'static str {
        match self {
            Merchant::GoldApi => "goldapi",
            Merchant::MetalPriceApi => "metalpriceapi",
        }
    }
}

impl Display for Merchant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Merchant {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "goldapi" => Ok(Merchant::GoldApi),
            "metalpriceapi" => Ok(Merchant::MetalPriceApi),
            _ => Err(QuoteError::ConfigurationInvalid(format!(
                "Unknown merchant: {s}"
            ))),
        }
    }
}

/// Everything a provider needs for one spot-price lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub merchant: String,
    pub access_token: String,
    pub base_currency: String,
}

impl QuoteRequest {
    pub fn new(merchant: &str, access_token: &str, base_currency: &str) -> Self {
        Self {
            merchant: merchant.to_string(),
            access_token: access_token.to_string(),
            base_currency: base_currency.to_string(),
        }
    }

    /// Checks that every field is present and the merchant is known.
    pub fn validate(&self) -> Result<Merchant, QuoteError> {
        for (field, value) in [
            ("merchant", &self.merchant),
            ("api access token", &self.access_token),
            ("base currency", &self.base_currency),
        ] {
            if value.trim().is_empty() {
                return Err(QuoteError::ConfigurationInvalid(format!(
                    "{field} must not be empty"
                )));
            }
        }
        if !self.base_currency.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(QuoteError::ConfigurationInvalid(format!(
                "Invalid base currency: {}",
                self.base_currency
            )));
        }
        self.merchant.parse()
    }
}

/// Spot price of one troy ounce of fine gold in `currency`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub price_per_ounce: f64,
    pub currency: String,
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Performs exactly one upstream lookup. No retries.
    async fn fetch_spot(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_round_trip_through_id() {
        for merchant in Merchant::ALL {
            assert_eq!(merchant.id().parse::<Merchant>().unwrap(), merchant);
            assert_eq!(merchant.to_string(), merchant.id());
        }
        assert_eq!(" GoldAPI ".parse::<Merchant>().unwrap(), Merchant::GoldApi);
    }

    #[test]
    fn test_unknown_merchant_is_configuration_error() {
        let err = "kitco".parse::<Merchant>().unwrap_err();
        assert!(matches!(err, QuoteError::ConfigurationInvalid(_)));
        assert_eq!(err.to_string(), "Invalid configuration: Unknown merchant: kitco");
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let cases = [
            QuoteRequest::new("", "token", "INR"),
            QuoteRequest::new("goldapi", "  ", "INR"),
            QuoteRequest::new("goldapi", "token", ""),
            QuoteRequest::new("goldapi", "token", "INR/../x"),
        ];
        for request in cases {
            assert!(matches!(
                request.validate(),
                Err(QuoteError::ConfigurationInvalid(_))
            ));
        }

        let ok = QuoteRequest::new("metalpriceapi", "token", "INR");
        assert_eq!(ok.validate().unwrap(), Merchant::MetalPriceApi);
    }
}
