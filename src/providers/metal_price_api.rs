//! Metal Price API adapter.
//!
//! The API quotes metals inverted: `rates.XAU` is how many troy ounces one
//! unit of the base currency buys, so the price per ounce is its reciprocal.

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::util::snippet;
use crate::core::RawQuote;

const GOLD_SYMBOL: &str = "XAU";

pub struct MetalPriceApiProvider {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct MetalPriceResponse {
    success: bool,
    #[serde(default)]
    rates: HashMap<String, f64>,
    error: Option<MetalPriceError>,
}

#[derive(Debug, Deserialize)]
struct MetalPriceError {
    #[serde(alias = "statusCode")]
    status_code: Option<u16>,
    message: Option<String>,
}

impl MetalPriceApiProvider {
    pub fn new(base_url: &str, client: Client) -> Self {
        MetalPriceApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    #[instrument(name = "MetalPriceApiFetch", skip(self, api_key))]
    pub async fn fetch_spot(&self, api_key: &str, currency: &str) -> Result<RawQuote> {
        let endpoint = format!("{}/v1/latest", self.base_url);
        debug!("Requesting gold price from {}", endpoint);

        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("api_key", api_key),
                ("base", currency),
                ("currencies", GOLD_SYMBOL),
            ],
        )
        .context("Invalid Metal Price API URL")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            // Drop the URL from the error, it carries the API key
            .map_err(|e| anyhow!("Request error: {} for currency: {}", e.without_url(), currency))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body for currency: {currency}"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency: {}: {}",
                status,
                currency,
                snippet(&text)
            ));
        }

        let data: MetalPriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", currency, e))?;

        if !data.success {
            let detail = data
                .error
                .map(|e| {
                    format!(
                        "{} ({})",
                        e.message.unwrap_or_else(|| "unknown error".to_string()),
                        e.status_code.map_or("no code".to_string(), |c| c.to_string())
                    )
                })
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(anyhow!("Provider error for {}: {}", currency, detail));
        }

        let rate = data
            .rates
            .get(GOLD_SYMBOL)
            .copied()
            .ok_or_else(|| anyhow!("No {} rate found for currency: {}", GOLD_SYMBOL, currency))?;

        if rate == 0.0 || !rate.is_finite() {
            return Err(anyhow!("Invalid {} rate {} for currency: {}", GOLD_SYMBOL, rate, currency));
        }

        let price = 1.0 / rate;
        debug!(rate, price, "Received gold rate");

        Ok(RawQuote {
            price_per_ounce: price,
            currency: currency.to_string(),
        })
    }
}
