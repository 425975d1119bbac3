use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::snippet;
use crate::core::RawQuote;

pub struct GoldApiProvider {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GoldApiResponse {
    price: Option<f64>,
    currency: Option<String>,
    error: Option<String>,
}

impl GoldApiProvider {
    pub fn new(base_url: &str, client: Client) -> Self {
        GoldApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Fetches the XAU spot price per troy ounce in `currency`.
    #[instrument(name = "GoldApiFetch", skip(self, access_token))]
    pub async fn fetch_spot(&self, access_token: &str, currency: &str) -> Result<RawQuote> {
        let url = format!("{}/api/XAU/{}", self.base_url, currency);
        debug!("Requesting gold price from {}", url);

        let response = self
            .client
            .get(&url)
            .header("x-access-token", access_token)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency: {}", e, currency))?;

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

        let data: GoldApiResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", currency, e))?;

        if let Some(error) = data.error {
            return Err(anyhow!("Provider error for {}: {}", currency, error));
        }

        let price = data
            .price
            .ok_or_else(|| anyhow!("No price found for currency: {}", currency))?;
        debug!(price, "Received gold price");

        Ok(RawQuote {
            price_per_ounce: price,
            currency: data.currency.unwrap_or_else(|| currency.to_string()),
        })
    }
}
