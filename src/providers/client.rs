use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::goldapi::GoldApiProvider;
use super::metal_price_api::MetalPriceApiProvider;
use super::util::http_client;
use crate::core::config::AppConfig;
use crate::core::{Merchant, QuoteError, QuoteProvider, QuoteRequest, RawQuote};

/// Routes a quote request to the adapter of its merchant.
///
/// Makes exactly one outbound call per request. Every failure after input
/// validation is reported as [`QuoteError::QuoteFetchFailed`].
pub struct QuoteClient {
    goldapi: GoldApiProvider,
    metalpriceapi: MetalPriceApiProvider,
}

impl QuoteClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = http_client(config.request_timeout()).context("Failed to build HTTP client")?;
        Ok(Self {
            goldapi: GoldApiProvider::new(
                config.providers.base_url(Merchant::GoldApi),
                client.clone(),
            ),
            metalpriceapi: MetalPriceApiProvider::new(
                config.providers.base_url(Merchant::MetalPriceApi),
                client,
            ),
        })
    }
}

#[async_trait]
impl QuoteProvider for QuoteClient {
    async fn fetch_spot(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError> {
        let merchant = request.validate()?;
        debug!(%merchant, currency = %request.base_currency, "Fetching spot quote");

        let result = match merchant {
            Merchant::GoldApi => {
                self.goldapi
                    .fetch_spot(&request.access_token, &request.base_currency)
                    .await
            }
            Merchant::MetalPriceApi => {
                self.metalpriceapi
                    .fetch_spot(&request.access_token, &request.base_currency)
                    .await
            }
        };

        result.map_err(|e| QuoteError::fetch_failed(merchant.id(), e))
    }
}
