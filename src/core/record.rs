//! The persisted rate configuration record and its repository.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::quote::QuoteRequest;

/// Merchant, credential and currency as supplied by a create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSettings {
    pub merchant: String,
    pub api_access_token: String,
    pub base_currency: String,
}

impl RateSettings {
    pub fn new(merchant: &str, api_access_token: &str, base_currency: &str) -> Self {
        Self {
            merchant: merchant.trim().to_lowercase(),
            api_access_token: api_access_token.trim().to_string(),
            base_currency: base_currency.trim().to_uppercase(),
        }
    }

    pub fn to_request(&self) -> QuoteRequest {
        QuoteRequest::new(&self.merchant, &self.api_access_token, &self.base_currency)
    }
}

/// A retail quote together with the moment it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedQuote {
    pub quote: Decimal,
    pub refreshed_at: DateTime<Utc>,
}

/// The singleton gold rate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateConfiguration {
    #[serde(flatten)]
    pub settings: RateSettings,
    #[serde(default)]
    pub cached: Option<CachedQuote>,
}

impl RateConfiguration {
    pub fn cached_quote(&self) -> Option<Decimal> {
        self.cached.map(|c| c.quote)
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.cached.map(|c| c.refreshed_at)
    }
}

/// Storage for the one rate configuration record.
///
/// `save` replaces the whole record in a single write so readers never see
/// a quote paired with a timestamp from another refresh.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn load(&self) -> Result<Option<RateConfiguration>>;
    async fn save(&self, record: &RateConfiguration) -> Result<()>;
}
