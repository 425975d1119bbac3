//! The gold rate cache: decides between serving the stored quote and asking
//! the upstream provider for a new one.
//!
//! Every operation that may write runs inside one async critical section, so
//! load, refresh and save of the singleton record never interleave. A failed
//! refresh never clears a previously stored quote; the old quote is served
//! instead and tagged [`QuoteSource::ApiFailedServingCache`].

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::{QuoteError, RateError};
use crate::core::quote::QuoteProvider;
use crate::core::record::{CachedQuote, RateConfiguration, RateSettings, RateStore};
use crate::core::transform::{self, DEFAULT_MARKUP};

/// Hours after which a stored quote must be refreshed before it is served.
pub const STALENESS_WINDOW_HOURS: i64 = 24;

/// Where the quote in a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuoteSource {
    /// Served from the store without contacting the provider.
    #[serde(rename = "Database")]
    Cache,
    /// Freshly fetched from the provider.
    #[serde(rename = "API")]
    Api,
    /// The provider failed; the previous quote was served instead.
    #[serde(rename = "Degraded")]
    ApiFailedServingCache,
}

impl QuoteSource {
    pub fn tag(&self) -> &'static str {
        match self {
            QuoteSource::Cache => "cache",
            QuoteSource::Api => "api",
            QuoteSource::ApiFailedServingCache => "api-failed-serving-cache",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuoteSource::Cache => "Database",
            QuoteSource::Api => "API",
            QuoteSource::ApiFailedServingCache => "Degraded",
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, QuoteSource::ApiFailedServingCache)
    }
}

impl Display for QuoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Configuration plus quote, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pub merchant: String,
    #[serde(skip_serializing)]
    pub api_access_token: String,
    pub base_currency: String,
    pub quote: Decimal,
    pub refreshed_at: DateTime<Utc>,
    pub source: QuoteSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RateSnapshot {
    fn new(settings: RateSettings, cached: CachedQuote, source: QuoteSource) -> Self {
        Self {
            merchant: settings.merchant,
            api_access_token: settings.api_access_token,
            base_currency: settings.base_currency,
            quote: cached.quote,
            refreshed_at: cached.refreshed_at,
            source,
            warning: None,
        }
    }

    fn with_warning(mut self, warning: String) -> Self {
        self.warning = Some(warning);
        self
    }
}

pub struct RateCache {
    store: Arc<dyn RateStore>,
    provider: Arc<dyn QuoteProvider>,
    clock: Arc<dyn Clock>,
    markup: Decimal,
    staleness: Duration,
    lock: Mutex<()>,
}

impl RateCache {
    pub fn new(store: Arc<dyn RateStore>, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            store,
            provider,
            clock: Arc::new(SystemClock),
            markup: DEFAULT_MARKUP,
            staleness: Duration::hours(STALENESS_WINDOW_HOURS),
            lock: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_markup(mut self, markup: Decimal) -> Self {
        self.markup = markup;
        self
    }

    /// Returns the current quote, refreshing it first when it is missing or
    /// older than the staleness window.
    #[instrument(name = "RateRead", skip(self))]
    pub async fn read(&self) -> Result<RateSnapshot, RateError> {
        let _guard = self.lock.lock().await;
        let record = self.load_existing().await?;

        if let Some(cached) = self.fresh_quote(&record) {
            debug!(refreshed_at = %cached.refreshed_at, "Serving cached gold rate");
            return Ok(RateSnapshot::new(record.settings, cached, QuoteSource::Cache));
        }

        debug!("Cached gold rate missing or stale, refreshing");
        self.refresh_record(record, None).await
    }

    /// Entry point for the background scheduler; same policy as [`Self::read`].
    pub async fn refresh_if_stale(&self) -> Result<RateSnapshot, RateError> {
        self.read().await
    }

    /// Returns the stored quote without ever contacting the provider.
    pub async fn cached(&self) -> Result<RateSnapshot, RateError> {
        let record = self.load_existing().await?;
        let cached = record.cached.ok_or(RateError::NotConfigured)?;
        Ok(RateSnapshot::new(record.settings, cached, QuoteSource::Cache))
    }

    /// Refreshes the quote with the stored settings regardless of its age.
    #[instrument(name = "RateRefresh", skip(self))]
    pub async fn refresh(&self) -> Result<RateSnapshot, RateError> {
        let _guard = self.lock.lock().await;
        let record = self.load_existing().await?;
        self.refresh_record(record, None).await
    }

    /// Creates the singleton record. Nothing is stored unless the initial
    /// fetch succeeds.
    #[instrument(name = "RateCreate", skip_all, fields(merchant = %settings.merchant, currency = %settings.base_currency))]
    pub async fn create(&self, settings: RateSettings) -> Result<RateSnapshot, RateError> {
        let _guard = self.lock.lock().await;
        if self.store.load().await?.is_some() {
            return Err(RateError::AlreadyConfigured);
        }
        settings.to_request().validate()?;

        let cached = self.fetch_quote(&settings).await?;
        let record = RateConfiguration {
            settings,
            cached: Some(cached),
        };
        self.store.save(&record).await?;
        info!(quote = %cached.quote, "Gold rate configured");

        Ok(RateSnapshot::new(record.settings, cached, QuoteSource::Api))
    }

    /// Applies new settings. Changed settings always trigger a refresh; the
    /// change is stored only if that refresh succeeds.
    #[instrument(name = "RateUpdate", skip_all, fields(merchant = %settings.merchant, currency = %settings.base_currency))]
    pub async fn update(&self, settings: RateSettings) -> Result<RateSnapshot, RateError> {
        let _guard = self.lock.lock().await;
        let record = self.load_existing().await?;
        settings.to_request().validate()?;

        if settings != record.settings {
            info!("Gold rate settings changed, forcing refresh");
            return self.refresh_record(record, Some(settings)).await;
        }

        if let Some(cached) = self.fresh_quote(&record) {
            debug!("Settings unchanged and quote fresh, nothing to do");
            return Ok(RateSnapshot::new(record.settings, cached, QuoteSource::Cache));
        }

        self.refresh_record(record, None).await
    }

    async fn load_existing(&self) -> Result<RateConfiguration, RateError> {
        self.store.load().await?.ok_or(RateError::NotConfigured)
    }

    fn fresh_quote(&self, record: &RateConfiguration) -> Option<CachedQuote> {
        let cached = record.cached?;
        let age = self.clock.now() - cached.refreshed_at;
        (age < self.staleness).then_some(cached)
    }

    async fn fetch_quote(&self, settings: &RateSettings) -> Result<CachedQuote, QuoteError> {
        let raw = self.provider.fetch_spot(&settings.to_request()).await?;
        let quote = transform::retail_quote(&raw, self.markup)?;
        Ok(CachedQuote {
            quote,
            refreshed_at: self.clock.now(),
        })
    }

    async fn refresh_record(
        &self,
        record: RateConfiguration,
        proposed: Option<RateSettings>,
    ) -> Result<RateSnapshot, RateError> {
        let settings = proposed.unwrap_or_else(|| record.settings.clone());

        match self.fetch_quote(&settings).await {
            Ok(cached) => {
                let updated = RateConfiguration {
                    settings,
                    cached: Some(cached),
                };
                self.store.save(&updated).await?;
                info!(quote = %cached.quote, "Gold rate refreshed");
                Ok(RateSnapshot::new(updated.settings, cached, QuoteSource::Api))
            }
            Err(err) if !err.is_recoverable() => Err(err.into()),
            Err(err) => match record.cached {
                Some(previous) => {
                    warn!(error = %err, "Gold rate refresh failed, serving cached quote");
                    Ok(RateSnapshot::new(
                        record.settings,
                        previous,
                        QuoteSource::ApiFailedServingCache,
                    )
                    .with_warning(err.to_string()))
                }
                None => Err(RateError::RefreshFailed(err)),
            },
        }
    }
}
