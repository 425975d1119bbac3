//! Error types for quote fetching and the rate cache.

use thiserror::Error;

/// Failures of a single quote fetch: provider call plus transformation.
///
/// Callers implementing fallback treat `QuoteFetchFailed` and
/// `TransformationFailed` alike; `ConfigurationInvalid` is raised before any
/// network traffic happens.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// A required configuration field is missing or unrecognised.
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// The provider was unreachable or returned unusable data.
    #[error("Quote fetch failed for {merchant}: {source}")]
    QuoteFetchFailed {
        merchant: String,
        #[source]
        source: anyhow::Error,
    },

    /// The raw quote could not be turned into a retail price.
    #[error("Quote transformation failed: {0}")]
    TransformationFailed(String),
}

impl QuoteError {
    pub fn fetch_failed(merchant: &str, source: anyhow::Error) -> Self {
        QuoteError::QuoteFetchFailed {
            merchant: merchant.to_string(),
            source,
        }
    }

    /// True for errors the rate cache may recover from by serving a stale quote.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QuoteError::QuoteFetchFailed { .. } | QuoteError::TransformationFailed(_)
        )
    }
}

/// Errors surfaced by the rate cache controller.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("Gold rate is not configured; create the settings first")]
    NotConfigured,

    #[error("Gold rate settings already exist; use update instead")]
    AlreadyConfigured,

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// A refresh failed and there was no earlier quote to fall back on.
    #[error("Refresh failed: {0}")]
    RefreshFailed(#[source] QuoteError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<QuoteError> for RateError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::ConfigurationInvalid(msg) => RateError::ConfigurationInvalid(msg),
            other => RateError::RefreshFailed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_recoverable_classification() {
        assert!(QuoteError::fetch_failed("goldapi", anyhow!("timeout")).is_recoverable());
        assert!(QuoteError::TransformationFailed("zero".into()).is_recoverable());
        assert!(!QuoteError::ConfigurationInvalid("merchant".into()).is_recoverable());
    }

    #[test]
    fn test_conversion_keeps_configuration_errors_separate() {
        let err: RateError = QuoteError::ConfigurationInvalid("token is empty".into()).into();
        assert!(matches!(err, RateError::ConfigurationInvalid(_)));

        let err: RateError = QuoteError::fetch_failed("goldapi", anyhow!("HTTP 500")).into();
        assert!(matches!(
            err,
            RateError::RefreshFailed(QuoteError::QuoteFetchFailed { .. })
        ));
        assert_eq!(
            err.to_string(),
            "Refresh failed: Quote fetch failed for goldapi: HTTP 500"
        );
    }
}
