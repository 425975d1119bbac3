//! Core business logic abstractions

pub mod clock;
pub mod config;
pub mod error;
pub mod log;
pub mod quote;
pub mod rates;
pub mod record;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for cleaner imports
pub use error::{QuoteError, RateError};
pub use quote::{Merchant, QuoteProvider, QuoteRequest, RawQuote};
pub use rates::{QuoteSource, RateCache, RateSnapshot};
pub use record::{CachedQuote, RateConfiguration, RateSettings, RateStore};
