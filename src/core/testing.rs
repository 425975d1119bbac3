//! Test doubles shared by unit tests.

use crate::core::clock::Clock;
use crate::core::error::QuoteError;
use crate::core::quote::{QuoteProvider, QuoteRequest, RawQuote};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Provider returning a scripted spot price and counting calls.
pub struct StubProvider {
    outcome: Mutex<Result<f64, String>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<QuoteRequest>>,
}

impl StubProvider {
    pub fn returning(price_per_ounce: f64) -> Self {
        Self {
            outcome: Mutex::new(Ok(price_per_ounce)),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        let provider = Self::returning(0.0);
        provider.fail(message);
        provider
    }

    pub fn set_price(&self, price_per_ounce: f64) {
        *self.outcome.lock().unwrap() = Ok(price_per_ounce);
    }

    pub fn fail(&self, message: &str) {
        *self.outcome.lock().unwrap() = Err(message.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<QuoteRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl QuoteProvider for StubProvider {
    async fn fetch_spot(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            Ok(price_per_ounce) => Ok(RawQuote {
                price_per_ounce,
                currency: request.base_currency.clone(),
            }),
            Err(message) => Err(QuoteError::fetch_failed(&request.merchant, anyhow!(message))),
        }
    }
}
