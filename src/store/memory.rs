use crate::core::record::{RateConfiguration, RateStore};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory rate store, mainly for tests
#[derive(Clone, Default)]
pub struct MemoryRateStore {
    inner: Arc<Mutex<Option<RateConfiguration>>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn load(&self) -> Result<Option<RateConfiguration>> {
        let record = self.inner.lock().await.clone();
        debug!(found = record.is_some(), "Memory store LOAD");
        Ok(record)
    }

    async fn save(&self, record: &RateConfiguration) -> Result<()> {
        let mut slot = self.inner.lock().await;
        debug!("Memory store SAVE");
        *slot = Some(record.clone());
        Ok(())
    }
}
