use crate::core::record::{RateConfiguration, RateStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "rate";
const RECORD_KEY: &[u8] = b"configuration";

/// Rate store persisted in a fjall keyspace.
///
/// The record is one JSON value under a single key, so each save swaps the
/// whole record at once.
pub struct FjallRateStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallRateStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open rate partition")?;

        debug!("Opened rate store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl RateStore for FjallRateStore {
    async fn load(&self) -> Result<Option<RateConfiguration>> {
        match self.partition.get(RECORD_KEY)? {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .context("Stored rate configuration is corrupt")?;
                debug!("Store HIT for rate configuration");
                Ok(Some(record))
            }
            None => {
                debug!("Store MISS for rate configuration");
                Ok(None)
            }
        }
    }

    async fn save(&self, record: &RateConfiguration) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.partition.insert(RECORD_KEY, bytes)?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist rate configuration")?;
        debug!("Store PUT for rate configuration");
        Ok(())
    }
}
