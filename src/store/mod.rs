pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use anyhow::Result;
pub use disk::FjallRateStore;
pub use memory::MemoryRateStore;

/// Opens the persistent rate store under the configured data directory.
pub fn open_default(config: &AppConfig) -> Result<FjallRateStore> {
    let path = config.default_data_path()?.join("store");
    FjallRateStore::open(&path)
}
