use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::quote::Merchant;

pub const DEFAULT_GOLDAPI_URL: &str = "https://www.goldapi.io";
pub const DEFAULT_METALPRICEAPI_URL: &str = "https://api.metalpriceapi.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderEndpoint {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub goldapi: Option<ProviderEndpoint>,
    pub metalpriceapi: Option<ProviderEndpoint>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            goldapi: Some(ProviderEndpoint {
                base_url: DEFAULT_GOLDAPI_URL.to_string(),
            }),
            metalpriceapi: Some(ProviderEndpoint {
                base_url: DEFAULT_METALPRICEAPI_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    /// Base URL for a merchant, falling back to the public endpoint.
    pub fn base_url(&self, merchant: Merchant) -> &str {
        match merchant {
            Merchant::GoldApi => self
                .goldapi
                .as_ref()
                .map_or(DEFAULT_GOLDAPI_URL, |p| &p.base_url),
            Merchant::MetalPriceApi => self
                .metalpriceapi
                .as_ref()
                .map_or(DEFAULT_METALPRICEAPI_URL, |p| &p.base_url),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "goldrate", "goldrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("com", "goldrate", "goldrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        if config.request_timeout_secs == 0 {
            bail!(
                "Invalid config file {}: request_timeout_secs must be at least 1",
                path.as_ref().display()
            );
        }
        debug!("Successfully loaded config");
        Ok(config)
    }
}
