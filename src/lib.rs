pub mod cli;
pub mod core;
pub mod providers;
pub mod scheduler;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{RateCache, RateSettings, RateSnapshot};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Show the rate, refreshing it when stale. `cached` never refreshes.
    Show { cached: bool },
    Create(RateSettings),
    Update(RateSettings),
    Refresh,
    Watch { every: Duration },
}

/// Builds the rate cache from config: fjall store plus the provider client.
pub fn build_rate_cache(config: &AppConfig) -> Result<RateCache> {
    let store = store::open_default(config)?;
    let client = providers::QuoteClient::new(config)?;
    Ok(RateCache::new(Arc::new(store), Arc::new(client)))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>, json: bool) -> Result<()> {
    info!("Gold rate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let cache = Arc::new(build_rate_cache(&config)?);

    match command {
        AppCommand::Show { cached: true } => {
            let snapshot = cache.cached().await?;
            cli::rate::print_snapshot(&snapshot, json)
        }
        AppCommand::Show { cached: false } => {
            let snapshot = with_spinner("Checking gold rate...", cache.read()).await?;
            cli::rate::print_snapshot(&snapshot, json)
        }
        AppCommand::Create(settings) => {
            let snapshot =
                with_spinner("Fetching initial gold rate...", cache.create(settings)).await?;
            cli::rate::print_snapshot(&snapshot, json)
        }
        AppCommand::Update(settings) => {
            let snapshot = with_spinner("Updating gold rate...", cache.update(settings)).await?;
            cli::rate::print_snapshot(&snapshot, json)
        }
        AppCommand::Refresh => {
            let snapshot = with_spinner("Refreshing gold rate...", cache.refresh()).await?;
            cli::rate::print_snapshot(&snapshot, json)
        }
        AppCommand::Watch { every } => {
            let scheduler = scheduler::RefreshScheduler::new(Arc::clone(&cache), every);
            scheduler
                .run_until(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                    }
                })
                .await;
            Ok(())
        }
    }
}

async fn with_spinner<F>(message: &str, operation: F) -> F::Output
where
    F: std::future::Future<Output = Result<RateSnapshot, crate::core::RateError>>,
{
    let pb = cli::ui::new_spinner(message);
    let result = operation.await;
    pb.finish_and_clear();
    result
}
