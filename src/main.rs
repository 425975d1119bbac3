use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use goldrate::core::RateSettings;
use goldrate::core::log::init_logging;
use std::time::Duration;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SettingsArgs {
    /// Quote provider: goldapi or metalpriceapi
    #[arg(short, long)]
    merchant: String,

    /// API access token for the provider
    #[arg(short, long, env = "GOLDRATE_API_TOKEN", hide_env_values = true)]
    token: String,

    /// Currency the gold price is quoted in, e.g. INR
    #[arg(short = 'u', long)]
    currency: String,
}

impl From<SettingsArgs> for RateSettings {
    fn from(args: SettingsArgs) -> Self {
        RateSettings::new(&args.merchant, &args.token, &args.currency)
    }
}

impl From<Commands> for goldrate::AppCommand {
    fn from(cmd: Commands) -> goldrate::AppCommand {
        match cmd {
            Commands::Show { cached } => goldrate::AppCommand::Show { cached },
            Commands::Create(args) => goldrate::AppCommand::Create(args.into()),
            Commands::Update(args) => goldrate::AppCommand::Update(args.into()),
            Commands::Refresh => goldrate::AppCommand::Refresh,
            Commands::Watch { interval_secs } => goldrate::AppCommand::Watch {
                every: Duration::from_secs(interval_secs.max(1)),
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the current gold rate, refreshing it when stale
    Show {
        /// Only show the stored rate, never contact the provider
        #[arg(long)]
        cached: bool,
    },
    /// Register the provider settings and fetch the first rate
    Create(SettingsArgs),
    /// Change the provider settings
    Update(SettingsArgs),
    /// Fetch a new rate now
    Refresh,
    /// Keep the rate fresh until interrupted
    Watch {
        /// Seconds between staleness checks
        #[arg(long, default_value_t = 900)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => goldrate::cli::setup::setup(),
        Some(cmd) => {
            goldrate::run_command(cmd.into(), cli.config_path.as_deref(), cli.json).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
