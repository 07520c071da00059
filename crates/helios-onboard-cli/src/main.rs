/*
[INPUT]:  CLI arguments, YAML configuration file, wallet key from the environment
[OUTPUT]: Authenticated onboarding session and printed session state
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or subcommands
*/

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use helios_onboard::EntryParams;
use tracing::info;
use tracing_subscriber::EnvFilter;

use helios_onboard_cli::{OnboardConfig, Runtime};

#[derive(Parser, Debug)]
#[command(name = "helios-onboard", version, about = "Helios wallet onboarding driver")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with the configured wallet key
    Login {
        /// Entry URL carrying `ref`, `linked` or `invite_required`
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// Reconcile and print the current session
    Status,
    /// Print invite quota and referral summary
    Referrals {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long = "page-size", default_value_t = 20)]
        page_size: u32,
    },
    /// Clear the stored session token
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = match &args.config_path {
        Some(path) => {
            info!(config_path = %path.display(), "loading configuration");
            OnboardConfig::from_file(path).context("load config")?
        }
        None => OnboardConfig::default(),
    };
    let runtime = Runtime::new(config)?;

    match args.command {
        Command::Login { url } => {
            let entry = match url {
                Some(url) => EntryParams::from_url(&url).context("parse entry url")?,
                None => EntryParams::default(),
            };
            runtime.login(entry).await
        }
        Command::Status => runtime.status().await,
        Command::Referrals { page, page_size } => runtime.referrals(page, page_size).await,
        Command::Logout => {
            runtime.logout();
            Ok(())
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
