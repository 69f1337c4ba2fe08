//! fc-renew - Keeps free-tier FreeCloud servers alive.
//!
//! Logs into the portal for every configured account and renews each of its
//! machines for one more month.
//!
//! ## Usage
//!
//! ```bash
//! # One account on the command line
//! fc-renew -c '{"username":"me","password":"secret","machines":[1234]}'
//!
//! # Several accounts through the environment
//! export FC_PROFILES='{"username":"a","password":"x","machines":[1]},{"username":"b","password":"y","machines":[2,3]}'
//! fc-renew
//! ```
//!
//! Exits non-zero when the profiles cannot be read, or as soon as the portal
//! answers a renewal with a message it does not recognise. That second case stops
//! every remaining machine and account too, which can be surprising when only
//! one machine id is wrong.

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fc_renew::config::{resolve_profiles, PortalConfig};
use fc_renew::constants::PROFILES_ENV_KEY;
use fc_renew::utils::logger::setup_logger;
use fc_renew::utils::runner::{run_profiles, RunSummary};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "fc-renew", version, about = "Renew FreeCloud server leases")]
struct Cli {
    /// Profile JSON: one object or an array. Falls back to FC_PROFILES.
    #[arg(short = 'c', long = "config", value_name = "JSON")]
    config: Option<String>,

    /// Portal base url, overrides FC_BASE_URL.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds, overrides FC_TIMEOUT.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_logger();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(summary) => {
            info!(
                "Done: {} renewed, {} too early, {} failed logins",
                summary.renewed, summary.too_early, summary.auth_failures
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let env_profiles = env::var(PROFILES_ENV_KEY).ok();
    let profiles = resolve_profiles(cli.config.as_deref(), env_profiles.as_deref())
        .context("Failed to load profiles")?;

    let mut config = PortalConfig::new();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    config.validate().context("Invalid portal configuration")?;
    debug!("Portal config: {}", config);

    info!("Loaded {} profile(s)", profiles.len());
    let summary = run_profiles(&config, &profiles).await?;
    Ok(summary)
}
