//! Roadwatch - A Telegram notifier for traffic delays on a daily driving route.
//!
//! # Overview
//!
//! Roadwatch checks the traffic between two fixed points with the TomTom
//! routing API and sends a Telegram message describing the situation. When
//! the traffic delay of the primary route exceeds five minutes the message is
//! an alert comparing the primary route with the alternative TomTom proposes.
//!
//! Each invocation performs a single check and exits, it is meant to be
//! scheduled externally:
//!
//! ```text
//! # every weekday at 7:30 and 15:00
//! 30 7 * * 1-5  roadwatch --config /etc/roadwatch.yaml
//! 0 15 * * 1-5  roadwatch --config /etc/roadwatch.yaml
//! ```
//!
//! # Configuration
//!
//! Settings come from an optional YAML file and the environment, a `.env`
//! file being loaded into the environment first. See [`config`] for the
//! complete list.
//!
//! ```bash
//! export START_COORD="52.3676,4.9041"
//! export DESTINATION_COORD="52.0907,5.1214"
//! export TOMTOM_API_KEY="your-tomtom-key"
//! export TELEGRAM_TOKEN="123456:bot-token"
//! export MY_CHAT_ID="42"
//! roadwatch
//! ```
//!
//! # Architecture
//!
//! - [`config`] - Layered configuration loading
//! - [`routing`] - TomTom client and route summaries
//! - [`message`] - Alert and clear message composition
//! - [`notify`] - Telegram and dry-run notifiers
//! - [`watcher`] - The fetch → summarize → compose → notify pipeline
//!
//! # Exit Codes
//!
//! - `0` - The check completed, including when no message was needed, no
//!   route was found or the message could not be delivered
//! - `1` - Configuration error, missing credential or routing API failure
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info, warn};

use crate::{
    config::Config,
    notify::{ConsoleNotifier, TelegramNotifier},
    routing::TomTomRequester,
    watcher::{Outcome, Watcher},
};

mod config;
mod message;
mod notify;
mod routing;
mod watcher;

/// Command-line arguments for roadwatch.
///
/// # Examples
///
/// ```bash
/// roadwatch --config roadwatch.yaml --always-notify false
/// roadwatch --env-file /etc/roadwatch.env --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an optional YAML configuration file.
    ///
    /// Environment variables override the values of the file.
    #[arg(short, long)]
    config: Option<String>,

    /// Path to a `.env` file loaded into the environment before the
    /// configuration. A missing file is ignored.
    #[arg(short, long, default_value = ".env")]
    env_file: String,

    /// Send a reassurance message when traffic is clear, overriding the
    /// configuration.
    #[arg(long)]
    always_notify: Option<bool>,

    /// Print the message on standard output instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

/// Main entry point for roadwatch.
///
/// 1. **Argument Parsing**: Parses command-line arguments using `clap`
/// 2. **Environment File**: Loads the `.env` file, if present
/// 3. **Logging Setup**: `info` level by default, overridable with `RUST_LOG`
/// 4. **Configuration Loading**: Defaults, YAML file and environment
/// 5. **Check**: Runs a single [`Watcher`] pass and maps the result to the
///    exit code
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Loaded before the logger so RUST_LOG can come from the file
    let env_file = dotenvy::from_path(&args.env_file);

    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting roadwatch {}...", env!("CARGO_PKG_VERSION"));

    report_env_file(&args.env_file, env_file);

    let mut config = match Config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(always_notify) = args.always_notify {
        config.always_notify = always_notify;
    }
    debug!("config {:?}", &config);

    match check(&config, args.dry_run).await {
        Ok(outcome) => {
            info!("check finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs how loading the `.env` file went and returns whether it was loaded.
///
/// A missing or unreadable file never stops the run, the environment is
/// used as it is.
fn report_env_file(path: &str, result: Result<(), dotenvy::Error>) -> bool {
    match result {
        Ok(()) => {
            debug!("loaded environment file {}", path);
            true
        }
        Err(e) if e.not_found() => {
            debug!("no environment file {}", path);
            false
        }
        Err(e) => {
            warn!("ignoring environment file {}: {}", path, e);
            false
        }
    }
}

/// Runs one traffic check with the real routing client.
async fn check(config: &Config, dry_run: bool) -> Result<Outcome, anyhow::Error> {
    let requester = TomTomRequester::new(config).context("failed to build routing client")?;

    if dry_run {
        Watcher::new(config, requester, ConsoleNotifier).run().await
    } else {
        Watcher::new(config, requester, TelegramNotifier::new(config))
            .run()
            .await
    }
}
