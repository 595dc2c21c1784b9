// # ddnsd - DDNS Daemon
//
// CRITICAL RULES:
// - This is a THIN integration layer ONLY
// - DO NOT add DNS logic or update decisions here
// - All DDNS logic MUST be in ddns-core
//
// The ddnsd daemon is responsible for:
// 1. Reading configuration from flags / environment variables
// 2. Building the logger
// 3. Initializing the runtime
// 4. Wiring the IP source and provider into the engine and starting it
//
// ## Configuration
//
// ### Required
// - `--key` / `DDNS_API_KEY`: GoDaddy API key
// - `--secret` / `DDNS_API_SECRET`: GoDaddy API secret
// - `--domain` / `DDNS_DOMAIN`: Domain registered with GoDaddy
//
// ### Optional
// - `--subdomain` / `DDNS_SUBDOMAIN`: Record host name (default `@`)
// - `--interval` / `DDNS_INTERVAL`: Polling interval in seconds (default 600)
// - `--log` / `DDNS_LOG_FILE`: Log file (default standard output)
// - `--log-level` / `DDNS_LOG_LEVEL`: Log level (default info)
// - `--timeout` / `DDNS_HTTP_TIMEOUT`: Per-request timeout in seconds (default 30)
// - `--families` / `DDNS_FAMILIES`: `ipv4`, `ipv6` or both (default both)
// - `--dry-run` / `DDNS_DRY_RUN`: Read but never write records
//
// ## Example
//
// ```bash
// export DDNS_API_KEY=your_key
// export DDNS_API_SECRET=your_secret
// ddnsd --domain example.com --subdomain home --log /var/log/ddnsd.log
// ```

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use ddns_core::{DdnsConfig, DdnsEngine};
use ddns_ip_http::HttpIpSource;
use ddns_provider_godaddy::GoDaddyProvider;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Dispatch, error, info};

use crate::cli::Cli;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Validate configuration before anything else starts
    let config = cli.to_config();
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let dispatch = match logging::build_dispatch(&cli.log_destination(), cli.log_level) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("Logging setup error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Scoped to this thread; the engine carries its own handle to every task.
    let _log_guard = tracing::dispatcher::set_default(&dispatch);

    info!("Starting ddnsd v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Managing {} ({})",
        config.target,
        config
            .engine
            .enabled_families()
            .iter()
            .map(|family| family.record_type().as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        let engine = match build_engine(&config, dispatch) {
            Ok(engine) => engine,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return DdnsExitCode::ConfigError;
            }
        };

        if let Err(e) = run_daemon(engine).await {
            error!("Daemon error: {:#}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the IP source and provider into an engine
fn build_engine(config: &DdnsConfig, dispatch: Dispatch) -> Result<DdnsEngine> {
    let ip_source = Arc::new(HttpIpSource::from_config(config)?);
    let provider = Arc::new(GoDaddyProvider::from_config(config)?);

    Ok(DdnsEngine::new(ip_source, provider, config, dispatch)?)
}

/// Run the scheduler until the process is told to stop
async fn run_daemon(engine: DdnsEngine) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler = tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);

    // The scheduler may already be gone if it panicked; join reports that.
    let _ = shutdown_tx.send(());
    scheduler.await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
