//! Bookdesk CLI - command-line host for the library console session gate.
//!
//! This is the composition root: it builds the one `AuthSession` for the
//! process, rehydrates it once at boot, and hands its receiver to the route
//! guard. There is no explicit teardown; the session lives as long as the
//! process.

mod commands;
mod presenter;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bookdesk_core::{
    ApiClient, AuthSession, CancelToken, Config, MemoryRouter, RouteGuard, RouteTable,
};

use commands::Command;
use presenter::TerminalPresenter;

/// Log file name prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "bookdesk.log";

/// Initialize the tracing subscriber for logging.
///
/// Returns the guard of the file writer, which must be held until exit so
/// buffered lines are flushed.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match config.cache_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn usage() -> &'static str {
    "Usage: bookdesk <command>\n\n\
     Commands:\n  \
     login [username]   Sign in (password is prompted)\n  \
     logout             Sign out and forget the stored session\n  \
     whoami             Show the signed-in user\n  \
     status             Show session state and credential expiry\n  \
     visit <path>       Run the route guard for a console page\n"
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Some(command) => command,
        None => {
            eprint!("{}", usage());
            std::process::exit(2);
        }
    };

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {:#}, using defaults", e);
            Config::default()
        }
    };

    let _log_guard = init_tracing(&config);
    info!(api = %config.api_base_url, store = ?config.store, "Bookdesk starting");

    let store = config.session_store().context("Failed to open session store")?;
    let api = ApiClient::new(config.api_base_url.clone()).context("Failed to create API client")?;
    let session = Arc::new(AuthSession::new(Arc::new(api), store));

    // Boot: rehydrate exactly once. The CLI never tears down mid-boot, so the
    // mount token is never cancelled.
    session.rehydrate(&CancelToken::new()).await;

    let guard = RouteGuard::new(
        session.subscribe(),
        Arc::new(MemoryRouter::new("/")),
        Arc::new(TerminalPresenter),
        Arc::new(RouteTable::default()),
    );

    let result = commands::run(command, &session, &guard, config).await;
    if let Err(ref e) = result {
        warn!(error = %e, "Command failed");
    }

    info!("Bookdesk shutting down");
    result
}
