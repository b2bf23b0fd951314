//! solo-serve: a single-connection TCP server
//!
//! Modes:
//! - echo: every read is echoed back; `CLOSE` ends the connection and
//!   `QUIT` stops the server
//! - http: serves `/imageN.jpg` and `/fileN.html` from the serving
//!   directory, one GET per connection
//!
//! The port is drawn at random from 1024..=11023 and logged at startup.

use solo_serve::config::{Config, Mode};
use solo_serve::logger::Logger;
use solo_serve::protocols::echo::EchoHandler;
use solo_serve::protocols::http::{FileFetcher, HttpHandler};
use solo_serve::server::{local_addr, Listener};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        mode = ?config.mode,
        verbosity = config.verbosity,
        root = %config.root.display(),
        "Starting solo-serve"
    );

    let logger = Logger::new(config.verbosity);

    if let Err(e) = run(&config, logger) {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }

    Ok(())
}

/// Bind, then serve with the handler for the configured mode.
fn run(config: &Config, logger: Logger) -> Result<(), solo_serve::server::ServerError> {
    let mut listener = Listener::new(logger)?;
    let port = listener.bind()?;
    info!(addr = %local_addr(port), "Listening");

    match config.mode {
        Mode::Echo => listener.serve(&EchoHandler::new(logger)),
        Mode::Http => {
            let fetcher = FileFetcher::new(&config.root);
            info!(root = %fetcher.root().display(), "Serving files");
            listener.serve(&HttpHandler::new(logger, fetcher))
        }
    }
}
