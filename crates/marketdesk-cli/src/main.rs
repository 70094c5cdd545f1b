//! marketdesk - command-line admin console for the marketplace backend.
//!
//! Signs in against the REST API, keeps the session tokens between runs and
//! gives access to the reference data, company and catalog collections.

mod args;
mod commands;
mod output;

use std::io;

use anyhow::Result;
use clap::Parser;
use marketdesk_core::config::Config;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::Cli;
use commands::App;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level (e.g. RUST_LOG=marketdesk_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first so clap sees MARKETDESK_API_BASE_URL from it
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    info!("marketdesk starting");

    let config = Config::load()?;
    let mut app = App::new(config, cli.base_url)?;
    app.run(cli.command).await
}
