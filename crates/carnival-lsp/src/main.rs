//! carnival-lsp: language server binary for Carnival.
//!
//! Speaks LSP over stdio. Logs go to stderr since stdout is the protocol
//! channel.
//!
//! # Usage
//!
//! ```bash
//! carnival-lsp --config ~/.config/carnival/config.toml --log-level debug
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lsp_server::Connection;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use carnival_lsp::ServerConfig;

#[derive(Debug, Parser)]
#[command(name = "carnival-lsp", version, about)]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/carnival/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level directive for this server, e.g. `debug`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("carnival_lsp={}", args.log_level).parse()?)
                .add_directive(format!("carnival_kernel={}", args.log_level).parse()?),
        )
        .init();

    tracing::info!("Starting carnival language server");

    let config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    let (connection, io_threads) = Connection::stdio();
    carnival_lsp::run(&connection, config)?;
    drop(connection);
    io_threads.join().context("Failed to join stdio threads")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
