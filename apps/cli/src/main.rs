mod args;
mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use prodcat_core::CatalogConfig;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut config = CatalogConfig::from_env()?;
    cli.apply_overrides(&mut config);

    commands::run(cli.command, &config).await
}
