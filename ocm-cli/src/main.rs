//! ocm - command line tool for the open carbon map.

use clap::Parser;
use ocm_core::config::MapConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ocm", version, about = "Open carbon map toolkit")]
struct Cli {
    /// JSON map configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: ocm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    log::debug!("Using API at '{}'", config.api_url);

    ocm_cmd::run(cli.command, config).await
}
