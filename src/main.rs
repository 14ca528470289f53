//! Binary crate for the `skycast` command-line tool.

use anyhow::Result;
use clap::Parser;
use skycast_app::WeatherApp;
use skycast_core::Config;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = cli::Cli::parse();

    skycast_core::init()?;

    let (config, _) = Config::load_validated()?;

    let app = WeatherApp::from_config(&config)?;
    tracing::info!("Skycast started");

    cmd.run(app).await
}
