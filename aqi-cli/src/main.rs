//! AQI CLI - Command line tool for precomputing and querying daily air-quality index data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aqi-cli",
    version,
    about = "Daily air-quality index toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: aqi_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    aqi_cmd::run(cli.command).await
}
