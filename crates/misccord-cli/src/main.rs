#![doc = include_str!("../README.md")]

mod config;
mod report;
mod telemetry;

use clap::Parser;
use config::{CliArgs, CliConfig};
use report::{LocalUsers, Report};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry(config.log_format)?;
    tracing::debug!(?config, "parsed configuration");

    let report = Report::build(config.task, &LocalUsers)?;
    println!("{}", report.render(config.output)?);
    Ok(())
}
