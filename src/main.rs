use anyhow::Context;
use aqi_processor::cli::{run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("aqi-processor failed")
}
