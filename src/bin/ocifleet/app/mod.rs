mod capacity;
mod instances;
mod pool;

use anyhow::Context;
use clap::Parser;
use ocifleet::config::load_config;

use crate::args::{CliArgs, Command};
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = load_config(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let _logger = init_logging(&config.logging, args.log_level.as_deref())?;

    match args.command {
        Command::Instances(instance_args) => instances::run(config, instance_args).await,
        Command::Pool(pool_args) => pool::run(config, pool_args).await,
        Command::Capacity(capacity_args) => capacity::run(config, capacity_args).await,
    }
}
