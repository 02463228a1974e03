use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use ocifleet::config::FleetConfig;
use ocifleet::fleet::{launch_batch, launch_items, terminate_batch};
use ocifleet::ledger::{read_ids, write_ids};
use ocifleet::{aggregate, Dispatcher, OciClient};

use crate::args::{InstancesAction, InstancesArgs};
use crate::report;

const DEFAULT_PREFIX: &str = "instance";

pub async fn run(mut config: FleetConfig, args: InstancesArgs) -> anyhow::Result<()> {
    if let Some(compartment) = args.compartment.clone() {
        config.compartment_id = compartment;
    }
    match args.action {
        InstancesAction::Create => create(&config, &args).await,
        InstancesAction::Terminate => terminate(&config, &args).await,
    }
}

async fn create(config: &FleetConfig, args: &InstancesArgs) -> anyhow::Result<()> {
    let settings = config.validate_instances()?;
    let count = args.count.unwrap_or(settings.count);
    if count == 0 {
        bail!("instance count must be greater than 0; use --count or instance_settings.count");
    }
    let prefix = args
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| Some(settings.display_name_prefix.clone()).filter(|n| !n.is_empty()))
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

    if args.dry_run {
        report::print_lines(&report::instances_dry_run(settings, &prefix, count));
        return Ok(());
    }

    let client = Arc::new(OciClient::from_config(config)?);
    let dispatcher = Dispatcher::new(args.parallel)?;
    println!(
        "Creating {count} instance(s) with up to {} in parallel...",
        dispatcher.max_parallel()
    );

    let outcomes = launch_batch(
        client,
        settings,
        &config.compartment_id,
        &dispatcher,
        settings.wait.into(),
        launch_items(&prefix, count),
        |outcome| println!("{}", report::launch_line(outcome)),
    )
    .await;
    let summary = aggregate(outcomes);

    println!(
        "\nSummary: {}/{} instances created successfully",
        summary.succeeded, summary.total
    );
    if !summary.success_items.is_empty() {
        match write_ids(&args.output, &summary.success_items) {
            Ok(()) => println!("Instance OCIDs written to {}", args.output.display()),
            Err(e) => {
                log::error!("writing {} failed: {e}", args.output.display());
                println!("Error writing instances to file: {e}");
            }
        }
    }
    Ok(())
}

async fn terminate(config: &FleetConfig, args: &InstancesArgs) -> anyhow::Result<()> {
    let ids = read_ids(&args.file)
        .with_context(|| format!("failed to read instance ids from {}", args.file.display()))?;
    if ids.is_empty() {
        println!("No instance IDs found in {}", args.file.display());
        return Ok(());
    }
    println!("Found {} instances to terminate", ids.len());

    let client = Arc::new(OciClient::from_config(config)?);
    let dispatcher =
        Dispatcher::new(args.parallel)?.stagger(Duration::from_millis(args.stagger_ms));
    let deadline = config.request_timeout();
    let outcomes = terminate_batch(client, ids, &dispatcher, deadline, |outcome| {
        println!("{}", report::terminate_line(outcome))
    })
    .await;
    let summary = aggregate(outcomes);

    println!(
        "\nSummary: {}/{} instances terminated successfully",
        summary.succeeded, summary.total
    );
    if summary.failed > 0 {
        println!("Failures: {}", summary.failed);
    }
    Ok(())
}
