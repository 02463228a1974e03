use anyhow::{bail, Context};
use ocifleet::compute::{provision_pool, ComputeApi};
use ocifleet::config::FleetConfig;
use ocifleet::OciClient;

use crate::args::{PoolAction, PoolArgs};
use crate::report;

fn require<'a>(value: &'a Option<String>, flag: &str, action: &str) -> anyhow::Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => bail!("{flag} is required for {action} action"),
    }
}

pub async fn run(mut config: FleetConfig, args: PoolArgs) -> anyhow::Result<()> {
    if let Some(compartment) = args.compartment.clone() {
        config.compartment_id = compartment;
    }
    if let Some(pool) = config.instance_pool.as_mut() {
        if let Some(count) = args.count {
            pool.size = count;
        }
        if let Some(name) = args.name.clone() {
            pool.display_name = name;
        }
    }

    match args.action {
        PoolAction::Create => create(&config, args.dry_run).await,
        PoolAction::Scale => {
            let pool_id = require(&args.pool_id, "--pool-id", "scale")?;
            let size = args
                .count
                .or_else(|| config.instance_pool.as_ref().map(|p| p.size))
                .unwrap_or(0);
            if size == 0 {
                bail!("instance pool size must be greater than 0; use --count to set it");
            }
            let client = OciClient::from_config(&config)?;
            println!("Scaling instance pool {pool_id} to {size} instances...");
            client
                .update_instance_pool(pool_id, size)
                .await
                .context("failed to scale instance pool")?;
            println!("Successfully scaled instance pool to {size} instances");
            Ok(())
        }
        PoolAction::Terminate => {
            let pool_id = require(&args.pool_id, "--pool-id", "terminate")?;
            let client = OciClient::from_config(&config)?;
            println!("Terminating instance pool {pool_id}...");
            client
                .terminate_instance_pool(pool_id)
                .await
                .context("failed to terminate instance pool")?;
            println!("Successfully terminated instance pool");
            Ok(())
        }
        PoolAction::Delete => {
            let pool_id = require(&args.pool_id, "--pool-id", "delete")?;
            let instance_id = require(&args.instance_id, "--instance-id", "delete")?;
            let client = OciClient::from_config(&config)?;
            println!("Detaching instance {instance_id} from pool {pool_id}...");
            client
                .detach_pool_instance(pool_id, instance_id)
                .await
                .context("failed to detach instance")?;
            println!("Successfully detached and terminated instance. Pool size reduced by 1.");
            Ok(())
        }
        PoolAction::List => {
            let pool_id = require(&args.pool_id, "--pool-id", "list")?;
            let client = OciClient::from_config(&config)?;
            println!("Listing instances in pool {pool_id}...");
            let instances = client
                .list_instance_pool_instances(&config.compartment_id, pool_id)
                .await
                .context("failed to list pool instances")?;
            println!();
            report::print_lines(&report::pool_instances(&instances));
            Ok(())
        }
    }
}

async fn create(config: &FleetConfig, dry_run: bool) -> anyhow::Result<()> {
    let pool = config.validate_pool()?;
    if pool.size == 0 {
        bail!("instance pool size must be greater than 0; use --count to set it");
    }
    if dry_run {
        report::print_lines(&report::pool_dry_run(pool));
        return Ok(());
    }

    let client = OciClient::from_config(config)?;
    println!("Creating instance pool with {} instances...", pool.size);
    let created = provision_pool(&client, pool, &config.compartment_id)
        .await
        .context("failed to create instance pool")?;
    println!(
        "Successfully created instance pool: {} (ID: {})",
        created.display_name, created.id
    );
    println!("Instance pool is now provisioning. Check OCI console for status.");
    Ok(())
}
