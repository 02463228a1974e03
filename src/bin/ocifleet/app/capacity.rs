use std::sync::Arc;

use anyhow::{bail, Context};
use ocifleet::capacity::{prescale, CapacityMode};
use ocifleet::compute::{CapacityReservationRequest, ComputeApi};
use ocifleet::config::FleetConfig;
use ocifleet::{Dispatcher, OciClient};

use crate::args::{CapacityAction, CapacityArgs};
use crate::report;

pub async fn run(config: FleetConfig, args: CapacityArgs) -> anyhow::Result<()> {
    match args.action {
        CapacityAction::List => {
            let client = OciClient::from_config(&config)?;
            println!("Listing capacity reservations...");
            let reservations = client
                .list_capacity_reservations(&config.compartment_id)
                .await
                .context("failed to list capacity reservations")?;
            report::print_lines(&report::reservations(&reservations));
            Ok(())
        }
        CapacityAction::Create => {
            let Some(ad) = args.ad.as_deref().filter(|ad| !ad.is_empty()) else {
                bail!("availability domain (--ad) is required for creation");
            };
            let client = OciClient::from_config(&config)?;
            println!("Creating capacity reservation: {}", args.name);
            let request = CapacityReservationRequest::single_shape(
                &config.compartment_id,
                &args.name,
                ad,
                &args.shape,
                args.count,
                args.ocpus,
                args.memory,
            );
            let reservation = client
                .create_capacity_reservation(&request)
                .await
                .context("failed to create capacity reservation")?;
            println!("✓ Capacity reservation created successfully!");
            println!("  OCID: {}", reservation.id);
            println!("  State: {}", reservation.lifecycle_state);
            println!("\nAdd this to your config.yaml:");
            println!("  capacity_reservation_id: \"{}\"", reservation.id);
            Ok(())
        }
        CapacityAction::Delete => {
            let Some(id) = args.id.as_deref().filter(|id| !id.is_empty()) else {
                bail!("reservation id (--id) is required for deletion");
            };
            let client = OciClient::from_config(&config)?;
            println!("Deleting capacity reservation: {id}");
            client
                .delete_capacity_reservation(id)
                .await
                .context("failed to delete capacity reservation")?;
            println!("✓ Capacity reservation deleted successfully!");
            Ok(())
        }
        CapacityAction::Prescale => {
            let settings = config.validate_prescale()?;
            let client = Arc::new(OciClient::from_config(&config)?);
            let dispatcher = Dispatcher::new(args.parallel)?;
            println!(
                "Prescaling {} reservation(s) toward {} instances (minimum {})...",
                settings.reservation_ids.len(),
                settings.desired_capacity,
                settings.minimum_capacity
            );
            let outcome = prescale(client, settings, &dispatcher, |progress| {
                println!("{}", report::reservation_progress_line(progress))
            })
            .await
            .context("prescale failed")?;

            report::print_lines(&report::prescale_summary(&outcome));
            println!("{}", serde_json::to_string(&outcome)?);
            if outcome.capacity_mode == CapacityMode::Failed {
                log::warn!(
                    "only {} of the minimum {} instances could be reserved",
                    outcome.safe_capacity,
                    outcome.minimum_capacity
                );
            }
            Ok(())
        }
    }
}
