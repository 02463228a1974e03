//! Human-readable lines printed by the subcommands.

use chrono::{DateTime, SecondsFormat, Utc};
use ocifleet::capacity::{PrescaleReport, ReservationTarget};
use ocifleet::compute::{CapacityReservation, PoolInstance};
use ocifleet::config::{InstancePoolSettings, InstanceSettings};
use ocifleet::fleet::LaunchItem;
use ocifleet::Outcome;

const RULE_WIDTH: usize = 80;

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Formats a whole-second duration as `1h2m3s`, dropping leading zero units.
pub fn ready_in(elapsed: chrono::Duration) -> String {
    let total = elapsed.num_milliseconds().max(0);
    // round to the nearest second
    let secs = (total + 500) / 1000;
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

pub fn launch_line(outcome: &Outcome<LaunchItem, String>) -> String {
    match outcome {
        Outcome::Success {
            item,
            value,
            started_at,
            completed_at,
        } => format!(
            "✓ Successfully created {item} (ID: {value}) | launch: {} | running: {} | ready in: {}",
            timestamp(started_at),
            timestamp(completed_at),
            ready_in(*completed_at - *started_at)
        ),
        Outcome::Failure { item, error, .. } => format!("❌ Failed to create {item}: {error}"),
    }
}

pub fn terminate_line(outcome: &Outcome<String, String>) -> String {
    match outcome {
        Outcome::Success { item, .. } => format!("✓ Successfully terminated {item}"),
        Outcome::Failure { item, error, .. } => format!("❌ Failed to terminate {item}: {error}"),
    }
}

pub fn reservation_progress_line(outcome: &Outcome<ReservationTarget, u64>) -> String {
    match outcome {
        Outcome::Success { item, value, .. } => format!(
            "✓ {} now reserves {value} (started at {}, target {})",
            item.reservation_id, item.starting, item.target
        ),
        Outcome::Failure { item, error, .. } => {
            format!("❌ Failed to raise {}: {error}", item.reservation_id)
        }
    }
}

fn shape_lines(shape: &str, ocpus: f32, memory_in_gbs: f32, out: &mut Vec<String>) {
    out.push(format!("  Shape: {shape}"));
    if ocpus > 0.0 {
        out.push(format!("  OCPUs: {ocpus:.1}"));
    }
    if memory_in_gbs > 0.0 {
        out.push(format!("  Memory: {memory_in_gbs:.1} GB"));
    }
}

pub fn instances_dry_run(settings: &InstanceSettings, prefix: &str, count: u32) -> Vec<String> {
    let mut out = vec![
        "=== DRY RUN MODE ===".to_string(),
        format!("Would create {count} instances named {prefix}-1..{prefix}-{count} with:"),
    ];
    shape_lines(
        &settings.shape,
        settings.shape_config.ocpus,
        settings.shape_config.memory_in_gbs,
        &mut out,
    );
    out.push(format!("  Image: {}", settings.image_id));
    out.push(format!("  Subnet: {}", settings.subnet_id));
    out.push(format!(
        "  Availability Domain: {}",
        settings.availability_domain
    ));
    if let Some(reservation) = &settings.capacity_reservation_id {
        out.push(format!("  Capacity Reservation: {reservation}"));
    }
    out
}

pub fn pool_dry_run(pool: &InstancePoolSettings) -> Vec<String> {
    let template = &pool.instance_configuration;
    let mut out = vec![
        "=== DRY RUN MODE ===".to_string(),
        format!(
            "Would create instance pool {} with {} instances:",
            pool.display_name, pool.size
        ),
    ];
    shape_lines(
        &template.shape,
        template.shape_config.ocpus,
        template.shape_config.memory_in_gbs,
        &mut out,
    );
    out.push(format!("  Image: {}", template.image_id));
    out.push(format!("  Subnet: {}", template.subnet_id));
    for placement in &pool.placement {
        out.push(format!("  Placement: {}", placement.availability_domain));
    }
    for lb in &pool.load_balancers {
        out.push(format!(
            "  Load Balancer: {} ({}:{})",
            lb.load_balancer_id, lb.backend_set_name, lb.port
        ));
    }
    out
}

pub fn pool_instances(instances: &[PoolInstance]) -> Vec<String> {
    let mut out = vec![format!("Found {} instances:", instances.len())];
    for (n, instance) in instances.iter().enumerate() {
        out.push(format!("{}. ID: {}", n + 1, instance.id));
        out.push(format!("   Display Name: {}", instance.display_name));
        out.push(format!("   State: {}", instance.state));
        out.push(format!("   AD: {}", instance.availability_domain));
        if let Some(fault_domain) = &instance.fault_domain {
            out.push(format!("   Fault Domain: {fault_domain}"));
        }
        out.push(String::new());
    }
    out
}

pub fn reservations(reservations: &[CapacityReservation]) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = vec![rule.clone()];
    if reservations.is_empty() {
        out.push("No capacity reservations found.".to_string());
    }
    for reservation in reservations {
        out.push(String::new());
        out.push(format!("Name: {}", reservation.display_name));
        out.push(format!("  OCID: {}", reservation.id));
        out.push(format!("  State: {}", reservation.lifecycle_state));
        out.push(format!(
            "  Availability Domain: {}",
            reservation.availability_domain
        ));
        out.push(format!(
            "  Reserved Instances: {}",
            reservation.reserved_instance_count
        ));
        out.push(format!(
            "  Used Instances: {}",
            reservation.used_instance_count
        ));
        if let Some(created) = reservation.time_created {
            out.push(format!("  Created: {}", created.format("%Y-%m-%d %H:%M:%S")));
        }
    }
    out.push(rule);
    out
}

pub fn prescale_summary(report: &PrescaleReport) -> Vec<String> {
    vec![
        format!("Capacity mode: {:?}", report.capacity_mode),
        format!(
            "Safe capacity: {} ({} per AD across {} reservations)",
            report.safe_capacity, report.per_ad_capacity, report.reservation_count
        ),
        format!(
            "Requested: desired {}, minimum {}",
            report.desired_capacity, report.minimum_capacity
        ),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ocifleet::OperationError;

    #[test]
    fn durations_drop_leading_zero_units() {
        assert_eq!(ready_in(chrono::Duration::milliseconds(400)), "0s");
        assert_eq!(ready_in(chrono::Duration::milliseconds(44_600)), "45s");
        assert_eq!(ready_in(chrono::Duration::seconds(83)), "1m23s");
        assert_eq!(ready_in(chrono::Duration::seconds(3723)), "1h2m3s");
    }

    #[test]
    fn launch_lines_show_timestamps_and_ready_time() {
        let started_at = Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap();
        let item = LaunchItem {
            index: 1,
            display_name: "worker-1".to_string(),
        };
        let success = Outcome::Success {
            item: item.clone(),
            value: "ocid1.instance.a".to_string(),
            started_at,
            completed_at: started_at + chrono::Duration::seconds(95),
        };
        assert_eq!(
            launch_line(&success),
            "✓ Successfully created worker-1 (ID: ocid1.instance.a) | launch: 2026-10-17T08:00:00Z | running: 2026-10-17T08:01:35Z | ready in: 1m35s"
        );

        let failure: Outcome<LaunchItem, String> =
            Outcome::failure(item, OperationError::TerminalState("STOPPED".to_string()), started_at);
        assert!(launch_line(&failure).starts_with("❌ Failed to create worker-1: "));
        assert!(launch_line(&failure).contains("STOPPED"));
    }

    #[test]
    fn empty_reservation_list_says_so() {
        let lines = reservations(&[]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "No capacity reservations found.");
    }
}
