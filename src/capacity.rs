//! Pre-scaling a set of capacity reservations ahead of a large launch.
//!
//! The desired and minimum totals are split evenly across the reservations
//! (one per availability domain). Each reservation is raised to its share and
//! watched until the provider grants it or the check budget runs out. The
//! capacity that is safe to use is the smallest per-domain gain times the
//! number of domains.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::try_join_all;
use serde::Serialize;
use tokio::time::sleep;

use crate::batch::{Dispatcher, OperationError, Outcome};
use crate::compute::{CapacityReservation, ComputeApi};
use crate::config::PrescaleSettings;
use crate::error::FleetError;

/// Per-reservation share of the requested totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrescalePlan {
    pub reservation_count: u64,
    pub desired_capacity: u64,
    pub minimum_capacity: u64,
    pub per_ad_desired: u64,
    pub per_ad_minimum: u64,
}

/// `floor(total / parts + 0.9)` in integer arithmetic: round up once the
/// remainder reaches a tenth of a part.
fn share(total: u64, parts: u64) -> u64 {
    let (whole, rem) = (total / parts, total % parts);
    if rem >= parts.div_ceil(10) {
        whole + 1
    } else {
        whole
    }
}

impl PrescalePlan {
    pub fn new(desired_capacity: u64, minimum_capacity: u64, reservation_count: usize) -> Self {
        let parts = reservation_count.max(1) as u64;
        Self {
            reservation_count: parts,
            desired_capacity,
            minimum_capacity,
            per_ad_desired: share(desired_capacity, parts),
            per_ad_minimum: share(minimum_capacity, parts),
        }
    }
}

/// One reservation to raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationTarget {
    pub reservation_id: String,
    pub starting: u64,
    pub target: u64,
}

impl fmt::Display for ReservationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} -> {})", self.reservation_id, self.starting, self.target)
    }
}

/// Result of the prescale run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CapacityMode {
    Desired,
    Minimum,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescaleReport {
    pub capacity_mode: CapacityMode,
    pub reservation_count: u64,
    pub desired_capacity: u64,
    pub minimum_capacity: u64,
    #[serde(rename = "perADCapacity")]
    pub per_ad_capacity: u64,
    pub safe_capacity: u64,
}

/// Classifies the capacity actually gained per reservation.
///
/// `added` holds one gain per reservation; a reservation that could not be
/// raised counts as zero.
pub fn evaluate(plan: &PrescalePlan, added: &[u64]) -> PrescaleReport {
    let per_ad_capacity = added.iter().copied().min().unwrap_or(0);
    let safe_capacity = per_ad_capacity * plan.reservation_count;
    let capacity_mode = if safe_capacity >= plan.desired_capacity {
        CapacityMode::Desired
    } else if safe_capacity >= plan.minimum_capacity {
        CapacityMode::Minimum
    } else {
        CapacityMode::Failed
    };
    PrescaleReport {
        capacity_mode,
        reservation_count: plan.reservation_count,
        desired_capacity: plan.desired_capacity,
        minimum_capacity: plan.minimum_capacity,
        per_ad_capacity,
        safe_capacity,
    }
}

fn primary_count(reservation: &CapacityReservation) -> Result<u64, FleetError> {
    reservation
        .primary_reserved_count()
        .ok_or_else(|| FleetError::ResponseFormatError {
            message: format!(
                "reservation {} has no instance reservation configs",
                reservation.id
            ),
            raw_response: String::new(),
        })
}

/// Raises every configured reservation and reports the usable capacity.
///
/// Failing to read a starting capacity aborts before anything is changed.
/// Failures while raising or watching one reservation only zero its gain.
pub async fn prescale<O>(
    api: Arc<dyn ComputeApi>,
    settings: &PrescaleSettings,
    dispatcher: &Dispatcher,
    observer: O,
) -> Result<PrescaleReport, FleetError>
where
    O: FnMut(&Outcome<ReservationTarget, u64>),
{
    let mut seen = HashSet::new();
    if let Some(id) = settings
        .reservation_ids
        .iter()
        .find(|id| !seen.insert(id.as_str()))
    {
        return Err(FleetError::InvalidRequest(format!(
            "reservation {id} is listed more than once"
        )));
    }

    let plan = PrescalePlan::new(
        settings.desired_capacity,
        settings.minimum_capacity,
        settings.reservation_ids.len(),
    );
    log::info!(
        "raising {} reservation(s) by {} each (minimum {})",
        plan.reservation_count,
        plan.per_ad_desired,
        plan.per_ad_minimum
    );

    let starting = try_join_all(
        settings
            .reservation_ids
            .iter()
            .map(|id| api.get_capacity_reservation(id)),
    )
    .await?;

    let mut targets = Vec::with_capacity(starting.len());
    for reservation in &starting {
        let start = primary_count(reservation)?;
        targets.push(ReservationTarget {
            reservation_id: reservation.id.clone(),
            starting: start,
            target: start + plan.per_ad_desired,
        });
    }

    let interval = Duration::from_secs(settings.check_interval_secs);
    let max_checks = settings.max_checks.max(1);
    let op = move |target: ReservationTarget| {
        let api = api.clone();
        async move {
            let started_at = Utc::now();
            match raise_and_watch(api.as_ref(), &target, interval, max_checks).await {
                Ok(reached) => Outcome::success(target, reached, started_at),
                Err(err) => Outcome::failure(target, err, started_at),
            }
        }
    };

    let outcomes = dispatcher.run_observed(targets, op, observer).await;
    let added: Vec<u64> = outcomes
        .iter()
        .map(|outcome| match outcome {
            Outcome::Success { item, value, .. } => value.saturating_sub(item.starting),
            Outcome::Failure { .. } => 0,
        })
        .collect();

    Ok(evaluate(&plan, &added))
}

async fn raise_and_watch(
    api: &dyn ComputeApi,
    target: &ReservationTarget,
    interval: Duration,
    max_checks: u32,
) -> Result<u64, OperationError> {
    let current = api
        .get_capacity_reservation(&target.reservation_id)
        .await
        .map_err(|err| OperationError::Submit(err.to_string()))?;
    let mut configs = current.configs.clone();
    match configs.first_mut() {
        Some(primary) => primary.reserved_count = target.target,
        None => {
            return Err(OperationError::Submit(
                "reservation has no instance reservation configs".to_string(),
            ))
        }
    }
    api.update_capacity_reservation(&target.reservation_id, &configs)
        .await
        .map_err(|err| OperationError::Submit(err.to_string()))?;

    let mut reached = 0;
    for check in 1..=max_checks {
        let reservation = api
            .get_capacity_reservation(&target.reservation_id)
            .await
            .map_err(|err| OperationError::Poll(err.to_string()))?;
        reached = reservation.primary_reserved_count().unwrap_or(0);
        if reached >= target.target {
            break;
        }
        log::debug!(
            "{} at {reached}/{} after check {check}",
            target.reservation_id,
            target.target
        );
        if check < max_checks {
            sleep(interval).await;
        }
    }
    Ok(reached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::mock::MockCompute;
    use rstest::rstest;

    #[rstest]
    #[case(100, 3, 34)]
    #[case(90, 3, 30)]
    #[case(100, 1, 100)]
    #[case(10, 4, 3)]
    #[case(0, 2, 0)]
    #[case(1, 10, 1)]
    #[case(1, 11, 0)]
    #[case(u64::MAX, 1, u64::MAX)]
    #[case(u64::MAX - 1, 2, u64::MAX / 2)]
    fn shares_round_like_the_capacity_planner(
        #[case] total: u64,
        #[case] parts: usize,
        #[case] expected: u64,
    ) {
        assert_eq!(PrescalePlan::new(total, 0, parts).per_ad_desired, expected);
    }

    #[test]
    fn modes_follow_the_smallest_gain() {
        let plan = PrescalePlan::new(100, 90, 3);
        assert_eq!(evaluate(&plan, &[34, 40, 35]).capacity_mode, CapacityMode::Desired);

        let minimum = evaluate(&plan, &[34, 30, 33]);
        assert_eq!(minimum.capacity_mode, CapacityMode::Minimum);
        assert_eq!(minimum.per_ad_capacity, 30);
        assert_eq!(minimum.safe_capacity, 90);

        assert_eq!(evaluate(&plan, &[34, 0, 34]).capacity_mode, CapacityMode::Failed);
    }

    #[test]
    fn report_serializes_with_planner_field_names() {
        let report = evaluate(&PrescalePlan::new(100, 90, 3), &[34, 34, 34]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["capacityMode"], "Desired");
        assert_eq!(json["perADCapacity"], 34);
        assert_eq!(json["safeCapacity"], 102);
    }

    fn settings(ids: &[&str]) -> PrescaleSettings {
        PrescaleSettings {
            reservation_ids: ids.iter().map(|s| s.to_string()).collect(),
            desired_capacity: 100,
            minimum_capacity: 90,
            check_interval_secs: 1,
            max_checks: 3,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn full_grant_reaches_desired() {
        let mock = Arc::new(MockCompute::default());
        for id in ["r1", "r2", "r3"] {
            mock.add_reservation(id, 5, u64::MAX);
        }

        let report = prescale(
            mock.clone(),
            &settings(&["r1", "r2", "r3"]),
            &Dispatcher::new(3).unwrap(),
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(report.capacity_mode, CapacityMode::Desired);
        assert_eq!(report.per_ad_capacity, 34);
        let reservations = mock.reservations.lock().unwrap();
        assert_eq!(reservations["r2"].primary_reserved_count(), Some(39));
    }

    #[tokio::test(start_paused = true)]
    async fn partial_grant_falls_back_to_minimum() {
        let mock = Arc::new(MockCompute::default());
        mock.add_reservation("r1", 0, 40);
        mock.add_reservation("r2", 10, 40);
        mock.add_reservation("r3", 0, 40);

        let report = prescale(
            mock.clone(),
            &settings(&["r1", "r2", "r3"]),
            &Dispatcher::new(2).unwrap(),
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(report.per_ad_capacity, 30);
        assert_eq!(report.safe_capacity, 90);
        assert_eq!(report.capacity_mode, CapacityMode::Minimum);
        assert_eq!(mock.calls_named("update_reservation r2"), 1);
        // r2 is capped at 40 of 44: starting read, pre-update read, three checks
        assert_eq!(mock.calls_named("get_reservation r2"), 5);
        assert_eq!(mock.calls_named("get_reservation r1"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_reservation_aborts_before_updates() {
        let mock = Arc::new(MockCompute::default());
        mock.add_reservation("r1", 0, u64::MAX);

        let err = prescale(
            mock.clone(),
            &settings(&["r1", "missing"]),
            &Dispatcher::new(2).unwrap(),
            |_| {},
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(mock.calls_named("update_reservation"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_reservation_is_rejected_before_any_call() {
        let mock = Arc::new(MockCompute::default());
        mock.add_reservation("r1", 30, u64::MAX);
        mock.add_reservation("r2", 30, u64::MAX);

        let err = prescale(
            mock.clone(),
            &settings(&["r1", "r1", "r2"]),
            &Dispatcher::new(3).unwrap(),
            |_| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FleetError::InvalidRequest(_)));
        assert_eq!(mock.calls_named("get_reservation"), 0);
        assert_eq!(mock.calls_named("update_reservation"), 0);
    }
}
