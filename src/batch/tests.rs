use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use proptest::prelude::*;
use tokio::time::{sleep, Instant};

use super::{aggregate, Dispatcher, OperationError, Outcome};

fn instant_success(item: usize) -> Outcome<usize, String> {
    Outcome::success(item, format!("ocid-{item}"), Utc::now())
}

#[derive(Default)]
struct InFlight {
    current: usize,
    peak: usize,
}

#[tokio::test(start_paused = true)]
async fn five_items_two_at_a_time_all_succeed() {
    let dispatcher = Dispatcher::new(2).unwrap();
    let outcomes = dispatcher
        .run((0..5).collect(), |item| async move { instant_success(item) })
        .await;

    let summary = aggregate(outcomes);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.succeeded, 5);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.success_items.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn never_exceeds_the_ceiling() {
    let gauge = Arc::new(Mutex::new(InFlight::default()));
    let dispatcher = Dispatcher::new(3).unwrap();

    let op_gauge = gauge.clone();
    let outcomes = dispatcher
        .run((0..20).collect(), move |item: usize| {
            let gauge = op_gauge.clone();
            async move {
                {
                    let mut g = gauge.lock().unwrap();
                    g.current += 1;
                    g.peak = g.peak.max(g.current);
                    assert!(g.current <= 3, "{} operations in flight", g.current);
                }
                sleep(Duration::from_millis(10 + (item as u64 * 7) % 23)).await;
                gauge.lock().unwrap().current -= 1;
                instant_success(item)
            }
        })
        .await;

    assert_eq!(outcomes.len(), 20);
    let g = gauge.lock().unwrap();
    assert_eq!(g.current, 0);
    assert_eq!(g.peak, 3);
}

#[tokio::test(start_paused = true)]
async fn serial_dispatch_preserves_item_order() {
    let dispatcher = Dispatcher::new(1).unwrap();
    let outcomes = dispatcher
        .run((0..8).collect(), |item: usize| async move {
            // later items finish faster, so only admission order keeps them sorted
            sleep(Duration::from_millis(100 - item as u64 * 10)).await;
            instant_success(item)
        })
        .await;

    let order: Vec<usize> = outcomes.iter().map(|o| *o.item()).collect();
    assert_eq!(order, (0..8).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn ceiling_above_item_count_runs_everything_at_once() {
    let dispatcher = Dispatcher::new(10).unwrap();
    let start = Instant::now();
    let outcomes = dispatcher
        .run((0..4).collect(), |item: usize| async move {
            sleep(Duration::from_secs(1)).await;
            instant_success(item)
        })
        .await;

    assert_eq!(outcomes.len(), 4);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn one_failure_does_not_stop_the_others() {
    let dispatcher = Dispatcher::new(3).unwrap();
    let outcomes = dispatcher
        .run(vec!["a", "b", "c"], |item: &'static str| async move {
            let started_at = Utc::now();
            if item == "b" {
                return Outcome::failure(
                    item,
                    OperationError::Submit("quota exceeded".to_string()),
                    started_at,
                );
            }
            sleep(Duration::from_millis(50)).await;
            Outcome::success(item, item.to_uppercase(), started_at)
        })
        .await;

    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(*failed[0].item(), "b");
    assert!(matches!(failed[0].error(), Some(OperationError::Submit(_))));

    let summary = aggregate(outcomes);
    assert_eq!((summary.succeeded, summary.failed), (2, 1));
    let mut values = summary.success_items;
    values.sort();
    assert_eq!(values, vec!["A".to_string(), "C".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn observer_sees_every_outcome_once() {
    let dispatcher = Dispatcher::new(4).unwrap();
    let mut seen = Vec::new();
    let outcomes = dispatcher
        .run_observed(
            (0..6).collect(),
            |item: usize| async move { instant_success(item) },
            |outcome| seen.push(*outcome.item()),
        )
        .await;

    assert_eq!(seen.len(), 6);
    let arrival: Vec<usize> = outcomes.iter().map(|o| *o.item()).collect();
    assert_eq!(seen, arrival);
}

#[tokio::test(start_paused = true)]
async fn stagger_delays_every_admission() {
    let dispatcher = Dispatcher::new(5)
        .unwrap()
        .stagger(Duration::from_millis(1500));
    let start = Instant::now();
    let outcomes = dispatcher
        .run((0..3).collect(), |item: usize| async move {
            instant_success(item)
        })
        .await;

    assert_eq!(outcomes.len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(4500));
}

#[tokio::test(start_paused = true)]
async fn stagger_applies_to_the_first_item_too() {
    let dispatcher = Dispatcher::new(1)
        .unwrap()
        .stagger(Duration::from_millis(1500));
    let start = Instant::now();
    let admitted_at = Arc::new(Mutex::new(None));

    let seen = admitted_at.clone();
    dispatcher
        .run(vec![0usize], move |item| {
            let seen = seen.clone();
            async move {
                *seen.lock().unwrap() = Some(start.elapsed());
                instant_success(item)
            }
        })
        .await;

    let admitted = admitted_at.lock().unwrap().unwrap();
    assert!(admitted >= Duration::from_millis(1500));
}

#[tokio::test]
async fn empty_batch_returns_nothing() {
    let dispatcher = Dispatcher::new(2).unwrap();
    let outcomes = dispatcher
        .run(Vec::<usize>::new(), |item| async move { instant_success(item) })
        .await;
    assert!(outcomes.is_empty());
    assert_eq!(aggregate(outcomes).total, 0);
}

#[test]
fn zero_parallelism_is_rejected() {
    assert!(Dispatcher::new(0).is_err());
}

#[tokio::test]
#[should_panic(expected = "boom")]
async fn panicking_operation_is_reraised() {
    let dispatcher = Dispatcher::new(2).unwrap();
    dispatcher
        .run((0..3).collect(), |item: usize| async move {
            if item == 1 {
                panic!("boom");
            }
            instant_success(item)
        })
        .await;
}

proptest! {
    #[test]
    fn successes_plus_failures_cover_every_item(
        fails in proptest::collection::vec(any::<bool>(), 0..40),
        max_parallel in 1usize..8,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let total = fails.len();
        let items: Vec<(usize, bool)> = fails.into_iter().enumerate().collect();
        let summary = runtime.block_on(async {
            let outcomes = Dispatcher::new(max_parallel)
                .unwrap()
                .run(items, |(idx, fail)| async move {
                    if fail {
                        Outcome::failure(
                            (idx, fail),
                            OperationError::Submit("rejected".to_string()),
                            Utc::now(),
                        )
                    } else {
                        Outcome::success((idx, fail), idx, Utc::now())
                    }
                })
                .await;
            aggregate(outcomes)
        });

        prop_assert_eq!(summary.total, total);
        prop_assert_eq!(summary.success_items.len() + summary.failed, total);
    }
}
