use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::time::sleep;

use crate::error::FleetError;

use super::types::Outcome;

/// Runs one async operation per work item under a fixed concurrency ceiling.
///
/// Items are admitted in order: a permit is taken from the semaphore before
/// the item's task is spawned and released only after its outcome has been
/// delivered. Completion order is whatever the remote side produces, except
/// with `max_parallel == 1`, where outcomes arrive in item order.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    max_parallel: usize,
    stagger: Duration,
}

impl Dispatcher {
    /// Creates a dispatcher allowing `max_parallel` operations in flight.
    pub fn new(max_parallel: usize) -> Result<Self, FleetError> {
        if max_parallel == 0 {
            return Err(FleetError::InvalidRequest(
                "parallelism must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_parallel,
            stagger: Duration::ZERO,
        })
    }

    /// Sets a fixed delay taken before each admission, the first included.
    pub fn stagger(mut self, delay: Duration) -> Self {
        self.stagger = delay;
        self
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Runs `op` for every item and returns the outcomes in arrival order.
    pub async fn run<I, T, F, Fut>(&self, items: Vec<I>, op: F) -> Vec<Outcome<I, T>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<I, T>> + Send + 'static,
    {
        self.run_observed(items, op, |_| {}).await
    }

    /// Like [`Dispatcher::run`], calling `observer` as each outcome arrives.
    ///
    /// `op` must turn its own failures into [`Outcome::Failure`]. A panic
    /// escaping `op` is re-raised here once every other item has finished.
    pub async fn run_observed<I, T, F, Fut, O>(
        &self,
        items: Vec<I>,
        op: F,
        mut observer: O,
    ) -> Vec<Outcome<I, T>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<I, T>> + Send + 'static,
        O: FnMut(&Outcome<I, T>),
    {
        let total = items.len();
        let stagger = self.stagger;
        let op = Arc::new(op);
        let permits = Arc::new(Semaphore::new(self.max_parallel));
        let (tx, mut rx) = mpsc::unbounded_channel::<Outcome<I, T>>();

        log::debug!(
            "dispatching {total} item(s) with at most {} in flight",
            self.max_parallel
        );

        let admit = async move {
            let mut handles = Vec::with_capacity(total);
            for (idx, item) in items.into_iter().enumerate() {
                if !stagger.is_zero() {
                    sleep(stagger).await;
                }
                // The semaphore is owned here and never closed.
                let Ok(permit) = permits.clone().acquire_owned().await else {
                    break;
                };
                log::trace!("admitted item {} of {total}", idx + 1);
                let op = op.clone();
                let tx = tx.clone();
                handles.push(tokio::spawn(async move {
                    let outcome = (*op)(item).await;
                    let _ = tx.send(outcome);
                    drop(permit);
                }));
            }
            drop(tx);
            handles
        };

        let drain = async {
            let mut outcomes = Vec::with_capacity(total);
            while let Some(outcome) = rx.recv().await {
                observer(&outcome);
                outcomes.push(outcome);
            }
            outcomes
        };

        let (handles, outcomes) = tokio::join!(admit, drain);

        for handle in handles {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    std::panic::resume_unwind(err.into_panic());
                }
                log::warn!("batch task cancelled: {err}");
            }
        }

        outcomes
    }
}
