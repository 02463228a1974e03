//! Per-item remote operations run by the batch dispatcher.
//!
//! [`launch_and_await`] submits a create request and then polls the new
//! resource at a fixed interval until it is running or settles in a terminal
//! state. [`terminate`] is a single request. Both run under one deadline per
//! item, which covers the submit request too.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{sleep, timeout};

use crate::batch::{OperationError, Outcome};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_MAX_WAIT_SECS: u64 = 30 * 60;

/// Where a polled resource stands relative to the state being waited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Succeeded,
    Failed,
}

/// A provider-reported lifecycle state that knows how to classify itself.
pub trait Lifecycle: Display {
    fn phase(&self) -> Phase;
}

/// Fixed-interval polling schedule with an overall deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
        }
    }
}

/// Submits a resource and waits for it to reach its success state.
///
/// The value of a successful outcome is the handle returned by `submit`;
/// its completion time is the moment the success state was observed.
pub async fn launch_and_await<I, H, S, E, Sub, SubFut, P, PollFut>(
    item: I,
    submit: Sub,
    poll: P,
    policy: WaitPolicy,
) -> Outcome<I, H>
where
    H: Clone,
    S: Lifecycle,
    E: Display,
    Sub: FnOnce() -> SubFut,
    SubFut: Future<Output = Result<H, E>>,
    P: FnMut(H) -> PollFut,
    PollFut: Future<Output = Result<S, E>>,
{
    let started_at = Utc::now();

    let settled = async move {
        let handle = submit()
            .await
            .map_err(|err| OperationError::Submit(err.to_string()))?;
        poll_until_settled(&handle, poll, policy.interval).await?;
        Ok::<_, OperationError>(handle)
    };

    match timeout(policy.max_wait, settled).await {
        Ok(Ok(handle)) => Outcome::success(item, handle, started_at),
        Ok(Err(err)) => Outcome::failure(item, err, started_at),
        Err(_) => Outcome::failure(item, OperationError::Timeout(policy.max_wait), started_at),
    }
}

async fn poll_until_settled<H, S, E, P, PollFut>(
    handle: &H,
    mut poll: P,
    interval: Duration,
) -> Result<(), OperationError>
where
    H: Clone,
    S: Lifecycle,
    E: Display,
    P: FnMut(H) -> PollFut,
    PollFut: Future<Output = Result<S, E>>,
{
    loop {
        let state = poll(handle.clone())
            .await
            .map_err(|err| OperationError::Poll(err.to_string()))?;
        match state.phase() {
            Phase::Succeeded => return Ok(()),
            Phase::Failed => return Err(OperationError::TerminalState(state.to_string())),
            Phase::Pending => {
                log::trace!("still {state}, checking again in {interval:?}");
                sleep(interval).await;
            }
        }
    }
}

/// Issues a single terminate request for `item`, giving up after `deadline`.
///
/// Success carries the item itself as its value.
pub async fn terminate<I, E, F, Fut>(item: I, request: F, deadline: Duration) -> Outcome<I, I>
where
    I: Clone,
    E: Display,
    F: FnOnce(I) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let started_at = Utc::now();
    match timeout(deadline, request(item.clone())).await {
        Ok(Ok(())) => Outcome::success(item.clone(), item, started_at),
        Ok(Err(err)) => Outcome::failure(item, OperationError::Submit(err.to_string()), started_at),
        Err(_) => Outcome::failure(item, OperationError::Timeout(deadline), started_at),
    }
}
