use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Why a single work item failed. Never fatal for the batch as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The one-shot create or terminate request was rejected.
    #[error("submit failed: {0}")]
    Submit(String),
    /// A lifecycle status check itself failed.
    #[error("status check failed: {0}")]
    Poll(String),
    /// The resource settled in a state that can no longer become successful.
    #[error("entered terminal state: {0}")]
    TerminalState(String),
    /// The success state was not observed before the deadline.
    #[error("timed out after {0:?} waiting for running state")]
    Timeout(Duration),
}

/// Terminal result of one work item.
#[derive(Debug, Clone)]
pub enum Outcome<I, T> {
    Success {
        item: I,
        value: T,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    Failure {
        item: I,
        error: OperationError,
        started_at: DateTime<Utc>,
    },
}

impl<I, T> Outcome<I, T> {
    /// Builds a success stamped with the current time as completion.
    pub fn success(item: I, value: T, started_at: DateTime<Utc>) -> Self {
        Outcome::Success {
            item,
            value,
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn failure(item: I, error: OperationError, started_at: DateTime<Utc>) -> Self {
        Outcome::Failure {
            item,
            error,
            started_at,
        }
    }

    pub fn item(&self) -> &I {
        match self {
            Outcome::Success { item, .. } | Outcome::Failure { item, .. } => item,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        match self {
            Outcome::Success { started_at, .. } | Outcome::Failure { started_at, .. } => {
                *started_at
            }
        }
    }

    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Outcome::Failure { error, .. } => Some(error),
            Outcome::Success { .. } => None,
        }
    }

    /// Time between start and completion, for successes only.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        match self {
            Outcome::Success {
                started_at,
                completed_at,
                ..
            } => Some(*completed_at - *started_at),
            Outcome::Failure { .. } => None,
        }
    }
}
