//! Bounded-concurrency batch execution.
//!
//! A [`Dispatcher`] fans a list of work items out to an async operation,
//! keeping at most `max_parallel` operations in flight. Every item yields
//! exactly one [`Outcome`]; [`aggregate`] folds those into a [`BatchSummary`].

#[path = "batch/types.rs"]
mod types;

#[path = "batch/dispatcher.rs"]
mod dispatcher;

#[path = "batch/summary.rs"]
mod summary;

#[cfg(test)]
#[path = "batch/tests.rs"]
mod tests;

pub use dispatcher::Dispatcher;
pub use summary::{aggregate, BatchSummary};
pub use types::{OperationError, Outcome};
