//! Batch utilities for the Oracle Cloud compute control plane.
//!
//! The library launches, scales and tears down instances, instance pools
//! and capacity reservations. Work that touches many resources at once runs
//! through a bounded-concurrency [`batch::Dispatcher`] so that one slow or
//! failing item never holds up or aborts its siblings.
//!
//! The remote side is reached through the [`compute::ComputeApi`] trait;
//! [`oci::OciClient`] is the signed REST implementation used by the
//! `ocifleet` binary.

pub mod batch;
pub mod capacity;
pub mod compute;
pub mod config;
pub mod error;
pub mod fleet;
pub mod ledger;
pub mod oci;
pub mod wait;

pub use batch::{aggregate, BatchSummary, Dispatcher, OperationError, Outcome};
pub use compute::ComputeApi;
pub use config::{load_config, FleetConfig};
pub use error::FleetError;
pub use oci::OciClient;
