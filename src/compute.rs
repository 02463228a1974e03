//! Provider-neutral view of the compute control plane.
//!
//! [`ComputeApi`] is the seam between the batch flows and a concrete client
//! such as [`crate::oci::OciClient`]. Requests and results here are plain
//! values; wire formats stay inside the client.

#[path = "compute/types.rs"]
mod types;

#[path = "compute/api.rs"]
mod api;

#[path = "compute/requests.rs"]
mod requests;

#[path = "compute/pool.rs"]
mod pool;

#[cfg(test)]
#[path = "compute/mock.rs"]
pub(crate) mod mock;


pub use api::ComputeApi;
pub use pool::provision_pool;
pub use requests::is_flexible_shape;
pub use types::{
    CapacityReservation, CapacityReservationRequest, Instance, InstanceConfiguration,
    InstanceConfigurationRequest, InstancePool, InstancePoolRequest, InstanceState, LaunchRequest,
    LoadBalancerAttachment, Placement, PoolInstance, ReservationConfig, ShapeConfig,
};
