use async_trait::async_trait;

use crate::error::FleetError;

use super::types::{
    CapacityReservation, CapacityReservationRequest, Instance, InstanceConfiguration,
    InstanceConfigurationRequest, InstancePool, InstancePoolRequest, LaunchRequest, PoolInstance,
    ReservationConfig,
};

/// Remote operations the fleet utilities need from a compute provider.
///
/// Implementations must be safe to call from many tasks at once; the batch
/// dispatcher shares one client across every in-flight item.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Submits a launch request. Returns as soon as the provider accepts it.
    async fn launch_instance(&self, request: &LaunchRequest) -> Result<Instance, FleetError>;

    async fn get_instance(&self, instance_id: &str) -> Result<Instance, FleetError>;

    async fn terminate_instance(&self, instance_id: &str) -> Result<(), FleetError>;

    async fn create_instance_configuration(
        &self,
        request: &InstanceConfigurationRequest,
    ) -> Result<InstanceConfiguration, FleetError>;

    async fn create_instance_pool(
        &self,
        request: &InstancePoolRequest,
    ) -> Result<InstancePool, FleetError>;

    async fn get_instance_pool(&self, pool_id: &str) -> Result<InstancePool, FleetError>;

    /// Resizes a pool.
    async fn update_instance_pool(&self, pool_id: &str, size: u32)
        -> Result<InstancePool, FleetError>;

    /// Terminates a pool together with all of its instances.
    async fn terminate_instance_pool(&self, pool_id: &str) -> Result<(), FleetError>;

    /// Removes one instance from a pool, shrinking the pool and terminating
    /// the instance.
    async fn detach_pool_instance(&self, pool_id: &str, instance_id: &str)
        -> Result<(), FleetError>;

    async fn list_instance_pool_instances(
        &self,
        compartment_id: &str,
        pool_id: &str,
    ) -> Result<Vec<PoolInstance>, FleetError>;

    async fn create_capacity_reservation(
        &self,
        request: &CapacityReservationRequest,
    ) -> Result<CapacityReservation, FleetError>;

    async fn get_capacity_reservation(
        &self,
        reservation_id: &str,
    ) -> Result<CapacityReservation, FleetError>;

    /// Replaces the per-shape configurations of a reservation.
    async fn update_capacity_reservation(
        &self,
        reservation_id: &str,
        configs: &[ReservationConfig],
    ) -> Result<CapacityReservation, FleetError>;

    async fn delete_capacity_reservation(&self, reservation_id: &str) -> Result<(), FleetError>;

    async fn list_capacity_reservations(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<CapacityReservation>, FleetError>;
}
