use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::FleetError;

use super::api::ComputeApi;
use super::types::{
    CapacityReservation, CapacityReservationRequest, Instance, InstanceConfiguration,
    InstanceConfigurationRequest, InstancePool, InstancePoolRequest, InstanceState, LaunchRequest,
    PoolInstance, ReservationConfig,
};

/// In-memory [`ComputeApi`] that records calls and replays scripted states.
#[derive(Default)]
pub(crate) struct MockCompute {
    pub calls: Mutex<Vec<String>>,
    /// Display names whose launch is rejected.
    pub reject_launch: Mutex<HashSet<String>>,
    /// Instance ids whose termination is rejected.
    pub reject_terminate: Mutex<HashSet<String>>,
    /// States returned by successive `get_instance` calls; the last one repeats.
    pub instance_states: Mutex<HashMap<String, VecDeque<InstanceState>>>,
    pub reservations: Mutex<HashMap<String, CapacityReservation>>,
    /// Upper bound the provider will actually grant per reservation.
    pub capacity_limits: Mutex<HashMap<String, u64>>,
    pub config_requests: Mutex<Vec<InstanceConfigurationRequest>>,
    pub pool_requests: Mutex<Vec<InstancePoolRequest>>,
}

impl MockCompute {
    pub fn instance_id(display_name: &str) -> String {
        format!("ocid1.instance.{display_name}")
    }

    pub fn script_states(&self, display_name: &str, states: Vec<InstanceState>) {
        self.instance_states
            .lock()
            .unwrap()
            .insert(Self::instance_id(display_name), states.into());
    }

    pub fn add_reservation(&self, id: &str, reserved: u64, limit: u64) {
        self.reservations.lock().unwrap().insert(
            id.to_string(),
            CapacityReservation {
                id: id.to_string(),
                display_name: id.to_string(),
                lifecycle_state: "ACTIVE".to_string(),
                availability_domain: "AD-1".to_string(),
                reserved_instance_count: reserved,
                used_instance_count: 0,
                time_created: None,
                configs: vec![ReservationConfig {
                    shape: "VM.Standard.E4.Flex".to_string(),
                    reserved_count: reserved,
                    ..Default::default()
                }],
            },
        );
        self.capacity_limits
            .lock()
            .unwrap()
            .insert(id.to_string(), limit);
    }

    pub fn calls_named(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn not_found(id: &str) -> FleetError {
        FleetError::ApiError {
            status: 404,
            code: "NotAuthorizedOrNotFound".to_string(),
            message: format!("{id} not found"),
        }
    }
}

#[async_trait]
impl ComputeApi for MockCompute {
    async fn launch_instance(&self, request: &LaunchRequest) -> Result<Instance, FleetError> {
        self.record(format!("launch {}", request.display_name));
        if self
            .reject_launch
            .lock()
            .unwrap()
            .contains(&request.display_name)
        {
            return Err(FleetError::ApiError {
                status: 400,
                code: "LimitExceeded".to_string(),
                message: "service limit reached".to_string(),
            });
        }
        Ok(Instance {
            id: Self::instance_id(&request.display_name),
            display_name: request.display_name.clone(),
            lifecycle_state: InstanceState::Provisioning,
            availability_domain: request.availability_domain.clone(),
            fault_domain: request.fault_domain.clone(),
        })
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Instance, FleetError> {
        self.record(format!("get {instance_id}"));
        let mut states = self.instance_states.lock().unwrap();
        let state = match states.get_mut(instance_id) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap_or(InstanceState::Running),
            Some(script) => script.front().cloned().unwrap_or(InstanceState::Running),
            None => InstanceState::Running,
        };
        Ok(Instance {
            id: instance_id.to_string(),
            display_name: instance_id.to_string(),
            lifecycle_state: state,
            availability_domain: "AD-1".to_string(),
            fault_domain: None,
        })
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<(), FleetError> {
        self.record(format!("terminate {instance_id}"));
        if self.reject_terminate.lock().unwrap().contains(instance_id) {
            return Err(Self::not_found(instance_id));
        }
        Ok(())
    }

    async fn create_instance_configuration(
        &self,
        request: &InstanceConfigurationRequest,
    ) -> Result<InstanceConfiguration, FleetError> {
        self.record(format!("create_config {}", request.display_name));
        self.config_requests.lock().unwrap().push(request.clone());
        Ok(InstanceConfiguration {
            id: "ocid1.instanceconfiguration.mock".to_string(),
            display_name: request.display_name.clone(),
        })
    }

    async fn create_instance_pool(
        &self,
        request: &InstancePoolRequest,
    ) -> Result<InstancePool, FleetError> {
        self.record(format!("create_pool {}", request.display_name));
        self.pool_requests.lock().unwrap().push(request.clone());
        Ok(InstancePool {
            id: "ocid1.instancepool.mock".to_string(),
            display_name: request.display_name.clone(),
            lifecycle_state: "PROVISIONING".to_string(),
            size: request.size,
        })
    }

    async fn get_instance_pool(&self, pool_id: &str) -> Result<InstancePool, FleetError> {
        self.record(format!("get_pool {pool_id}"));
        Ok(InstancePool {
            id: pool_id.to_string(),
            display_name: pool_id.to_string(),
            lifecycle_state: "RUNNING".to_string(),
            size: 1,
        })
    }

    async fn update_instance_pool(
        &self,
        pool_id: &str,
        size: u32,
    ) -> Result<InstancePool, FleetError> {
        self.record(format!("scale_pool {pool_id} {size}"));
        Ok(InstancePool {
            id: pool_id.to_string(),
            display_name: pool_id.to_string(),
            lifecycle_state: "SCALING".to_string(),
            size,
        })
    }

    async fn terminate_instance_pool(&self, pool_id: &str) -> Result<(), FleetError> {
        self.record(format!("terminate_pool {pool_id}"));
        Ok(())
    }

    async fn detach_pool_instance(
        &self,
        pool_id: &str,
        instance_id: &str,
    ) -> Result<(), FleetError> {
        self.record(format!("detach {pool_id} {instance_id}"));
        Ok(())
    }

    async fn list_instance_pool_instances(
        &self,
        _compartment_id: &str,
        pool_id: &str,
    ) -> Result<Vec<PoolInstance>, FleetError> {
        self.record(format!("list_pool {pool_id}"));
        Ok(Vec::new())
    }

    async fn create_capacity_reservation(
        &self,
        request: &CapacityReservationRequest,
    ) -> Result<CapacityReservation, FleetError> {
        self.record(format!("create_reservation {}", request.display_name));
        let id = format!("ocid1.capacityreservation.{}", request.display_name);
        self.add_reservation(&id, request.reserved_count, u64::MAX);
        self.get_capacity_reservation(&id).await
    }

    async fn get_capacity_reservation(
        &self,
        reservation_id: &str,
    ) -> Result<CapacityReservation, FleetError> {
        self.record(format!("get_reservation {reservation_id}"));
        self.reservations
            .lock()
            .unwrap()
            .get(reservation_id)
            .cloned()
            .ok_or_else(|| Self::not_found(reservation_id))
    }

    async fn update_capacity_reservation(
        &self,
        reservation_id: &str,
        configs: &[ReservationConfig],
    ) -> Result<CapacityReservation, FleetError> {
        self.record(format!("update_reservation {reservation_id}"));
        let limit = self
            .capacity_limits
            .lock()
            .unwrap()
            .get(reservation_id)
            .copied()
            .unwrap_or(u64::MAX);
        let mut reservations = self.reservations.lock().unwrap();
        let reservation = reservations
            .get_mut(reservation_id)
            .ok_or_else(|| Self::not_found(reservation_id))?;
        reservation.configs = configs
            .iter()
            .map(|c| ReservationConfig {
                reserved_count: c.reserved_count.min(limit),
                ..c.clone()
            })
            .collect();
        reservation.reserved_instance_count =
            reservation.configs.iter().map(|c| c.reserved_count).sum();
        Ok(reservation.clone())
    }

    async fn delete_capacity_reservation(&self, reservation_id: &str) -> Result<(), FleetError> {
        self.record(format!("delete_reservation {reservation_id}"));
        self.reservations
            .lock()
            .unwrap()
            .remove(reservation_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(reservation_id))
    }

    async fn list_capacity_reservations(
        &self,
        _compartment_id: &str,
    ) -> Result<Vec<CapacityReservation>, FleetError> {
        self.record("list_reservations".to_string());
        Ok(self.reservations.lock().unwrap().values().cloned().collect())
    }
}
