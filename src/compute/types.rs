use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::wait::{Lifecycle, Phase};

/// Lifecycle of a compute instance as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Moving,
    Provisioning,
    Running,
    Starting,
    Stopping,
    Stopped,
    CreatingImage,
    Terminating,
    Terminated,
    Other(String),
}

impl InstanceState {
    pub fn as_str(&self) -> &str {
        match self {
            InstanceState::Moving => "MOVING",
            InstanceState::Provisioning => "PROVISIONING",
            InstanceState::Running => "RUNNING",
            InstanceState::Starting => "STARTING",
            InstanceState::Stopping => "STOPPING",
            InstanceState::Stopped => "STOPPED",
            InstanceState::CreatingImage => "CREATING_IMAGE",
            InstanceState::Terminating => "TERMINATING",
            InstanceState::Terminated => "TERMINATED",
            InstanceState::Other(raw) => raw,
        }
    }
}

impl From<&str> for InstanceState {
    fn from(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "MOVING" => InstanceState::Moving,
            "PROVISIONING" => InstanceState::Provisioning,
            "RUNNING" => InstanceState::Running,
            "STARTING" => InstanceState::Starting,
            "STOPPING" => InstanceState::Stopping,
            "STOPPED" => InstanceState::Stopped,
            "CREATING_IMAGE" => InstanceState::CreatingImage,
            "TERMINATING" => InstanceState::Terminating,
            "TERMINATED" => InstanceState::Terminated,
            _ => InstanceState::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Lifecycle for InstanceState {
    fn phase(&self) -> Phase {
        match self {
            InstanceState::Running => Phase::Succeeded,
            InstanceState::Stopped | InstanceState::Terminating | InstanceState::Terminated => {
                Phase::Failed
            }
            _ => Phase::Pending,
        }
    }
}

/// Flexible-shape sizing sent with launch and reservation requests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapeConfig {
    pub ocpus: Option<f32>,
    pub memory_in_gbs: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchRequest {
    pub compartment_id: String,
    pub display_name: String,
    pub availability_domain: String,
    pub fault_domain: Option<String>,
    pub shape: String,
    pub shape_config: Option<ShapeConfig>,
    pub image_id: String,
    pub subnet_id: String,
    pub assign_public_ip: bool,
    pub capacity_reservation_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub freeform_tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: InstanceState,
    pub availability_domain: String,
    pub fault_domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceConfigurationRequest {
    pub compartment_id: String,
    pub display_name: String,
    pub shape: String,
    pub shape_config: Option<ShapeConfig>,
    pub image_id: String,
    pub subnet_id: String,
    pub assign_public_ip: bool,
    pub metadata: BTreeMap<String, String>,
    pub freeform_tags: BTreeMap<String, String>,
    pub defined_tags: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceConfiguration {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub availability_domain: String,
    pub primary_subnet_id: String,
    pub fault_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBalancerAttachment {
    pub load_balancer_id: String,
    pub backend_set_name: String,
    pub port: u16,
    pub vnic_selection: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePoolRequest {
    pub compartment_id: String,
    pub instance_configuration_id: String,
    pub display_name: String,
    pub size: u32,
    pub placements: Vec<Placement>,
    pub load_balancers: Vec<LoadBalancerAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancePool {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub size: u32,
}

/// One member of an instance pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolInstance {
    pub id: String,
    pub display_name: String,
    pub state: String,
    pub availability_domain: String,
    pub fault_domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityReservationRequest {
    pub compartment_id: String,
    pub display_name: String,
    pub availability_domain: String,
    pub shape: String,
    pub reserved_count: u64,
    pub shape_config: Option<ShapeConfig>,
}

/// Per-shape slice of a capacity reservation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationConfig {
    pub shape: String,
    pub reserved_count: u64,
    pub used_count: u64,
    pub shape_config: Option<ShapeConfig>,
    pub fault_domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapacityReservation {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub availability_domain: String,
    pub reserved_instance_count: u64,
    pub used_instance_count: u64,
    pub time_created: Option<DateTime<Utc>>,
    pub configs: Vec<ReservationConfig>,
}

impl CapacityReservation {
    /// Reserved count of the first per-shape configuration.
    pub fn primary_reserved_count(&self) -> Option<u64> {
        self.configs.first().map(|c| c.reserved_count)
    }
}
