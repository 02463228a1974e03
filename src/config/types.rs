use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::wait::WaitPolicy;

const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;
const DEFAULT_WAIT_INTERVAL_SECS: u64 = 10;
const DEFAULT_MAX_WAIT_SECS: u64 = 30 * 60;
const DEFAULT_PRESCALE_INTERVAL_SECS: u64 = 1;
const DEFAULT_PRESCALE_MAX_CHECKS: u32 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FleetConfig {
    pub tenancy_ocid: String,
    pub user_ocid: String,
    pub fingerprint: String,
    pub private_key_path: String,
    pub region: String,
    pub compartment_id: String,
    /// Overrides the regional compute endpoint, mostly for testing.
    pub endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub logging: LoggingConfig,
    pub instance_settings: Option<InstanceSettings>,
    pub instance_pool: Option<InstancePoolSettings>,
    pub prescale: Option<PrescaleSettings>,
}

impl FleetConfig {
    /// Per-request HTTP deadline, 60 seconds unless configured.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub path: Option<String>,
    pub rotate_size: u64,
    pub rotate_keep: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
            rotate_size: DEFAULT_LOG_ROTATE_SIZE,
            rotate_keep: DEFAULT_LOG_ROTATE_KEEP,
        }
    }
}

/// Flexible-shape sizing. Zero means "leave unset".
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShapeSettings {
    pub ocpus: f32,
    pub memory_in_gbs: f32,
}

impl ShapeSettings {
    pub fn is_empty(&self) -> bool {
        self.ocpus <= 0.0 && self.memory_in_gbs <= 0.0
    }
}

/// Settings for standalone instances launched by `ocifleet instances`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InstanceSettings {
    pub display_name_prefix: String,
    pub count: u32,
    pub shape: String,
    pub shape_config: ShapeSettings,
    pub image_id: String,
    pub subnet_id: String,
    pub assign_public_ip: bool,
    pub ssh_authorized_keys: Option<String>,
    pub availability_domain: String,
    pub capacity_reservation_id: Option<String>,
    pub fault_domain: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub freeform_tags: BTreeMap<String, String>,
    pub wait: WaitSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitSettings {
    pub interval_secs: u64,
    pub max_wait_secs: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_WAIT_INTERVAL_SECS,
            max_wait_secs: DEFAULT_MAX_WAIT_SECS,
        }
    }
}

impl From<WaitSettings> for WaitPolicy {
    fn from(settings: WaitSettings) -> Self {
        WaitPolicy {
            interval: Duration::from_secs(settings.interval_secs),
            max_wait: Duration::from_secs(settings.max_wait_secs),
        }
    }
}

/// Settings for `ocifleet pool`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InstancePoolSettings {
    pub display_name: String,
    pub size: u32,
    pub instance_configuration: InstanceConfigurationSettings,
    pub placement: Vec<PlacementSettings>,
    pub load_balancers: Vec<LoadBalancerSettings>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InstanceConfigurationSettings {
    pub display_name: String,
    pub shape: String,
    pub shape_config: ShapeSettings,
    pub image_id: String,
    pub subnet_id: String,
    pub assign_public_ip: bool,
    pub ssh_authorized_keys: Option<String>,
    pub user_data: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub freeform_tags: BTreeMap<String, String>,
    pub defined_tags: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacementSettings {
    pub availability_domain: String,
    pub fault_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadBalancerSettings {
    pub load_balancer_id: String,
    pub backend_set_name: String,
    pub port: u16,
    pub vnic_selection: String,
}

/// Settings for `ocifleet capacity --action prescale`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrescaleSettings {
    pub reservation_ids: Vec<String>,
    pub desired_capacity: u64,
    pub minimum_capacity: u64,
    pub check_interval_secs: u64,
    pub max_checks: u32,
}

impl Default for PrescaleSettings {
    fn default() -> Self {
        Self {
            reservation_ids: Vec::new(),
            desired_capacity: 0,
            minimum_capacity: 0,
            check_interval_secs: DEFAULT_PRESCALE_INTERVAL_SECS,
            max_checks: DEFAULT_PRESCALE_MAX_CHECKS,
        }
    }
}
