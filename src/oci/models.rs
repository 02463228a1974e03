//! Request and response bodies of the Core Services API (version 20160918).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeConfigDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocpus: Option<f32>,
    #[serde(rename = "memoryInGBs", skip_serializing_if = "Option::is_none")]
    pub memory_in_gbs: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSourceDetails {
    pub source_type: &'static str,
    pub image_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnicDetails {
    pub subnet_id: String,
    pub assign_public_ip: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub availability_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_domain: Option<String>,
    pub shape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_config: Option<ShapeConfigDetails>,
    pub source_details: ImageSourceDetails,
    pub create_vnic_details: CreateVnicDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_reservation_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub freeform_tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceBody {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub availability_domain: String,
    pub fault_domain: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceLaunchTemplate {
    pub compartment_id: String,
    pub shape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_config: Option<ShapeConfigDetails>,
    pub source_details: ImageSourceDetails,
    pub create_vnic_details: CreateVnicDetails,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub freeform_tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub defined_tags: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeInstanceDetails {
    pub instance_type: &'static str,
    pub launch_details: InstanceLaunchTemplate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceConfigurationDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub instance_details: ComputeInstanceDetails,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub freeform_tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub defined_tags: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceConfigurationBody {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfiguration {
    pub availability_domain: String,
    pub primary_subnet_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fault_domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachLoadBalancerDetails {
    pub load_balancer_id: String,
    pub backend_set_name: String,
    pub port: u16,
    pub vnic_selection: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstancePoolDetails {
    pub compartment_id: String,
    pub instance_configuration_id: String,
    pub display_name: String,
    pub size: u32,
    pub placement_configurations: Vec<PlacementConfiguration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_balancers: Vec<AttachLoadBalancerDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateInstancePoolDetails {
    pub size: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachInstancePoolInstanceDetails {
    pub instance_id: String,
    pub is_decrement_size: bool,
    pub is_auto_terminate: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstancePoolBody {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub size: u32,
}

/// Entry of `GET /instancePools/{id}/instances`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceSummaryBody {
    pub id: String,
    pub display_name: String,
    pub state: String,
    pub availability_domain: String,
    pub fault_domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceReservationConfig {
    pub instance_shape: String,
    pub reserved_count: u64,
    #[serde(skip_serializing)]
    pub used_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_shape_config: Option<ShapeConfigDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_domain: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCapacityReservationDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub availability_domain: String,
    pub instance_reservation_configs: Vec<InstanceReservationConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCapacityReservationDetails {
    pub instance_reservation_configs: Vec<InstanceReservationConfig>,
}

/// Full reservation or list summary; summaries carry no configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityReservationBody {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: String,
    pub availability_domain: String,
    pub reserved_instance_count: u64,
    pub used_instance_count: u64,
    pub time_created: Option<DateTime<Utc>>,
    pub instance_reservation_configs: Vec<InstanceReservationConfig>,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceError {
    pub code: String,
    pub message: String,
}
