use chrono::Utc;

use crate::config::{
    InstanceConfigurationSettings, InstancePoolSettings, InstanceSettings, ShapeSettings,
};

use super::types::{
    CapacityReservationRequest, InstanceConfigurationRequest, InstancePoolRequest, LaunchRequest,
    LoadBalancerAttachment, Placement, ShapeConfig,
};

const SSH_KEYS_METADATA: &str = "ssh_authorized_keys";
const USER_DATA_METADATA: &str = "user_data";

const FLEXIBLE_SHAPES: &[&str] = &[
    "VM.Standard.E3.Flex",
    "VM.Standard.E4.Flex",
    "VM.Standard.E5.Flex",
    "VM.Standard.A1.Flex",
    "VM.Optimized3.Flex",
];

/// Whether `shape` accepts an explicit OCPU and memory configuration.
pub fn is_flexible_shape(shape: &str) -> bool {
    FLEXIBLE_SHAPES.contains(&shape) || shape.ends_with(".Flex")
}

fn shape_config(settings: ShapeSettings) -> Option<ShapeConfig> {
    if settings.is_empty() {
        return None;
    }
    Some(ShapeConfig {
        ocpus: (settings.ocpus > 0.0).then_some(settings.ocpus),
        memory_in_gbs: (settings.memory_in_gbs > 0.0).then_some(settings.memory_in_gbs),
    })
}

fn name_or_timestamped(name: &str, prefix: &str) -> String {
    if name.trim().is_empty() {
        format!("{prefix}-{}", Utc::now().timestamp())
    } else {
        name.to_string()
    }
}

impl LaunchRequest {
    /// Builds the launch request for one instance of an `instance_settings` batch.
    pub fn from_settings(
        settings: &InstanceSettings,
        compartment_id: &str,
        display_name: impl Into<String>,
    ) -> Self {
        let mut metadata = settings.metadata.clone();
        if let Some(keys) = settings.ssh_authorized_keys.as_deref().filter(|k| !k.is_empty()) {
            metadata.insert(SSH_KEYS_METADATA.to_string(), keys.to_string());
        }
        Self {
            compartment_id: compartment_id.to_string(),
            display_name: display_name.into(),
            availability_domain: settings.availability_domain.clone(),
            fault_domain: settings.fault_domain.clone(),
            shape: settings.shape.clone(),
            shape_config: shape_config(settings.shape_config),
            image_id: settings.image_id.clone(),
            subnet_id: settings.subnet_id.clone(),
            assign_public_ip: settings.assign_public_ip,
            capacity_reservation_id: settings.capacity_reservation_id.clone(),
            metadata,
            freeform_tags: settings.freeform_tags.clone(),
        }
    }
}

impl InstanceConfigurationRequest {
    /// Builds the reusable instance template behind a pool.
    ///
    /// Explicit `metadata` entries win over the SSH key and user data fields.
    pub fn from_settings(template: &InstanceConfigurationSettings, compartment_id: &str) -> Self {
        let mut metadata = std::collections::BTreeMap::new();
        if let Some(keys) = template.ssh_authorized_keys.as_deref().filter(|k| !k.is_empty()) {
            metadata.insert(SSH_KEYS_METADATA.to_string(), keys.to_string());
        }
        if let Some(data) = template.user_data.as_deref().filter(|d| !d.is_empty()) {
            metadata.insert(USER_DATA_METADATA.to_string(), data.to_string());
        }
        metadata.extend(template.metadata.clone());

        Self {
            compartment_id: compartment_id.to_string(),
            display_name: name_or_timestamped(&template.display_name, "instance-config"),
            shape: template.shape.clone(),
            shape_config: shape_config(template.shape_config),
            image_id: template.image_id.clone(),
            subnet_id: template.subnet_id.clone(),
            assign_public_ip: template.assign_public_ip,
            metadata,
            freeform_tags: template.freeform_tags.clone(),
            defined_tags: template.defined_tags.clone(),
        }
    }
}

impl InstancePoolRequest {
    /// Builds the pool request once its instance configuration exists.
    pub fn from_settings(
        pool: &InstancePoolSettings,
        compartment_id: &str,
        instance_configuration_id: &str,
    ) -> Self {
        let subnet_id = &pool.instance_configuration.subnet_id;
        Self {
            compartment_id: compartment_id.to_string(),
            instance_configuration_id: instance_configuration_id.to_string(),
            display_name: name_or_timestamped(&pool.display_name, "instance-pool"),
            size: pool.size,
            placements: pool
                .placement
                .iter()
                .map(|p| Placement {
                    availability_domain: p.availability_domain.clone(),
                    primary_subnet_id: subnet_id.clone(),
                    fault_domains: p.fault_domains.clone(),
                })
                .collect(),
            load_balancers: pool
                .load_balancers
                .iter()
                .map(|lb| LoadBalancerAttachment {
                    load_balancer_id: lb.load_balancer_id.clone(),
                    backend_set_name: lb.backend_set_name.clone(),
                    port: lb.port,
                    vnic_selection: lb.vnic_selection.clone(),
                })
                .collect(),
        }
    }
}

impl CapacityReservationRequest {
    /// Builds a single-shape reservation; sizing applies to flexible shapes only.
    pub fn single_shape(
        compartment_id: &str,
        display_name: &str,
        availability_domain: &str,
        shape: &str,
        reserved_count: u64,
        ocpus: f32,
        memory_in_gbs: f32,
    ) -> Self {
        let shape_config = is_flexible_shape(shape).then_some(ShapeConfig {
            ocpus: Some(ocpus),
            memory_in_gbs: Some(memory_in_gbs),
        });
        Self {
            compartment_id: compartment_id.to_string(),
            display_name: display_name.to_string(),
            availability_domain: availability_domain.to_string(),
            shape: shape.to_string(),
            reserved_count,
            shape_config,
        }
    }
}
