//! Conversions between domain values and wire bodies.

use crate::compute::{
    CapacityReservation, CapacityReservationRequest, Instance, InstanceConfiguration,
    InstanceConfigurationRequest, InstancePool, InstancePoolRequest, InstanceState,
    LaunchRequest, PoolInstance, ReservationConfig, ShapeConfig,
};

use super::models::{
    AttachLoadBalancerDetails, CapacityReservationBody, ComputeInstanceDetails,
    CreateCapacityReservationDetails, CreateInstanceConfigurationDetails,
    CreateInstancePoolDetails, CreateVnicDetails, ImageSourceDetails, InstanceBody,
    InstanceConfigurationBody, InstanceLaunchTemplate, InstancePoolBody,
    InstanceReservationConfig, InstanceSummaryBody, LaunchInstanceDetails,
    PlacementConfiguration, ShapeConfigDetails,
};

fn image_source(image_id: &str) -> ImageSourceDetails {
    ImageSourceDetails {
        source_type: "image",
        image_id: image_id.to_string(),
    }
}

impl From<ShapeConfig> for ShapeConfigDetails {
    fn from(shape: ShapeConfig) -> Self {
        Self {
            ocpus: shape.ocpus,
            memory_in_gbs: shape.memory_in_gbs,
        }
    }
}

impl From<ShapeConfigDetails> for ShapeConfig {
    fn from(shape: ShapeConfigDetails) -> Self {
        Self {
            ocpus: shape.ocpus,
            memory_in_gbs: shape.memory_in_gbs,
        }
    }
}

impl From<&LaunchRequest> for LaunchInstanceDetails {
    fn from(request: &LaunchRequest) -> Self {
        Self {
            compartment_id: request.compartment_id.clone(),
            display_name: request.display_name.clone(),
            availability_domain: request.availability_domain.clone(),
            fault_domain: request.fault_domain.clone(),
            shape: request.shape.clone(),
            shape_config: request.shape_config.map(Into::into),
            source_details: image_source(&request.image_id),
            create_vnic_details: CreateVnicDetails {
                subnet_id: request.subnet_id.clone(),
                assign_public_ip: request.assign_public_ip,
            },
            capacity_reservation_id: request.capacity_reservation_id.clone(),
            metadata: request.metadata.clone(),
            freeform_tags: request.freeform_tags.clone(),
        }
    }
}

impl From<InstanceBody> for Instance {
    fn from(body: InstanceBody) -> Self {
        Self {
            lifecycle_state: InstanceState::from(body.lifecycle_state.as_str()),
            id: body.id,
            display_name: body.display_name,
            availability_domain: body.availability_domain,
            fault_domain: body.fault_domain,
        }
    }
}

impl From<&InstanceConfigurationRequest> for CreateInstanceConfigurationDetails {
    fn from(request: &InstanceConfigurationRequest) -> Self {
        Self {
            compartment_id: request.compartment_id.clone(),
            display_name: request.display_name.clone(),
            instance_details: ComputeInstanceDetails {
                instance_type: "compute",
                launch_details: InstanceLaunchTemplate {
                    compartment_id: request.compartment_id.clone(),
                    shape: request.shape.clone(),
                    shape_config: request.shape_config.map(Into::into),
                    source_details: image_source(&request.image_id),
                    create_vnic_details: CreateVnicDetails {
                        subnet_id: request.subnet_id.clone(),
                        assign_public_ip: request.assign_public_ip,
                    },
                    metadata: request.metadata.clone(),
                    freeform_tags: request.freeform_tags.clone(),
                    defined_tags: request.defined_tags.clone(),
                },
            },
            freeform_tags: request.freeform_tags.clone(),
            defined_tags: request.defined_tags.clone(),
        }
    }
}

impl From<InstanceConfigurationBody> for InstanceConfiguration {
    fn from(body: InstanceConfigurationBody) -> Self {
        Self {
            id: body.id,
            display_name: body.display_name,
        }
    }
}

impl From<&InstancePoolRequest> for CreateInstancePoolDetails {
    fn from(request: &InstancePoolRequest) -> Self {
        Self {
            compartment_id: request.compartment_id.clone(),
            instance_configuration_id: request.instance_configuration_id.clone(),
            display_name: request.display_name.clone(),
            size: request.size,
            placement_configurations: request
                .placements
                .iter()
                .map(|p| PlacementConfiguration {
                    availability_domain: p.availability_domain.clone(),
                    primary_subnet_id: p.primary_subnet_id.clone(),
                    fault_domains: p.fault_domains.clone(),
                })
                .collect(),
            load_balancers: request
                .load_balancers
                .iter()
                .map(|lb| AttachLoadBalancerDetails {
                    load_balancer_id: lb.load_balancer_id.clone(),
                    backend_set_name: lb.backend_set_name.clone(),
                    port: lb.port,
                    vnic_selection: lb.vnic_selection.clone(),
                })
                .collect(),
        }
    }
}

impl From<InstancePoolBody> for InstancePool {
    fn from(body: InstancePoolBody) -> Self {
        Self {
            id: body.id,
            display_name: body.display_name,
            lifecycle_state: body.lifecycle_state,
            size: body.size,
        }
    }
}

impl From<InstanceSummaryBody> for PoolInstance {
    fn from(body: InstanceSummaryBody) -> Self {
        Self {
            id: body.id,
            display_name: body.display_name,
            state: body.state,
            availability_domain: body.availability_domain,
            fault_domain: body.fault_domain,
        }
    }
}

impl From<&ReservationConfig> for InstanceReservationConfig {
    fn from(config: &ReservationConfig) -> Self {
        Self {
            instance_shape: config.shape.clone(),
            reserved_count: config.reserved_count,
            used_count: config.used_count,
            instance_shape_config: config.shape_config.map(Into::into),
            fault_domain: config.fault_domain.clone(),
        }
    }
}

impl From<InstanceReservationConfig> for ReservationConfig {
    fn from(config: InstanceReservationConfig) -> Self {
        Self {
            shape: config.instance_shape,
            reserved_count: config.reserved_count,
            used_count: config.used_count,
            shape_config: config.instance_shape_config.map(Into::into),
            fault_domain: config.fault_domain,
        }
    }
}

impl From<&CapacityReservationRequest> for CreateCapacityReservationDetails {
    fn from(request: &CapacityReservationRequest) -> Self {
        Self {
            compartment_id: request.compartment_id.clone(),
            display_name: request.display_name.clone(),
            availability_domain: request.availability_domain.clone(),
            instance_reservation_configs: vec![InstanceReservationConfig {
                instance_shape: request.shape.clone(),
                reserved_count: request.reserved_count,
                instance_shape_config: request.shape_config.map(Into::into),
                ..Default::default()
            }],
        }
    }
}

impl From<CapacityReservationBody> for CapacityReservation {
    fn from(body: CapacityReservationBody) -> Self {
        Self {
            id: body.id,
            display_name: body.display_name,
            lifecycle_state: body.lifecycle_state,
            availability_domain: body.availability_domain,
            reserved_instance_count: body.reserved_instance_count,
            used_instance_count: body.used_instance_count,
            time_created: body.time_created,
            configs: body
                .instance_reservation_configs
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
