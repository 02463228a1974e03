use crate::config::InstancePoolSettings;
use crate::error::FleetError;

use super::api::ComputeApi;
use super::types::{InstanceConfigurationRequest, InstancePool, InstancePoolRequest};

/// Creates the instance configuration for `pool`, then the pool itself.
pub async fn provision_pool(
    api: &dyn ComputeApi,
    pool: &InstancePoolSettings,
    compartment_id: &str,
) -> Result<InstancePool, FleetError> {
    if pool.size == 0 {
        return Err(FleetError::InvalidRequest(
            "instance pool size must be greater than 0".to_string(),
        ));
    }

    let template = InstanceConfigurationRequest::from_settings(
        &pool.instance_configuration,
        compartment_id,
    );
    log::info!("creating instance configuration {}", template.display_name);
    let configuration = api.create_instance_configuration(&template).await?;
    log::info!("instance configuration created: {}", configuration.id);

    let request = InstancePoolRequest::from_settings(pool, compartment_id, &configuration.id);
    log::info!(
        "creating instance pool {} with {} instance(s) across {} placement(s)",
        request.display_name,
        request.size,
        request.placements.len()
    );
    api.create_instance_pool(&request).await
}
