use std::collections::HashSet;

use super::error::ConfigError;
use super::types::{FleetConfig, InstancePoolSettings, InstanceSettings, PrescaleSettings};

fn require(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(field.to_string()));
    }
    Ok(())
}

impl FleetConfig {
    /// Checks the credential and tenancy fields every utility needs.
    pub fn validate_auth(&self) -> Result<(), ConfigError> {
        require(&self.tenancy_ocid, "tenancy_ocid")?;
        require(&self.user_ocid, "user_ocid")?;
        require(&self.fingerprint, "fingerprint")?;
        require(&self.private_key_path, "private_key_path")?;
        require(&self.region, "region")?;
        require(&self.compartment_id, "compartment_id")?;
        Ok(())
    }

    /// Validates the configuration used by `ocifleet instances create`.
    pub fn validate_instances(&self) -> Result<&InstanceSettings, ConfigError> {
        self.validate_auth()?;
        let settings = self
            .instance_settings
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField("instance_settings".to_string()))?;
        require(&settings.shape, "instance_settings.shape")?;
        require(&settings.image_id, "instance_settings.image_id")?;
        require(&settings.subnet_id, "instance_settings.subnet_id")?;
        require(
            &settings.availability_domain,
            "instance_settings.availability_domain",
        )?;
        if settings.wait.interval_secs == 0 {
            return Err(ConfigError::invalid(
                "instance_settings.wait.interval_secs",
                "must be greater than 0",
            ));
        }
        Ok(settings)
    }

    /// Validates the configuration used by `ocifleet pool`.
    ///
    /// The pool size may be zero here; it can be supplied on the command line.
    pub fn validate_pool(&self) -> Result<&InstancePoolSettings, ConfigError> {
        self.validate_auth()?;
        let pool = self
            .instance_pool
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField("instance_pool".to_string()))?;
        let template = &pool.instance_configuration;
        require(&template.shape, "instance_pool.instance_configuration.shape")?;
        require(
            &template.image_id,
            "instance_pool.instance_configuration.image_id",
        )?;
        require(
            &template.subnet_id,
            "instance_pool.instance_configuration.subnet_id",
        )?;
        if pool.placement.is_empty() {
            return Err(ConfigError::MissingField(
                "instance_pool.placement".to_string(),
            ));
        }
        for (idx, placement) in pool.placement.iter().enumerate() {
            require(
                &placement.availability_domain,
                &format!("instance_pool.placement[{idx}].availability_domain"),
            )?;
        }
        Ok(pool)
    }

    /// Validates the configuration used by `ocifleet capacity --action prescale`.
    pub fn validate_prescale(&self) -> Result<&PrescaleSettings, ConfigError> {
        self.validate_auth()?;
        let prescale = self
            .prescale
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField("prescale".to_string()))?;
        if prescale.reservation_ids.is_empty() {
            return Err(ConfigError::MissingField(
                "prescale.reservation_ids".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for id in &prescale.reservation_ids {
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::invalid(
                    "prescale.reservation_ids",
                    format!("duplicate id {id}"),
                ));
            }
        }
        if prescale.desired_capacity == 0 {
            return Err(ConfigError::MissingField(
                "prescale.desired_capacity".to_string(),
            ));
        }
        if prescale.minimum_capacity > prescale.desired_capacity {
            return Err(ConfigError::invalid(
                "prescale.minimum_capacity",
                "must not exceed desired_capacity",
            ));
        }
        Ok(prescale)
    }
}
