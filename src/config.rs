//! YAML configuration shared by every `ocifleet` utility.

#[path = "config/error.rs"]
mod error;

#[path = "config/types.rs"]
mod types;

#[path = "config/load.rs"]
mod load;

#[path = "config/validate.rs"]
mod validate;


pub use error::ConfigError;
pub use load::{expand_home, load_config};
pub use types::{
    FleetConfig, InstanceConfigurationSettings, InstancePoolSettings, InstanceSettings,
    LoadBalancerSettings, LoggingConfig, PlacementSettings, PrescaleSettings, ShapeSettings,
    WaitSettings,
};
