use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::types::FleetConfig;

/// Reads and parses a YAML configuration file.
///
/// Only syntax is checked here; each utility validates the sections it uses.
pub fn load_config(path: impl AsRef<Path>) -> Result<FleetConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FleetConfig =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Expands a leading `~` to the current user's home directory.
pub fn expand_home(raw: &str) -> Result<PathBuf, ConfigError> {
    if raw == "~" {
        return dirs::home_dir().ok_or(ConfigError::MissingHome);
    }
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw)),
    }
}
