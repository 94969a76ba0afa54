//! TOML configuration for the generator.
//!
//! ```toml
//! [[profiles]]
//! season = "summer"
//! calendar = [
//!     { month = "March", days = 31 },
//!     { month = "April", days = 30 },
//! ]
//!
//! [profiles.ranges]
//! irradiance = { min = 600.0, max = 1000.0 }
//! humidity = { min = 10.0, max = 50.0 }
//! wind_speed = { min = 0.0, max = 5.0 }
//! ambient_temperature = { min = 30.0, max = 45.0 }
//! tilt_angle = { min = 10.0, max = 40.0 }
//! ```
//!
//! Loading validates the result, so a config that parses is ready to
//! generate from.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::generator::validate_config;
use crate::types::GeneratorConfig;

impl GeneratorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(s)?;
        validate_config(&config)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<GeneratorConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = GeneratorConfig::from_toml_str(&text)?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "loaded generator config");
    Ok(config)
}
