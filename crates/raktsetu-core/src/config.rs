//! Dashboard configuration.

use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::PAYLOAD_SEPARATOR;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("UTC offset out of range: {0} minutes")]
    InvalidOffset(i32),

    #[error("max_identifier_attempts must be at least 1")]
    InvalidAttempts,

    #[error("City must not contain '|': {0}")]
    InvalidCity(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Per-deployment settings for a hospital dashboard.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Hospital shown in the header and welcome banner
    pub hospital_name: String,
    /// City stamped onto every new request; must not contain the payload separator
    pub city: String,
    /// Hospital timezone as minutes east of UTC.
    ///
    /// Form input (date + time) is read in this zone, and the table shows
    /// dates and times in it.
    pub utc_offset_minutes: i32,
    /// How many identifiers to draw before giving up on a collision-free one
    pub max_identifier_attempts: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            hospital_name: "AIIMS Delhi".to_string(),
            city: "Delhi".to_string(),
            utc_offset_minutes: 330,
            max_identifier_attempts: 16,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        self.timezone()?;
        if self.max_identifier_attempts == 0 {
            return Err(ConfigError::InvalidAttempts);
        }
        if self.city.contains(PAYLOAD_SEPARATOR) {
            return Err(ConfigError::InvalidCity(self.city.clone()));
        }
        Ok(())
    }

    /// Hospital timezone.
    pub fn timezone(&self) -> ConfigResult<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }
}
