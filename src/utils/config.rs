use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{DEFAULT_SAMPLE_INTERVAL_S, METERS_PER_DEGREE_LAT};

/// Navigator configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Assumed interval between acceleration samples (seconds)
    pub sample_interval_s: f64,
    /// Meters per degree of latitude for the flat-earth projection
    pub meters_per_degree_lat: f64,
    /// Deadline for one provider request (milliseconds)
    pub fix_timeout_ms: u64,
    /// Capacity of the service command queue
    pub command_queue_depth: usize,
    /// Default log filter for the binary
    pub log_level: LogLevel,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            sample_interval_s: DEFAULT_SAMPLE_INTERVAL_S,
            meters_per_degree_lat: METERS_PER_DEGREE_LAT,
            fix_timeout_ms: 5000,
            command_queue_depth: 64,
            log_level: LogLevel::Info,
        }
    }
}

/// Logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter string understood by `env_logger`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("I/O error: {message}")]
    IoError { message: String },
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl NavigatorConfig {
    /// Load and validate configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: NavigatorConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }

    /// Check every parameter, reporting the first invalid one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_interval_s.is_finite() || self.sample_interval_s <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "sample_interval_s".to_string(),
                value: self.sample_interval_s.to_string(),
                reason: "Sample interval must be a positive number of seconds".to_string(),
            });
        }

        if !self.meters_per_degree_lat.is_finite() || self.meters_per_degree_lat <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "meters_per_degree_lat".to_string(),
                value: self.meters_per_degree_lat.to_string(),
                reason: "Meters per degree must be positive".to_string(),
            });
        }

        if self.fix_timeout_ms == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "fix_timeout_ms".to_string(),
                value: self.fix_timeout_ms.to_string(),
                reason: "Fix timeout must be at least 1 ms".to_string(),
            });
        }

        if self.command_queue_depth == 0 || self.command_queue_depth > 65536 {
            return Err(ConfigError::InvalidParameter {
                parameter: "command_queue_depth".to_string(),
                value: self.command_queue_depth.to_string(),
                reason: "Queue depth must be between 1 and 65536".to_string(),
            });
        }

        Ok(())
    }
}
