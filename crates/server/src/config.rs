//! Cluster configuration
//!
//! Loaded from TOML; every field has a default, so an empty file (or no file)
//! gives a working local cluster:
//!
//! ```toml
//! [store]
//! addr = "127.0.0.1:4042"
//! entries = 10
//!
//! [validator]
//! addr = "127.0.0.1:4041"
//!
//! [dispatcher]
//! addr = "127.0.0.1:4040"
//! coordinator_host = "127.0.0.1"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default store address
pub const DEFAULT_STORE_ADDR: &str = "127.0.0.1:4042";
/// Default validator address
pub const DEFAULT_VALIDATOR_ADDR: &str = "127.0.0.1:4041";
/// Default dispatcher address
pub const DEFAULT_DISPATCHER_ADDR: &str = "127.0.0.1:4040";
/// Default number of seeded keys
pub const DEFAULT_ENTRIES: usize = 10;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Store service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Listen address
    pub addr: String,
    /// Keys "1".."entries" are seeded at startup
    pub entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_STORE_ADDR.to_string(),
            entries: DEFAULT_ENTRIES,
        }
    }
}

/// Validator service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Listen address
    pub addr: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_VALIDATOR_ADDR.to_string(),
        }
    }
}

/// Dispatcher service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Listen address
    pub addr: String,
    /// Host the per-client coordinator listeners bind to (port is chosen by the OS)
    pub coordinator_host: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_DISPATCHER_ADDR.to_string(),
            coordinator_host: "127.0.0.1".to_string(),
        }
    }
}

/// Settings for every service of a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Store settings
    pub store: StoreConfig,
    /// Validator settings
    pub validator: ValidatorConfig,
    /// Dispatcher settings
    pub dispatcher: DispatcherConfig,
}

impl ClusterConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Set the number of seeded keys
    pub fn with_entries(mut self, entries: usize) -> Self {
        self.store.entries = entries;
        self
    }

    /// Set the store address
    pub fn with_store_addr(mut self, addr: impl Into<String>) -> Self {
        self.store.addr = addr.into();
        self
    }

    /// Set the validator address
    pub fn with_validator_addr(mut self, addr: impl Into<String>) -> Self {
        self.validator.addr = addr.into();
        self
    }

    /// Set the dispatcher address
    pub fn with_dispatcher_addr(mut self, addr: impl Into<String>) -> Self {
        self.dispatcher.addr = addr.into();
        self
    }

    /// Bind every service to an OS-assigned port on localhost
    pub fn ephemeral() -> Self {
        Self::default()
            .with_store_addr("127.0.0.1:0")
            .with_validator_addr("127.0.0.1:0")
            .with_dispatcher_addr("127.0.0.1:0")
    }
}
