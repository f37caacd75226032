//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a sensible default; a missing file yields the default
//! configuration. The controller model has no default on purpose — an
//! unknown controller must fail start-up, not guess a mapping.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Controller selection
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Controller model name; see the profile registry for known models.
    /// Required by resolution time (here or on the command line).
    #[serde(default)]
    pub model: Option<String>,

    /// Index among detected controllers.
    #[serde(default)]
    pub device: usize,
}

/// Poll loop timing
#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    /// Cycle period in operational mode, in milliseconds.
    #[serde(default = "default_update_period_ms")]
    pub update_period_ms: u64,

    /// Cycle period in diagnostic mode; longer, to keep console output
    /// readable.
    #[serde(default = "default_diagnostic_period_ms")]
    pub diagnostic_period_ms: u64,
}

/// Stick-output hand-off
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Capacity of the bounded stick-output queue. A full queue drops
    /// frames instead of stalling the loop.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

// Default value functions
fn default_update_period_ms() -> u64 { 50 }
fn default_diagnostic_period_ms() -> u64 { 150 }
fn default_queue_capacity() -> usize { 64 }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            model: None,
            device: 0,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            update_period_ms: default_update_period_ms(),
            diagnostic_period_ms: default_diagnostic_period_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use joy_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file when a path is given, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`]; the default configuration always
    /// validates.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if let Some(model) = &self.controller.model {
            if model.is_empty() {
                return Err(crate::error::JoyBridgeError::Config(
                    toml::de::Error::custom("controller model cannot be empty")
                ));
            }
        }

        if self.control.update_period_ms == 0 || self.control.update_period_ms > 1000 {
            return Err(crate::error::JoyBridgeError::Config(
                toml::de::Error::custom("update_period_ms must be between 1 and 1000")
            ));
        }

        if self.control.diagnostic_period_ms == 0 || self.control.diagnostic_period_ms > 5000 {
            return Err(crate::error::JoyBridgeError::Config(
                toml::de::Error::custom("diagnostic_period_ms must be between 1 and 5000")
            ));
        }

        if self.output.queue_capacity == 0 || self.output.queue_capacity > 4096 {
            return Err(crate::error::JoyBridgeError::Config(
                toml::de::Error::custom("queue_capacity must be between 1 and 4096")
            ));
        }

        Ok(())
    }
}
