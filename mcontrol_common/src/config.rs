//! Configuration plumbing shared by the mcontrol binaries.
//!
//! The axis schema itself lives in `mcontrol_unit::config`. This module
//! provides the error type every loader returns, the `[shared]` table and
//! the [`ConfigLoader`] trait that turns a TOML file into any
//! deserializable type.
//!
//! ```rust,no_run
//! use mcontrol_common::config::{ConfigError, ConfigLoader, SharedConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct AxisFile {
//!     #[serde(default)]
//!     shared: SharedConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let file = AxisFile::load(Path::new("/etc/mcontrol/mcontrol.toml"))?;
//!     file.shared.validate()?;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::angle::AngleConfigError;

/// Load-time configuration fault.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("configuration file {} not found", .0.display())]
    FileNotFound(PathBuf),

    /// Unreadable file, malformed TOML, wrong type or unknown key.
    #[error("cannot parse configuration: {0}")]
    ParseError(String),

    /// Well-formed but out of bounds or inconsistent.
    #[error("invalid configuration: {0}")]
    ValidationError(String),

    /// Rejected by the angle model.
    #[error("invalid angle configuration: {0}")]
    Angle(#[from] AngleConfigError),
}

/// Default log verbosity, overridden by `--verbose` and `RUST_LOG`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Equivalent `tracing` level.
    pub const fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_tracing(), f)
    }
}

/// `[shared]` table: process identity and logging.
///
/// ```toml
/// [shared]
/// service_name = "mcontrol-dec"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedConfig {
    pub log_level: LogLevel,
    /// Instance name, one per controlled axis.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: "mcontrol".to_string(),
        }
    }
}

impl SharedConfig {
    /// `service_name` must be a non-empty token without whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() || self.service_name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "service_name {:?} must be a non-empty token",
                self.service_name
            )));
        }
        Ok(())
    }
}

/// TOML loading for any deserializable configuration type.
///
/// A missing file is [`ConfigError::FileNotFound`]; every other read or
/// decode failure is [`ConfigError::ParseError`]. Semantic checks are left
/// to the caller.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Read and parse `path`.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
            _ => ConfigError::ParseError(format!("{}: {e}", path.display())),
        })?;
        Self::load_str(&text)
            .map_err(|e| match e {
                ConfigError::ParseError(msg) => {
                    ConfigError::ParseError(format!("{}: {msg}", path.display()))
                }
                other => other,
            })
    }

    /// Parse TOML text.
    fn load_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
