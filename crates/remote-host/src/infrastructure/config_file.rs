//! Optional TOML configuration file.
//!
//! Every key is optional; absent keys keep the built-in defaults and
//! command-line flags override whatever the file says.
//!
//! ```toml
//! max_restart_attempts = 5
//! backend_timeout_ms = 3000
//! service_name = "Living Room PC"
//! log_level = "debug"
//!
//! enable_native = true
//! enable_script_shell = false
//! enable_cli_tools = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::HostConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// On-disk schema.  Unknown keys are rejected so typos surface at startup.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub max_restart_attempts: Option<u32>,
    pub backend_timeout_ms: Option<u64>,
    pub service_name: Option<String>,
    pub log_level: Option<String>,
    pub enable_native: Option<bool>,
    pub enable_script_shell: Option<bool>,
    pub enable_cli_tools: Option<bool>,
}

impl FileConfig {
    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: FileConfig = toml::from_str(text)?;
        if config.backend_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                key: "backend_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if matches!(&config.service_name, Some(name) if name.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: "service_name",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(config)
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`FileConfig::parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Overlays the keys present in the file onto `config`.
    pub fn apply_to(self, config: &mut HostConfig) {
        if let Some(v) = self.max_restart_attempts {
            config.max_restart_attempts = v;
        }
        if let Some(ms) = self.backend_timeout_ms {
            config.backend_timeout = Duration::from_millis(ms);
        }
        if let Some(v) = self.service_name {
            config.service_name = v;
        }
        if let Some(v) = self.log_level {
            config.log_level = v;
        }
        if let Some(v) = self.enable_native {
            config.enable_native = v;
        }
        if let Some(v) = self.enable_script_shell {
            config.enable_script_shell = v;
        }
        if let Some(v) = self.enable_cli_tools {
            config.enable_cli_tools = v;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
