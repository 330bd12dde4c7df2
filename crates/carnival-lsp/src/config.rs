//! Server configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/carnival/config.toml` (or `--config`), then
//! overridden by the client's `initializationOptions`:
//!
//! ```toml
//! [quick_fix]
//! name = "Program"
//! version = "0.1"
//! author = "Me"
//!
//! [diagnostics]
//! source = "carnival"
//! ```

use std::path::{Path, PathBuf};

use carnival_kernel::fixes::MetaDefaults;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid initializationOptions: {0}")]
    InitOptions(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Label shown as the diagnostic source.
    pub source: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            source: "carnival".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Values inserted by the missing-meta quick fixes.
    pub quick_fix: MetaDefaults,
    pub diagnostics: DiagnosticsConfig,
}

/// Partial config as sent in `initializationOptions`; absent keys keep the
/// file's values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigOverride {
    quick_fix: QuickFixOverride,
    diagnostics: DiagnosticsOverride,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuickFixOverride {
    name: Option<String>,
    version: Option<String>,
    author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DiagnosticsOverride {
    source: Option<String>,
}

impl ServerConfig {
    /// Default config file location.
    ///
    /// Uses `$XDG_CONFIG_HOME/carnival/config.toml` or falls back to
    /// `~/.config/carnival/config.toml`.
    pub fn default_path() -> PathBuf {
        BaseDirs::new()
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp"))
                    .join(".config")
            })
            .join("carnival")
            .join("config.toml")
    }

    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        toml::from_str(&content).map_err(|source| ConfigError::Toml { path, source })
    }

    /// Apply the client's `initializationOptions` on top of this config.
    pub fn apply_init_options(&mut self, options: serde_json::Value) -> Result<(), ConfigError> {
        if options.is_null() {
            return Ok(());
        }
        let overrides: ConfigOverride = serde_json::from_value(options)?;
        let fix = overrides.quick_fix;
        if let Some(name) = fix.name {
            self.quick_fix.name = name;
        }
        if let Some(version) = fix.version {
            self.quick_fix.version = version;
        }
        if let Some(author) = fix.author {
            self.quick_fix.author = author;
        }
        if let Some(source) = overrides.diagnostics.source {
            self.diagnostics.source = source;
        }
        Ok(())
    }
}
