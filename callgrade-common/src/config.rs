//! Configuration loading and API base resolution
//!
//! The analysis service base address is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`CALLGRADE_API_BASE`)
//! 3. TOML config file
//! 4. Compiled default (local loopback)
//!
//! A missing or unreadable TOML file is never fatal: loading hands back a
//! warning for the caller to log and continues with defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the analysis service address
pub const API_BASE_ENV: &str = "CALLGRADE_API_BASE";

/// Analysis service address used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Analysis service base address
    #[serde(default)]
    pub api_base: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the explicit path if given, else the per-user default location.
    ///
    /// Falls back to defaults when the file is malformed or an explicitly
    /// requested file is missing, and returns the warning alongside the
    /// config. Config is read before the tracing subscriber exists, so the
    /// caller logs the warning once logging is initialized. A missing
    /// default-location file is normal and produces no warning.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, Option<String>) {
        let (path, explicit) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return (Self::default(), None),
            },
        };

        if !path.exists() {
            let warning = explicit
                .then(|| format!("Config file {} not found, using defaults", path.display()));
            return (Self::default(), warning);
        }

        match Self::load(&path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(format!("Ignoring config file, using defaults: {}", e)),
            ),
        }
    }
}

/// Per-user config file location (`~/.config/callgrade/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("callgrade").join("config.toml"))
}

/// Resolve the analysis service base address.
///
/// Blank values at any tier are skipped. The returned address never ends in
/// `/`, so callers can append `/calls` directly.
pub fn resolve_api_base(cli_arg: Option<&str>, env_var_name: &str, toml: &TomlConfig) -> String {
    // Priority 1: Command-line argument
    if let Some(base) = cli_arg.and_then(normalize_base) {
        return base;
    }

    // Priority 2: Environment variable
    if let Some(base) = std::env::var(env_var_name)
        .ok()
        .as_deref()
        .and_then(normalize_base)
    {
        return base;
    }

    // Priority 3: TOML config file
    if let Some(base) = toml.api_base.as_deref().and_then(normalize_base) {
        return base;
    }

    // Priority 4: Compiled default
    DEFAULT_API_BASE.to_string()
}

fn normalize_base(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
