//! Configuration loading and backend base URL resolution
//!
//! The backend base URL is resolved once at process start and then handed to
//! every client, fetcher and orchestrator explicitly. Priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled local-development default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Compiled fallback for local development
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable consulted for the backend base URL
pub const API_BASE_ENV: &str = "VIRALSYNTH_API_BASE_URL";

/// Default console listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Backend base URL without a trailing slash
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiBase(String);

impl ApiBase {
    /// Validate and normalize a base URL
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Config("API base URL is empty".to_string()));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https://: {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join an absolute endpoint path (`/api/...`) onto the base
    pub fn join(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.0, endpoint)
        } else {
            format!("{}/{}", self.0, endpoint)
        }
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self(DEFAULT_API_BASE_URL.to_string())
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Contents of `console.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Backend base URL
    pub api_base_url: Option<String>,
    /// Console listen address
    pub bind_addr: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default config file location: `<config_dir>/viralsynth/console.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("viralsynth").join("console.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load the TOML config, degrading to defaults when it is missing or broken
///
/// An explicit path that does not exist is worth a warning; an absent default
/// file is normal and only logged at info.
pub fn load_toml_config_or_default(explicit: Option<&Path>) -> TomlConfig {
    let (path, is_explicit) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return TomlConfig::default(),
        },
    };

    if !path.exists() {
        if is_explicit {
            warn!("Config file not found: {} (using defaults)", path.display());
        } else {
            info!("No config file at {} (using defaults)", path.display());
        }
        return TomlConfig::default();
    }

    match load_toml_config(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            TomlConfig::default()
        }
    }
}

/// Resolve the backend base URL following the documented priority order
///
/// Blank values at any tier are skipped. An invalid value at a tier is an
/// error rather than a silent fallthrough, so a typo is not masked by the
/// default.
pub fn resolve_api_base(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Result<ApiBase> {
    let env_value = std::env::var(API_BASE_ENV).ok();

    let candidates = [
        ("command line", cli_arg),
        ("environment", env_value.as_deref()),
        ("TOML config", toml_config.api_base_url.as_deref()),
    ];

    for (source, value) in candidates {
        if let Some(raw) = value.filter(|v| !v.trim().is_empty()) {
            let base = ApiBase::parse(raw)?;
            info!("API base URL from {}: {}", source, base);
            return Ok(base);
        }
    }

    info!("API base URL defaulted to {}", DEFAULT_API_BASE_URL);
    Ok(ApiBase::default())
}
