//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line arguments and environment variables arrive together as
//! [`ConfigOverrides`] (clap merges the two); the TOML file and compiled
//! defaults are handled here.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Primary HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Port tried when the primary port is already in use
pub const DEFAULT_FALLBACK_PORT: u16 = 3001;

/// Listen on all interfaces by default
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Itqan CMS developers API
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.cms.itqan.dev/developers-api";

/// Timeout applied to upstream JSON requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Config file name inside the `qradio` config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file contents
///
/// Every field is optional; anything missing falls through to the compiled
/// default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Port tried when `port` is in use (0 disables the fallback)
    #[serde(default)]
    pub fallback_port: Option<u16>,

    /// Address to bind the HTTP listener on
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Base URL of the upstream content API
    #[serde(default)]
    pub upstream_base_url: Option<String>,

    /// Timeout for upstream JSON requests, in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
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

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub fallback_port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream_base_url: Option<String>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` when the fallback is disabled or equal to `port`
    pub fallback_port: Option<u16>,
    pub bind_address: IpAddr,
    /// Upstream base URL without a trailing slash
    pub upstream_base_url: String,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl ServerConfig {
    /// Resolve the final configuration from overrides, an optional TOML file
    /// and compiled defaults.
    pub fn resolve(overrides: ConfigOverrides, toml: Option<TomlConfig>) -> Result<Self> {
        let toml = toml.unwrap_or_default();

        let port = overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT);

        let fallback_port = match overrides
            .fallback_port
            .or(toml.fallback_port)
            .unwrap_or(DEFAULT_FALLBACK_PORT)
        {
            0 => None,
            p if p == port => None,
            p => Some(p),
        };

        let bind_raw = overrides
            .bind_address
            .or(toml.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address: IpAddr = bind_raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind_raw, e)))?;

        let upstream_raw = overrides
            .upstream_base_url
            .or(toml.upstream_base_url)
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());
        let upstream_base_url = normalize_base_url(&upstream_raw)?;

        let timeout_secs = toml
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            port,
            fallback_port,
            bind_address,
            upstream_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level: toml.logging.level,
        })
    }
}

/// Validate an upstream base URL and strip any trailing slash
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid upstream URL '{}': {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(Error::Config(format!(
            "Upstream URL must use http or https, got '{}'",
            other
        ))),
    }
}

/// Load a TOML config file
///
/// A missing file is not an error: `Ok(None)` is returned and the caller
/// continues with defaults. A file that exists but cannot be parsed is.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        info!("Config file {} not found, using defaults", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    info!("Loaded config file {}", path.display());
    Ok(Some(config))
}

/// Pick the config file to read
///
/// An explicit path always wins. Otherwise the per-user file is used when it
/// exists, then `/etc/qradio/config.toml` on Linux.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let user_config = dirs::config_dir().map(|d| d.join("qradio").join(CONFIG_FILE_NAME));
    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/qradio").join(CONFIG_FILE_NAME);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_configured() {
        let config = ServerConfig::resolve(ConfigOverrides::default(), None).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.fallback_port, Some(3001));
        assert_eq!(config.bind_address.to_string(), "0.0.0.0");
        assert_eq!(config.upstream_base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_override_beats_toml() {
        let toml = TomlConfig {
            port: Some(8080),
            upstream_base_url: Some("http://toml.example".to_string()),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            port: Some(9090),
            ..Default::default()
        };

        let config = ServerConfig::resolve(overrides, Some(toml)).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.upstream_base_url, "http://toml.example");
    }

    #[test]
    fn test_fallback_disabled_by_zero_or_same_port() {
        let overrides = ConfigOverrides {
            fallback_port: Some(0),
            ..Default::default()
        };
        let config = ServerConfig::resolve(overrides, None).unwrap();
        assert_eq!(config.fallback_port, None);

        let overrides = ConfigOverrides {
            port: Some(4000),
            fallback_port: Some(4000),
            ..Default::default()
        };
        let config = ServerConfig::resolve(overrides, None).unwrap();
        assert_eq!(config.fallback_port, None);
    }

    #[test]
    fn test_invalid_bind_address_rejected() {
        let overrides = ConfigOverrides {
            bind_address: Some("not-an-ip".to_string()),
            ..Default::default()
        };
        let err = ServerConfig::resolve(overrides, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let toml = TomlConfig {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(ServerConfig::resolve(ConfigOverrides::default(), Some(toml)).is_err());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1/").unwrap(),
            "https://api.example.com/v1"
        );
        assert_eq!(
            normalize_base_url("  http://localhost:9000  ").unwrap(),
            "http://localhost:9000"
        );
        assert!(normalize_base_url("ftp://example.com").is_err());
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = Path::new("/tmp/some/where.toml");
        assert_eq!(resolve_config_path(Some(path)), Some(path.to_path_buf()));
    }
}
