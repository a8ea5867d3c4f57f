//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    pub logging: LoggingConfig,
}

/// Knox gateway configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewaySettings {
    /// Comma or whitespace separated gateway base URLs, in probing order
    #[serde(default)]
    pub token_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Knox gateways commonly present internally issued certificates, so
    /// verification is off unless explicitly enabled.
    #[serde(default)]
    pub verify_tls: bool,
}

fn default_timeout() -> u64 {
    10_000
}

fn default_connect_timeout() -> u64 {
    5_000
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            token_url: String::new(),
            timeout_ms: default_timeout(),
            connect_timeout_ms: default_connect_timeout(),
            verify_tls: false,
        }
    }
}

/// Source of the SPNEGO token sent in the `Negotiate` header
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CredentialsConfig {
    /// Base64 encoded token
    #[serde(default)]
    pub negotiate_token: Option<String>,
    /// File holding the raw token bytes
    #[serde(default)]
    pub negotiate_token_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Ordered list of candidate gateway base URLs.
///
/// Parsed from a single value whose entries are separated by commas and/or
/// whitespace. Empty entries are dropped; the remaining order is the probing
/// priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    candidates: Vec<String>,
}

impl GatewayConfig {
    /// Parse a comma or whitespace separated list of gateway base URLs
    pub fn parse(raw: &str) -> Result<Self> {
        let candidates: Vec<String> = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if candidates.is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "gateway.token_url must list at least one Knox gateway".to_string(),
            )));
        }

        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// More than one candidate means failover probing is enabled
    pub fn is_ha(&self) -> bool {
        self.candidates.len() > 1
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .set_default("gateway.token_url", "")?
            .set_default("gateway.timeout_ms", default_timeout() as i64)?
            .set_default("gateway.connect_timeout_ms", default_connect_timeout() as i64)?
            .set_default("gateway.verify_tls", false)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            // Load from configuration file
            .add_source(File::with_name(path.as_ref().to_str().unwrap_or("config/default")).required(false))
            // Override with environment variables (prefixed with KNOX_JWT_)
            .add_source(
                Environment::with_prefix("KNOX_JWT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Candidate gateways parsed from `gateway.token_url`
    pub fn gateway_config(&self) -> Result<GatewayConfig> {
        GatewayConfig::parse(&self.gateway.token_url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let gateways = self.gateway_config()?;

        for candidate in gateways.candidates() {
            if !(candidate.starts_with("http://") || candidate.starts_with("https://")) {
                return Err(AppError::Config(config::ConfigError::Message(format!(
                    "Gateway '{}' must be an http or https URL",
                    candidate
                ))));
            }
        }

        if self.gateway.timeout_ms == 0 || self.gateway.connect_timeout_ms == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Gateway timeouts cannot be 0".to_string(),
            )));
        }

        if !["json", "text"].contains(&self.logging.format.as_str()) {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Invalid logging format '{}'. Must be 'json' or 'text'",
                self.logging.format
            ))));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway: GatewaySettings::default(),
            credentials: CredentialsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
