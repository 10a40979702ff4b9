//! `seam.toml` loading and validation.
//!
//! Every section and field is optional; an absent file means all defaults.
//! Validation runs at load time, so the binary never wires providers from an
//! invalid configuration.

use std::path::{Path, PathBuf};

use capability::User;
use rest::Url;
use serde::Deserialize;
use thiserror::Error;

/// File read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "seam.toml";

/// Errors produced while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists (or was named explicitly) but could not be read.
    #[error("cannot read configuration file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`SeamConfig`].
    #[error("cannot parse configuration file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but is not acceptable.
    #[error("invalid configuration value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Root of `seam.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeamConfig {
    pub logging: LoggingConfig,
    pub users: UsersConfig,
    pub records: RecordsConfig,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// `[logging]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    pub format: LogFormat,
    /// OTLP/gRPC collector endpoint; spans are only exported when set.
    pub otlp_endpoint: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
            otlp_endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsersProvider {
    Rest,
    #[default]
    Memory,
}

/// `[users]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UsersConfig {
    pub provider: UsersProvider,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Users the `memory` provider starts with. Ignored by `rest`.
    pub seed: Vec<User>,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            provider: UsersProvider::Memory,
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 5_000,
            seed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordsProvider {
    #[default]
    File,
    Memory,
}

/// `[records]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordsConfig {
    pub provider: RecordsProvider,
    pub root: PathBuf,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            provider: RecordsProvider::File,
            root: PathBuf::from(".seam/records"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierProvider {
    Webhook,
    #[default]
    Memory,
}

/// `[notifier]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifierConfig {
    pub provider: NotifierProvider,
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            provider: NotifierProvider::Memory,
            url: "http://localhost:8080/notify".to_string(),
            timeout_ms: 5_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl SeamConfig {
    /// Loads and validates the configuration.
    ///
    /// With `path == None`, [`DEFAULT_CONFIG_FILE`] is read if it exists and
    /// defaults are used otherwise. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML text without validating it.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Checks values serde cannot check on its own.
    ///
    /// URLs and timeouts are only checked for the providers that use them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.users.provider == UsersProvider::Rest {
            http_url("users.base_url", &self.users.base_url)?;
            positive("users.timeout_ms", self.users.timeout_ms)?;
        }
        if self.notifier.provider == NotifierProvider::Webhook {
            http_url("notifier.url", &self.notifier.url)?;
            positive("notifier.timeout_ms", self.notifier.timeout_ms)?;
        }
        if self.records.provider == RecordsProvider::File && self.records.root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "records.root",
                message: "must not be empty".to_string(),
            });
        }
        if let Some(endpoint) = &self.logging.otlp_endpoint {
            http_url("logging.otlp_endpoint", endpoint)?;
        }
        Ok(())
    }
}

/// Parses `value` as an `http` or `https` URL.
pub fn http_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Invalid {
        field,
        message: format!("'{value}' is not a URL: {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            field,
            message: format!("'{value}' must use http or https"),
        });
    }
    Ok(url)
}

fn positive(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            field,
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}
