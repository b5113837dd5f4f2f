#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for the package verifier
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/package-verifier/config.toml)
//! - Environment variables
//!
//! The merged `Config` is immutable once startup completes and is exposed to
//! the rest of the application through [`ApplicationParameters`].

pub mod constants;
pub mod parameters;
pub mod request;
pub mod sections;
pub mod settings;

pub use parameters::ApplicationParameters;
pub use request::{os_user_name, RequestContext, StaticRequestContext};
pub use sections::{DeliveryMethod, LoggingConfig, MailConfig};
pub use settings::{keys, SettingsSource};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use verifier_errors::{ConfigError, Error};

use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, CONNECTION_STRING_NAME, ENV_PREFIX};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Free-form application settings read through `SettingsSource`
    #[serde(default)]
    pub app_settings: BTreeMap<String, toml::Value>,

    #[serde(default)]
    pub connection_strings: BTreeMap<String, String>,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for `Config`.
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            debug!(path = %config_path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// Each application setting can be overridden with `VERIFIER_<KEY>` in
    /// upper case, e.g. `VERIFIER_SITE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        for key in keys::ALL {
            let var = env_var_name(key);
            if let Ok(value) = std::env::var(&var) {
                debug!(var = %var, "Setting overridden from environment");
                self.app_settings
                    .insert(key.to_string(), toml::Value::String(value));
            }
        }

        // VERIFIER_CONNECTION_STRING
        if let Ok(connection) = std::env::var(env_var_name("connection_string")) {
            self.connection_strings
                .insert(CONNECTION_STRING_NAME.to_string(), connection);
        }

        // VERIFIER_MAIL_DELIVERY_METHOD
        if let Ok(method) = std::env::var(env_var_name("mail_delivery_method")) {
            self.mail.delivery_method = method.parse()?;
        }

        // VERIFIER_MAIL_PICKUP_DIRECTORY
        if let Ok(directory) = std::env::var(env_var_name("mail_pickup_directory")) {
            if directory.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: env_var_name("mail_pickup_directory"),
                    value: directory,
                }
                .into());
            }
            self.mail.pickup_directory_location = Some(PathBuf::from(directory));
        }

        // VERIFIER_MAIL_FROM
        if let Ok(from) = std::env::var(env_var_name("mail_from")) {
            self.mail.from = Some(from);
        }

        // VERIFIER_LOG
        if let Ok(filter) = std::env::var(env_var_name("log")) {
            self.logging.filter = filter;
        }

        Ok(())
    }
}

/// Environment variable that overrides `key`
#[must_use]
pub fn env_var_name(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_names_are_prefixed_and_upper_case() {
        assert_eq!(env_var_name(keys::SITE_URL), "VERIFIER_SITE_URL");
        assert_eq!(
            env_var_name(keys::IS_DEBUG_MODE),
            "VERIFIER_IS_DEBUG_MODE"
        );
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert!(config.app_settings.is_empty());
        assert_eq!(config.mail.delivery_method, DeliveryMethod::Network);
        assert!(config.mail.pickup_directory_location.is_none());
    }
}
