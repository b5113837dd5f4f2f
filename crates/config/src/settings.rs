//! Key/value access to application settings
//!
//! `SettingsSource` is the synchronous, typed read surface the rest of the
//! application consumes. `Config` implements it over its `[app_settings]` and
//! `[connection_strings]` tables.

use toml::Value;
use verifier_errors::ConfigError;

use crate::Config;

/// Names of the recognised application settings
pub mod keys {
    pub const REPOSITORY_CACHE_INTERVAL_MINUTES: &str = "repository_cache_interval_minutes";
    pub const IS_DEBUG_MODE: &str = "is_debug_mode";
    pub const GITHUB_USER_NAME: &str = "github_user_name";
    pub const GITHUB_PASSWORD: &str = "github_password";
    pub const SITE_URL: &str = "site_url";
    pub const SYSTEM_EMAIL_ADDRESS: &str = "system_email_address";
    pub const INSERT_TEST_DATA: &str = "insert_test_data";

    pub const ALL: [&str; 7] = [
        REPOSITORY_CACHE_INTERVAL_MINUTES,
        IS_DEBUG_MODE,
        GITHUB_USER_NAME,
        GITHUB_PASSWORD,
        SITE_URL,
        SYSTEM_EMAIL_ADDRESS,
        INSERT_TEST_DATA,
    ];
}

/// Read-only settings provider
pub trait SettingsSource: Send + Sync {
    /// Raw string value of `key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the key is absent and
    /// `ConfigError::InvalidValue` if it cannot be read as text.
    fn get(&self, key: &str) -> Result<String, ConfigError>;

    /// Connection string registered under `name`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConnectionStringNotFound` if no such entry exists.
    fn connection_string(&self, name: &str) -> Result<String, ConfigError>;

    /// Boolean value of `key`
    ///
    /// # Errors
    ///
    /// Propagates lookup errors and rejects values other than
    /// true/false, 1/0 and yes/no.
    fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        let value = self.get(key)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                field: key.to_string(),
                value,
            }),
        }
    }

    /// Unsigned integer value of `key`
    ///
    /// # Errors
    ///
    /// Propagates lookup errors and rejects values that do not parse as `u32`.
    fn get_u32(&self, key: &str) -> Result<u32, ConfigError> {
        let value = self.get(key)?;
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: key.to_string(),
                value,
            })
    }
}

impl SettingsSource for Config {
    fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = self
            .app_settings
            .get(key)
            .ok_or_else(|| ConfigError::MissingField {
                field: key.to_string(),
            })?;

        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Datetime(d) => Ok(d.to_string()),
            Value::Array(_) | Value::Table(_) => Err(ConfigError::InvalidValue {
                field: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn connection_string(&self, name: &str) -> Result<String, ConfigError> {
        self.connection_strings
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::ConnectionStringNotFound {
                name: name.to_string(),
            })
    }
}
