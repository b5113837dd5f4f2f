//! Typed configuration sections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use verifier_errors::ConfigError;

use crate::constants::APP_DIR_NAME;

/// How outgoing mail leaves the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Hand messages to an SMTP relay
    #[default]
    Network,
    /// Drop messages as files into a local pickup directory
    SpecifiedPickupDirectory,
}

impl DeliveryMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::SpecifiedPickupDirectory => "specified_pickup_directory",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "network" => Ok(Self::Network),
            "specified_pickup_directory" | "pickup" => Ok(Self::SpecifiedPickupDirectory),
            _ => Err(ConfigError::InvalidValue {
                field: "mail.delivery_method".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Outgoing mail configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MailConfig {
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    /// Relative paths are resolved to absolute ones once at startup
    pub pickup_directory_location: Option<PathBuf>,
    /// Sender address used when a message does not set one
    pub from: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            directory: None,
        }
    }
}

impl LoggingConfig {
    /// Directory debug log files are written to
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

fn default_log_filter() -> String {
    "warn,package_verifier=info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_method_parses_case_insensitively() {
        assert_eq!(
            "Specified_Pickup_Directory".parse::<DeliveryMethod>().unwrap(),
            DeliveryMethod::SpecifiedPickupDirectory
        );
        assert_eq!(
            "network".parse::<DeliveryMethod>().unwrap(),
            DeliveryMethod::Network
        );
        assert!("carrier-pigeon".parse::<DeliveryMethod>().is_err());
    }

    #[test]
    fn explicit_log_directory_wins() {
        let config = LoggingConfig {
            directory: Some(PathBuf::from("/tmp/verifier-logs")),
            ..LoggingConfig::default()
        };
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/verifier-logs"));
    }
}
