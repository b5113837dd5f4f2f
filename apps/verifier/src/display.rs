//! Output rendering for CLI commands

use crate::error::CliError;
use serde_json::{json, Map, Value};
use std::path::Path;
use verifier_config::{ApplicationParameters, MailConfig};
use verifier_errors::Error;

const MASK: &str = "********";

/// One row of `show-config` output
struct Row {
    name: &'static str,
    value: Result<Value, String>,
}

impl Row {
    fn new<T: Into<Value>>(name: &'static str, value: Result<T, Error>) -> Self {
        Self {
            name,
            value: value.map(Into::into).map_err(|e| e.to_string()),
        }
    }
}

/// Renders command results as text or JSON
pub struct OutputRenderer {
    json_output: bool,
}

impl OutputRenderer {
    pub fn new(json_output: bool) -> Self {
        Self { json_output }
    }

    /// Print every application parameter
    pub fn render_parameters(
        &self,
        parameters: &ApplicationParameters,
        mail: &MailConfig,
    ) -> Result<(), CliError> {
        let rows = vec![
            Row::new("file_version", Ok(parameters.file_version())),
            Row::new("current_user_name", Ok(parameters.current_user_name())),
            Row::new("is_debug", Ok(parameters.is_debug())),
            Row::new(
                "repository_cache_interval_minutes",
                parameters.repository_cache_interval_minutes(),
            ),
            Row::new("github_user_name", parameters.github_user_name()),
            Row::new(
                "github_password",
                parameters.github_password().map(|_| MASK.to_string()),
            ),
            Row::new("insert_test_data", parameters.insert_test_data()),
            Row::new(
                "connection_string",
                parameters.connection_string().map(|_| MASK.to_string()),
            ),
            Row::new("site_url", parameters.site_url()),
            Row::new("system_email_address", parameters.system_email_address()),
            Row::new("mail.delivery_method", Ok(mail.delivery_method.as_str())),
            Row::new(
                "mail.pickup_directory_location",
                Ok(mail
                    .pickup_directory_location
                    .as_deref()
                    .map(|path| path.display().to_string())),
            ),
        ];

        if self.json_output {
            let mut object = Map::new();
            for row in rows {
                let entry = match row.value {
                    Ok(value) => json!({ "value": value }),
                    Err(error) => json!({ "value": Value::Null, "error": error }),
                };
                object.insert(row.name.to_string(), entry);
            }
            let rendered =
                serde_json::to_string_pretty(&Value::Object(object)).map_err(Error::from)?;
            println!("{rendered}");
        } else {
            let width = rows.iter().map(|row| row.name.len()).max().unwrap_or(0);
            for row in rows {
                match row.value {
                    Ok(Value::String(value)) => println!("{:<width$}  {value}", row.name),
                    Ok(Value::Null) => println!("{:<width$}  (not set)", row.name),
                    Ok(value) => println!("{:<width$}  {value}", row.name),
                    Err(error) => println!("{:<width$}  <error: {error}>", row.name),
                }
            }
        }
        Ok(())
    }

    /// Report a delivered message
    pub fn render_delivery(&self, path: &Path) -> Result<(), CliError> {
        if self.json_output {
            let value = json!({ "delivered": path.display().to_string() });
            println!("{}", serde_json::to_string(&value).map_err(Error::from)?);
        } else {
            println!("Message written to {}", path.display());
        }
        Ok(())
    }

    /// Report a finished run
    pub fn render_stopped(&self, reason: &str) -> Result<(), CliError> {
        if self.json_output {
            let value = json!({ "stopped": reason });
            println!("{}", serde_json::to_string(&value).map_err(Error::from)?);
        } else {
            println!("Verifier stopped: {reason}");
        }
        Ok(())
    }
}
