//! CLI error handling

use serde_json::{json, Value};
use std::fmt;

use verifier_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Startup or command error
    Verifier(verifier_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Verifier(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl CliError {
    /// Error envelope printed on stdout in `--json` mode
    pub fn to_json(&self) -> Value {
        match self {
            CliError::Verifier(e) => json!({
                "error": {
                    "message": e.user_message(),
                    "code": e.user_code(),
                    "hint": e.user_hint(),
                    "retryable": e.is_retryable(),
                    "detail": serde_json::to_value(e).unwrap_or(Value::Null),
                }
            }),
            CliError::Io(e) => json!({
                "error": {
                    "message": e.to_string(),
                    "code": "error.io",
                    "hint": Value::Null,
                    "retryable": false,
                    "detail": Value::Null,
                }
            }),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Verifier(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<verifier_errors::Error> for CliError {
    fn from(e: verifier_errors::Error) -> Self {
        CliError::Verifier(e)
    }
}

impl From<verifier_errors::TaskError> for CliError {
    fn from(e: verifier_errors::TaskError) -> Self {
        CliError::Verifier(e.into())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
