//! Parameters used application wide
//!
//! `ApplicationParameters` is built once at startup over an immutable
//! settings source and shared by reference. Every accessor propagates lookup
//! failures to the caller except `is_debug` and `current_user_name`, which
//! fall back to a default instead.

use std::sync::Arc;
use tracing::warn;
use verifier_errors::Error;

use crate::constants::CONNECTION_STRING_NAME;
use crate::request::{os_user_name, RequestContext};
use crate::settings::{keys, SettingsSource};

/// Typed, read-only view over the application settings
#[derive(Clone)]
pub struct ApplicationParameters {
    settings: Arc<dyn SettingsSource>,
    request: Option<Arc<dyn RequestContext>>,
}

impl ApplicationParameters {
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsSource>) -> Self {
        Self {
            settings,
            request: None,
        }
    }

    /// Attach the request context used for caller identity
    #[must_use]
    pub fn with_request_context(mut self, request: Arc<dyn RequestContext>) -> Self {
        self.request = Some(request);
        self
    }

    pub fn request_context(&self) -> Option<&dyn RequestContext> {
        self.request.as_deref()
    }

    /// Minutes between repository cache refreshes
    ///
    /// # Errors
    ///
    /// Returns an error if the setting is missing or not a number.
    pub fn repository_cache_interval_minutes(&self) -> Result<u32, Error> {
        Ok(self
            .settings
            .get_u32(keys::REPOSITORY_CACHE_INTERVAL_MINUTES)?)
    }

    /// Whether the verifier runs in debug mode; `false` when unreadable
    #[must_use]
    pub fn is_debug(&self) -> bool {
        try_get_config(
            keys::IS_DEBUG_MODE,
            || Ok(self.settings.get_bool(keys::IS_DEBUG_MODE)?),
            false,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the setting is missing.
    pub fn github_user_name(&self) -> Result<String, Error> {
        Ok(self.settings.get(keys::GITHUB_USER_NAME)?)
    }

    /// # Errors
    ///
    /// Returns an error if the setting is missing.
    pub fn github_password(&self) -> Result<String, Error> {
        Ok(self.settings.get(keys::GITHUB_PASSWORD)?)
    }

    /// Whether test data should be inserted. This should be false unless
    /// testing locally.
    ///
    /// Only a case-insensitive "true" enables it; any other value disables it.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting is missing.
    pub fn insert_test_data(&self) -> Result<bool, Error> {
        let value = self.settings.get(keys::INSERT_TEST_DATA)?;
        Ok(value.eq_ignore_ascii_case("true"))
    }

    /// # Errors
    ///
    /// Returns an error if no connection string is registered under the
    /// application's connection string name.
    pub fn connection_string(&self) -> Result<String, Error> {
        Ok(self.settings.connection_string(CONNECTION_STRING_NAME)?)
    }

    /// # Errors
    ///
    /// Returns an error if the setting is missing.
    pub fn site_url(&self) -> Result<String, Error> {
        Ok(self.settings.get(keys::SITE_URL)?)
    }

    /// Version of the running build
    #[must_use]
    pub fn file_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Name of the current caller
    ///
    /// The authenticated request identity when one is available, otherwise
    /// the OS user the process runs as.
    #[must_use]
    pub fn current_user_name(&self) -> String {
        let fallback = os_user_name();
        let Some(request) = &self.request else {
            return fallback;
        };

        let fallback_for_errors = fallback.clone();
        try_get_config(
            "current_user_name",
            || Ok(request.user_name()?.unwrap_or(fallback)),
            fallback_for_errors,
        )
    }

    /// Address system mail is sent from
    ///
    /// # Errors
    ///
    /// Returns an error if the setting is missing.
    pub fn system_email_address(&self) -> Result<String, Error> {
        Ok(self.settings.get(keys::SYSTEM_EMAIL_ADDRESS)?)
    }
}

impl std::fmt::Debug for ApplicationParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationParameters")
            .field("has_request_context", &self.request.is_some())
            .finish_non_exhaustive()
    }
}

fn try_get_config<T, F>(name: &str, f: F, default_value: T) -> T
where
    F: FnOnce() -> Result<T, Error>,
{
    match f() {
        Ok(value) => value,
        Err(e) => {
            warn!(setting = name, error = %e, "Falling back to default value");
            default_value
        }
    }
}
