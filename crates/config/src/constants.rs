//! Application-wide constants
//!
//! These values are fixed at compile time and are deliberately not exposed
//! through the TOML configuration.

/// Name of the application
pub const NAME: &str = "chocolatey.package.verifier";

/// Name of the connection string in the `[connection_strings]` table
pub const CONNECTION_STRING_NAME: &str = "chocolatey.package.verifier";

/// The email regular expression
pub const EMAIL_REGULAR_EXPRESSION: &str = r"[.\S]+\@[.\S]+\.[.\S]+";

/// The phone number regular expression, just needs the string to contain 10 digits
pub const PHONE_NUMBER_REGULAR_EXPRESSION: &str = r"(\D*\d){10}\D*";

/// The zip code regular expression
pub const ZIP_CODE_REGULAR_EXPRESSION: &str = r"\d{5}";

pub const WEB_SEPARATOR_CHAR: char = '/';

/// Directory name used under the platform config and data directories
pub const APP_DIR_NAME: &str = "package-verifier";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "VERIFIER_";
