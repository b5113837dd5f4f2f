//! Input validation against the application's contact-data patterns
//!
//! Each helper requires the whole input to match the pattern.

use verifier_config::constants::{
    EMAIL_REGULAR_EXPRESSION, PHONE_NUMBER_REGULAR_EXPRESSION, ZIP_CODE_REGULAR_EXPRESSION,
};
use verifier_errors::PatternError;

use crate::service::{RegexService, RegularExpressionService};

fn matches_whole(input: &str, pattern: &str) -> Result<bool, PatternError> {
    RegexService.is_match(input, &format!("^(?:{pattern})$"))
}

/// # Errors
///
/// Returns `PatternError::InvalidPattern` if the email pattern does not compile.
pub fn is_email(input: &str) -> Result<bool, PatternError> {
    matches_whole(input, EMAIL_REGULAR_EXPRESSION)
}

/// Ten digits, with any separators between them
///
/// # Errors
///
/// Returns `PatternError::InvalidPattern` if the phone pattern does not compile.
pub fn is_phone_number(input: &str) -> Result<bool, PatternError> {
    matches_whole(input, PHONE_NUMBER_REGULAR_EXPRESSION)
}

/// # Errors
///
/// Returns `PatternError::InvalidPattern` if the zip code pattern does not compile.
pub fn is_zip_code(input: &str) -> Result<bool, PatternError> {
    matches_whole(input, ZIP_CODE_REGULAR_EXPRESSION)
}
