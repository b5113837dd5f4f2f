//! Regular-expression replacement

use regex::{Captures, Regex};
use tracing::debug;
use verifier_errors::PatternError;

/// Pattern matching and match-by-match replacement
pub trait RegularExpressionService: Send + Sync {
    /// Replace every match of `pattern` in `input` with the evaluator's output
    ///
    /// The evaluator is called once per match, left to right.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidPattern` if `pattern` does not compile.
    fn replace(
        &self,
        input: &str,
        pattern: &str,
        evaluator: &mut dyn FnMut(&Captures<'_>) -> String,
    ) -> Result<String, PatternError>;

    /// Whether `pattern` matches anywhere in `input`
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidPattern` if `pattern` does not compile.
    fn is_match(&self, input: &str, pattern: &str) -> Result<bool, PatternError>;
}

/// Stateless [`RegularExpressionService`] over the `regex` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexService;

impl RegexService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn compile(pattern: &str) -> Result<Regex, PatternError> {
        Regex::new(pattern).map_err(|e| PatternError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
    }
}

impl RegularExpressionService for RegexService {
    fn replace(
        &self,
        input: &str,
        pattern: &str,
        evaluator: &mut dyn FnMut(&Captures<'_>) -> String,
    ) -> Result<String, PatternError> {
        let regex = Self::compile(pattern)?;
        let output = regex.replace_all(input, |captures: &Captures<'_>| evaluator(captures));
        debug!(pattern, changed = output != input, "Pattern replaced");
        Ok(output.into_owned())
    }

    fn is_match(&self, input: &str, pattern: &str) -> Result<bool, PatternError> {
        Ok(Self::compile(pattern)?.is_match(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_each_match_with_evaluator_output() {
        let service = RegexService::new();
        let output = service
            .replace("a1b2", r"\d", &mut |_| "#".to_string())
            .unwrap();
        assert_eq!(output, "a#b#");
    }

    #[test]
    fn evaluator_sees_captures_in_order() {
        let service = RegexService::new();
        let mut seen = Vec::new();
        let output = service
            .replace("x=1, y=22", r"(\w)=(\d+)", &mut |caps| {
                seen.push(caps[1].to_string());
                format!("{}:{}", &caps[1], caps[2].len())
            })
            .unwrap();

        assert_eq!(output, "x:1, y:2");
        assert_eq!(seen, vec!["x", "y"]);
    }

    #[test]
    fn no_match_returns_input_unchanged() {
        let service = RegexService::new();
        let mut calls = 0;
        let output = service
            .replace("abc", r"\d", &mut |_| {
                calls += 1;
                String::new()
            })
            .unwrap();
        assert_eq!(output, "abc");
        assert_eq!(calls, 0);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let service = RegexService::new();
        let err = service
            .replace("abc", "(unclosed", &mut |_| String::new())
            .unwrap_err();
        let PatternError::InvalidPattern { pattern, .. } = err;
        assert_eq!(pattern, "(unclosed");

        assert!(service.is_match("abc", "[").is_err());
    }

    #[test]
    fn works_through_a_trait_object() {
        let service: &dyn RegularExpressionService = &RegexService;
        assert!(service.is_match("release-42", r"\d+").unwrap());
        assert!(!service.is_match("release", r"\d+").unwrap());
    }
}
