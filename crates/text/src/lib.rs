#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Text processing for the package verifier
//!
//! [`RegularExpressionService`] is the seam consumers depend on for
//! pattern-based rewriting; [`RegexService`] backs it with the `regex` crate.

mod service;
pub mod validation;

pub use regex::Captures;
pub use service::{RegexService, RegularExpressionService};
pub use validation::{is_email, is_phone_number, is_zip_code};
