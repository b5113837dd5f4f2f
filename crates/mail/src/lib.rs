#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Outgoing mail for the package verifier
//!
//! Mail is either handed to a network relay or dropped as `.eml` files into a
//! pickup directory. For pickup delivery the configured directory is resolved
//! to an absolute path once at startup by [`PickupDirectoryConverter`].

mod converter;
mod mailer;
mod message;

pub use converter::PickupDirectoryConverter;
pub use mailer::PickupDirectoryMailer;
pub use message::MailMessage;
