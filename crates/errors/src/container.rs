//! Service container activation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors raised while registering or activating services
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ContainerError {
    #[error("no suitable constructor for {implementation}: {reason}")]
    NoSuitableConstructor {
        implementation: String,
        reason: String,
    },

    #[error("no registration for {service}")]
    MissingRegistration { service: String },

    #[error("{service} is registered more than once")]
    DuplicateRegistration { service: String },

    #[error("circular dependency while resolving {service}: {chain}")]
    CircularDependency { service: String, chain: String },

    #[error("{consumer} cannot depend on scoped service {service} outside a scope")]
    LifetimeMismatch { consumer: String, service: String },

    #[error("registered instance of {service} has an unexpected type")]
    TypeMismatch { service: String },

    #[error("failed to construct {service}: {message}")]
    ConstructionFailed { service: String, message: String },
}

impl UserFacingError for ContainerError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoSuitableConstructor { .. } => {
                Some("Declare exactly one constructor or install the longest-constructor behavior.")
            }
            Self::MissingRegistration { .. } => {
                Some("Register the dependency before building the container.")
            }
            Self::LifetimeMismatch { .. } => {
                Some("Resolve scoped services from a scope created with create_scope().")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NoSuitableConstructor { .. } => "container.no_suitable_constructor",
            Self::MissingRegistration { .. } => "container.missing_registration",
            Self::DuplicateRegistration { .. } => "container.duplicate_registration",
            Self::CircularDependency { .. } => "container.circular_dependency",
            Self::LifetimeMismatch { .. } => "container.lifetime_mismatch",
            Self::TypeMismatch { .. } => "container.type_mismatch",
            Self::ConstructionFailed { .. } => "container.construction_failed",
        };
        Some(code)
    }
}
