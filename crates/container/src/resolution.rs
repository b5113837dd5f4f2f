//! Constructor selection for type registrations

use tracing::debug;
use verifier_errors::ContainerError;

use crate::constructor::{ConstructorSignature, ImplementationInfo};
use crate::key::ServiceKey;

/// Picks the constructor the container calls for a type registration
pub trait ConstructorResolutionBehavior: Send + Sync {
    /// Select one of `implementation`'s constructors for `service`
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::NoSuitableConstructor` if no constructor can
    /// be chosen.
    fn select_constructor<'a>(
        &self,
        service: &ServiceKey,
        implementation: &'a ImplementationInfo,
    ) -> Result<&'a ConstructorSignature, ContainerError>;
}

impl<B: ConstructorResolutionBehavior + ?Sized> ConstructorResolutionBehavior for Box<B> {
    fn select_constructor<'a>(
        &self,
        service: &ServiceKey,
        implementation: &'a ImplementationInfo,
    ) -> Result<&'a ConstructorSignature, ContainerError> {
        (**self).select_constructor(service, implementation)
    }
}

/// Accepts only implementations that declare exactly one constructor
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConstructorResolution;

impl ConstructorResolutionBehavior for DefaultConstructorResolution {
    fn select_constructor<'a>(
        &self,
        _service: &ServiceKey,
        implementation: &'a ImplementationInfo,
    ) -> Result<&'a ConstructorSignature, ContainerError> {
        match implementation.constructors() {
            [only] => Ok(only),
            [] => Err(ContainerError::NoSuitableConstructor {
                implementation: implementation.key().name().to_string(),
                reason: "no constructors declared".to_string(),
            }),
            many => Err(ContainerError::NoSuitableConstructor {
                implementation: implementation.key().name().to_string(),
                reason: format!(
                    "{} constructors declared, exactly one is required",
                    many.len()
                ),
            }),
        }
    }
}

/// Prefers the constructor with the most parameters
///
/// Applies only when the implementation can be used as the requested service;
/// otherwise the wrapped behavior decides, and its result is returned as is.
#[derive(Debug, Clone, Default)]
pub struct LongestConstructorResolution<B> {
    inner: B,
}

impl<B> LongestConstructorResolution<B> {
    #[must_use]
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: ConstructorResolutionBehavior> ConstructorResolutionBehavior
    for LongestConstructorResolution<B>
{
    fn select_constructor<'a>(
        &self,
        service: &ServiceKey,
        implementation: &'a ImplementationInfo,
    ) -> Result<&'a ConstructorSignature, ContainerError> {
        if implementation.is_assignable_to(service) {
            // Ties go to the first declared constructor
            let longest = implementation
                .constructors()
                .iter()
                .fold(None::<&ConstructorSignature>, |best, candidate| match best {
                    Some(best) if best.arity() >= candidate.arity() => Some(best),
                    _ => Some(candidate),
                });
            if let Some(constructor) = longest {
                debug!(
                    service = %service,
                    implementation = %implementation.key(),
                    constructor = constructor.name(),
                    arity = constructor.arity(),
                    "Selected longest constructor"
                );
                return Ok(constructor);
            }
        }
        self.inner.select_constructor(service, implementation)
    }
}
