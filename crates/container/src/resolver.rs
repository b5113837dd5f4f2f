//! Read access to registered services during construction

use std::any::Any;
use std::sync::Arc;
use verifier_errors::{ContainerError, Error};

use crate::key::ServiceKey;

/// Type-erased service instance as stored by the container
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Source of already registered services
///
/// Factories and constructors receive a `&dyn Resolver` to obtain their
/// dependencies. [`ResolverExt::resolve`] is the typed entry point.
pub trait Resolver {
    /// Resolve the instance registered under `key`
    ///
    /// # Errors
    ///
    /// Returns a `ContainerError` if the service is not registered, depends on
    /// itself, has an incompatible lifetime or fails to construct.
    fn resolve_any(&self, key: &ServiceKey) -> Result<Instance, Error>;
}

/// Typed resolution on top of [`Resolver`]
pub trait ResolverExt {
    /// Resolve the service registered under `S`
    ///
    /// # Errors
    ///
    /// Same as [`Resolver::resolve_any`], plus `ContainerError::TypeMismatch`
    /// if the stored instance is not an `S`.
    fn resolve<S: Clone + Send + Sync + 'static>(&self) -> Result<S, Error>;
}

impl<R: Resolver + ?Sized> ResolverExt for R {
    fn resolve<S: Clone + Send + Sync + 'static>(&self) -> Result<S, Error> {
        let key = ServiceKey::of::<S>();
        let instance = self.resolve_any(&key)?;
        instance.downcast_ref::<S>().cloned().ok_or_else(|| {
            ContainerError::TypeMismatch {
                service: key.name().to_string(),
            }
            .into()
        })
    }
}
