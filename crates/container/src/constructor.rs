//! Declared constructors of type registrations
//!
//! A type registration names the implementation type, the services it can
//! stand in for and the constructors it offers. Each constructor lists the
//! services it needs so the container can check them before calling it.

use std::sync::Arc;
use verifier_errors::Error;

use crate::key::ServiceKey;
use crate::resolver::{Instance, Resolver};

/// One constructor of an implementation type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSignature {
    position: usize,
    name: &'static str,
    parameters: Vec<ServiceKey>,
}

impl ConstructorSignature {
    #[must_use]
    pub fn new(name: &'static str, parameters: Vec<ServiceKey>) -> Self {
        Self {
            position: 0,
            name,
            parameters,
        }
    }

    /// Declaration index within the implementation
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[ServiceKey] {
        &self.parameters
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// Metadata about an implementation type, used for constructor selection
#[derive(Debug, Clone)]
pub struct ImplementationInfo {
    key: ServiceKey,
    provides: Vec<ServiceKey>,
    constructors: Vec<ConstructorSignature>,
}

impl ImplementationInfo {
    #[must_use]
    pub fn new(key: ServiceKey) -> Self {
        Self {
            key,
            provides: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Declare that this implementation can be used as `service`
    #[must_use]
    pub fn with_provides(mut self, service: ServiceKey) -> Self {
        if !self.provides.contains(&service) {
            self.provides.push(service);
        }
        self
    }

    /// Append a constructor; its position is the declaration order
    #[must_use]
    pub fn with_constructor(mut self, mut constructor: ConstructorSignature) -> Self {
        constructor.position = self.constructors.len();
        self.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn key(&self) -> ServiceKey {
        self.key
    }

    #[must_use]
    pub fn constructors(&self) -> &[ConstructorSignature] {
        &self.constructors
    }

    /// Whether a value of this implementation can be handed out as `service`
    #[must_use]
    pub fn is_assignable_to(&self, service: &ServiceKey) -> bool {
        self.key == *service || self.provides.contains(service)
    }
}

pub(crate) type ErasedBuild = Arc<dyn Fn(&dyn Resolver) -> Result<Instance, Error> + Send + Sync>;

/// A type registration for service `S`
///
/// Pairs the [`ImplementationInfo`] with one build function per declared
/// constructor. The container picks a constructor with its
/// [`ConstructorResolutionBehavior`](crate::ConstructorResolutionBehavior)
/// and calls the matching build function.
pub struct Implementation<S> {
    info: ImplementationInfo,
    builds: Vec<ErasedBuild>,
    _service: std::marker::PhantomData<fn() -> S>,
}

impl<S: Send + Sync + 'static> Implementation<S> {
    /// Start describing implementation type `I`
    #[must_use]
    pub fn of<I: ?Sized + 'static>() -> Self {
        Self {
            info: ImplementationInfo::new(ServiceKey::of::<I>()),
            builds: Vec::new(),
            _service: std::marker::PhantomData,
        }
    }

    /// Declare that the implementation can be used as `T`
    #[must_use]
    pub fn provides<T: ?Sized + 'static>(mut self) -> Self {
        self.info = self.info.with_provides(ServiceKey::of::<T>());
        self
    }

    /// Declare a constructor taking the services in `parameters`
    #[must_use]
    pub fn constructor<F>(
        mut self,
        name: &'static str,
        parameters: Vec<ServiceKey>,
        build: F,
    ) -> Self
    where
        F: Fn(&dyn Resolver) -> Result<S, Error> + Send + Sync + 'static,
    {
        self.info = self
            .info
            .with_constructor(ConstructorSignature::new(name, parameters));
        self.builds.push(Arc::new(move |resolver: &dyn Resolver| {
            build(resolver).map(|service| Arc::new(service) as Instance)
        }));
        self
    }

    #[must_use]
    pub fn info(&self) -> &ImplementationInfo {
        &self.info
    }

    pub(crate) fn into_parts(self) -> (ImplementationInfo, Vec<ErasedBuild>) {
        (self.info, self.builds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn constructors_are_numbered_in_declaration_order() {
        let info = ImplementationInfo::new(ServiceKey::of::<Widget>())
            .with_constructor(ConstructorSignature::new("empty", vec![]))
            .with_constructor(ConstructorSignature::new(
                "with_name",
                vec![ServiceKey::of::<String>()],
            ));

        let positions: Vec<_> = info
            .constructors()
            .iter()
            .map(ConstructorSignature::position)
            .collect();
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(info.constructors()[1].arity(), 1);
    }

    #[test]
    fn assignable_to_self_and_provided_services() {
        let info = ImplementationInfo::new(ServiceKey::of::<Widget>())
            .with_provides(ServiceKey::of::<String>());

        assert!(info.is_assignable_to(&ServiceKey::of::<Widget>()));
        assert!(info.is_assignable_to(&ServiceKey::of::<String>()));
        assert!(!info.is_assignable_to(&ServiceKey::of::<u64>()));
    }
}
