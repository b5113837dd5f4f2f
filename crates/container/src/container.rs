//! Service registrations and the built container

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info};
use verifier_errors::{ContainerError, Error};

use crate::constructor::{ErasedBuild, Implementation};
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use crate::resolution::{ConstructorResolutionBehavior, DefaultConstructorResolution};
use crate::resolver::{Instance, Resolver, ResolverExt};

enum Provider {
    Instance(Instance),
    Factory(ErasedBuild),
    Type {
        implementation: crate::constructor::ImplementationInfo,
        builds: Vec<ErasedBuild>,
    },
}

struct Registration {
    key: ServiceKey,
    lifetime: Lifetime,
    provider: Provider,
}

/// A registration after constructor selection
struct Entry {
    key: ServiceKey,
    lifetime: Lifetime,
    build: Build,
    singleton: OnceLock<Instance>,
}

enum Build {
    Instance(Instance),
    Call(ErasedBuild),
}

struct Registry {
    entries: Vec<Entry>,
    index: HashMap<ServiceKey, usize>,
}

impl Registry {
    fn entry(&self, key: &ServiceKey) -> Option<&Entry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }
}

type ScopeCache = Mutex<HashMap<ServiceKey, Instance>>;

/// One resolution request and everything it pulls in
///
/// Tracks the chain of services under construction to detect cycles and
/// singletons that would capture a scoped service.
struct Resolution<'c> {
    registry: &'c Registry,
    scope: Option<&'c ScopeCache>,
    chain: RefCell<Vec<(ServiceKey, Lifetime)>>,
}

impl<'c> Resolution<'c> {
    fn new(registry: &'c Registry, scope: Option<&'c ScopeCache>) -> Self {
        Self {
            registry,
            scope,
            chain: RefCell::new(Vec::new()),
        }
    }

    fn construct(&self, entry: &Entry) -> Result<Instance, Error> {
        let build = match &entry.build {
            Build::Instance(instance) => return Ok(Arc::clone(instance)),
            Build::Call(build) => build,
        };

        {
            let mut chain = self.chain.borrow_mut();
            if chain.iter().any(|(key, _)| *key == entry.key) {
                let mut path: Vec<&str> = chain.iter().map(|(key, _)| key.name()).collect();
                path.push(entry.key.name());
                return Err(ContainerError::CircularDependency {
                    service: entry.key.name().to_string(),
                    chain: path.join(" -> "),
                }
                .into());
            }
            chain.push((entry.key, entry.lifetime));
        }

        let resolver: &dyn Resolver = self;
        let result = build(resolver);
        self.chain.borrow_mut().pop();

        result.map_err(|e| match e {
            Error::Container(_) => e,
            other => ContainerError::ConstructionFailed {
                service: entry.key.name().to_string(),
                message: other.to_string(),
            }
            .into(),
        })
    }

    fn singleton(&self, entry: &Entry) -> Result<Instance, Error> {
        if let Some(instance) = entry.singleton.get() {
            return Ok(Arc::clone(instance));
        }
        let instance = self.construct(entry)?;
        debug!(service = %entry.key, "Singleton created");
        // Construction is single threaded during build, so the slot is empty
        let _ = entry.singleton.set(Arc::clone(&instance));
        Ok(instance)
    }

    fn scoped(&self, entry: &Entry) -> Result<Instance, Error> {
        let captive = self
            .chain
            .borrow()
            .iter()
            .rev()
            .find(|(_, lifetime)| *lifetime == Lifetime::Singleton)
            .map(|(key, _)| *key);
        if let Some(consumer) = captive {
            return Err(ContainerError::LifetimeMismatch {
                consumer: consumer.name().to_string(),
                service: entry.key.name().to_string(),
            }
            .into());
        }

        let Some(cache) = self.scope else {
            return Err(ContainerError::LifetimeMismatch {
                consumer: self
                    .chain
                    .borrow()
                    .last()
                    .map_or("root container", |(key, _)| key.name())
                    .to_string(),
                service: entry.key.name().to_string(),
            }
            .into());
        };

        if let Some(instance) = lock(cache).get(&entry.key) {
            return Ok(Arc::clone(instance));
        }
        // The lock is not held while building so scoped dependencies can resolve
        let instance = self.construct(entry)?;
        Ok(Arc::clone(lock(cache).entry(entry.key).or_insert(instance)))
    }
}

impl Resolver for Resolution<'_> {
    fn resolve_any(&self, key: &ServiceKey) -> Result<Instance, Error> {
        let entry = self
            .registry
            .entry(key)
            .ok_or_else(|| ContainerError::MissingRegistration {
                service: key.name().to_string(),
            })?;
        match entry.lifetime {
            Lifetime::Singleton => self.singleton(entry),
            Lifetime::Scoped => self.scoped(entry),
            Lifetime::Transient => self.construct(entry),
        }
    }
}

fn lock(cache: &ScopeCache) -> std::sync::MutexGuard<'_, HashMap<ServiceKey, Instance>> {
    cache
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Collects service registrations and builds a [`Container`]
///
/// Registrations are kept in order. Singletons are created in that order when
/// the container is built, so any construction failure surfaces from
/// [`ContainerBuilder::build`] and no partially built container exists.
pub struct ContainerBuilder {
    registrations: Vec<Registration>,
    behavior: Box<dyn ConstructorResolutionBehavior>,
}

impl ContainerBuilder {
    /// Create a builder using [`DefaultConstructorResolution`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            behavior: Box::new(DefaultConstructorResolution),
        }
    }

    /// Register an existing value as a singleton
    #[must_use]
    pub fn instance<S>(mut self, value: S) -> Self
    where
        S: Clone + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            key: ServiceKey::of::<S>(),
            lifetime: Lifetime::Singleton,
            provider: Provider::Instance(Arc::new(value)),
        });
        self
    }

    /// Register a factory with the given lifetime
    #[must_use]
    pub fn factory<S, F>(mut self, lifetime: Lifetime, factory: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<S, Error> + Send + Sync + 'static,
    {
        self.registrations.push(Registration {
            key: ServiceKey::of::<S>(),
            lifetime,
            provider: Provider::Factory(Arc::new(move |resolver: &dyn Resolver| {
                factory(resolver).map(|service| Arc::new(service) as Instance)
            })),
        });
        self
    }

    #[must_use]
    pub fn singleton<S, F>(self, factory: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<S, Error> + Send + Sync + 'static,
    {
        self.factory(Lifetime::Singleton, factory)
    }

    #[must_use]
    pub fn scoped<S, F>(self, factory: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<S, Error> + Send + Sync + 'static,
    {
        self.factory(Lifetime::Scoped, factory)
    }

    #[must_use]
    pub fn transient<S, F>(self, factory: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<S, Error> + Send + Sync + 'static,
    {
        self.factory(Lifetime::Transient, factory)
    }

    /// Register an implementation type whose constructor is chosen at build
    #[must_use]
    pub fn register_type<S>(
        mut self,
        implementation: Implementation<S>,
        lifetime: Lifetime,
    ) -> Self
    where
        S: Clone + Send + Sync + 'static,
    {
        let (implementation, builds) = implementation.into_parts();
        self.registrations.push(Registration {
            key: ServiceKey::of::<S>(),
            lifetime,
            provider: Provider::Type {
                implementation,
                builds,
            },
        });
        self
    }

    /// Wrap the current constructor selection behavior
    ///
    /// ```ignore
    /// builder.decorate_constructor_resolution(LongestConstructorResolution::new)
    /// ```
    #[must_use]
    pub fn decorate_constructor_resolution<F, B>(mut self, decorate: F) -> Self
    where
        F: FnOnce(Box<dyn ConstructorResolutionBehavior>) -> B,
        B: ConstructorResolutionBehavior + 'static,
    {
        self.behavior = Box::new(decorate(self.behavior));
        self
    }

    /// Number of registrations so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Validate the registrations and create every singleton
    ///
    /// # Errors
    ///
    /// Returns a `ContainerError` if a service is registered twice, a type
    /// registration has no usable constructor, a constructor parameter is not
    /// registered, a dependency cycle exists, a singleton depends on a scoped
    /// service or any singleton fails to construct.
    pub fn build(self) -> Result<Container, Error> {
        let mut index = HashMap::with_capacity(self.registrations.len());
        for (position, registration) in self.registrations.iter().enumerate() {
            if index.insert(registration.key, position).is_some() {
                return Err(ContainerError::DuplicateRegistration {
                    service: registration.key.name().to_string(),
                }
                .into());
            }
        }

        let mut entries = Vec::with_capacity(self.registrations.len());
        for registration in self.registrations {
            let build = match registration.provider {
                Provider::Instance(instance) => Build::Instance(instance),
                Provider::Factory(build) => Build::Call(build),
                Provider::Type {
                    implementation,
                    mut builds,
                } => {
                    let constructor = self
                        .behavior
                        .select_constructor(&registration.key, &implementation)?;
                    for parameter in constructor.parameters() {
                        if !index.contains_key(parameter) {
                            return Err(ContainerError::MissingRegistration {
                                service: parameter.name().to_string(),
                            }
                            .into());
                        }
                    }
                    debug!(
                        service = %registration.key,
                        implementation = %implementation.key(),
                        constructor = constructor.name(),
                        "Constructor selected"
                    );
                    let position = constructor.position();
                    if position >= builds.len() {
                        return Err(ContainerError::ConstructionFailed {
                            service: registration.key.name().to_string(),
                            message: format!(
                                "constructor {} has no build function",
                                constructor.name()
                            ),
                        }
                        .into());
                    }
                    Build::Call(builds.swap_remove(position))
                }
            };
            entries.push(Entry {
                key: registration.key,
                lifetime: registration.lifetime,
                build,
                singleton: OnceLock::new(),
            });
        }

        let registry = Registry { entries, index };
        {
            let resolution = Resolution::new(&registry, None);
            for entry in &registry.entries {
                if entry.lifetime == Lifetime::Singleton {
                    resolution.singleton(entry)?;
                }
            }
        }

        info!(services = registry.entries.len(), "Container built");
        Ok(Container {
            registry: Arc::new(registry),
        })
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Built service container
///
/// Cheap to clone; clones share the same singletons.
#[derive(Clone)]
pub struct Container {
    registry: Arc<Registry>,
}

impl Container {
    #[must_use]
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Resolve a service from the root container
    ///
    /// # Errors
    ///
    /// Returns a `ContainerError` if `S` is not registered, is scoped, or
    /// fails to construct.
    pub fn resolve<S: Clone + Send + Sync + 'static>(&self) -> Result<S, Error> {
        ResolverExt::resolve(self)
    }

    #[must_use]
    pub fn contains<S: ?Sized + 'static>(&self) -> bool {
        self.registry.index.contains_key(&ServiceKey::of::<S>())
    }

    #[must_use]
    pub fn lifetime_of<S: ?Sized + 'static>(&self) -> Option<Lifetime> {
        self.registry
            .entry(&ServiceKey::of::<S>())
            .map(|entry| entry.lifetime)
    }

    /// Registered services in registration order
    pub fn services(&self) -> impl Iterator<Item = (ServiceKey, Lifetime)> + '_ {
        self.registry
            .entries
            .iter()
            .map(|entry| (entry.key, entry.lifetime))
    }

    /// Open a scope that caches scoped services until it is dropped
    #[must_use]
    pub fn create_scope(&self) -> Scope {
        Scope {
            registry: Arc::clone(&self.registry),
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl Resolver for Container {
    fn resolve_any(&self, key: &ServiceKey) -> Result<Instance, Error> {
        Resolution::new(&self.registry, None).resolve_any(key)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.registry.entries.len())
            .finish()
    }
}

/// Resolution scope created by [`Container::create_scope`]
pub struct Scope {
    registry: Arc<Registry>,
    cache: ScopeCache,
}

impl Scope {
    /// Resolve a service, reusing this scope's scoped instances
    ///
    /// # Errors
    ///
    /// Returns a `ContainerError` if `S` is not registered or fails to
    /// construct.
    pub fn resolve<S: Clone + Send + Sync + 'static>(&self) -> Result<S, Error> {
        ResolverExt::resolve(self)
    }
}

impl Resolver for Scope {
    fn resolve_any(&self, key: &ServiceKey) -> Result<Instance, Error> {
        Resolution::new(&self.registry, Some(&self.cache)).resolve_any(key)
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("cached", &lock(&self.cache).len())
            .finish()
    }
}
