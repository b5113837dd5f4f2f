#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Service container for the package verifier
//!
//! Services are registered explicitly with closures or with type
//! registrations that declare their constructors. The container validates the
//! graph and creates every singleton when it is built.

mod constructor;
mod container;
mod key;
mod lifetime;
mod registration;
mod resolution;
mod resolver;

pub use constructor::{ConstructorSignature, Implementation, ImplementationInfo};
pub use container::{Container, ContainerBuilder, Scope};
pub use key::ServiceKey;
pub use lifetime::Lifetime;
pub use registration::ContainerBinding;
pub use resolution::{
    ConstructorResolutionBehavior, DefaultConstructorResolution, LongestConstructorResolution,
};
pub use resolver::{Instance, Resolver, ResolverExt};
