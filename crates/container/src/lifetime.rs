//! Service lifetimes

use std::fmt;

/// How long a resolved service instance is reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// One instance per container, created while the container is built
    Singleton,
    /// One instance per [`Scope`](crate::Scope), created on first resolve
    Scoped,
    /// A new instance on every resolve
    Transient,
}

impl Lifetime {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
