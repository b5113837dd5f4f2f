//! Concrete platform implementations

pub mod os;
