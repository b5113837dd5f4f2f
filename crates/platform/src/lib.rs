//! Platform abstraction layer for operating-system access.
//!
//! This crate provides the `FileSystem` capability the rest of the verifier
//! depends on, and the `OsFileSystem` adapter that backs it with `tokio::fs`.
//! Consumers hold an `Arc<dyn FileSystem>` so tests can substitute their own
//! implementation.

pub mod filesystem;
pub mod implementations;

pub use filesystem::FileSystem;
pub use implementations::os::OsFileSystem;
