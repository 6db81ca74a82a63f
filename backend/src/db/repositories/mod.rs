//! Repository implementations.
//!
//! - `local`: in-memory implementation for tests and local development
#[cfg(feature = "local-repo")]
pub mod local;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
