//! Adapter implementations for healthcheck ports.

pub mod files;

pub use files::{DirFileProbe, InMemoryFileProbe};
