//! Filesystem existence probe.

use camino::Utf8Path;

/// Answers whether a path referenced by a database exists on disk.
pub trait FileProbe: Send + Sync {
    /// Returns `true` when `path` exists.
    fn exists(&self, path: &Utf8Path) -> bool;
}
