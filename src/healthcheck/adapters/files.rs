//! File probes backed by a capability directory or an in-memory set.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::collections::BTreeSet;
use std::fmt;

use crate::healthcheck::ports::FileProbe;

/// Probe confined to one data-file root directory.
///
/// Absolute paths under the root are resolved relative to it; paths outside
/// the root are reported as missing rather than escaping the capability.
pub struct DirFileProbe {
    root: Utf8PathBuf,
    dir: Dir,
}

impl fmt::Debug for DirFileProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirFileProbe")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl DirFileProbe {
    /// Opens the root directory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open(root: &Utf8Path) -> std::io::Result<Self> {
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: root.to_path_buf(),
            dir,
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl FileProbe for DirFileProbe {
    fn exists(&self, path: &Utf8Path) -> bool {
        if path.is_relative() {
            return self.dir.exists(path);
        }
        path.strip_prefix(&self.root)
            .is_ok_and(|relative| !relative.as_str().is_empty() && self.dir.exists(relative))
    }
}

/// Probe answering from a fixed set of paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileProbe {
    paths: BTreeSet<Utf8PathBuf>,
}

impl InMemoryFileProbe {
    /// Creates a probe where only the given paths exist.
    #[must_use]
    pub fn new<P: Into<Utf8PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileProbe for InMemoryFileProbe {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.paths.contains(path)
    }
}
