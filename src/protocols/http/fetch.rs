//! Reads requested files from the serving directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Loads whole files relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the file named by a validated request path.
    ///
    /// The leading `/` is dropped and the rest is resolved against the root.
    /// The path must already have passed the whitelist; this does no
    /// traversal checks of its own.
    pub fn fetch(&self, path: &[u8]) -> io::Result<Vec<u8>> {
        let name = path.strip_prefix(b"/").unwrap_or(path);
        let name = std::str::from_utf8(name)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        fs::read(self.root.join(name))
    }
}
