//! Request-scoped temporary files.
//!
//! Every path handed out by [`ScratchStore`] is wrapped in a [`ScratchFile`]
//! guard which unlinks the file when dropped, whether the request succeeded,
//! failed or was cancelled mid-flight.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ScratchStore {
    root: Arc<PathBuf>,
}

impl ScratchStore {
    /// Opens (and creates if needed) the scratch directory.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserves a unique path with the given extension. The file itself is
    /// created by whoever writes to it.
    pub fn allocate(&self, extension: &str) -> ScratchFile {
        let name = format!("mixer-{}.{}", Uuid::new_v4().as_simple(), extension);
        ScratchFile {
            path: self.root.join(name),
        }
    }
}

#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed scratch file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!("Failed to remove scratch file {}: {}", self.path.display(), e),
        }
    }
}
