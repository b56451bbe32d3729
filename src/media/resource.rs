use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::library::FileEntry;

/// A playable resource acquired from a `ResourceProvider`.
///
/// Handles are not `Clone`: whoever holds one must give it back through
/// `ResourceProvider::release`, exactly once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: u64,
    path: PathBuf,
}

impl ResourceHandle {
    pub fn new(id: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("cannot open {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),
}

/// Acquires and releases resource handles for accepted files.
pub trait ResourceProvider {
    fn create(&mut self, entry: &FileEntry) -> Result<ResourceHandle, ResourceError>;
    fn release(&mut self, handle: ResourceHandle);
}

/// Filesystem-backed handles: a handle is a checked, numbered reference to
/// a readable local file.
#[derive(Debug, Default)]
pub struct FileResources {
    next_id: u64,
    live: HashSet<u64>,
}

impl FileResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created and not yet released.
    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl ResourceProvider for FileResources {
    fn create(&mut self, entry: &FileEntry) -> Result<ResourceHandle, ResourceError> {
        let unreadable = |source| ResourceError::Unreadable {
            path: entry.path.clone(),
            source,
        };

        let meta = std::fs::metadata(&entry.path).map_err(unreadable)?;
        if !meta.is_file() {
            return Err(ResourceError::NotAFile(entry.path.clone()));
        }
        File::open(&entry.path).map_err(unreadable)?;

        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(id);
        debug!(id, path = %entry.path.display(), "resource acquired");
        Ok(ResourceHandle::new(id, entry.path.clone()))
    }

    fn release(&mut self, handle: ResourceHandle) {
        if self.live.remove(&handle.id) {
            debug!(id = handle.id, "resource released");
        } else {
            warn!(
                id = handle.id,
                path = %handle.path.display(),
                "release of a resource that is not live"
            );
        }
    }
}
