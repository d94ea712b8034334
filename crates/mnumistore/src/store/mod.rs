//! # Storage Layer
//!
//! One [`ResourceStore`] serves one resource directory. The store maps
//! resource handles to files and moves bytes; it knows nothing about the
//! payload format, filtering or pagination.
//!
//! ## Contract
//!
//! - `create` and `replace` are separate operations: `create` fails with
//!   `AlreadyExists` when the file is there, `replace` fails with `NotFound`
//!   when it is not.
//! - `list` is lazy and single-pass. Calling it again restarts enumeration
//!   from the current directory state. Subdirectories and names outside the
//!   grammar (see [`crate::naming`]) are skipped.
//! - The directory is created on first access.
//! - Nothing is cached between calls: every operation goes back to the
//!   directory.
//!
//! Readers never see a partial file: `create` publishes a fully written
//! temp file with a hard link and `replace` renames one over the target.
//!
//! Concurrent writers to the same resource race (last writer wins). The
//! update command takes an expected version and rejects the write when the
//! bytes on disk no longer match it. The check and the `replace` are two
//! separate steps without a lock, so a writer landing between them is still
//! overwritten; the version check narrows the window, it does not close it.
//!
//! ## Implementations
//!
//! - [`fs::FsStore`]: a directory on disk.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O.

use crate::error::Result;
use crate::model::{ResourceHandle, ResourceKind};
use crate::naming;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Lazy enumeration of the valid resource files in a store.
pub type Entries<'a> = Box<dyn Iterator<Item = Result<ResourceHandle>> + 'a>;

pub trait ResourceStore {
    /// Kind of resource this store holds.
    fn kind(&self) -> ResourceKind;

    /// Turn a public id into a handle. Does not touch the store.
    fn resolve(&self, id: &str) -> Result<ResourceHandle> {
        naming::resolve(self.kind(), id)
    }

    fn exists(&self, handle: &ResourceHandle) -> bool;

    /// Read the whole file. `NotFound` when absent.
    fn read_all(&self, handle: &ResourceHandle) -> Result<Vec<u8>>;

    /// Write a new file. `AlreadyExists` when present.
    fn create(&self, handle: &ResourceHandle, bytes: &[u8]) -> Result<()>;

    /// Rewrite an existing file. `NotFound` when absent.
    fn replace(&self, handle: &ResourceHandle, bytes: &[u8]) -> Result<()>;

    /// Remove a file. `NotFound` when absent, `Delete` when it is not a
    /// regular file or cannot be removed.
    fn delete(&self, handle: &ResourceHandle) -> Result<()>;

    /// Modification time of the file.
    fn modified(&self, handle: &ResourceHandle) -> Result<DateTime<Utc>>;

    fn list(&self) -> Result<Entries<'_>>;

    /// Where the file lives. A virtual path for non-filesystem stores.
    fn location(&self, handle: &ResourceHandle) -> PathBuf;
}
