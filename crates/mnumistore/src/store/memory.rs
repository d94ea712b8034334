use super::{Entries, ResourceStore};
use crate::error::{Result, StoreError};
use crate::model::{ResourceHandle, ResourceKind};
use crate::naming;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

#[derive(Clone)]
enum MemEntry {
    File {
        bytes: Vec<u8>,
        modified: DateTime<Utc>,
    },
    Dir,
}

/// In-memory store for testing.
///
/// Entries enumerate in insertion order, which stands in for directory
/// order. Uses `RefCell` since the store API takes `&self` and tests are
/// single-threaded.
pub struct InMemoryStore {
    kind: ResourceKind,
    entries: RefCell<IndexMap<String, MemEntry>>,
    simulate_write_error: Cell<bool>,
}

impl InMemoryStore {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            entries: RefCell::new(IndexMap::new()),
            simulate_write_error: Cell::new(false),
        }
    }

    /// Seed an entry under any name, bypassing the grammar.
    pub fn insert_raw(&self, name: &str, bytes: &[u8]) {
        self.entries.borrow_mut().insert(
            name.to_string(),
            MemEntry::File {
                bytes: bytes.to_vec(),
                modified: Utc::now(),
            },
        );
    }

    /// Seed a subdirectory entry.
    pub fn insert_dir(&self, name: &str) {
        self.entries
            .borrow_mut()
            .insert(name.to_string(), MemEntry::Dir);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Returns true if the file existed and was updated.
    pub fn set_modified(&self, handle: &ResourceHandle, at: DateTime<Utc>) -> bool {
        match self.entries.borrow_mut().get_mut(&handle.file_name()) {
            Some(MemEntry::File { modified, .. }) => {
                *modified = at;
                true
            }
            _ => false,
        }
    }

    fn check_writable(&self, handle: &ResourceHandle) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(StoreError::write(
                self.location(handle),
                std::io::Error::other("simulated write error"),
            ));
        }
        Ok(())
    }
}

impl ResourceStore for InMemoryStore {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn exists(&self, handle: &ResourceHandle) -> bool {
        matches!(
            self.entries.borrow().get(&handle.file_name()),
            Some(MemEntry::File { .. })
        )
    }

    fn read_all(&self, handle: &ResourceHandle) -> Result<Vec<u8>> {
        match self.entries.borrow().get(&handle.file_name()) {
            Some(MemEntry::File { bytes, .. }) => Ok(bytes.clone()),
            Some(MemEntry::Dir) => Err(StoreError::read(
                self.location(handle),
                std::io::Error::other("is a directory"),
            )),
            None => Err(StoreError::NotFound(handle.id.to_string())),
        }
    }

    fn create(&self, handle: &ResourceHandle, bytes: &[u8]) -> Result<()> {
        self.check_writable(handle)?;
        let mut entries = self.entries.borrow_mut();
        let name = handle.file_name();
        if entries.contains_key(&name) {
            return Err(StoreError::AlreadyExists(handle.id.to_string()));
        }
        entries.insert(
            name,
            MemEntry::File {
                bytes: bytes.to_vec(),
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    fn replace(&self, handle: &ResourceHandle, bytes: &[u8]) -> Result<()> {
        self.check_writable(handle)?;
        match self.entries.borrow_mut().get_mut(&handle.file_name()) {
            Some(MemEntry::File {
                bytes: stored,
                modified,
            }) => {
                *stored = bytes.to_vec();
                *modified = Utc::now();
                Ok(())
            }
            _ => Err(StoreError::NotFound(handle.id.to_string())),
        }
    }

    fn delete(&self, handle: &ResourceHandle) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        let name = handle.file_name();
        let is_file = match entries.get(&name) {
            None => return Err(StoreError::NotFound(handle.id.to_string())),
            Some(entry) => matches!(entry, MemEntry::File { .. }),
        };
        if !is_file {
            return Err(StoreError::delete(
                self.location(handle),
                "not a regular file",
            ));
        }
        entries.shift_remove(&name);
        Ok(())
    }

    fn modified(&self, handle: &ResourceHandle) -> Result<DateTime<Utc>> {
        match self.entries.borrow().get(&handle.file_name()) {
            Some(MemEntry::File { modified, .. }) => Ok(*modified),
            _ => Err(StoreError::NotFound(handle.id.to_string())),
        }
    }

    fn list(&self) -> Result<Entries<'_>> {
        let names: Vec<String> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, entry)| matches!(entry, MemEntry::File { .. }))
            .map(|(name, _)| name.clone())
            .collect();
        let kind = self.kind;

        Ok(Box::new(names.into_iter().filter_map(move |name| {
            naming::parse_file_name(&name)
                .ok()
                .map(|id| Ok(ResourceHandle::new(kind, id)))
        })))
    }

    fn location(&self, handle: &ResourceHandle) -> PathBuf {
        PathBuf::from("memory")
            .join(self.kind.dir_name())
            .join(handle.file_name())
    }
}
