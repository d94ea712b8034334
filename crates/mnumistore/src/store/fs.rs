use super::{Entries, ResourceStore};
use crate::error::{Result, StoreError};
use crate::model::{ResourceHandle, ResourceKind};
use crate::naming;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsStore {
    root: PathBuf,
    kind: ResourceKind,
}

impl FsStore {
    /// Store rooted at `root`, which holds the files directly.
    pub fn new(root: impl Into<PathBuf>, kind: ResourceKind) -> Self {
        Self {
            root: root.into(),
            kind,
        }
    }

    /// Store for `kind` inside the uploads directory `base`
    /// (`<base>/mnumidesigner-calendars`, ...).
    pub fn under(base: &Path, kind: ResourceKind) -> Self {
        Self::new(base.join(kind.dir_name()), kind)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, handle: &ResourceHandle) -> PathBuf {
        self.root.join(handle.file_name())
    }

    /// Writes `bytes` to a fresh hidden file next to the target. Nothing is
    /// left behind on failure.
    fn write_tmp(&self, handle: &ResourceHandle, bytes: &[u8]) -> Result<PathBuf> {
        let tmp_path = self.root.join(format!(".{}-{}.tmp", handle.id, Uuid::new_v4()));
        let written = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .and_then(|mut file| file.write_all(bytes).and_then(|_| file.sync_all()));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::write(tmp_path, e));
        }
        Ok(tmp_path)
    }

    /// Publishes a complete temp file under the resource name. `hard_link`
    /// refuses an existing target, so the name only ever appears with the
    /// full contents.
    fn link_new(&self, handle: &ResourceHandle, tmp_path: &Path) -> Result<()> {
        let path = self.path_for(handle);
        match fs::hard_link(tmp_path, &path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists(handle.id.to_string()))
            }
            Err(e) => Err(StoreError::write(path, e)),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            tracing::debug!(dir = %self.root.display(), "creating store directory");
            fs::create_dir_all(&self.root).map_err(|e| StoreError::write(&self.root, e))?;
        }
        Ok(())
    }
}

impl ResourceStore for FsStore {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn exists(&self, handle: &ResourceHandle) -> bool {
        self.path_for(handle).is_file()
    }

    fn read_all(&self, handle: &ResourceHandle) -> Result<Vec<u8>> {
        let path = self.path_for(handle);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(handle.id.to_string()))
            }
            Err(e) => Err(StoreError::read(path, e)),
        }
    }

    fn create(&self, handle: &ResourceHandle, bytes: &[u8]) -> Result<()> {
        self.ensure_dir()?;
        let tmp_path = self.write_tmp(handle, bytes)?;
        let linked = self.link_new(handle, &tmp_path);
        let _ = fs::remove_file(&tmp_path);
        linked?;

        tracing::debug!(file = %self.path_for(handle).display(), bytes = bytes.len(), "created resource file");
        Ok(())
    }

    fn replace(&self, handle: &ResourceHandle, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(handle);
        if !path.is_file() {
            return Err(StoreError::NotFound(handle.id.to_string()));
        }

        let tmp_path = self.write_tmp(handle, bytes)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::write(path, e));
        }

        tracing::debug!(file = %path.display(), bytes = bytes.len(), "rewrote resource file");
        Ok(())
    }

    fn delete(&self, handle: &ResourceHandle) -> Result<()> {
        let path = self.path_for(handle);
        let meta = match fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(handle.id.to_string()));
            }
            Err(e) => return Err(StoreError::delete(path, e.to_string())),
        };
        if !meta.is_file() {
            return Err(StoreError::delete(path, "not a regular file"));
        }
        fs::remove_file(&path).map_err(|e| StoreError::delete(&path, e.to_string()))?;

        tracing::debug!(file = %path.display(), "deleted resource file");
        Ok(())
    }

    fn modified(&self, handle: &ResourceHandle) -> Result<DateTime<Utc>> {
        let path = self.path_for(handle);
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(handle.id.to_string()));
            }
            Err(e) => return Err(StoreError::read(path, e)),
        };
        let modified = meta.modified().map_err(|e| StoreError::read(&path, e))?;
        Ok(modified.into())
    }

    fn list(&self) -> Result<Entries<'_>> {
        self.ensure_dir()?;
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::read(&self.root, e))?;
        let kind = self.kind;
        let root = self.root.clone();

        Ok(Box::new(entries.filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(StoreError::read(&root, e))),
            };
            let path = entry.path();
            if !path.is_file() {
                return None;
            }
            let name = path.file_name().and_then(|s| s.to_str())?;
            match naming::parse_file_name(name) {
                Ok(id) => Some(Ok(ResourceHandle::new(kind, id))),
                Err(_) => {
                    tracing::trace!(file = name, "skipping file outside the naming grammar");
                    None
                }
            }
        })))
    }

    fn location(&self, handle: &ResourceHandle) -> PathBuf {
        self.path_for(handle)
    }
}
