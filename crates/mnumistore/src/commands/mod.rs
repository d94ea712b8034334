//! # Command Layer
//!
//! One submodule per operation on a resource collection. Commands are
//! plain functions over a [`ResourceStore`]; they validate input, move
//! bytes through the store and map the result into documents.
//!
//! Commands do no terminal or HTTP work. They return a [`CmdResult`] and
//! let the caller decide how to present it, and they return errors rather
//! than exit codes.
//!
//! Tests here run against [`crate::store::memory::InMemoryStore`].
//!
//! - [`list`]: filtered, paginated listing
//! - [`get`]: a single resource
//! - [`create`]: a new resource from a name, locale and entries
//! - [`update`]: replace a resource's entries, optionally guarded by a version
//! - [`delete`]: remove a resource

use crate::dictionary::Dictionary;
use crate::error::{Result, StoreError};
use crate::mapper::{self, Document, Fields, RenderContext};
use crate::metadata;
use crate::model::{ResourceHandle, ResourceKind};
use crate::pagination::PageInfo;
use crate::store::ResourceStore;
use serde::Serialize;

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub documents: Vec<Document>,
    /// Set by `list` only.
    pub page: Option<PageInfo>,
    pub deleted: bool,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }
}

/// How documents are produced for a command's output.
#[derive(Clone, Copy)]
pub struct View<'a> {
    pub ctx: &'a RenderContext,
    pub dictionary: &'a dyn Dictionary,
    pub fields: &'a Fields,
}

impl<'a> View<'a> {
    pub fn new(ctx: &'a RenderContext, dictionary: &'a dyn Dictionary, fields: &'a Fields) -> Self {
        Self {
            ctx,
            dictionary,
            fields,
        }
    }

    /// Maps the resource behind `handle`, reading the file only if a
    /// payload field is requested.
    pub fn render<S: ResourceStore + ?Sized>(&self, store: &S, handle: &ResourceHandle) -> Result<Document> {
        let modified_at = store.modified(handle)?;
        let meta = metadata::extract(handle, modified_at, &self.ctx.format);
        mapper::map_for_response(&meta, self.fields, self.ctx, self.dictionary, || {
            store.read_all(handle)
        })
    }
}

pub(crate) fn ensure_kind<S: ResourceStore + ?Sized>(store: &S, kind: ResourceKind) -> Result<()> {
    if store.kind() != kind {
        return Err(StoreError::InvalidArgument(format!(
            "{} payload sent to the {} collection",
            kind,
            store.kind()
        )));
    }
    Ok(())
}
