//! # Domain Model
//!
//! Calendars and translations are both stored as one JSON file per resource.
//! Their identity is a three part key, `<name>.<type_or_domain>.<locale>`,
//! which doubles as the public `id` and (with a `.json` suffix) as the file
//! name:
//!
//! ```text
//! mnumidesigner-calendars/
//! ├── birthdays.name-day.en.json
//! └── poland.national-day.pl_PL.json
//! mnumidesigner-translations/
//! └── shop.editor.pl_PL.json
//! ```
//!
//! The middle part is the calendar type for calendars (`name-day`,
//! `national-day`) and the fixed domain `editor` for translations.

use crate::error::{Result, StoreError};
use crate::naming;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// REST namespace the resources are published under.
pub const REST_NAMESPACE: &str = "mnumidesigner/v1";

/// The only domain a translation resource can have.
pub const TRANSLATION_DOMAIN: &str = "editor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Calendar,
    Translation,
}

impl ResourceKind {
    /// Directory (under the uploads base) holding this kind's files.
    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceKind::Calendar => "mnumidesigner-calendars",
            ResourceKind::Translation => "mnumidesigner-translations",
        }
    }

    /// Route base of the collection endpoint.
    pub fn rest_base(self) -> &'static str {
        match self {
            ResourceKind::Calendar => "calendars",
            ResourceKind::Translation => "translations",
        }
    }

    /// Public name of the middle identity part.
    pub fn middle_field(self) -> &'static str {
        match self {
            ResourceKind::Calendar => "type",
            ResourceKind::Translation => "domain",
        }
    }

    /// Field (and link relation) carrying the resource payload.
    pub fn entries_field(self) -> &'static str {
        match self {
            ResourceKind::Calendar => "events",
            ResourceKind::Translation => "translations",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Calendar => "calendar",
            ResourceKind::Translation => "translation",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "calendar" | "calendars" => Ok(ResourceKind::Calendar),
            "translation" | "translations" => Ok(ResourceKind::Translation),
            other => Err(StoreError::InvalidArgument(format!(
                "unknown resource kind: {}",
                other
            ))),
        }
    }
}

/// Composite identity of a resource.
///
/// Construct through [`ResourceId::new`] or `str::parse`, both of which
/// enforce the identity grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub name: String,
    pub type_or_domain: String,
    pub locale: String,
}

impl ResourceId {
    pub fn new(
        name: impl Into<String>,
        type_or_domain: impl Into<String>,
        locale: impl Into<String>,
    ) -> Result<Self> {
        let id = Self {
            name: name.into(),
            type_or_domain: type_or_domain.into(),
            locale: locale.into(),
        };
        naming::validate_id(&id)?;
        Ok(id)
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self, naming::FILE_EXTENSION)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.name, self.type_or_domain, self.locale)
    }
}

impl FromStr for ResourceId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        naming::parse_id(s)
    }
}

/// A resolved reference to a resource file. The file may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    pub kind: ResourceKind,
    pub id: ResourceId,
}

impl ResourceHandle {
    pub fn new(kind: ResourceKind, id: ResourceId) -> Self {
        Self { kind, id }
    }

    pub fn file_name(&self) -> String {
        self.id.file_name()
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
