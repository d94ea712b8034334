//! # Response Mapping
//!
//! Builds the public document for one resource from its [`Metadata`] and,
//! only when a payload field is wanted, its file contents.
//!
//! Field selection works like a REST `_fields` parameter: when the caller
//! names no fields every schema field of the kind is produced, otherwise
//! only the named ones. Unknown names are ignored.

use crate::calendar;
use crate::dictionary::Dictionary;
use crate::error::{Result, StoreError};
use crate::metadata::{Metadata, ModifiedFormat};
use crate::model::{ResourceKind, REST_NAMESPACE};
use crate::payload;
use crate::translation::{self, TranslationRow};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::str::FromStr;
use url::Url;

const CALENDAR_FIELDS: &[&str] = &[
    "id", "name", "type", "locale", "modified", "link", "version", "events",
];

const TRANSLATION_FIELDS: &[&str] = &[
    "id",
    "name",
    "domain",
    "locale",
    "fallback",
    "modified",
    "link",
    "version",
    "translations",
];

pub fn schema_fields(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Calendar => CALENDAR_FIELDS,
        ResourceKind::Translation => TRANSLATION_FIELDS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    #[default]
    View,
    Edit,
    /// Only the id, for documents embedded in another response.
    Embed,
}

impl FromStr for Context {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "view" => Ok(Context::View),
            "edit" => Ok(Context::Edit),
            "embed" => Ok(Context::Embed),
            other => Err(StoreError::InvalidArgument(format!(
                "unknown context: {}",
                other
            ))),
        }
    }
}

/// Requested fields. `Fields::all()` means every schema field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Option<Vec<String>>);

impl Fields {
    pub fn all() -> Self {
        Self(None)
    }

    pub fn only<I, T>(fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self(Some(fields.into_iter().map(Into::into).collect()))
    }

    /// Parses a comma separated list; blank input selects everything.
    pub fn parse(csv: &str) -> Self {
        let names: Vec<String> = csv
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        if names.is_empty() {
            Self::all()
        } else {
            Self(Some(names))
        }
    }

    pub fn wants(&self, kind: ResourceKind, field: &str) -> bool {
        schema_fields(kind).contains(&field)
            && self
                .0
                .as_ref()
                .map_or(true, |names| names.iter().any(|name| name == field))
    }
}

/// Everything the mapper needs besides the resource itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    api_url: Url,
    files_url: String,
    pub format: ModifiedFormat,
    /// Pins the year cyclic events are placed in; `None` follows the clock.
    pub year: Option<i32>,
    pub context: Context,
}

impl RenderContext {
    /// `api_url` is the REST root (`https://shop.test/wp-json`), `files_url`
    /// the public URL of the directory holding the resource directories.
    pub fn new(api_url: &str, files_url: &str) -> Result<Self> {
        let api = parse_base_url(api_url)?;
        parse_base_url(files_url)?;
        Ok(Self {
            api_url: api,
            files_url: files_url.trim_end_matches('/').to_string(),
            format: ModifiedFormat::default(),
            year: None,
            context: Context::default(),
        })
    }

    pub fn with_format(mut self, format: ModifiedFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Year cyclic events are placed in, evaluated per call.
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| self.format.year_at(Utc::now()))
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn collection_url(&self, kind: ResourceKind) -> Url {
        self.api_path(|segments| {
            segments
                .extend(REST_NAMESPACE.split('/'))
                .push(kind.rest_base());
        })
    }

    pub fn item_url(&self, kind: ResourceKind, id: &str) -> Url {
        self.api_path(|segments| {
            segments
                .extend(REST_NAMESPACE.split('/'))
                .push(kind.rest_base())
                .push(id);
        })
    }

    pub fn entries_url(&self, kind: ResourceKind, id: &str) -> Url {
        self.api_path(|segments| {
            segments
                .extend(REST_NAMESPACE.split('/'))
                .push(kind.rest_base())
                .push(id)
                .push("entries");
        })
    }

    pub fn file_url(&self, kind: ResourceKind, file_name: &str) -> String {
        format!("{}/{}/{}", self.files_url, kind.dir_name(), file_name)
    }

    fn api_path(&self, build: impl FnOnce(&mut url::PathSegmentsMut<'_>)) -> Url {
        let mut url = self.api_url.clone();
        // checked in `new`: the API URL can be a base
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            build(&mut segments);
        }
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| StoreError::Config(format!("invalid URL {}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(StoreError::Config(format!("URL cannot be a base: {}", raw)));
    }
    Ok(url)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "is_false")]
    pub embeddable: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

pub type Links = IndexMap<String, Vec<Link>>;

/// A resource as clients see it. Absent fields were not requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub calendar_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// Raw modification time behind `modified`; not part of the wire shape.
    #[serde(skip)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<calendar::CalendarEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<TranslationRow>>,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

pub fn links_for(kind: ResourceKind, id: &str, ctx: &RenderContext) -> Links {
    let mut links = Links::new();
    links.insert(
        "self".to_string(),
        vec![Link {
            href: ctx.item_url(kind, id).to_string(),
            embeddable: false,
        }],
    );
    links.insert(
        "collection".to_string(),
        vec![Link {
            href: ctx.collection_url(kind).to_string(),
            embeddable: false,
        }],
    );
    links.insert(
        kind.entries_field().to_string(),
        vec![Link {
            href: ctx.entries_url(kind, id).to_string(),
            embeddable: true,
        }],
    );
    links
}

/// Maps one resource to its public document.
///
/// `load_body` is called at most once, and only when a field that needs
/// the payload (`version`, `events`, `translations`) is selected. Its
/// errors propagate. A failing dictionary does not: the translations list
/// is then empty.
pub fn map_for_response<F>(
    meta: &Metadata,
    fields: &Fields,
    ctx: &RenderContext,
    dictionary: &dyn Dictionary,
    load_body: F,
) -> Result<Document>
where
    F: FnOnce() -> Result<Vec<u8>>,
{
    let kind = meta.kind;
    let id = meta.id().to_string();

    if ctx.context == Context::Embed {
        return Ok(Document {
            id: Some(id),
            ..Document::default()
        });
    }

    let wants = |field: &str| fields.wants(kind, field);
    let needs_body = wants("version") || wants(kind.entries_field());
    let body = if needs_body { Some(load_body()?) } else { None };

    let mut doc = Document::default();
    if wants("id") {
        doc.id = Some(id.clone());
    }
    if wants("name") {
        doc.name = Some(meta.name.clone());
    }
    match kind {
        ResourceKind::Calendar if wants("type") => {
            doc.calendar_type = Some(meta.type_or_domain.clone());
        }
        ResourceKind::Translation if wants("domain") => {
            doc.domain = Some(meta.type_or_domain.clone());
        }
        _ => {}
    }
    if wants("locale") {
        doc.locale = Some(meta.locale.clone());
    }
    if wants("fallback") {
        doc.fallback = meta.fallback.clone();
    }
    if wants("modified") {
        doc.modified = Some(meta.modified.clone());
        doc.modified_at = Some(meta.modified_at);
    }
    if wants("link") {
        doc.link = Some(ctx.file_url(kind, &meta.file_name()));
    }

    if let Some(bytes) = body.as_deref() {
        if wants("version") {
            doc.version = Some(payload::version_of(bytes));
        }
        if wants(kind.entries_field()) {
            match kind {
                ResourceKind::Calendar => {
                    let stored = calendar::parse_payload(bytes)?;
                    doc.events = Some(calendar::decode_events(
                        &meta.type_or_domain,
                        &stored,
                        ctx.year(),
                    ));
                }
                ResourceKind::Translation => {
                    let local = translation::parse_payload(bytes)?;
                    let rows = match dictionary.entries(&meta.locale) {
                        Ok(remote) => translation::merge_with_remote(&local, remote),
                        Err(err) => {
                            tracing::warn!(id = %id, error = %err, "dictionary lookup failed");
                            Vec::new()
                        }
                    };
                    doc.translations = Some(rows);
                }
            }
        }
    }

    doc.links = Some(links_for(kind, &id, ctx));
    Ok(doc)
}
