//! Metadata extraction.
//!
//! Everything a listing needs to know about a resource comes from its file
//! name plus the file's modification time; the payload is never opened here.

use crate::error::{Result, StoreError};
use crate::model::{ResourceHandle, ResourceId, ResourceKind};
use crate::naming;
use crate::store::ResourceStore;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use serde::Serialize;

pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M %P";

/// How the `modified` field is rendered: the site's date and time formats
/// joined by a space, in the site's UTC offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedFormat {
    pattern: String,
    offset: FixedOffset,
}

impl Default for ModifiedFormat {
    fn default() -> Self {
        Self {
            pattern: format!("{} {}", DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT),
            offset: Utc.fix(),
        }
    }
}

impl ModifiedFormat {
    pub fn new(date_format: &str, time_format: &str, utc_offset_minutes: i32) -> Result<Self> {
        let pattern = format!("{} {}", date_format, time_format);
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(StoreError::Config(format!(
                "invalid date/time format: {}",
                pattern
            )));
        }
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                StoreError::Config(format!("invalid UTC offset: {} minutes", utc_offset_minutes))
            })?;
        Ok(Self { pattern, offset })
    }

    /// Calendar year at `at` in the site timezone.
    pub fn year_at(&self, at: DateTime<Utc>) -> i32 {
        at.with_timezone(&self.offset).year()
    }

    pub fn format(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(&self.pattern)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub kind: ResourceKind,
    pub name: String,
    pub type_or_domain: String,
    pub locale: String,
    pub modified: String,
    pub modified_at: DateTime<Utc>,
    /// Language part of the locale; translations only.
    pub fallback: Option<String>,
}

impl Metadata {
    pub fn id(&self) -> ResourceId {
        ResourceId {
            name: self.name.clone(),
            type_or_domain: self.type_or_domain.clone(),
            locale: self.locale.clone(),
        }
    }

    pub fn file_name(&self) -> String {
        self.id().file_name()
    }
}

/// `pl_PL` -> `pl`, `en` -> `en`.
pub fn fallback_locale(locale: &str) -> &str {
    locale.split('_').next().unwrap_or(locale)
}

pub fn extract(
    handle: &ResourceHandle,
    modified_at: DateTime<Utc>,
    format: &ModifiedFormat,
) -> Metadata {
    let fallback = match handle.kind {
        ResourceKind::Translation => Some(fallback_locale(&handle.id.locale).to_string()),
        ResourceKind::Calendar => None,
    };
    Metadata {
        kind: handle.kind,
        name: handle.id.name.clone(),
        type_or_domain: handle.id.type_or_domain.clone(),
        locale: handle.id.locale.clone(),
        modified: format.format(modified_at),
        modified_at,
        fallback,
    }
}

/// Extracts metadata for a file name found in `store`.
pub fn extract_file<S: ResourceStore + ?Sized>(
    store: &S,
    file_name: &str,
    format: &ModifiedFormat,
) -> Result<Metadata> {
    let id = naming::parse_file_name(file_name)?;
    let handle = ResourceHandle::new(store.kind(), id);
    let modified_at = store.modified(&handle)?;
    Ok(extract(&handle, modified_at, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 15, 4, 0).unwrap()
    }

    #[test]
    fn default_format_matches_site_defaults() {
        assert_eq!(ModifiedFormat::default().format(at()), "March 14, 2024 3:04 pm");
    }

    #[test]
    fn format_applies_offset() {
        let fmt = ModifiedFormat::new("%Y-%m-%d", "%H:%M", 120).unwrap();
        assert_eq!(fmt.format(at()), "2024-03-14 17:04");
    }

    #[test]
    fn rejects_bad_formats() {
        assert!(matches!(
            ModifiedFormat::new("%Y-%Q", "%H", 0),
            Err(StoreError::Config(_))
        ));
        assert!(ModifiedFormat::new("%Y", "%H", 60 * 24 * 2).is_err());
    }

    #[test]
    fn fallback_is_language_subtag() {
        assert_eq!(fallback_locale("pl_PL"), "pl");
        assert_eq!(fallback_locale("en"), "en");
    }

    #[test]
    fn extract_translation_metadata() {
        let handle = naming::resolve(ResourceKind::Translation, "shop.editor.pl_PL").unwrap();
        let meta = extract(&handle, at(), &ModifiedFormat::default());
        assert_eq!(meta.name, "shop");
        assert_eq!(meta.type_or_domain, "editor");
        assert_eq!(meta.fallback.as_deref(), Some("pl"));
        assert_eq!(meta.type_or_domain, "editor");
    }

    #[test]
    fn extract_calendar_metadata_has_no_fallback() {
        let handle = naming::resolve(ResourceKind::Calendar, "x.name-day.en").unwrap();
        let meta = extract(&handle, at(), &ModifiedFormat::default());
        assert_eq!(meta.fallback, None);
        assert_eq!(meta.type_or_domain, "name-day");
    }

    #[test]
    fn extract_file_rejects_invalid_names() {
        let store = InMemoryStore::new(ResourceKind::Calendar);
        store.insert_raw("readme.txt", b"{}");
        let err = extract_file(&store, "readme.txt", &ModifiedFormat::default()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidFilename(_)));
    }

    #[test]
    fn extract_file_reads_modification_time() {
        let store = InMemoryStore::new(ResourceKind::Calendar);
        store.insert_raw("x.name-day.en.json", b"{}");
        let handle = naming::resolve(ResourceKind::Calendar, "x.name-day.en").unwrap();
        store.set_modified(&handle, at());
        let meta = extract_file(&store, "x.name-day.en.json", &ModifiedFormat::default()).unwrap();
        assert_eq!(meta.modified_at, at());
    }

    #[test]
    fn year_follows_site_offset() {
        let new_year_eve = Utc.with_ymd_and_hms(2025, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(ModifiedFormat::default().year_at(new_year_eve), 2025);
        let warsaw = ModifiedFormat::new(DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT, 60).unwrap();
        assert_eq!(warsaw.year_at(new_year_eve), 2026);
    }
}
