//! Source texts for translations.
//!
//! The design tool publishes the original editor strings per language. A
//! [`Dictionary`] hands them out as an ordered map from entry id to text so
//! local translation files can be merged against them.
//!
//! The remote payload looks like:
//!
//! ```json
//! {
//!   "locale": "pl",
//!   "fallback": "en",
//!   "translations": { "pl": { "editor": { "hello": "Cześć" } } }
//! }
//! ```
//!
//! Lookups use the two letter language of the requested locale (`pl_PL` ->
//! `pl`), matching how the remote service is queried.

use crate::error::{Result, StoreError};
use crate::model::TRANSLATION_DOMAIN;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub type Entries = IndexMap<String, String>;

pub trait Dictionary {
    fn entries(&self, locale: &str) -> Result<Entries>;
}

impl<D: Dictionary + ?Sized> Dictionary for Box<D> {
    fn entries(&self, locale: &str) -> Result<Entries> {
        (**self).entries(locale)
    }
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn entries(&self, locale: &str) -> Result<Entries> {
        (**self).entries(locale)
    }
}

/// `pl_PL` -> `pl`.
pub fn language_key(locale: &str) -> String {
    locale.chars().take(2).collect()
}

/// A dictionary with no entries for any language.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDictionary;

impl Dictionary for EmptyDictionary {
    fn entries(&self, _locale: &str) -> Result<Entries> {
        Ok(Entries::new())
    }
}

/// In-memory dictionary keyed by language.
#[derive(Debug, Default, Clone)]
pub struct StaticDictionary {
    languages: HashMap<String, Entries>,
}

impl StaticDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language<K, V>(mut self, language: &str, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.languages.insert(
            language_key(language),
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

impl Dictionary for StaticDictionary {
    fn entries(&self, locale: &str) -> Result<Entries> {
        Ok(self
            .languages
            .get(&language_key(locale))
            .cloned()
            .unwrap_or_default())
    }
}

/// Remote translation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTranslation {
    pub locale: String,
    #[serde(default)]
    pub translations: IndexMap<String, IndexMap<String, Entries>>,
}

impl RemoteTranslation {
    /// Entries of the editor domain for the payload's own locale.
    pub fn entries(&self) -> Entries {
        self.translations
            .get(&self.locale)
            .and_then(|domains| domains.get(TRANSLATION_DOMAIN))
            .cloned()
            .unwrap_or_default()
    }
}

/// Dictionary backed by a directory of saved remote payloads, one
/// `<language>.json` per language.
#[derive(Debug, Clone)]
pub struct JsonDictionary {
    dir: PathBuf,
}

impl JsonDictionary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load(&self, locale: &str) -> Result<RemoteTranslation> {
        let path = self.dir.join(format!("{}.json", language_key(locale)));
        let content = fs::read(&path).map_err(|e| {
            StoreError::Dictionary(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_slice(&content).map_err(|e| {
            StoreError::Dictionary(format!("malformed dictionary {}: {}", path.display(), e))
        })
    }
}

impl Dictionary for JsonDictionary {
    fn entries(&self, locale: &str) -> Result<Entries> {
        Ok(self.load(locale)?.entries())
    }
}
