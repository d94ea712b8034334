//! Translation payloads: a JSON object from entry id to translated text.

use crate::error::Result;
use crate::payload;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type TranslationPayload = IndexMap<String, String>;

/// A translated entry as clients send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationInput {
    pub id: String,
    pub translation: String,
}

impl TranslationInput {
    pub fn new(id: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            translation: translation.into(),
        }
    }
}

/// A translated entry as clients receive it, next to the text it translates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRow {
    pub id: String,
    pub original: Option<String>,
    pub translation: String,
}

/// Writes `entries` over `payload`; later entries win.
pub fn apply_entries(payload: &mut TranslationPayload, entries: &[TranslationInput]) {
    for entry in entries {
        payload.insert(entry.id.clone(), entry.translation.clone());
    }
}

/// Merges local overrides with the remote dictionary.
///
/// Local entries come first, in file order, with the remote text as
/// `original` (`None` when the remote no longer has the id). Entries only
/// the remote knows follow in remote order, translated as themselves.
pub fn merge_with_remote(
    local: &TranslationPayload,
    mut remote: IndexMap<String, String>,
) -> Vec<TranslationRow> {
    let mut rows = Vec::with_capacity(local.len() + remote.len());
    for (id, translation) in local {
        rows.push(TranslationRow {
            id: id.clone(),
            original: remote.shift_remove(id),
            translation: translation.clone(),
        });
    }
    for (id, original) in remote {
        rows.push(TranslationRow {
            id,
            translation: original.clone(),
            original: Some(original),
        });
    }
    rows
}

pub fn parse_payload(bytes: &[u8]) -> Result<TranslationPayload> {
    payload::decode_object(bytes)
}

pub fn to_bytes(payload: &TranslationPayload) -> Result<Vec<u8>> {
    payload::encode_object(payload)
}
