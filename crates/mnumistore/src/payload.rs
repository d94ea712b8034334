//! JSON object (de)serialization shared by the resource payloads.

use crate::error::Result;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Decodes a flat JSON object, keeping key order.
///
/// An empty JSON array is accepted as an empty object; older writers store
/// empty resources as `[]`.
pub fn decode_object<V: DeserializeOwned>(bytes: &[u8]) -> Result<IndexMap<String, V>> {
    let trimmed = bytes.trim_ascii();
    if trimmed.is_empty() || trimmed == b"[]" {
        return Ok(IndexMap::new());
    }
    Ok(serde_json::from_slice(trimmed)?)
}

pub fn encode_object<V: Serialize>(object: &IndexMap<String, V>) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(object)?)
}

/// Version token of a file's bytes: the first 16 hex digits of its SHA-256.
pub fn version_of(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(&digest[..8])
}
