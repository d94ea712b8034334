use crate::calendar::{self, EventInput};
use crate::commands::{CmdMessage, CmdResult, View};
use crate::error::{Result, StoreError};
use crate::model::ResourceKind;
use crate::payload;
use crate::store::ResourceStore;
use crate::translation::{self, TranslationInput};
use serde::Deserialize;

/// New entries for an existing resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResourceUpdate {
    /// Replaces all events of a calendar.
    Events { events: Vec<EventInput> },
    /// Overlays entries onto a translation; ids not mentioned keep their text.
    Translations { translations: Vec<TranslationInput> },
}

impl ResourceUpdate {
    fn kind(&self) -> ResourceKind {
        match self {
            ResourceUpdate::Events { .. } => ResourceKind::Calendar,
            ResourceUpdate::Translations { .. } => ResourceKind::Translation,
        }
    }
}

/// Rewrites an existing resource.
///
/// With `expected_version` set, the write is refused with
/// `VersionConflict` when the stored bytes no longer hash to it.
pub fn run<S: ResourceStore + ?Sized>(
    store: &S,
    id: &str,
    update: &ResourceUpdate,
    expected_version: Option<&str>,
    view: View<'_>,
) -> Result<CmdResult> {
    super::ensure_kind(store, update.kind())?;
    let handle = store.resolve(id)?;
    let current = store.read_all(&handle)?;

    if let Some(expected) = expected_version {
        let actual = payload::version_of(&current);
        if actual != expected {
            return Err(StoreError::VersionConflict {
                id: handle.id.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    let bytes = match update {
        ResourceUpdate::Events { events } => {
            calendar::to_bytes(&calendar::encode_events(&handle.id.type_or_domain, events)?)?
        }
        ResourceUpdate::Translations { translations } => {
            let mut existing = translation::parse_payload(&current)?;
            translation::apply_entries(&mut existing, translations);
            translation::to_bytes(&existing)?
        }
    };
    store.replace(&handle, &bytes)?;
    tracing::info!(resource = %handle, "updated");

    let mut result = CmdResult::default();
    result.documents.push(view.render(store, &handle)?);
    result.add_message(CmdMessage::success(format!(
        "Updated {} {}",
        handle.kind, handle.id
    )));
    Ok(result)
}
