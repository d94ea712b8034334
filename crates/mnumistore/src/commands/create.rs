use crate::calendar::{self, CalendarType, EventInput};
use crate::commands::{ensure_kind, CmdMessage, CmdResult, View};
use crate::error::{Result, StoreError};
use crate::model::{ResourceHandle, ResourceId, ResourceKind, TRANSLATION_DOMAIN};
use crate::naming;
use crate::store::ResourceStore;
use crate::translation::{self, TranslationInput, TranslationPayload};
use serde::Deserialize;

/// Input for a new resource. The id is derived from `name`, the type (or
/// the fixed translation domain) and `locale`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NewResource {
    Calendar {
        name: String,
        #[serde(rename = "type")]
        calendar_type: CalendarType,
        locale: String,
        #[serde(default)]
        events: Vec<EventInput>,
    },
    Translation {
        name: String,
        locale: String,
        #[serde(default)]
        translations: Vec<TranslationInput>,
    },
}

impl NewResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            NewResource::Calendar { .. } => ResourceKind::Calendar,
            NewResource::Translation { .. } => ResourceKind::Translation,
        }
    }

    fn id(&self) -> Result<ResourceId> {
        let (name, middle, locale) = match self {
            NewResource::Calendar {
                name,
                calendar_type,
                locale,
                ..
            } => (name, calendar_type.as_str(), locale),
            NewResource::Translation { name, locale, .. } => (name, TRANSLATION_DOMAIN, locale),
        };
        let slug = naming::slugify(name);
        if slug.is_empty() {
            return Err(StoreError::InvalidArgument(format!(
                "name '{}' has no usable characters",
                name
            )));
        }
        ResourceId::new(slug, middle, locale.as_str())
    }

    fn encode(&self) -> Result<Vec<u8>> {
        match self {
            NewResource::Calendar {
                calendar_type,
                events,
                ..
            } => calendar::to_bytes(&calendar::encode_events(calendar_type.as_str(), events)?),
            NewResource::Translation { translations, .. } => {
                let mut payload = TranslationPayload::new();
                translation::apply_entries(&mut payload, translations);
                translation::to_bytes(&payload)
            }
        }
    }
}

/// Writes a new resource. Fails with `AlreadyExists` rather than
/// overwriting.
pub fn run<S: ResourceStore + ?Sized>(store: &S, input: &NewResource, view: View<'_>) -> Result<CmdResult> {
    ensure_kind(store, input.kind())?;
    let handle = ResourceHandle::new(store.kind(), input.id()?);
    let bytes = input.encode()?;
    store.create(&handle, &bytes)?;
    tracing::info!(resource = %handle, "created");

    let mut result = CmdResult::default();
    result.documents.push(view.render(store, &handle)?);
    result.add_message(CmdMessage::success(format!(
        "Created {} {}",
        handle.kind, handle.id
    )));
    Ok(result)
}
