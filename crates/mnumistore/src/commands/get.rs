use crate::commands::{CmdMessage, CmdResult, View};
use crate::error::Result;
use crate::store::ResourceStore;

/// Fetches one resource by id.
///
/// A well-formed id with no file behind it is not an error: the result is
/// simply empty. Malformed ids are rejected.
pub fn run<S: ResourceStore + ?Sized>(store: &S, id: &str, view: View<'_>) -> Result<CmdResult> {
    let handle = store.resolve(id)?;
    let mut result = CmdResult::default();
    if !store.exists(&handle) {
        result.add_message(CmdMessage::info(format!("No {} {}", handle.kind, handle.id)));
        return Ok(result);
    }
    result.documents.push(view.render(store, &handle)?);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use crate::error::StoreError;
    use crate::model::ResourceKind;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn returns_the_document() {
        let store = InMemoryStore::new(ResourceKind::Translation);
        store.insert_raw("greeting.editor.en.json", br#"{"hello":"Hi"}"#);
        let (ctx, dict, fields) = (testing::ctx(), testing::dictionary(), testing::all());

        let result = run(&store, "greeting.editor.en", View::new(&ctx, &dict, &fields)).unwrap();

        let doc = &result.documents[0];
        assert_eq!(doc.name.as_deref(), Some("greeting"));
        let rows = doc.translations.as_ref().unwrap();
        assert_eq!(rows[0].translation, "Hi");
        assert_eq!(rows[1].id, "bye");
    }

    #[test]
    fn missing_resource_gives_empty_result() {
        let store = InMemoryStore::new(ResourceKind::Calendar);
        let (ctx, dict, fields) = (testing::ctx(), testing::dictionary(), testing::all());
        let result = run(&store, "nope.name-day.en", View::new(&ctx, &dict, &fields)).unwrap();
        assert!(result.documents.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn malformed_id_is_rejected() {
        let store = InMemoryStore::new(ResourceKind::Calendar);
        let (ctx, dict, fields) = (testing::ctx(), testing::dictionary(), testing::all());
        let err = run(&store, "../etc/passwd", View::new(&ctx, &dict, &fields)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentity(_)));
    }
}
