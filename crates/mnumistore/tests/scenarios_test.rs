//! End-to-end behaviour of the library over real directories.

use chrono::{Datelike, Utc};
use mnumistore::calendar::{CalendarEvent, CalendarType, EventInput};
use mnumistore::commands::create::NewResource;
use mnumistore::commands::update::ResourceUpdate;
use mnumistore::dictionary::{JsonDictionary, StaticDictionary};
use mnumistore::mapper::{Fields, RenderContext};
use mnumistore::payload::version_of;
use mnumistore::store::fs::FsStore;
use mnumistore::store::ResourceStore;
use mnumistore::translation::{TranslationInput, TranslationRow};
use mnumistore::{DesignerApi, ListParams, ResourceKind, StoreError};
use std::fs;
use tempfile::TempDir;

fn setup_with<D: mnumistore::dictionary::Dictionary>(dictionary: D) -> (TempDir, DesignerApi<FsStore, D>) {
    let base = TempDir::new().unwrap();
    let api = DesignerApi::new(
        FsStore::under(base.path(), ResourceKind::Calendar),
        FsStore::under(base.path(), ResourceKind::Translation),
        dictionary,
        RenderContext::new("https://shop.test/wp-json", "https://shop.test/wp-content/uploads").unwrap(),
    )
    .unwrap();
    (base, api)
}

fn setup() -> (TempDir, DesignerApi<FsStore, StaticDictionary>) {
    setup_with(StaticDictionary::new().with_language("en", [("hello", "Hello"), ("bye", "Bye")]))
}

fn calendar_dir(base: &TempDir) -> std::path::PathBuf {
    let dir = base.path().join("mnumidesigner-calendars");
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_cyclic_name_day_lists_in_current_year() {
    let (base, api) = setup();
    fs::write(
        calendar_dir(&base).join("birthdays.name-day.en.json"),
        r#"{"03-14": ["Alice"]}"#,
    )
    .unwrap();

    let params = ListParams {
        page: Some(1),
        per_page: Some(10),
        ..Default::default()
    };
    let result = api.list(ResourceKind::Calendar, &params, &Fields::all()).unwrap();

    assert_eq!(result.documents.len(), 1);
    assert_eq!(
        result.documents[0].events,
        Some(vec![CalendarEvent {
            date: format!("{}-03-14", Utc::now().year()),
            cyclic: true,
            name: "Alice".into(),
            event_type: String::new(),
        }])
    );
}

#[test]
fn test_created_translation_reads_back_merged() {
    let (_base, api) = setup();
    let input = NewResource::Translation {
        name: "greeting".into(),
        locale: "en".into(),
        translations: vec![TranslationInput::new("hello", "Hello")],
    };
    api.create(&input, &Fields::all()).unwrap();

    let result = api
        .get(ResourceKind::Translation, "greeting.editor.en", &Fields::parse("translations"))
        .unwrap();

    assert_eq!(
        result.documents[0].translations,
        Some(vec![
            TranslationRow {
                id: "hello".into(),
                original: Some("Hello".into()),
                translation: "Hello".into(),
            },
            TranslationRow {
                id: "bye".into(),
                original: Some("Bye".into()),
                translation: "Bye".into(),
            },
        ])
    );
}

#[test]
fn test_filtered_second_page_in_store_order() {
    let (base, api) = setup();
    let dir = calendar_dir(&base);
    for name in [
        "one.national-day.pl.json",
        "two.national-day.pl.json",
        "three.national-day.en.json",
        "four.name-day.pl.json",
        "five.name-day.en.json",
    ] {
        fs::write(dir.join(name), "{}").unwrap();
    }

    let store = api.store(ResourceKind::Calendar);
    let matching: Vec<String> = store
        .list()
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|handle| handle.id.type_or_domain == "national-day")
        .map(|handle| handle.id.to_string())
        .collect();

    let params = ListParams {
        page: Some(2),
        per_page: Some(1),
        filters: vec![("type".into(), "national-day".into())],
        ..Default::default()
    };
    let result = api.list(ResourceKind::Calendar, &params, &Fields::parse("id")).unwrap();

    assert_eq!(result.documents.len(), 1);
    assert_eq!(result.documents[0].id.as_deref(), Some(matching[1].as_str()));
    let page = result.page.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn test_create_then_update_with_version() {
    let (base, api) = setup();
    let input = NewResource::Calendar {
        name: "Święta".into(),
        calendar_type: CalendarType::NationalDay,
        locale: "pl_PL".into(),
        events: vec![EventInput::new("2024-05-03", "Konstytucja", true).with_type("holiday")],
    };
    let created = api.create(&input, &Fields::all()).unwrap();
    let doc = &created.documents[0];
    assert_eq!(doc.id.as_deref(), Some("swieta.national-day.pl_PL"));
    assert_eq!(
        doc.link.as_deref(),
        Some("https://shop.test/wp-content/uploads/mnumidesigner-calendars/swieta.national-day.pl_PL.json")
    );

    let on_disk = fs::read(base.path().join("mnumidesigner-calendars/swieta.national-day.pl_PL.json")).unwrap();
    assert_eq!(on_disk, br#"{"05-03":[{"name":"Konstytucja","type":"holiday"}]}"#);
    let version = doc.version.clone().unwrap();
    assert_eq!(version, version_of(&on_disk));

    let update = ResourceUpdate::Events {
        events: vec![EventInput::new("2024-11-11", "Niepodległość", false)],
    };
    api.update(ResourceKind::Calendar, "swieta.national-day.pl_PL", &update, Some(&version), &Fields::all())
        .unwrap();

    let err = api
        .update(ResourceKind::Calendar, "swieta.national-day.pl_PL", &update, Some(&version), &Fields::all())
        .unwrap_err();
    assert!(matches!(err, StoreError::VersionConflict { .. }));
}

#[test]
fn test_delete_then_get_is_empty() {
    let (_base, api) = setup();
    let input = NewResource::Translation {
        name: "shop".into(),
        locale: "en".into(),
        translations: vec![],
    };
    api.create(&input, &Fields::all()).unwrap();
    assert!(api.delete(ResourceKind::Translation, "shop.editor.en").unwrap().deleted);

    let result = api.get(ResourceKind::Translation, "shop.editor.en", &Fields::all()).unwrap();
    assert!(result.documents.is_empty());
    assert!(matches!(
        api.delete(ResourceKind::Translation, "shop.editor.en"),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_json_dictionary_from_directory() {
    let dict_dir = TempDir::new().unwrap();
    fs::write(
        dict_dir.path().join("pl.json"),
        r#"{"locale":"pl","fallback":"en","translations":{"pl":{"editor":{"save":"Zapisz","undo":"Cofnij"}}}}"#,
    )
    .unwrap();
    let (_base, api) = setup_with(JsonDictionary::new(dict_dir.path()));

    let input = NewResource::Translation {
        name: "shop".into(),
        locale: "pl_PL".into(),
        translations: vec![TranslationInput::new("undo", "Wstecz")],
    };
    let created = api.create(&input, &Fields::all()).unwrap();
    let rows = created.documents[0].translations.clone().unwrap();
    assert_eq!(rows[0].id, "undo");
    assert_eq!(rows[0].original.as_deref(), Some("Cofnij"));
    assert_eq!(rows[0].translation, "Wstecz");
    assert_eq!(rows[1].id, "save");
    assert_eq!(created.documents[0].fallback.as_deref(), Some("pl"));
}
