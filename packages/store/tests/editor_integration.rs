//! Editor sessions running against the in-memory store

use std::sync::Arc;
use std::time::Duration;

use funnel_editor::{EditorConfig, EditorSession, Mutation, MutationSink, PageStore, SaveStatus};
use funnel_model::{create_element, ElementKind, LayoutFormatError, NewPage, PageRecord};
use funnel_store::{MemoryStore, StoreSnapshot};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn legacy_record(funnel_id: &str) -> PageRecord {
    serde_json::from_value(json!({
        "id": "legacy-page",
        "funnel_id": funnel_id,
        "name": "Old Landing",
        "slug": "old-landing",
        "elements": [
            { "id": "a", "position": { "x": 10, "y": 20 }, "type": "text",
              "content": { "text": "hi" }, "styles": {} },
            { "id": "b", "position": { "x": 10, "y": 80 }, "type": "button",
              "content": { "text": "Go", "url": "/next" }, "styles": {} }
        ]
    }))
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_legacy_page_is_upgraded_and_saved_as_sections() -> anyhow::Result<()> {
    init_tracing();
    let store = Arc::new(MemoryStore::new().with_latency(Duration::from_millis(30)));
    let funnel = store.create_funnel("Spring Launch");
    store.insert_page(legacy_record(&funnel.id));

    let mut session =
        EditorSession::open(Arc::clone(&store), EditorConfig::default(), &funnel.id, "legacy-page")
            .await?;

    assert!(session.document().upgraded_from_legacy());
    let tree = session.tree();
    assert_eq!(tree.sections.len(), 1);
    assert_eq!(tree.sections[0].rows[0].columns[0].width, 12);
    let ids: Vec<_> = tree.elements().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    // nothing written until an edit
    assert_eq!(store.writes("legacy-page"), 0);

    session.apply(Mutation::UpdateElement {
        element_id: "b".to_string(),
        patch: funnel_editor::ElementPatch::content("text", json!("Continue")),
    });
    session.wait_for_autosave().await?;

    let record = store.page("legacy-page").unwrap();
    assert!(record.elements.is_none());
    let stored = store.sections("legacy-page").unwrap();
    assert_eq!(&stored, session.tree());
    assert_eq!(stored.element("b").unwrap().content_str("url"), Some("/next"));
    assert_eq!(store.writes("legacy-page"), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_malformed_page_opens_empty_and_flagged() -> anyhow::Result<()> {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let funnel = store.create_funnel("Broken");
    store.insert_page(serde_json::from_value(json!({
        "id": "weird",
        "funnel_id": funnel.id,
        "name": "Weird",
        "slug": "weird",
        "elements": "not a list"
    }))?);

    let session =
        EditorSession::open(Arc::clone(&store), EditorConfig::default(), &funnel.id, "weird").await?;

    assert!(session.tree().is_empty());
    assert!(matches!(
        session.document().needs_attention(),
        Some(LayoutFormatError::InvalidLegacyElements(_))
    ));
    assert!(!session.is_dirty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_build_page_then_switch() -> anyhow::Result<()> {
    init_tracing();
    let store = Arc::new(MemoryStore::new().with_latency(Duration::from_millis(20)));
    let funnel = store.create_funnel("Webinar");

    let config = EditorConfig::from_json(r#"{ "autosaveQuietPeriodMs": 500 }"#)?;
    let home = store
        .create_page(NewPage {
            funnel_id: funnel.id.clone(),
            name: "Home".to_string(),
        })
        .await?;

    let mut session =
        EditorSession::open(Arc::clone(&store), config, &funnel.id, &home.id).await?;
    let thanks = session.create_page("Thank You").await?;
    assert_eq!(thanks.slug, "thank-you");
    let names: Vec<_> = session.pages().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "Thank You"]);

    let section_id = session
        .apply(Mutation::AddSection)
        .created_id()
        .unwrap()
        .to_string();
    let section = session.tree().section(&section_id).unwrap().clone();
    let button = create_element(ElementKind::Button);
    session.apply(Mutation::InsertElement {
        section_id,
        row_id: section.rows[0].id.clone(),
        column_id: section.rows[0].columns[0].id.clone(),
        element: button.clone(),
        index: None,
    });

    // still inside the quiet period
    tokio::time::advance(Duration::from_millis(100)).await;
    session.tick().await;
    assert_eq!(store.total_writes(), 0);

    session.switch_page(&thanks.id).await?;

    assert_eq!(store.writes(&home.id), 1);
    let saved = store.sections(&home.id).unwrap();
    assert!(saved.contains_element(&button.id));
    assert_eq!(session.current_page().id, thanks.id);
    assert!(session.tree().is_empty());
    assert!(matches!(session.save_status(), SaveStatus::Idle));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_write_failure_keeps_edits_and_retries_manually() -> anyhow::Result<()> {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let funnel = store.create_funnel("Flaky");
    let home = store
        .create_page(NewPage {
            funnel_id: funnel.id.clone(),
            name: "Home".to_string(),
        })
        .await?;

    let mut session =
        EditorSession::open(Arc::clone(&store), EditorConfig::default(), &funnel.id, &home.id)
            .await?;
    store.fail_writes(Some("backend unavailable"));

    session.apply(Mutation::AddSection);
    assert!(session.wait_for_autosave().await.is_err());
    assert_eq!(
        session.save_status(),
        &SaveStatus::Failed {
            message: "Transport error: backend unavailable".to_string()
        }
    );
    assert_eq!(session.tree().sections.len(), 1);
    assert!(session.is_dirty());

    store.fail_writes(None);
    session.save_now().await?;
    assert!(!session.is_dirty());
    assert_eq!(store.sections(&home.id).unwrap().sections.len(), 1);
    Ok(())
}

/// Landing page in the shape the seed data and template clones were stored in
fn seeded_landing_page(funnel_id: &str) -> PageRecord {
    serde_json::from_value(json!({
        "id": "landing",
        "funnel_id": funnel_id,
        "name": "Landing Page",
        "slug": "landing",
        "elements": [
            { "id": "headline-1", "type": "text",
              "content": "Get Your Free Marketing Guide",
              "styles": { "fontSize": "48px", "fontWeight": "bold" } },
            { "id": "subheadline-1", "type": "text",
              "content": "Learn the secrets to growing your business online",
              "styles": { "fontSize": "24px", "color": "#6b7280" } },
            { "id": "form-1", "type": "form",
              "fields": [
                  { "name": "name", "type": "text", "placeholder": "Your Name", "required": true },
                  { "name": "email", "type": "email", "placeholder": "Your Email", "required": true }
              ],
              "submitText": "Get Free Access",
              "styles": { "maxWidth": "500px", "margin": "40px auto" } }
        ]
    }))
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_seeded_legacy_page_survives_first_save() -> anyhow::Result<()> {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let funnel = store.create_funnel("Lead Magnet");
    store.insert_page(seeded_landing_page(&funnel.id));

    let mut session =
        EditorSession::open(Arc::clone(&store), EditorConfig::default(), &funnel.id, "landing")
            .await?;
    assert!(session.document().needs_attention().is_none());
    assert_eq!(session.tree().element_count(), 3);

    session.apply(Mutation::AddSection);
    session.save_now().await?;

    let stored = store.sections("landing").unwrap();
    assert_eq!(stored.element_count(), 3);
    assert_eq!(
        stored.element("headline-1").unwrap().content_str("text"),
        Some("Get Your Free Marketing Guide")
    );

    let written = serde_json::to_value(store.page("landing").unwrap().sections)?;
    let form = &written[0]["rows"][0]["columns"][0]["elements"][2];
    assert_eq!(form["type"], "form");
    assert_eq!(form["submitText"], "Get Free Access");
    assert_eq!(form["fields"][1]["placeholder"], "Your Email");
    assert_eq!(form["styles"]["maxWidth"], "500px");
    Ok(())
}

#[test]
fn test_snapshot_json_round_trip() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let funnel = store.create_funnel("Seeded");
    store.insert_page(legacy_record(&funnel.id));

    let json = store.to_json()?;
    let restored = MemoryStore::from_json(&json)?;

    assert_eq!(restored.snapshot(), store.snapshot());
    let snapshot: StoreSnapshot = serde_json::from_str(&json)?;
    assert_eq!(snapshot.funnels[0].pages, vec!["legacy-page".to_string()]);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.json");
    std::fs::write(&path, &json)?;
    assert_eq!(MemoryStore::load(&path)?.snapshot(), store.snapshot());
    Ok(())
}
