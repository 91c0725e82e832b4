//! Stored records through load and write-back

use funnel_model::{
    create_element, palette, ElementKind, PageRecord, PageUpdate, PaletteGroup, GRID_COLUMNS,
};
use serde_json::{json, Value};

fn legacy_page() -> Value {
    json!({
        "id": "p1",
        "funnel_id": "f1",
        "name": "Opt In",
        "slug": "opt-in",
        "elements": [
            { "id": "h", "type": "heading", "position": { "x": 40, "y": 10 },
              "content": { "text": "Join the list" }, "styles": { "color": "#111" } },
            { "id": "e", "type": "email", "position": { "x": 40, "y": 90 },
              "content": { "label": "Email", "required": true },
              "size": { "width": 320, "height": "auto" } },
            { "id": "m", "type": "countdown", "position": { "x": 40, "y": 160 },
              "content": { "until": "2025-01-01" } }
        ]
    })
}

#[test]
fn test_legacy_page_writes_back_as_sections() -> anyhow::Result<()> {
    let record: PageRecord = serde_json::from_value(legacy_page())?;
    let loaded = record.into_loaded();
    assert!(loaded.upgraded_from_legacy);

    let body = serde_json::to_value(PageUpdate {
        sections: loaded.page.sections.clone(),
    })?;
    let columns = &body["sections"][0]["rows"][0]["columns"];
    assert_eq!(columns.as_array().map(Vec::len), Some(1));
    assert_eq!(columns[0]["width"], json!(GRID_COLUMNS));

    let elements = &columns[0]["elements"];
    assert_eq!(elements[0]["content"]["text"], "Join the list");
    assert_eq!(elements[1]["size"]["width"], json!(320));
    assert!(elements[1].get("position").is_none());

    // unrecognised kinds survive untouched
    assert_eq!(elements[2]["type"], "countdown");
    assert_eq!(elements[2]["content"]["until"], "2025-01-01");
    Ok(())
}

#[test]
fn test_written_sections_reload_identically() -> anyhow::Result<()> {
    let record: PageRecord = serde_json::from_value(legacy_page())?;
    let first = record.clone().into_loaded();

    let reloaded = PageRecord {
        sections: Some(serde_json::to_value(&first.page.sections)?),
        elements: None,
        ..record
    }
    .into_loaded();

    assert!(!reloaded.upgraded_from_legacy);
    assert!(reloaded.needs_attention.is_none());
    assert_eq!(reloaded.page.sections, first.page.sections);
    Ok(())
}

#[test]
fn test_every_palette_entry_creates_a_distinct_element() {
    let entries = palette();
    assert!(entries.iter().any(|(group, _)| *group == PaletteGroup::Form));

    let mut ids: Vec<String> = entries
        .into_iter()
        .map(|(_, kind)| {
            let element = create_element(kind.clone());
            assert_eq!(element.kind, kind);
            assert!(element.size.is_some());
            element.id
        })
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert!(!ElementKind::Unknown("map".to_string()).is_known());
}
