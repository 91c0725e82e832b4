//! # Stored page records
//!
//! Pages reach the editor in one of two historical shapes:
//!
//! - **Sections**: `{ sections: [Section] }`, the current format
//! - **Legacy**: `{ elements: [{ id, type, position: {x, y}, ... }] }`, a flat
//!   list of absolutely positioned elements
//!
//! The record keeps both layout fields as raw JSON. [`StoredLayout::classify`]
//! decides which shape a record is in and [`StoredLayout::upgrade`] turns
//! either into a [`LayoutTree`]. The upgrade is one-way: pages are only ever
//! written back in the sections format.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::element::{Element, ElementKind, FieldMap, Size};
use crate::error::LayoutFormatError;
use crate::layout::{Column, LayoutTree, Page, Row, Section};
use crate::id_generator::new_id;

/// A page as the persistence collaborator returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: String,
    pub funnel_id: String,
    pub name: String,
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `POST /api/pages` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPage {
    pub funnel_id: String,
    pub name: String,
}

/// `PUT /api/pages/{id}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageUpdate {
    pub sections: LayoutTree,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Element of the flat positioned format
///
/// Older pages store `content` as a bare string and keep form data (`fields`,
/// `submitText`) at the top level. A bare string becomes `{ "text": .. }`;
/// top-level keys land in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: FieldMap,
    #[serde(default, deserialize_with = "lenient_styles")]
    pub styles: FieldMap,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(flatten)]
    pub extra: FieldMap,
}

fn lenient_content<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FieldMap, D::Error> {
    let mut map = FieldMap::new();
    match Value::deserialize(deserializer)? {
        Value::Null => {}
        Value::Object(fields) => map = fields,
        text @ Value::String(_) => {
            map.insert("text".to_string(), text);
        }
        other => {
            map.insert("value".to_string(), other);
        }
    }
    Ok(map)
}

fn lenient_styles<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FieldMap, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(FieldMap::new()),
        Value::Object(fields) => Ok(fields),
        _ => Err(D::Error::custom("styles must be an object")),
    }
}

impl LegacyElement {
    /// Parse one stored element. One that still does not fit is kept whole as
    /// an unknown-kind element whose raw fields move into `content`, so a
    /// single odd entry never costs the rest of the page.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_else(|_| Self::opaque(value))
    }

    fn opaque(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                let mut fields = FieldMap::new();
                fields.insert("value".to_string(), other);
                fields
            }
        };

        let id = match fields.remove("id") {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => new_id(),
        };
        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            _ => "unknown".to_string(),
        };
        fields.remove("position");

        Self {
            id,
            kind: ElementKind::Unknown(kind),
            content: fields,
            styles: FieldMap::new(),
            size: None,
            position: None,
            extra: FieldMap::new(),
        }
    }

    /// Drops the absolute position
    pub fn into_element(self) -> Element {
        Element {
            id: self.id,
            kind: self.kind,
            content: self.content,
            styles: self.styles,
            size: self.size,
            extra: self.extra,
        }
    }
}

/// Layout of a stored page, tagged by format
#[derive(Debug, Clone, PartialEq)]
pub enum StoredLayout {
    Sections(LayoutTree),
    Legacy(Vec<LegacyElement>),
}

impl StoredLayout {
    /// Sections win when both fields are present.
    pub fn classify(
        sections: Option<&Value>,
        elements: Option<&Value>,
    ) -> Result<Self, LayoutFormatError> {
        match (sections, elements) {
            (Some(sections), _) if !sections.is_null() => {
                serde_json::from_value::<LayoutTree>(sections.clone())
                    .map(StoredLayout::Sections)
                    .map_err(|e| LayoutFormatError::InvalidSections(e.to_string()))
            }
            (_, Some(elements)) if !elements.is_null() => match elements {
                Value::Array(items) => Ok(StoredLayout::Legacy(
                    items.iter().cloned().map(LegacyElement::from_value).collect(),
                )),
                _ => Err(LayoutFormatError::InvalidLegacyElements(
                    "expected a list of elements".to_string(),
                )),
            },
            _ => Err(LayoutFormatError::MissingLayout),
        }
    }

    /// Legacy elements are wrapped, in their stored order, in one section with
    /// one row of one full-width column. An empty legacy list becomes an empty
    /// tree.
    pub fn upgrade(self) -> LayoutTree {
        match self {
            StoredLayout::Sections(tree) => tree,
            StoredLayout::Legacy(elements) if elements.is_empty() => LayoutTree::new(),
            StoredLayout::Legacy(elements) => {
                let mut column = Column::full_width();
                column.elements = elements
                    .into_iter()
                    .map(LegacyElement::into_element)
                    .collect();

                LayoutTree::from_sections(vec![Section {
                    id: new_id(),
                    rows: vec![Row {
                        id: new_id(),
                        columns: vec![column],
                    }],
                }])
            }
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, StoredLayout::Legacy(_))
    }
}

/// A record turned into an editable page
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPage {
    pub page: Page,
    /// Set when the stored layout was unreadable and an empty tree was used
    pub needs_attention: Option<LayoutFormatError>,
    /// Set when the stored layout was in the flat positioned format
    pub upgraded_from_legacy: bool,
}

impl PageRecord {
    pub fn layout(&self) -> Result<StoredLayout, LayoutFormatError> {
        StoredLayout::classify(self.sections.as_ref(), self.elements.as_ref())
    }

    /// Never fails: malformed layouts load as an empty tree and are flagged.
    pub fn into_loaded(self) -> LoadedPage {
        let (sections, needs_attention, upgraded_from_legacy) = match self.layout() {
            Ok(layout) => {
                let legacy = layout.is_legacy();
                (layout.upgrade(), None, legacy)
            }
            Err(e) => (LayoutTree::new(), Some(e), false),
        };

        LoadedPage {
            page: Page {
                id: self.id,
                funnel_id: self.funnel_id,
                name: self.name,
                slug: self.slug,
                sections,
            },
            needs_attention,
            upgraded_from_legacy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(body: Value) -> PageRecord {
        let mut value = json!({
            "id": "page-1",
            "funnel_id": "funnel-1",
            "name": "Landing",
            "slug": "landing",
        });
        if let (Value::Object(target), Value::Object(extra)) = (&mut value, body) {
            target.extend(extra);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_legacy_page_upgrades_to_single_column() {
        let loaded = record(json!({
            "elements": [
                { "id": "a", "position": { "x": 10, "y": 20 }, "type": "text",
                  "content": { "text": "hi" }, "styles": {} }
            ]
        }))
        .into_loaded();

        let tree = &loaded.page.sections;
        assert!(loaded.needs_attention.is_none());
        assert!(loaded.upgraded_from_legacy);
        assert_eq!(tree.sections.len(), 1);
        assert_eq!(tree.sections[0].rows.len(), 1);
        assert_eq!(tree.sections[0].rows[0].columns.len(), 1);

        let column = &tree.sections[0].rows[0].columns[0];
        assert_eq!(column.width, 12);
        assert_eq!(column.elements.len(), 1);
        assert_eq!(column.elements[0].id, "a");

        let written = serde_json::to_value(&column.elements[0]).unwrap();
        assert!(written.get("position").is_none());
    }

    #[test]
    fn test_legacy_order_is_preserved() {
        let loaded = record(json!({
            "elements": [
                { "id": "b", "type": "heading", "position": { "x": 0, "y": 90 } },
                { "id": "a", "type": "button", "position": { "x": 0, "y": 10 } }
            ]
        }))
        .into_loaded();

        let ids: Vec<_> = loaded.page.sections.elements().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_sections_format_loads_unchanged() {
        let loaded = record(json!({
            "sections": [
                { "id": "s1", "rows": [
                    { "id": "r1", "columns": [
                        { "id": "c1", "width": 6, "elements": [] },
                        { "id": "c2", "width": 6, "elements": [] }
                    ]}
                ]}
            ],
            "elements": []
        }))
        .into_loaded();

        assert!(!loaded.upgraded_from_legacy);
        assert_eq!(loaded.page.sections.sections[0].id, "s1");
        assert_eq!(loaded.page.sections.columns().count(), 2);
    }

    #[test]
    fn test_empty_legacy_list_is_empty_tree() {
        let loaded = record(json!({ "elements": [] })).into_loaded();
        assert!(loaded.page.sections.is_empty());
        assert!(loaded.needs_attention.is_none());
    }

    #[test]
    fn test_malformed_layout_is_flagged_not_fatal() {
        let loaded = record(json!({ "sections": { "not": "a list" } })).into_loaded();
        assert!(loaded.page.sections.is_empty());
        assert!(matches!(
            loaded.needs_attention,
            Some(LayoutFormatError::InvalidSections(_))
        ));

        let loaded = record(json!({})).into_loaded();
        assert_eq!(loaded.needs_attention, Some(LayoutFormatError::MissingLayout));
    }

    #[test]
    fn test_string_content_and_form_fields_upgrade() {
        let loaded = record(json!({
            "elements": [
                { "id": "headline-1", "type": "text",
                  "content": "Get Your Free Marketing Guide",
                  "styles": { "fontSize": "48px" } },
                { "id": "form-1", "type": "form",
                  "fields": [{ "name": "email", "type": "email", "required": true }],
                  "submitText": "Get Free Access",
                  "styles": { "maxWidth": "500px" } }
            ]
        }))
        .into_loaded();

        assert!(loaded.needs_attention.is_none());
        let tree = &loaded.page.sections;
        assert_eq!(tree.element_count(), 2);

        let headline = tree.element("headline-1").unwrap();
        assert_eq!(headline.content_str("text"), Some("Get Your Free Marketing Guide"));
        assert_eq!(headline.style_str("fontSize"), Some("48px"));

        let form = tree.element("form-1").unwrap();
        assert!(form.is_unknown_kind());
        assert_eq!(form.extra["submitText"], "Get Free Access");
        assert_eq!(form.extra["fields"][0]["name"], "email");
    }

    #[test]
    fn test_odd_element_is_kept_without_losing_the_page() {
        let loaded = record(json!({
            "elements": [
                { "id": "a", "type": "text", "content": "hi" },
                { "id": 7, "type": "button", "styles": "bold", "position": { "x": 1, "y": 2 } },
                "stray"
            ]
        }))
        .into_loaded();

        assert!(loaded.needs_attention.is_none());
        let elements: Vec<_> = loaded.page.sections.elements().collect();
        assert_eq!(elements.len(), 3);

        assert_eq!(elements[1].id, "7");
        assert_eq!(elements[1].kind, ElementKind::Unknown("button".to_string()));
        assert_eq!(elements[1].content["styles"], "bold");
        assert!(!elements[1].content.contains_key("position"));

        assert_eq!(elements[2].content["value"], "stray");
        assert_ne!(elements[2].id, elements[0].id);
    }

    #[test]
    fn test_non_list_elements_are_flagged() {
        let loaded = record(json!({ "elements": { "id": "a" } })).into_loaded();
        assert!(loaded.page.sections.is_empty());
        assert!(matches!(
            loaded.needs_attention,
            Some(LayoutFormatError::InvalidLegacyElements(_))
        ));
    }

    #[test]
    fn test_page_update_body_shape() {
        let body = PageUpdate {
            sections: LayoutTree::new(),
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "sections": [] }));
    }
}
