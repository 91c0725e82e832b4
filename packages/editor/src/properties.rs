//! # Property Editor
//!
//! Field-level edits of the selected element. Every write becomes an
//! [`Mutation::UpdateElement`] patch, so setting one field never disturbs its
//! siblings. With nothing selected every operation is skipped.

use funnel_model::{find_field, property_fields, Dimension, Element, FieldSpec, FieldTarget, Size};
use serde_json::Value;

use crate::mutations::{ElementPatch, Mutation, MutationOutcome, SkipReason};
use crate::sink::MutationSink;

pub struct PropertyEditor<'a, S: MutationSink> {
    sink: &'a mut S,
}

impl<'a, S: MutationSink> PropertyEditor<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink }
    }

    pub fn element(&self) -> Option<&Element> {
        self.sink.selected_element()
    }

    /// Fields shown for the selection; empty when nothing is selected
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.element()
            .map(|element| property_fields(&element.kind))
            .unwrap_or(&[])
    }

    /// Current value of a field, read from `content` or `styles` per its field table
    pub fn value(&self, key: &str) -> Option<&Value> {
        let element = self.element()?;
        let field = find_field(&element.kind, key)?;
        match field.target {
            FieldTarget::Content => element.content.get(key),
            FieldTarget::Styles => element.styles.get(key),
        }
    }

    fn selected_id(&self) -> Result<String, SkipReason> {
        self.sink
            .selected_element_id()
            .map(str::to_string)
            .ok_or(SkipReason::NothingSelected)
    }

    fn update(&mut self, patch: ElementPatch) -> MutationOutcome {
        match self.selected_id() {
            Ok(element_id) => self.sink.apply(Mutation::UpdateElement { element_id, patch }),
            Err(reason) => MutationOutcome::Skipped(reason),
        }
    }

    pub fn set_content(&mut self, key: &str, value: Value) -> MutationOutcome {
        self.update(ElementPatch::content(key, value))
    }

    pub fn set_style(&mut self, key: &str, value: Value) -> MutationOutcome {
        self.update(ElementPatch::style(key, value))
    }

    /// Write a field through its field table entry, so the caller need not know the target.
    /// Keys the kind does not expose fall back to `content`.
    pub fn set_field(&mut self, key: &str, value: Value) -> MutationOutcome {
        let target = self
            .element()
            .and_then(|element| find_field(&element.kind, key))
            .map(|field| field.target)
            .unwrap_or(FieldTarget::Content);

        match target {
            FieldTarget::Content => self.set_content(key, value),
            FieldTarget::Styles => self.set_style(key, value),
        }
    }

    pub fn set_size(&mut self, width: Dimension, height: Dimension) -> MutationOutcome {
        self.update(ElementPatch::size(Size { width, height }))
    }

    /// Items of a string-list field (`options`); non-string entries are skipped
    pub fn list_items(&self, key: &str) -> Vec<String> {
        self.element()
            .and_then(|element| element.content.get(key))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn write_list(&mut self, key: &str, items: Vec<String>) -> MutationOutcome {
        let items = items.into_iter().map(Value::String).collect();
        self.set_content(key, Value::Array(items))
    }

    pub fn set_list_item(&mut self, key: &str, index: usize, value: &str) -> MutationOutcome {
        if self.element().is_none() {
            return MutationOutcome::Skipped(SkipReason::NothingSelected);
        }
        let mut items = self.list_items(key);
        let Some(slot) = items.get_mut(index) else {
            return MutationOutcome::Skipped(SkipReason::InvalidIndex(index));
        };
        *slot = value.to_string();
        self.write_list(key, items)
    }

    pub fn push_list_item(&mut self, key: &str, value: &str) -> MutationOutcome {
        if self.element().is_none() {
            return MutationOutcome::Skipped(SkipReason::NothingSelected);
        }
        let mut items = self.list_items(key);
        items.push(value.to_string());
        self.write_list(key, items)
    }

    pub fn remove_list_item(&mut self, key: &str, index: usize) -> MutationOutcome {
        if self.element().is_none() {
            return MutationOutcome::Skipped(SkipReason::NothingSelected);
        }
        let mut items = self.list_items(key);
        if index >= items.len() {
            return MutationOutcome::Skipped(SkipReason::InvalidIndex(index));
        }
        items.remove(index);
        self.write_list(key, items)
    }

    pub fn delete_selected(&mut self) -> MutationOutcome {
        delete_selected(&mut *self.sink)
    }

    pub fn duplicate_selected(&mut self) -> MutationOutcome {
        duplicate_selected(&mut *self.sink)
    }
}

/// Delete the selection; the gateway clears the selection afterwards
pub fn delete_selected(sink: &mut impl MutationSink) -> MutationOutcome {
    match sink.selected_element_id() {
        Some(id) => {
            let element_id = id.to_string();
            sink.apply(Mutation::DeleteElement { element_id })
        }
        None => MutationOutcome::Skipped(SkipReason::NothingSelected),
    }
}

/// Duplicate the selection and select the clone
pub fn duplicate_selected(sink: &mut impl MutationSink) -> MutationOutcome {
    let Some(id) = sink.selected_element_id() else {
        return MutationOutcome::Skipped(SkipReason::NothingSelected);
    };
    let element_id = id.to_string();

    let outcome = sink.apply(Mutation::DuplicateElement { element_id });
    if let Some(clone_id) = outcome.created_id() {
        sink.select(Some(clone_id));
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;
    use crate::sink::PageEditor;
    use funnel_model::{create_element, ElementKind, LayoutTree, Page};
    use serde_json::json;

    fn editor_with(kind: ElementKind) -> (PageEditor, String) {
        let mut editor = PageEditor::new(PageDocument::new(Page {
            id: "p".into(),
            funnel_id: "f".into(),
            name: "Page".into(),
            slug: "page".into(),
            sections: LayoutTree::new(),
        }));
        editor.apply(Mutation::AddSection);

        let section = editor.tree().sections[0].clone();
        let element = create_element(kind);
        let id = element.id.clone();
        editor.apply(Mutation::InsertElement {
            section_id: section.id,
            row_id: section.rows[0].id.clone(),
            column_id: section.rows[0].columns[0].id.clone(),
            element,
            index: None,
        });
        editor.select(Some(&id));
        (editor, id)
    }

    #[test]
    fn test_nothing_selected_is_skipped() {
        let (mut editor, _) = editor_with(ElementKind::Text);
        editor.select(None);
        let mut props = PropertyEditor::new(&mut editor);

        assert!(props.fields().is_empty());
        assert_eq!(
            props.set_content("text", json!("hi")),
            MutationOutcome::Skipped(SkipReason::NothingSelected)
        );
        assert_eq!(
            props.delete_selected(),
            MutationOutcome::Skipped(SkipReason::NothingSelected)
        );
    }

    #[test]
    fn test_set_field_routes_to_styles() {
        let (mut editor, id) = editor_with(ElementKind::Button);
        let mut props = PropertyEditor::new(&mut editor);

        assert!(props.set_field("backgroundColor", json!("#111111")).is_applied());
        assert!(props.set_field("text", json!("Buy now")).is_applied());
        assert_eq!(props.value("backgroundColor"), Some(&json!("#111111")));

        let element = editor.tree().element(&id).unwrap();
        assert_eq!(element.style_str("backgroundColor"), Some("#111111"));
        assert_eq!(element.content_str("text"), Some("Buy now"));
        assert_eq!(element.content_str("url"), Some("#"));
    }

    #[test]
    fn test_list_item_editing() {
        let (mut editor, _) = editor_with(ElementKind::Radio);
        let mut props = PropertyEditor::new(&mut editor);

        assert!(props.set_list_item("options", 1, "Maybe").is_applied());
        assert!(props.push_list_item("options", "Never").is_applied());
        assert!(props.remove_list_item("options", 0).is_applied());
        assert_eq!(
            props.remove_list_item("options", 10),
            MutationOutcome::Skipped(SkipReason::InvalidIndex(10))
        );

        assert_eq!(props.list_items("options"), vec!["Maybe", "Option 3", "Never"]);
    }

    #[test]
    fn test_set_size_replaces_box() {
        let (mut editor, id) = editor_with(ElementKind::Image);
        let mut props = PropertyEditor::new(&mut editor);

        props.set_size(Dimension::css("50%"), Dimension::px(200));

        let size = editor.tree().element(&id).unwrap().size.clone().unwrap();
        assert_eq!(size.width, Dimension::css("50%"));
        assert_eq!(size.height.to_string(), "200px");
    }

    #[test]
    fn test_duplicate_selects_clone_and_delete_clears() {
        let (mut editor, id) = editor_with(ElementKind::Heading);

        let outcome = duplicate_selected(&mut editor);
        let clone_id = outcome.created_id().unwrap().to_string();
        assert_ne!(clone_id, id);
        assert_eq!(editor.selected_element_id(), Some(clone_id.as_str()));

        assert!(delete_selected(&mut editor).is_applied());
        assert_eq!(editor.selected_element_id(), None);
        assert!(editor.tree().contains_element(&id));
        assert!(!editor.tree().contains_element(&clone_id));
    }
}
