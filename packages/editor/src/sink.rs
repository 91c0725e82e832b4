//! # Mutation gateway
//!
//! Every change to the working tree goes through [`MutationSink::apply`].
//! Drag commits, property edits and keyboard shortcuts only ever see this
//! trait, never the tree storage, so no caller can read the tree, compute a new
//! one and write it back around the gateway.

use funnel_model::{Element, LayoutTree};
use tracing::debug;

use crate::document::PageDocument;
use crate::mutations::{Mutation, MutationOutcome};

pub trait MutationSink {
    /// Current working tree (read-only)
    fn tree(&self) -> &LayoutTree;

    /// Apply a mutation through the gateway
    fn apply(&mut self, mutation: Mutation) -> MutationOutcome;

    fn selected_element_id(&self) -> Option<&str>;

    /// Select an element, or clear the selection with `None`. Ids that do not
    /// resolve clear the selection; returns whether something is selected.
    fn select(&mut self, element_id: Option<&str>) -> bool;

    fn selected_element(&self) -> Option<&Element> {
        self.selected_element_id()
            .and_then(|id| self.tree().element(id))
    }
}

/// A page document plus the selection, without persistence
///
/// Keeps the selection consistent with the tree: when the selected element
/// disappears the selection clears.
#[derive(Debug, Clone)]
pub struct PageEditor {
    document: PageDocument,
    selected: Option<String>,
}

impl PageEditor {
    pub fn new(document: PageDocument) -> Self {
        Self {
            document,
            selected: None,
        }
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut PageDocument {
        &mut self.document
    }

    pub fn into_document(self) -> PageDocument {
        self.document
    }

    fn prune_selection(&mut self) {
        if let Some(id) = &self.selected {
            if !self.document.tree().contains_element(id) {
                debug!(element_id = %id, "Selected element removed, clearing selection");
                self.selected = None;
            }
        }
    }
}

impl MutationSink for PageEditor {
    fn tree(&self) -> &LayoutTree {
        self.document.tree()
    }

    fn apply(&mut self, mutation: Mutation) -> MutationOutcome {
        let outcome = self.document.apply(&mutation);

        match &outcome {
            MutationOutcome::Applied { .. } => {
                debug!(
                    mutation = mutation.name(),
                    version = self.document.version(),
                    "Applied mutation"
                );
                self.prune_selection();
            }
            MutationOutcome::Skipped(reason) => {
                debug!(mutation = mutation.name(), %reason, "Mutation skipped");
            }
        }

        outcome
    }

    fn selected_element_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    fn select(&mut self, element_id: Option<&str>) -> bool {
        self.selected = element_id
            .filter(|id| self.document.tree().contains_element(id))
            .map(str::to_string);
        self.selected.is_some()
    }
}
