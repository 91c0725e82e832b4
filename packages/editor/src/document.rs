//! # Page Document
//!
//! Editing state for the one page that is open.
//!
//! The working tree is replaced wholesale on every applied mutation. Each
//! applied mutation bumps `version`; a save records the version it carried, and
//! the document is dirty until the latest version has been saved.
//!
//! ## Lifecycle
//!
//! ```text
//! PageRecord → LoadedPage → PageDocument → apply()* → snapshot() → update_page
//!                (upgrade)                  version++     ↓
//!                                                      mark_saved(version)
//! ```

use funnel_model::{LayoutFormatError, LayoutTree, LoadedPage, Page, PageUpdate};

use crate::mutations::{Mutation, MutationOutcome};

/// Working copy of a page
#[derive(Debug, Clone)]
pub struct PageDocument {
    page: Page,

    /// Current version number (increments on each applied mutation)
    version: u64,

    /// Highest version known to be persisted
    saved_version: u64,

    needs_attention: Option<LayoutFormatError>,
    upgraded_from_legacy: bool,
}

/// Tree state captured for a save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSnapshot {
    pub page_id: String,
    pub version: u64,
    pub tree: LayoutTree,
}

impl SaveSnapshot {
    pub fn to_update(&self) -> PageUpdate {
        PageUpdate {
            sections: self.tree.clone(),
        }
    }
}

impl PageDocument {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            version: 0,
            saved_version: 0,
            needs_attention: None,
            upgraded_from_legacy: false,
        }
    }

    pub fn from_loaded(loaded: LoadedPage) -> Self {
        Self {
            needs_attention: loaded.needs_attention,
            upgraded_from_legacy: loaded.upgraded_from_legacy,
            ..Self::new(loaded.page)
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_id(&self) -> &str {
        &self.page.id
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.page.sections
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Set when the stored layout was unreadable and the page opened empty
    pub fn needs_attention(&self) -> Option<&LayoutFormatError> {
        self.needs_attention.as_ref()
    }

    pub fn upgraded_from_legacy(&self) -> bool {
        self.upgraded_from_legacy
    }

    /// Apply a mutation; the version only moves when the tree changed
    pub fn apply(&mut self, mutation: &Mutation) -> MutationOutcome {
        let edit = mutation.apply(&self.page.sections);

        if edit.outcome.is_applied() {
            self.page.sections = edit.tree;
            self.version += 1;
        }

        edit.outcome
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.saved_version < self.version
    }

    /// Record that `version` reached the store. Saves finishing out of order
    /// never move the mark backwards.
    pub fn mark_saved(&mut self, version: u64) {
        self.saved_version = self.saved_version.max(version);
    }

    pub fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot {
            page_id: self.page.id.clone(),
            version: self.version,
            tree: self.page.sections.clone(),
        }
    }
}
