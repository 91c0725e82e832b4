//! # Layout Mutations
//!
//! Structural operations on the section tree.
//!
//! ## Design Principles
//!
//! 1. **Pure**: every operation takes `&LayoutTree` and returns a new tree in an
//!    [`Edit`]; the input is never touched
//! 2. **Non-fatal**: an id that does not resolve yields
//!    [`MutationOutcome::Skipped`] and an unchanged tree, never an error
//! 3. **One vocabulary**: drag drops, property edits and keyboard shortcuts all
//!    produce [`Mutation`] values for the session gateway
//!
//! ## Mutation Semantics
//!
//! ### MoveElement
//! - The element is removed first, then inserted at `index` clamped to the
//!   target column's length after removal
//! - Same-column reorder and cross-column move are the same operation
//! - Resolving to the element's current slot is skipped (`SamePosition`)
//!
//! ### UpdateElement
//! - Field-level merge into `content` and `styles`; keys absent from the patch
//!   survive
//! - `size` is replaced as a whole when present
//! - A patch that leaves the element as it was is skipped (`Unchanged`), so
//!   it never marks the page dirty
//!
//! ### DeleteRow / DeleteSection
//! - Remove everything underneath; there is no undo

use std::fmt;

use funnel_model::{
    Element, FieldMap, LayoutTree, Row, Section, Size, GRID_COLUMNS, ROW_COLUMN_COUNTS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic operations on the layout tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a section holding one row of one full-width column
    AddSection,

    DeleteSection {
        section_id: String,
    },

    /// Append a row of `column_count` equal columns (1 to 4)
    AddRow {
        section_id: String,
        column_count: u8,
    },

    DeleteRow {
        section_id: String,
        row_id: String,
    },

    /// Set every column width of a row; must cover the 12-unit grid exactly
    ResizeColumns {
        row_id: String,
        widths: Vec<u8>,
    },

    /// Insert a new element; `index` defaults to the end of the column
    InsertElement {
        section_id: String,
        row_id: String,
        column_id: String,
        element: Element,
        index: Option<usize>,
    },

    MoveElement {
        element_id: String,
        target_column_id: String,
        index: usize,
    },

    /// Clone placed right after the original, with a new id
    DuplicateElement {
        element_id: String,
    },

    DeleteElement {
        element_id: String,
    },

    UpdateElement {
        element_id: String,
        patch: ElementPatch,
    },
}

/// Partial update for an element
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<FieldMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<FieldMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl ElementPatch {
    pub fn content(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut content = FieldMap::new();
        content.insert(key.into(), value);
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn style(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut styles = FieldMap::new();
        styles.insert(key.into(), value);
        Self {
            styles: Some(styles),
            ..Self::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }
}

/// A tree node referenced by a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    Section(String),
    Row(String),
    Column(String),
    Element(String),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Section(id) => write!(f, "section {}", id),
            NodeRef::Row(id) => write!(f, "row {}", id),
            NodeRef::Column(id) => write!(f, "column {}", id),
            NodeRef::Element(id) => write!(f, "element {}", id),
        }
    }
}

/// Why a mutation left the tree unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("Not found: {0}")]
    NotFound(NodeRef),

    #[error("Element is already at the target position")]
    SamePosition,

    #[error("Rows have 1 to 4 columns, got {0}")]
    InvalidColumnCount(u8),

    #[error("Invalid column widths: {0}")]
    InvalidWidths(String),

    #[error("Element id already in use: {0}")]
    DuplicateId(String),

    #[error("No element selected")]
    NothingSelected,

    #[error("List index out of range: {0}")]
    InvalidIndex(usize),

    #[error("Patch leaves the element unchanged")]
    Unchanged,
}

/// Whether a mutation landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// `created_id` is the id minted by add/insert/duplicate operations
    Applied { created_id: Option<String> },
    Skipped(SkipReason),
}

impl MutationOutcome {
    fn applied() -> Self {
        MutationOutcome::Applied { created_id: None }
    }

    fn created(id: String) -> Self {
        MutationOutcome::Applied {
            created_id: Some(id),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }

    pub fn created_id(&self) -> Option<&str> {
        match self {
            MutationOutcome::Applied { created_id } => created_id.as_deref(),
            MutationOutcome::Skipped(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&SkipReason> {
        match self {
            MutationOutcome::Skipped(reason) => Some(reason),
            MutationOutcome::Applied { .. } => None,
        }
    }
}

/// Result of a tree operation: the next tree and whether anything changed
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub tree: LayoutTree,
    pub outcome: MutationOutcome,
}

impl Edit {
    fn applied(tree: LayoutTree, outcome: MutationOutcome) -> Self {
        Self { tree, outcome }
    }

    fn skipped(tree: &LayoutTree, reason: SkipReason) -> Self {
        Self {
            tree: tree.clone(),
            outcome: MutationOutcome::Skipped(reason),
        }
    }
}

impl Mutation {
    /// Run against `tree`, producing a new tree
    pub fn apply(&self, tree: &LayoutTree) -> Edit {
        match self {
            Mutation::AddSection => add_section(tree),
            Mutation::DeleteSection { section_id } => delete_section(tree, section_id),
            Mutation::AddRow {
                section_id,
                column_count,
            } => add_row(tree, section_id, *column_count),
            Mutation::DeleteRow { section_id, row_id } => delete_row(tree, section_id, row_id),
            Mutation::ResizeColumns { row_id, widths } => resize_columns(tree, row_id, widths),
            Mutation::InsertElement {
                section_id,
                row_id,
                column_id,
                element,
                index,
            } => insert_element(tree, section_id, row_id, column_id, element.clone(), *index),
            Mutation::MoveElement {
                element_id,
                target_column_id,
                index,
            } => move_element(tree, element_id, target_column_id, *index),
            Mutation::DuplicateElement { element_id } => duplicate_element(tree, element_id),
            Mutation::DeleteElement { element_id } => delete_element(tree, element_id),
            Mutation::UpdateElement { element_id, patch } => {
                update_element(tree, element_id, patch)
            }
        }
    }

    /// Debug name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddSection => "AddSection",
            Mutation::DeleteSection { .. } => "DeleteSection",
            Mutation::AddRow { .. } => "AddRow",
            Mutation::DeleteRow { .. } => "DeleteRow",
            Mutation::ResizeColumns { .. } => "ResizeColumns",
            Mutation::InsertElement { .. } => "InsertElement",
            Mutation::MoveElement { .. } => "MoveElement",
            Mutation::DuplicateElement { .. } => "DuplicateElement",
            Mutation::DeleteElement { .. } => "DeleteElement",
            Mutation::UpdateElement { .. } => "UpdateElement",
        }
    }
}

pub fn add_section(tree: &LayoutTree) -> Edit {
    let mut next = tree.clone();
    let section = Section::new();
    let id = section.id.clone();
    next.sections.push(section);
    Edit::applied(next, MutationOutcome::created(id))
}

pub fn delete_section(tree: &LayoutTree, section_id: &str) -> Edit {
    let Some(pos) = tree.sections.iter().position(|s| s.id == section_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Section(section_id.to_string())));
    };

    let mut next = tree.clone();
    next.sections.remove(pos);
    Edit::applied(next, MutationOutcome::applied())
}

pub fn add_row(tree: &LayoutTree, section_id: &str, column_count: u8) -> Edit {
    if !ROW_COLUMN_COUNTS.contains(&column_count) {
        return Edit::skipped(tree, SkipReason::InvalidColumnCount(column_count));
    }

    let mut next = tree.clone();
    let Some(section) = next.section_mut(section_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Section(section_id.to_string())));
    };

    let row = Row::with_columns(column_count);
    let id = row.id.clone();
    section.rows.push(row);
    Edit::applied(next, MutationOutcome::created(id))
}

pub fn delete_row(tree: &LayoutTree, section_id: &str, row_id: &str) -> Edit {
    let mut next = tree.clone();
    let Some(section) = next.section_mut(section_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Section(section_id.to_string())));
    };
    let Some(pos) = section.rows.iter().position(|r| r.id == row_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Row(row_id.to_string())));
    };

    section.rows.remove(pos);
    Edit::applied(next, MutationOutcome::applied())
}

pub fn resize_columns(tree: &LayoutTree, row_id: &str, widths: &[u8]) -> Edit {
    let mut next = tree.clone();
    let Some(row) = next.row_mut(row_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Row(row_id.to_string())));
    };

    if widths.len() != row.columns.len() {
        return Edit::skipped(
            tree,
            SkipReason::InvalidWidths(format!(
                "expected {} widths, got {}",
                row.columns.len(),
                widths.len()
            )),
        );
    }
    if let Some(bad) = widths.iter().find(|w| !(1..=GRID_COLUMNS).contains(*w)) {
        return Edit::skipped(
            tree,
            SkipReason::InvalidWidths(format!("width {} outside 1..=12", bad)),
        );
    }
    let total: u32 = widths.iter().map(|w| u32::from(*w)).sum();
    if total != u32::from(GRID_COLUMNS) {
        return Edit::skipped(
            tree,
            SkipReason::InvalidWidths(format!("widths sum to {}, not 12", total)),
        );
    }

    for (column, width) in row.columns.iter_mut().zip(widths) {
        column.width = *width;
    }
    Edit::applied(next, MutationOutcome::applied())
}

pub fn insert_element(
    tree: &LayoutTree,
    section_id: &str,
    row_id: &str,
    column_id: &str,
    element: Element,
    index: Option<usize>,
) -> Edit {
    if tree.contains_element(&element.id) {
        return Edit::skipped(tree, SkipReason::DuplicateId(element.id));
    }

    let mut next = tree.clone();
    let Some(section) = next.section_mut(section_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Section(section_id.to_string())));
    };
    let Some(row) = section.rows.iter_mut().find(|r| r.id == row_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Row(row_id.to_string())));
    };
    let Some(column) = row.columns.iter_mut().find(|c| c.id == column_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Column(column_id.to_string())));
    };

    let at = index
        .unwrap_or(column.elements.len())
        .min(column.elements.len());
    let id = element.id.clone();
    column.elements.insert(at, element);
    Edit::applied(next, MutationOutcome::created(id))
}

pub fn move_element(
    tree: &LayoutTree,
    element_id: &str,
    target_column_id: &str,
    index: usize,
) -> Edit {
    let Some(source) = tree.locate(element_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Element(element_id.to_string())));
    };
    let Some(target) = tree.column(target_column_id) else {
        return Edit::skipped(
            tree,
            SkipReason::NotFound(NodeRef::Column(target_column_id.to_string())),
        );
    };

    let same_column = source.column_id == target_column_id;
    let len_after_removal = if same_column {
        target.elements.len() - 1
    } else {
        target.elements.len()
    };
    let at = index.min(len_after_removal);

    if same_column && at == source.index {
        return Edit::skipped(tree, SkipReason::SamePosition);
    }

    let mut next = tree.clone();
    let element = match next.column_mut(&source.column_id) {
        Some(column) => column.elements.remove(source.index),
        None => {
            return Edit::skipped(
                tree,
                SkipReason::NotFound(NodeRef::Column(source.column_id.clone())),
            )
        }
    };
    match next.column_mut(target_column_id) {
        Some(column) => column.elements.insert(at, element),
        None => {
            return Edit::skipped(
                tree,
                SkipReason::NotFound(NodeRef::Column(target_column_id.to_string())),
            )
        }
    }

    Edit::applied(next, MutationOutcome::applied())
}

pub fn duplicate_element(tree: &LayoutTree, element_id: &str) -> Edit {
    let Some(location) = tree.locate(element_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Element(element_id.to_string())));
    };

    let mut next = tree.clone();
    let Some(column) = next.column_mut(&location.column_id) else {
        return Edit::skipped(
            tree,
            SkipReason::NotFound(NodeRef::Column(location.column_id.clone())),
        );
    };

    let clone = column.elements[location.index].duplicate();
    let id = clone.id.clone();
    column.elements.insert(location.index + 1, clone);
    Edit::applied(next, MutationOutcome::created(id))
}

pub fn delete_element(tree: &LayoutTree, element_id: &str) -> Edit {
    let Some(location) = tree.locate(element_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Element(element_id.to_string())));
    };

    let mut next = tree.clone();
    if let Some(column) = next.column_mut(&location.column_id) {
        column.elements.remove(location.index);
    }
    Edit::applied(next, MutationOutcome::applied())
}

pub fn update_element(tree: &LayoutTree, element_id: &str, patch: &ElementPatch) -> Edit {
    let mut next = tree.clone();
    let Some(element) = next.element_mut(element_id) else {
        return Edit::skipped(tree, SkipReason::NotFound(NodeRef::Element(element_id.to_string())));
    };

    if let Some(content) = &patch.content {
        for (key, value) in content {
            element.content.insert(key.clone(), value.clone());
        }
    }
    if let Some(styles) = &patch.styles {
        for (key, value) in styles {
            element.styles.insert(key.clone(), value.clone());
        }
    }
    if let Some(size) = &patch.size {
        element.size = Some(size.clone());
    }

    if tree.element(element_id) == Some(&*element) {
        return Edit::skipped(tree, SkipReason::Unchanged);
    }
    Edit::applied(next, MutationOutcome::applied())
}
