//! # Layout Tree
//!
//! `Page → Section[] → Row[] → Column[] → Element[]`
//!
//! Columns are the only containers that hold elements directly. Sibling column
//! widths are on a 12-unit grid; the row constructor always splits 12 evenly,
//! nothing else enforces the sum.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::id_generator::new_id;

/// Grid units shared by the columns of one row
pub const GRID_COLUMNS: u8 = 12;

/// Column counts a row may be created with (all divide the grid evenly)
pub const ROW_COLUMN_COUNTS: std::ops::RangeInclusive<u8> = 1..=4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub width: u8,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Column {
    pub fn new(width: u8) -> Self {
        Self {
            id: new_id(),
            width,
            elements: Vec::new(),
        }
    }

    pub fn full_width() -> Self {
        Self::new(GRID_COLUMNS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub columns: Vec<Column>,
}

impl Row {
    /// Row of `count` equal columns. Callers validate `count` against
    /// [`ROW_COLUMN_COUNTS`] first.
    pub fn with_columns(count: u8) -> Self {
        let count = count.max(1);
        let width = GRID_COLUMNS / count;
        Self {
            id: new_id(),
            columns: (0..count).map(|_| Column::new(width)).collect(),
        }
    }

    pub fn total_width(&self) -> u32 {
        self.columns.iter().map(|c| u32::from(c.width)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Section {
    /// Section with one row of one full-width column
    pub fn new() -> Self {
        Self {
            id: new_id(),
            rows: vec![Row::with_columns(1)],
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}

/// Where an element currently sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementLocation {
    pub section_id: String,
    pub row_id: String,
    pub column_id: String,
    pub index: usize,
}

/// The ordered sections of one page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTree {
    pub sections: Vec<Section>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }

    pub fn row_mut(&mut self, row_id: &str) -> Option<&mut Row> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.rows.iter_mut())
            .find(|r| r.id == row_id)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.rows().flat_map(|r| r.columns.iter())
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns().find(|c| c.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.rows.iter_mut())
            .flat_map(|r| r.columns.iter_mut())
            .find(|c| c.id == column_id)
    }

    /// Every element in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.columns().flat_map(|c| c.elements.iter())
    }

    pub fn element(&self, element_id: &str) -> Option<&Element> {
        self.elements().find(|e| e.id == element_id)
    }

    pub fn element_mut(&mut self, element_id: &str) -> Option<&mut Element> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.rows.iter_mut())
            .flat_map(|r| r.columns.iter_mut())
            .flat_map(|c| c.elements.iter_mut())
            .find(|e| e.id == element_id)
    }

    pub fn contains_element(&self, element_id: &str) -> bool {
        self.element(element_id).is_some()
    }

    pub fn element_count(&self) -> usize {
        self.columns().map(|c| c.elements.len()).sum()
    }

    /// Full path of an element. O(total elements).
    pub fn locate(&self, element_id: &str) -> Option<ElementLocation> {
        for section in &self.sections {
            for row in &section.rows {
                for column in &row.columns {
                    if let Some(index) = column.elements.iter().position(|e| e.id == element_id) {
                        return Some(ElementLocation {
                            section_id: section.id.clone(),
                            row_id: row.id.clone(),
                            column_id: column.id.clone(),
                            index,
                        });
                    }
                }
            }
        }
        None
    }
}

/// One screen of a funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub funnel_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sections: LayoutTree,
}

impl Page {
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// A named, ordered collection of pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funnel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Page ids in funnel order
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub published: bool,
}
