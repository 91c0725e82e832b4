//! # Funnel Model
//!
//! Data model for the page builder.
//!
//! ```text
//! Funnel ─┬─ Page ── Section[] ── Row[] ── Column[] ── Element[]
//!         └─ Page ...
//! ```
//!
//! - **Element Model**: element kinds, default content/styles/size, and the
//!   property field tables the editor panel is generated from
//! - **Layout types**: the section tree and its lookups
//! - **Stored records**: the persistence boundary, including the one-way upgrade
//!   of legacy flat pages
//!
//! Everything here is plain data. Mutation lives in `funnel-editor`.

mod defaults;
mod element;
mod error;
mod fields;
mod id_generator;
mod layout;
mod record;

pub use defaults::{default_content, default_size, default_styles};
pub use element::{
    create_element, palette, Dimension, Element, ElementKind, FieldMap, PaletteGroup, Size,
};
pub use error::LayoutFormatError;
pub use fields::{find_field, property_fields, FieldControl, FieldSpec, FieldTarget};
pub use id_generator::{new_id, slugify};
pub use layout::{
    Column, ElementLocation, Funnel, LayoutTree, Page, PageSummary, Row, Section, GRID_COLUMNS,
    ROW_COLUMN_COUNTS,
};
pub use record::{
    LegacyElement, LoadedPage, NewPage, PageRecord, PageUpdate, Position, StoredLayout,
};
