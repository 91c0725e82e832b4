//! # Funnel Editor
//!
//! Editing engine for funnel pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Page → Section → Row → Column → Elem │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: one open page                       │
//! │  - Pure layout mutations                    │
//! │  - Drag / property / shortcut inputs        │
//! │  - Single mutation gateway (MutationSink)   │
//! │  - Debounced, coalesced autosave            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ PageStore: get / list / create / update     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Trees are values**: every mutation takes a tree and returns a new one
//! 2. **One gateway**: nothing writes the working tree except `apply`
//! 3. **Misses are outcomes**: an unresolved id skips, it never errors
//! 4. **Flush before switch**: a page's edits are persisted before another page
//!    is loaded
//!
//! ## Usage
//!
//! ```rust,ignore
//! use funnel_editor::{EditorConfig, EditorSession, Mutation, MutationSink};
//!
//! let mut session = EditorSession::open(store, EditorConfig::default(), "funnel-1", "page-1").await?;
//!
//! let outcome = session.apply(Mutation::AddSection);
//! let section_id = outcome.created_id().unwrap().to_string();
//! session.apply(Mutation::AddRow { section_id, column_count: 2 });
//!
//! // Saves once the quiet period passes
//! session.wait_for_autosave().await?;
//! ```

mod autosave;
mod config;
mod document;
mod drag;
mod errors;
mod mutations;
mod properties;
mod session;
mod shortcuts;
mod sink;
mod store;

pub use autosave::{AutosaveScheduler, AutosaveState};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use document::{PageDocument, SaveSnapshot};
pub use drag::{DragController, DragEnd, DragPayload, DragState, DropTarget, Point};
pub use errors::EditorError;
pub use mutations::{
    add_row, add_section, delete_element, delete_row, delete_section, duplicate_element,
    insert_element, move_element, resize_columns, update_element, Edit, ElementPatch, Mutation,
    MutationOutcome, NodeRef, SkipReason,
};
pub use properties::{delete_selected, duplicate_selected, PropertyEditor};
pub use session::{EditorSession, SaveStatus};
pub use shortcuts::{handle_shortcut, resolve_shortcut, Key, KeyEvent, Modifiers, Shortcut, ShortcutResult};
pub use sink::{MutationSink, PageEditor};
pub use store::{PageStore, StoreError};

// Re-export common types for convenience
pub use funnel_model as model;
