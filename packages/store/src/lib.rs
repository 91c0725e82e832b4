//! # Funnel Store
//!
//! In-memory persistence for funnels and pages, implementing
//! [`funnel_editor::PageStore`].
//!
//! Hosts without a backend use [`MemoryStore`] directly, optionally seeded from
//! a JSON [`StoreSnapshot`]. Page slugs are derived from the page name
//! (lowercased, spaces to `-`) on creation.

mod memory;
mod state;

pub use memory::MemoryStore;
pub use state::StoreSnapshot;
