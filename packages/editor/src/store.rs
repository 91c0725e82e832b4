//! # Persistence collaborator
//!
//! The editor depends on four operations only: get a funnel, list its pages,
//! create a page, and write a page's sections. Any request/response transport
//! can implement [`PageStore`]; the editor never assumes HTTP.

use std::future::Future;

use funnel_model::{Funnel, NewPage, PageRecord, PageUpdate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn funnel_not_found(id: &str) -> Self {
        StoreError::NotFound {
            kind: "Funnel",
            id: id.to_string(),
        }
    }

    pub fn page_not_found(id: &str) -> Self {
        StoreError::NotFound {
            kind: "Page",
            id: id.to_string(),
        }
    }
}

/// Backend CRUD over funnels and pages
///
/// - `get_funnel` ↔ `GET /api/funnels/{id}`
/// - `list_pages` ↔ `GET /api/funnels/{id}/pages`
/// - `create_page` ↔ `POST /api/pages {funnel_id, name}`
/// - `update_page` ↔ `PUT /api/pages/{id} {sections}`
pub trait PageStore: Send + Sync + 'static {
    fn get_funnel(
        &self,
        funnel_id: &str,
    ) -> impl Future<Output = Result<Funnel, StoreError>> + Send;

    fn list_pages(
        &self,
        funnel_id: &str,
    ) -> impl Future<Output = Result<Vec<PageRecord>, StoreError>> + Send;

    fn create_page(
        &self,
        page: NewPage,
    ) -> impl Future<Output = Result<PageRecord, StoreError>> + Send;

    fn update_page(
        &self,
        page_id: &str,
        update: PageUpdate,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
