//! Error types for the editor

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum EditorError {
    /// Input rejected before any mutation or request
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
