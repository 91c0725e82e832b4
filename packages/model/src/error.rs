use thiserror::Error;

/// A stored page matches neither the sections format nor the legacy flat format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutFormatError {
    #[error("Page has neither sections nor elements")]
    MissingLayout,

    #[error("Invalid sections: {0}")]
    InvalidSections(String),

    #[error("Invalid legacy elements: {0}")]
    InvalidLegacyElements(String),
}
