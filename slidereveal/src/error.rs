//! Error types for drawer construction.

use thiserror::Error;

/// Result type for slidereveal operations.
pub type Result<T> = std::result::Result<T, SlideRevealError>;

/// Errors raised while building a drawer controller.
///
/// Only construction can fail; `open`, `close`, `toggle` and `destroy` never do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlideRevealError {
    #[error("panel element not found for selector {0}")]
    PanelNotFound(String),

    #[error("content element not found for selector {0}")]
    ContentNotFound(String),

    #[error("no document available")]
    NoDocument,

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for SlideRevealError {
    fn from(e: serde_json::Error) -> Self {
        SlideRevealError::InvalidOptions(e.to_string())
    }
}
