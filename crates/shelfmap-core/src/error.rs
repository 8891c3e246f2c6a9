//! Error types for board editing operations.
//!
//! Interactive event handling never fails; these errors only surface from
//! explicit board-editing and loading calls.

use thiserror::Error;

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Element id already in use: {0}")]
    DuplicateElementId(String),
    #[error("Connection id already in use: {0}")]
    DuplicateConnectionId(String),
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
