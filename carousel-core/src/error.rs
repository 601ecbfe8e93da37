//! Error types for carousel-core operations.
//!
//! Document-store mutations never return errors (invalid ids are no-ops);
//! this type serves the snapshot loader and the external collaborators.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote collaborator call failed.
    #[error("Remote API error: {0}")]
    Remote(String),

    /// A font-catalog operation failed.
    #[error("Font catalog error: {0}")]
    FontCatalog(String),
}
