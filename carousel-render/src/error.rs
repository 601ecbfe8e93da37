//! Export pipeline error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur during capture, encoding, and assembly.
///
/// Only the export pipeline surfaces user-visible failures; the reported
/// notification stays generic while the detail here is logged.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The rendering surface could not be acquired at all. Aborts the
    /// whole export.
    #[error("Rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Rasterizing one slide failed.
    #[error("Capture failed: {0}")]
    Capture(String),

    /// Compressing the raster failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// The multi-page container could not be finalized.
    #[error("Assembly failed: {0}")]
    Assembly(String),

    /// Another export is already running; the request is ignored.
    #[error("An export is already in progress")]
    Busy,
}
