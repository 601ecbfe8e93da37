//! Geometry value types shared by the node model and the export pipeline.

use serde::{Deserialize, Serialize};

/// A point in full-resolution pixel units, measured from the canvas top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

impl Position {
    /// Create a position from pixel coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in full-resolution pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels, positive.
    pub width: f64,
    /// Height in pixels, positive.
    pub height: f64,
}

impl Size {
    /// Create a size from pixel dimensions.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
