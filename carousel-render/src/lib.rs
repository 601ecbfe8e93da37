//! # Carousel Render
//!
//! Export pipeline for carousel documents: rasterizes slides through an
//! SVG intermediate and packages them as downloadable artifacts.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Exporter                            │
//! ├──────────────┬───────────────┬───────────────────────────┤
//! │ RenderSurface│ encode        │ assemble                  │
//! │ (SVG→pixels) │ (PNG / JPEG)  │ (multi-page PDF)          │
//! └──────────────┴───────────────┴───────────────────────────┘
//! ```
//!
//! A single-slide export produces a lossless PNG named from the slide
//! ordinal; a whole-deck export produces one PDF page per slide in
//! original order, degrading failed captures to blank pages rather than
//! dropping them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod encode;
pub mod error;
pub mod fonts;
pub mod pdf;
pub mod pipeline;
pub mod surface;
pub mod svg;

pub use encode::{encode_jpeg, encode_png};
pub use error::{ExportError, ExportResult};
pub use fonts::FontLibrary;
pub use pdf::{assemble_pdf, DeckMetadata};
pub use pipeline::{
    DocumentArtifact, ExportConfig, ExportEvent, ExportKind, ExportOutcome, Exporter,
    ImageArtifact,
};
pub use surface::{CapturedFrame, RenderSurface, SvgSurface};
pub use svg::slide_to_svg;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
