//! # Carousel Core
//!
//! Document model and editing operations for fixed-aspect-ratio carousel
//! decks: slides hold positioned text and image nodes, a single-writer
//! store owns the document and persists a snapshot on every mutation, and
//! the synchronization engine propagates node attributes across slides.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               carousel-core                 │
//! ├──────────────────────┬──────────────────────┤
//! │  Document Store      │  Sync Engine         │
//! │  - Slides & nodes    │  - Style propagation │
//! │  - Focus/selection   │  - Clone propagation │
//! │  - Canvas presets    │  - Deck-wide restyle │
//! ├──────────────────────┼──────────────────────┤
//! │  Templates           │  Snapshot            │
//! │  - Preset catalog    │  - Legacy conversion │
//! │  - Fresh identities  │  - Fail-closed load  │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod document;
pub mod error;
pub mod geometry;
pub mod node;
pub mod slide;
pub mod snapshot;
pub mod store;
pub mod sync;
pub mod template;

pub use api::{CarouselApi, CarouselDraft, FontCatalog, FontResource};
pub use document::{CanvasPreset, Document};
pub use error::{CoreError, CoreResult};
pub use geometry::{Position, Size};
pub use node::{Alignment, FontStyle, Node, NodeId, NodeKind, NodePatch, TextStyle};
pub use slide::{Slide, SlideId, DEFAULT_BACKGROUND};
pub use snapshot::{DocumentSnapshot, SNAPSHOT_FORMAT};
pub use store::{BackgroundUpdate, DocumentStore, SNAPSHOT_FILE};
pub use template::{available_templates, NodeBlueprint, SlideTemplate};

/// Carousel core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
