//! The carousel document: ordered slides plus editor-focus state.

use serde::{Deserialize, Serialize};

use crate::{NodeId, Size, Slide, SlideId};

/// The fixed set of supported canvas output presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasPreset {
    /// 1:1 square, 1080x1080 px.
    #[default]
    Square,
    /// 4:5 portrait, 1080x1350 px.
    Portrait,
}

impl CanvasPreset {
    /// Pixel dimensions of this preset.
    #[must_use]
    pub const fn size(self) -> Size {
        match self {
            Self::Square => Size::new(1080.0, 1080.0),
            Self::Portrait => Size::new(1080.0, 1350.0),
        }
    }

    /// The other preset. Toggling twice returns the original value.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Square => Self::Portrait,
            Self::Portrait => Self::Square,
        }
    }

    /// Map pixel dimensions back to a preset, if they match one.
    #[must_use]
    pub fn from_size(size: Size) -> Option<Self> {
        [Self::Square, Self::Portrait]
            .into_iter()
            .find(|preset| preset.size() == size)
    }
}

/// The full ordered slide collection plus editor-focus state.
///
/// Invariants, upheld by every constructor and by [`crate::DocumentStore`]:
/// `slides` is never empty, `current_slide_index` is always in bounds, and
/// `selected_node_id` (when set) references a node on the current slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Ordered slides, at least one.
    pub slides: Vec<Slide>,
    /// Index of the slide under edit.
    pub current_slide_index: usize,
    /// Selected node on the current slide, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_node_id: Option<NodeId>,
    /// Active canvas output preset.
    #[serde(default)]
    pub canvas_preset: CanvasPreset,
}

impl Document {
    /// A document holding exactly one blank slide.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            slides: vec![Slide::blank()],
            current_slide_index: 0,
            selected_node_id: None,
            canvas_preset: CanvasPreset::default(),
        }
    }

    /// The slide under edit.
    #[must_use]
    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current_slide_index]
    }

    /// The slide under edit, mutably.
    pub fn current_slide_mut(&mut self) -> &mut Slide {
        &mut self.slides[self.current_slide_index]
    }

    /// Find a slide by id.
    #[must_use]
    pub fn slide(&self, id: SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    /// Find the index of a slide by id.
    #[must_use]
    pub fn slide_index(&self, id: SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    /// Number of slides.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::blank()
    }
}
