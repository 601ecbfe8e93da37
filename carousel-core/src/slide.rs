//! Slides - one page of the deck: a background plus an ordered node list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::template::SlideTemplate;
use crate::{Node, NodeId};

/// Background color used for freshly created slides.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Unique identifier for a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideId(Uuid);

impl SlideId {
    /// Create a new unique slide ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SlideId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SlideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of the carousel document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Unique identifier.
    pub id: SlideId,
    /// Background fill as hex (`#RRGGBB`).
    pub background_color: String,
    /// Optional background image source, drawn above the fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Nodes in insertion order.
    pub nodes: Vec<Node>,
}

impl Slide {
    /// Create an empty slide with the default background.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: SlideId::new(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            background_image: None,
            nodes: Vec::new(),
        }
    }

    /// Instantiate a slide from a template. Every node gets a fresh id and
    /// is forced draggable; the catalog entry itself is never mutated.
    #[must_use]
    pub fn from_template(template: &SlideTemplate) -> Self {
        Self {
            id: SlideId::new(),
            background_color: template.background_color.clone(),
            background_image: None,
            nodes: template
                .nodes
                .iter()
                .map(|blueprint| {
                    let mut node = blueprint.instantiate();
                    node.draggable = true;
                    node
                })
                .collect(),
        }
    }

    /// Deep clone with a new slide id and new ids for every node.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: SlideId::new(),
            background_color: self.background_color.clone(),
            background_image: self.background_image.clone(),
            nodes: self.nodes.iter().map(Node::clone_with_new_id).collect(),
        }
    }

    /// Find a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by id, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Whether any node on this slide references the given image source.
    #[must_use]
    pub fn has_image_source(&self, source_reference: &str) -> bool {
        self.nodes
            .iter()
            .any(|n| n.source_reference() == Some(source_reference))
    }

    /// Nodes in paint order: z-index ascending, list order breaking ties.
    /// Editor display and export capture both draw in this order.
    #[must_use]
    pub fn painter_order(&self) -> Vec<&Node> {
        let mut ordered: Vec<&Node> = self.nodes.iter().collect();
        ordered.sort_by_key(|n| n.z_index);
        ordered
    }
}
