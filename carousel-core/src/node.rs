//! Slide nodes - the positioned visual elements of a carousel slide.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Position, Size};

/// Unique identifier for a node. Ids are unique document-wide, never
/// per-slide: cross-slide copies always mint a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new unique node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from a string representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Align to the left edge of the text box.
    #[default]
    Left,
    /// Center within the text box.
    Center,
    /// Align to the right edge of the text box.
    Right,
}

/// Font style flags for text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FontStyle {
    /// Bold weight.
    #[serde(default)]
    pub bold: bool,
    /// Italic slant.
    #[serde(default)]
    pub italic: bool,
    /// Underline decoration.
    #[serde(default)]
    pub underline: bool,
}

/// The content a node carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// A positioned text block.
    #[serde(rename_all = "camelCase")]
    Text {
        /// Text content.
        content: String,
        /// Font size in pixels.
        font_size: f64,
        /// Font family name, resolved through the font catalog.
        font_family: String,
        /// Fill color as hex (`#RRGGBB`).
        fill_color: String,
        /// Optional fixed box width in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        /// Optional fixed box height in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
        /// Horizontal alignment within the box.
        #[serde(default)]
        alignment: Alignment,
        /// Bold/italic/underline flags.
        #[serde(default)]
        font_style: FontStyle,
        /// Optional background fill behind the text box.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background_color: Option<String>,
    },

    /// A positioned raster image.
    #[serde(rename_all = "camelCase")]
    Image {
        /// Image source: a data URI, URL, or local file path.
        source_reference: String,
        /// Display size in pixels.
        size: Size,
        /// Opacity in `0.0..=1.0`; `None` means fully opaque.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        opacity: Option<f64>,
        /// Clockwise rotation in degrees around the image center.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<f64>,
    },
}

/// A node on a slide: shared placement fields plus typed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Top-left position on the canvas.
    pub position: Position,
    /// Whether the node can be dragged in the editor.
    pub draggable: bool,
    /// Paint-order hint; affects draw order only, never identity.
    pub z_index: i32,
    /// Typed content.
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Create a node with a fresh id from placement fields and content.
    #[must_use]
    pub fn new(position: Position, z_index: i32, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            position,
            draggable: true,
            z_index,
            kind,
        }
    }

    /// Deep clone with a fresh id, everything else identical.
    #[must_use]
    pub fn clone_with_new_id(&self) -> Self {
        Self {
            id: NodeId::new(),
            ..self.clone()
        }
    }

    /// Whether this is a text node.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// The image source reference, if this is an image node.
    #[must_use]
    pub fn source_reference(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Image {
                source_reference, ..
            } => Some(source_reference),
            NodeKind::Text { .. } => None,
        }
    }

    /// Apply a sparse update. Only present fields change; the id and all
    /// untouched fields are preserved. Fields that do not apply to this
    /// node's kind are ignored.
    pub fn apply_patch(&mut self, patch: &NodePatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(draggable) = patch.draggable {
            self.draggable = draggable;
        }

        match &mut self.kind {
            NodeKind::Text {
                content,
                font_size,
                font_family,
                fill_color,
                width,
                height,
                alignment,
                font_style,
                background_color,
            } => {
                if let Some(v) = &patch.content {
                    content.clone_from(v);
                }
                if let Some(v) = patch.font_size {
                    *font_size = v;
                }
                if let Some(v) = &patch.font_family {
                    font_family.clone_from(v);
                }
                if let Some(v) = &patch.fill_color {
                    fill_color.clone_from(v);
                }
                if let Some(v) = patch.width {
                    *width = Some(v);
                }
                if let Some(v) = patch.height {
                    *height = Some(v);
                }
                if let Some(v) = patch.alignment {
                    *alignment = v;
                }
                if let Some(v) = patch.font_style {
                    *font_style = v;
                }
                if let Some(v) = &patch.background_color {
                    *background_color = Some(v.clone());
                }
            }
            NodeKind::Image {
                source_reference,
                size,
                opacity,
                rotation,
            } => {
                if let Some(v) = &patch.source_reference {
                    source_reference.clone_from(v);
                }
                if let Some(v) = patch.size {
                    *size = v;
                }
                if let Some(v) = patch.opacity {
                    *opacity = Some(v);
                }
                if let Some(v) = patch.rotation {
                    *rotation = Some(v);
                }
            }
        }
    }
}

/// Sparse update for a node. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    /// New position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// New z-index, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    /// New draggable flag, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    /// New text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New font size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// New font family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// New fill color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// New fixed box width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New fixed box height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// New font style flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// New text background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// New image source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,
    /// New image size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// New image opacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// New image rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

/// The style subset propagated by the synchronization engine. Content and
/// position are deliberately excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family name.
    pub font_family: String,
    /// Fill color as hex.
    pub fill_color: String,
    /// Horizontal alignment.
    pub alignment: Alignment,
    /// Bold/italic/underline flags.
    pub font_style: FontStyle,
    /// Optional background fill.
    pub background_color: Option<String>,
}

impl TextStyle {
    /// Extract the propagated style subset from a node, if it is text.
    #[must_use]
    pub fn extract(node: &Node) -> Option<Self> {
        match &node.kind {
            NodeKind::Text {
                font_size,
                font_family,
                fill_color,
                alignment,
                font_style,
                background_color,
                ..
            } => Some(Self {
                font_size: *font_size,
                font_family: font_family.clone(),
                fill_color: fill_color.clone(),
                alignment: *alignment,
                font_style: *font_style,
                background_color: background_color.clone(),
            }),
            NodeKind::Image { .. } => None,
        }
    }

    /// Merge this style into a node if it is text; content, position, and
    /// box dimensions stay untouched. No-op for image nodes.
    pub fn apply(&self, node: &mut Node) {
        if let NodeKind::Text {
            font_size,
            font_family,
            fill_color,
            alignment,
            font_style,
            background_color,
            ..
        } = &mut node.kind
        {
            *font_size = self.font_size;
            font_family.clone_from(&self.font_family);
            fill_color.clone_from(&self.fill_color);
            *alignment = self.alignment;
            *font_style = self.font_style;
            background_color.clone_from(&self.background_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_node() -> Node {
        Node::new(
            Position::new(10.0, 20.0),
            1,
            NodeKind::Text {
                content: "Hello".to_string(),
                font_size: 32.0,
                font_family: "Inter".to_string(),
                fill_color: "#111111".to_string(),
                width: Some(400.0),
                height: None,
                alignment: Alignment::Center,
                font_style: FontStyle::default(),
                background_color: None,
            },
        )
    }

    #[test]
    fn test_clone_with_new_id() {
        let node = text_node();
        let copy = node.clone_with_new_id();
        assert_ne!(node.id, copy.id);
        assert_eq!(node.position, copy.position);
        assert_eq!(node.kind, copy.kind);
    }

    #[test]
    fn test_patch_preserves_untouched_fields() {
        let mut node = text_node();
        let before = node.clone();
        node.apply_patch(&NodePatch {
            font_size: Some(48.0),
            ..Default::default()
        });

        assert_eq!(node.id, before.id);
        assert_eq!(node.position, before.position);
        match (&node.kind, &before.kind) {
            (
                NodeKind::Text {
                    content, font_size, ..
                },
                NodeKind::Text {
                    content: old_content,
                    ..
                },
            ) => {
                assert_eq!(content, old_content);
                assert!((font_size - 48.0).abs() < f64::EPSILON);
            }
            _ => panic!("expected text nodes"),
        }
    }

    #[test]
    fn test_identical_patch_is_idempotent() {
        let mut node = text_node();
        let before = node.clone();
        node.apply_patch(&NodePatch {
            position: Some(before.position),
            content: Some("Hello".to_string()),
            font_size: Some(32.0),
            ..Default::default()
        });
        assert_eq!(node, before);
    }

    #[test]
    fn test_image_fields_ignored_on_text() {
        let mut node = text_node();
        let before = node.clone();
        node.apply_patch(&NodePatch {
            source_reference: Some("photo.png".to_string()),
            opacity: Some(0.5),
            ..Default::default()
        });
        assert_eq!(node, before);
    }

    #[test]
    fn test_style_extract_and_apply() {
        let source = text_node();
        let style = TextStyle::extract(&source).expect("text style");

        let mut target = Node::new(
            Position::new(0.0, 0.0),
            0,
            NodeKind::Text {
                content: "Other".to_string(),
                font_size: 14.0,
                font_family: "Georgia".to_string(),
                fill_color: "#ff0000".to_string(),
                width: None,
                height: None,
                alignment: Alignment::Left,
                font_style: FontStyle::default(),
                background_color: Some("#ffffff".to_string()),
            },
        );
        style.apply(&mut target);

        match &target.kind {
            NodeKind::Text {
                content,
                font_family,
                alignment,
                background_color,
                ..
            } => {
                assert_eq!(content, "Other");
                assert_eq!(font_family, "Inter");
                assert_eq!(*alignment, Alignment::Center);
                assert_eq!(*background_color, None);
            }
            NodeKind::Image { .. } => panic!("expected text node"),
        }
        assert_eq!(target.position, Position::new(0.0, 0.0));
    }

    #[test]
    fn test_style_extract_none_for_image() {
        let node = Node::new(
            Position::default(),
            0,
            NodeKind::Image {
                source_reference: "a.png".to_string(),
                size: Size::new(100.0, 100.0),
                opacity: None,
                rotation: None,
            },
        );
        assert!(TextStyle::extract(&node).is_none());
    }

    #[test]
    fn test_node_json_shape() {
        let node = text_node();
        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(value["type"], "text");
        assert!(value["fontSize"].is_number());
        assert!(value["zIndex"].is_number());
        let back: Node = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, node);
    }
}
