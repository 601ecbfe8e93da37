//! Read-only catalog of slide presets.
//!
//! Templates describe a background and a set of id-less node blueprints.
//! Instantiation always mints fresh ids; the catalog itself never changes.

use serde::{Deserialize, Serialize};

use crate::{Alignment, FontStyle, Node, NodeKind, Position, Size};

/// 1x1 PNG standing in until the user drops a real image onto the slide.
const PLACEHOLDER_IMAGE: &str = "data:image/png;base64,\
iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

/// A node descriptor without identity. Z-index values are relative hints;
/// templates place text above images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeBlueprint {
    /// Initial position.
    pub position: Position,
    /// Relative paint-order hint.
    pub z_index: i32,
    /// Content the instantiated node will carry.
    pub kind: NodeKind,
}

impl NodeBlueprint {
    /// Materialize a node with a fresh id.
    #[must_use]
    pub fn instantiate(&self) -> Node {
        Node::new(self.position, self.z_index, self.kind.clone())
    }
}

/// A named slide preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideTemplate {
    /// Display name shown in the template picker.
    pub name: String,
    /// Slide background fill as hex.
    pub background_color: String,
    /// Id-less node descriptors.
    pub nodes: Vec<NodeBlueprint>,
}

fn text_blueprint(
    content: &str,
    position: Position,
    font_size: f64,
    alignment: Alignment,
    font_style: FontStyle,
    z_index: i32,
) -> NodeBlueprint {
    NodeBlueprint {
        position,
        z_index,
        kind: NodeKind::Text {
            content: content.to_string(),
            font_size,
            font_family: "Inter".to_string(),
            fill_color: "#1a1a2e".to_string(),
            width: Some(880.0),
            height: None,
            alignment,
            font_style,
            background_color: None,
        },
    }
}

fn image_blueprint(position: Position, size: Size, z_index: i32) -> NodeBlueprint {
    NodeBlueprint {
        position,
        z_index,
        kind: NodeKind::Image {
            source_reference: PLACEHOLDER_IMAGE.to_string(),
            size,
            opacity: None,
            rotation: None,
        },
    }
}

/// The available template catalog. Returned by value; callers may not
/// mutate the catalog through it.
#[must_use]
pub fn available_templates() -> Vec<SlideTemplate> {
    let bold = FontStyle {
        bold: true,
        ..FontStyle::default()
    };
    let italic = FontStyle {
        italic: true,
        ..FontStyle::default()
    };

    vec![
        SlideTemplate {
            name: "Title".to_string(),
            background_color: "#f7f3ee".to_string(),
            nodes: vec![
                text_blueprint(
                    "Your headline here",
                    Position::new(100.0, 380.0),
                    72.0,
                    Alignment::Center,
                    bold,
                    2,
                ),
                text_blueprint(
                    "A short supporting line",
                    Position::new(100.0, 520.0),
                    36.0,
                    Alignment::Center,
                    FontStyle::default(),
                    1,
                ),
            ],
        },
        SlideTemplate {
            name: "Quote".to_string(),
            background_color: "#1a1a2e".to_string(),
            nodes: vec![
                text_blueprint(
                    "\u{201c}Write the quote here.\u{201d}",
                    Position::new(100.0, 400.0),
                    48.0,
                    Alignment::Center,
                    italic,
                    2,
                ),
                text_blueprint(
                    "\u{2014} Attribution",
                    Position::new(100.0, 600.0),
                    28.0,
                    Alignment::Center,
                    FontStyle::default(),
                    1,
                ),
            ],
        },
        SlideTemplate {
            name: "List".to_string(),
            background_color: "#ffffff".to_string(),
            nodes: vec![
                text_blueprint(
                    "Three things to know",
                    Position::new(100.0, 120.0),
                    54.0,
                    Alignment::Left,
                    bold,
                    3,
                ),
                text_blueprint(
                    "1. First point\n2. Second point\n3. Third point",
                    Position::new(100.0, 320.0),
                    36.0,
                    Alignment::Left,
                    FontStyle::default(),
                    2,
                ),
            ],
        },
        SlideTemplate {
            name: "Feature".to_string(),
            background_color: "#eef2f7".to_string(),
            nodes: vec![
                image_blueprint(Position::new(100.0, 280.0), Size::new(880.0, 560.0), 0),
                text_blueprint(
                    "Show the feature",
                    Position::new(100.0, 120.0),
                    54.0,
                    Alignment::Left,
                    bold,
                    2,
                ),
                text_blueprint(
                    "One line on why it matters",
                    Position::new(100.0, 900.0),
                    32.0,
                    Alignment::Left,
                    FontStyle::default(),
                    1,
                ),
            ],
        },
    ]
}
