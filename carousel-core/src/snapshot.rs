//! Durable snapshot serialization.
//!
//! The persisted shape is `{format, slides, canvasSize, currentIndex}`.
//! Loading dispatches on the `format` discriminant: the current `"nodes"`
//! shape parses directly; a payload without a discriminant is treated as the
//! legacy shape (separate per-kind `texts`/`images`/`pdfs` arrays on each
//! slide) and converted, assigning ids where missing; anything else fails
//! closed to a single blank slide at index 0.

use serde::{Deserialize, Serialize};

use crate::{
    Alignment, CanvasPreset, CoreResult, Document, FontStyle, Node, NodeId, NodeKind, Position,
    Size, Slide, SlideId, DEFAULT_BACKGROUND,
};

/// Discriminant value written by the current snapshot shape.
pub const SNAPSHOT_FORMAT: &str = "nodes";

/// The serialized document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// Shape discriminant; always [`SNAPSHOT_FORMAT`] for this version.
    pub format: String,
    /// Ordered slide payloads.
    pub slides: Vec<Slide>,
    /// Active canvas dimensions in pixels.
    pub canvas_size: Size,
    /// Index of the focused slide.
    pub current_index: usize,
}

impl From<&Document> for DocumentSnapshot {
    fn from(document: &Document) -> Self {
        Self {
            format: SNAPSHOT_FORMAT.to_string(),
            slides: document.slides.clone(),
            canvas_size: document.canvas_preset.size(),
            current_index: document.current_slide_index,
        }
    }
}

impl DocumentSnapshot {
    /// Rebuild a runtime document, re-establishing the invariants: at least
    /// one slide, a valid focus index, no selection.
    #[must_use]
    pub fn into_document(self) -> Document {
        let mut slides = self.slides;
        if slides.is_empty() {
            slides.push(Slide::blank());
        }
        let current_slide_index = self.current_index.min(slides.len() - 1);
        Document {
            slides,
            current_slide_index,
            selected_node_id: None,
            canvas_preset: CanvasPreset::from_size(self.canvas_size).unwrap_or_default(),
        }
    }
}

/// Serialize a document to its snapshot JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(document: &Document) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(&DocumentSnapshot::from(
        document,
    ))?)
}

/// Deserialize a snapshot, never failing: absent, malformed, or
/// unrecognized payloads fall back to one blank slide at index 0.
#[must_use]
pub fn decode(json: &str) -> Document {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
        tracing::warn!("Snapshot is not valid JSON, falling back to blank document");
        return Document::blank();
    };

    match value.get("format").and_then(serde_json::Value::as_str) {
        Some(SNAPSHOT_FORMAT) => serde_json::from_value::<DocumentSnapshot>(value).map_or_else(
            |e| {
                tracing::warn!("Malformed snapshot, falling back: {e}");
                Document::blank()
            },
            DocumentSnapshot::into_document,
        ),
        Some(other) => {
            tracing::warn!("Unrecognized snapshot format {other:?}, falling back");
            Document::blank()
        }
        None => serde_json::from_value::<LegacySnapshot>(value).map_or_else(
            |e| {
                tracing::warn!("Malformed legacy snapshot, falling back: {e}");
                Document::blank()
            },
            LegacySnapshot::into_document,
        ),
    }
}

// ---------------------------------------------------------------------------
// Legacy shape
// ---------------------------------------------------------------------------

/// Pre-unification snapshot: per-kind arrays instead of one node list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySnapshot {
    slides: Vec<LegacySlide>,
    canvas_size: Option<Size>,
    #[serde(default)]
    current_index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySlide {
    #[serde(default)]
    background_color: Option<String>,
    #[serde(default)]
    background_image: Option<String>,
    #[serde(default)]
    texts: Vec<LegacyText>,
    #[serde(default)]
    images: Vec<LegacyImage>,
    #[serde(default)]
    pdfs: Vec<LegacyPdfPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyText {
    #[serde(default)]
    id: Option<String>,
    content: String,
    x: f64,
    y: f64,
    #[serde(default = "default_font_size")]
    font_size: f64,
    #[serde(default = "default_font_family")]
    font_family: String,
    #[serde(default = "default_fill")]
    fill: String,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    align: Alignment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyImage {
    #[serde(default)]
    id: Option<String>,
    src: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    opacity: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPdfPage {
    src: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn default_font_size() -> f64 {
    24.0
}

fn default_font_family() -> String {
    "Inter".to_string()
}

fn default_fill() -> String {
    "#000000".to_string()
}

/// Reuse a legacy id when it parses, otherwise assign a fresh one.
fn legacy_node_id(id: Option<&str>) -> NodeId {
    id.and_then(|s| NodeId::parse(s).ok())
        .unwrap_or_else(NodeId::new)
}

impl LegacySnapshot {
    fn into_document(self) -> Document {
        let slides: Vec<Slide> = self.slides.into_iter().map(LegacySlide::unify).collect();
        DocumentSnapshot {
            format: SNAPSHOT_FORMAT.to_string(),
            slides,
            canvas_size: self
                .canvas_size
                .unwrap_or_else(|| CanvasPreset::default().size()),
            current_index: self.current_index,
        }
        .into_document()
    }
}

impl LegacySlide {
    /// Fold the per-kind arrays into one node list. Imported pdf pages and
    /// plain images sit at z 0, text at z 1; list order keeps text on top.
    fn unify(self) -> Slide {
        let mut nodes = Vec::new();

        for page in self.pdfs {
            nodes.push(Node {
                id: NodeId::new(),
                position: Position::new(page.x, page.y),
                draggable: true,
                z_index: 0,
                kind: NodeKind::Image {
                    source_reference: page.src,
                    size: Size::new(page.width, page.height),
                    opacity: None,
                    rotation: None,
                },
            });
        }

        for image in self.images {
            nodes.push(Node {
                id: legacy_node_id(image.id.as_deref()),
                position: Position::new(image.x, image.y),
                draggable: true,
                z_index: 0,
                kind: NodeKind::Image {
                    source_reference: image.src,
                    size: Size::new(image.width, image.height),
                    opacity: image.opacity,
                    rotation: None,
                },
            });
        }

        for text in self.texts {
            nodes.push(Node {
                id: legacy_node_id(text.id.as_deref()),
                position: Position::new(text.x, text.y),
                draggable: true,
                z_index: 1,
                kind: NodeKind::Text {
                    content: text.content,
                    font_size: text.font_size,
                    font_family: text.font_family,
                    fill_color: text.fill,
                    width: text.width,
                    height: text.height,
                    alignment: text.align,
                    font_style: FontStyle::default(),
                    background_color: None,
                },
            });
        }

        Slide {
            id: SlideId::new(),
            background_color: self
                .background_color
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
            background_image: self.background_image,
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::available_templates;

    #[test]
    fn test_round_trip_is_deep_equal() {
        let mut document = Document::blank();
        let templates = available_templates();
        document.slides.push(Slide::from_template(&templates[0]));
        document.slides.push(Slide::from_template(&templates[2]));
        document.current_slide_index = 2;
        document.canvas_preset = CanvasPreset::Portrait;

        let json = encode(&document).expect("encode");
        let back = decode(&json);

        assert_eq!(back, document);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let doc = decode("{not json");
        assert_eq!(doc.slide_count(), 1);
        assert_eq!(doc.current_slide_index, 0);
        assert!(doc.slides[0].nodes.is_empty());
        assert!(doc.selected_node_id.is_none());
    }

    #[test]
    fn test_unrecognized_format_fails_closed() {
        let doc = decode(r#"{"format": "v99", "slides": []}"#);
        assert_eq!(doc.slide_count(), 1);
        assert_eq!(doc.current_slide_index, 0);
        assert!(doc.slides[0].nodes.is_empty());
    }

    #[test]
    fn test_empty_slides_backfilled() {
        let json = r#"{
            "format": "nodes",
            "slides": [],
            "canvasSize": {"width": 1080.0, "height": 1080.0},
            "currentIndex": 3
        }"#;
        let doc = decode(json);
        assert_eq!(doc.slide_count(), 1);
        assert_eq!(doc.current_slide_index, 0);
    }

    #[test]
    fn test_out_of_range_index_clamped() {
        let mut document = Document::blank();
        document.slides.push(Slide::blank());
        let mut snapshot = DocumentSnapshot::from(&document);
        snapshot.current_index = 99;
        let doc = snapshot.into_document();
        assert_eq!(doc.current_slide_index, 1);
    }

    #[test]
    fn test_legacy_shape_converted() {
        let json = r##"{
            "slides": [
                {
                    "backgroundColor": "#fafafa",
                    "texts": [
                        {"content": "Legacy title", "x": 50.0, "y": 80.0, "fontSize": 40.0}
                    ],
                    "images": [
                        {"src": "hero.png", "x": 0.0, "y": 200.0, "width": 500.0, "height": 400.0}
                    ],
                    "pdfs": [
                        {"src": "page-1.png", "x": 0.0, "y": 0.0, "width": 1080.0, "height": 1080.0}
                    ]
                },
                {"texts": [], "images": []}
            ],
            "canvasSize": {"width": 1080.0, "height": 1350.0},
            "currentIndex": 1
        }"##;

        let doc = decode(json);
        assert_eq!(doc.slide_count(), 2);
        assert_eq!(doc.current_slide_index, 1);
        assert_eq!(doc.canvas_preset, CanvasPreset::Portrait);

        let slide = &doc.slides[0];
        assert_eq!(slide.background_color, "#fafafa");
        assert_eq!(slide.nodes.len(), 3);
        // pdf page and image converted to image nodes, text on top.
        assert!(slide.has_image_source("page-1.png"));
        assert!(slide.has_image_source("hero.png"));
        let top = slide.painter_order().last().copied().expect("top node");
        match &top.kind {
            NodeKind::Text { content, .. } => assert_eq!(content, "Legacy title"),
            NodeKind::Image { .. } => panic!("expected text on top"),
        }
    }

    #[test]
    fn test_legacy_missing_ids_assigned_unique() {
        let json = r#"{
            "slides": [{
                "texts": [
                    {"content": "a", "x": 0.0, "y": 0.0},
                    {"content": "b", "x": 0.0, "y": 50.0}
                ]
            }]
        }"#;
        let doc = decode(json);
        let ids: Vec<NodeId> = doc.slides[0].nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }
}
