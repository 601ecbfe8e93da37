//! Single-writer document store.
//!
//! All editing flows through these operations. They are synchronous, atomic
//! from the caller's perspective, and never fail: operating on a stale slide
//! or node id is a silent no-op, expected under concurrent UI interaction.
//! Every mutation writes a best-effort snapshot when a data directory is
//! configured; a failed write is logged and never rolls back the in-memory
//! change.

use std::path::PathBuf;

use crate::snapshot;
use crate::template::SlideTemplate;
use crate::{CoreResult, Document, Node, NodeBlueprint, NodeId, NodePatch, Slide, SlideId};

/// File name of the persisted snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "carousel.json";

/// How to treat a slide's background image in
/// [`DocumentStore::update_slide_background`]. The three-way split keeps
/// "explicitly cleared" distinguishable from "not supplied".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackgroundUpdate {
    /// Leave the current background image untouched.
    #[default]
    Keep,
    /// Remove the background image.
    Clear,
    /// Replace the background image.
    Set(String),
}

/// Owns the document and is its only writer.
#[derive(Debug)]
pub struct DocumentStore {
    document: Document,
    /// Optional data directory for snapshot persistence.
    data_dir: Option<PathBuf>,
}

impl DocumentStore {
    /// Create a store with one blank slide and no persistence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: Document::blank(),
            data_dir: None,
        }
    }

    /// Create a store with snapshot persistence.
    ///
    /// An existing snapshot in `data_dir` is loaded; an absent or malformed
    /// one falls back silently to a single blank slide. The directory is
    /// created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> CoreResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let path = data_dir.join(SNAPSHOT_FILE);
        let document = match std::fs::read_to_string(&path) {
            Ok(json) => snapshot::decode(&json),
            Err(_) => Document::blank(),
        };

        Ok(Self {
            document,
            data_dir: Some(data_dir),
        })
    }

    /// Read access to the document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    // -----------------------------------------------------------------------
    // Slide operations
    // -----------------------------------------------------------------------

    /// Append a slide and focus it. With a template, the slide is
    /// instantiated with fresh ids and all nodes forced draggable.
    pub fn add_slide(&mut self, template: Option<&SlideTemplate>) {
        let slide = template.map_or_else(Slide::blank, Slide::from_template);
        self.document.slides.push(slide);
        self.focus(self.document.slides.len() - 1);
        self.persist();
    }

    /// Remove a slide by id. Removing the last slide substitutes exactly one
    /// fresh blank slide at index 0.
    ///
    /// The selection is cleared only when the focused slide itself is
    /// removed; a pure index shift (removing a slide before the focus)
    /// keeps both the focused slide and its selected node.
    pub fn remove_slide(&mut self, id: SlideId) {
        let Some(index) = self.document.slide_index(id) else {
            return;
        };
        if self.document.current_slide_index == index {
            self.document.selected_node_id = None;
        }
        self.document.slides.remove(index);

        if self.document.slides.is_empty() {
            self.document.slides.push(Slide::blank());
            self.document.current_slide_index = 0;
        } else {
            let current = self.document.current_slide_index;
            self.document.current_slide_index = if current >= index && current > 0 {
                current - 1
            } else {
                // Still clamp: removing below the focus can leave it past the end.
                current.min(self.document.slides.len() - 1)
            };
        }
        self.persist();
    }

    /// Deep-clone a slide (new slide id, new node ids), insert the clone
    /// immediately after the source, and focus it.
    pub fn duplicate_slide(&mut self, id: SlideId) {
        let Some(index) = self.document.slide_index(id) else {
            return;
        };
        let copy = self.document.slides[index].duplicate();
        self.document.slides.insert(index + 1, copy);
        self.focus(index + 1);
        self.persist();
    }

    /// Move one slide from `src` to `dst`, keeping the same logical slide
    /// focused: the moved slide follows to `dst`, slides strictly between
    /// the two indexes shift by one, all others are unaffected.
    pub fn reorder_slides(&mut self, src: usize, dst: usize) {
        let len = self.document.slides.len();
        if src >= len || dst >= len || src == dst {
            return;
        }

        let slide = self.document.slides.remove(src);
        self.document.slides.insert(dst, slide);

        let current = self.document.current_slide_index;
        let focused = if current == src {
            dst
        } else if src < current && current <= dst {
            current - 1
        } else if dst <= current && current < src {
            current + 1
        } else {
            current
        };
        self.document.current_slide_index = focused;
        self.persist();
    }

    /// Set a slide's background color, and optionally clear or replace its
    /// background image.
    pub fn update_slide_background(&mut self, id: SlideId, color: &str, image: BackgroundUpdate) {
        let Some(index) = self.document.slide_index(id) else {
            return;
        };
        let slide = &mut self.document.slides[index];
        slide.background_color = color.to_string();
        match image {
            BackgroundUpdate::Keep => {}
            BackgroundUpdate::Clear => slide.background_image = None,
            BackgroundUpdate::Set(src) => slide.background_image = Some(src),
        }
        self.persist();
    }

    /// Set every slide's background color.
    pub fn update_all_slides_background(&mut self, color: &str) {
        for slide in &mut self.document.slides {
            slide.background_color = color.to_string();
        }
        self.persist();
    }

    /// Replace every slide's background image, leaving each slide's own
    /// color untouched. `None` clears the image everywhere.
    pub fn update_all_slides_background_image(&mut self, image: Option<&str>) {
        for slide in &mut self.document.slides {
            slide.background_image = image.map(str::to_string);
        }
        self.persist();
    }

    /// Focus a slide by index. Out-of-range indexes are ignored. Changing
    /// focus clears the node selection.
    pub fn set_current_slide(&mut self, index: usize) {
        if index >= self.document.slides.len() {
            return;
        }
        self.focus(index);
        self.persist();
    }

    // -----------------------------------------------------------------------
    // Node operations
    // -----------------------------------------------------------------------

    /// Materialize a blueprint on a slide: fresh id, forced draggable,
    /// appended, selected. Selecting implies focusing the slide.
    pub fn add_node(&mut self, slide_id: SlideId, blueprint: &NodeBlueprint) {
        let Some(index) = self.document.slide_index(slide_id) else {
            return;
        };
        let mut node = blueprint.instantiate();
        node.draggable = true;
        let node_id = node.id;

        self.focus(index);
        self.document.slides[index].nodes.push(node);
        self.document.selected_node_id = Some(node_id);
        self.persist();
    }

    /// Merge a sparse update into a node. A stale slide or node id is a
    /// no-op, surfaced only at debug level.
    pub fn update_node(&mut self, slide_id: SlideId, node_id: NodeId, patch: &NodePatch) {
        let Some(index) = self.document.slide_index(slide_id) else {
            tracing::debug!(%slide_id, "update_node on unknown slide");
            return;
        };
        let Some(node) = self.document.slides[index].node_mut(node_id) else {
            tracing::debug!(%slide_id, %node_id, "update_node on unknown node");
            return;
        };
        node.apply_patch(patch);
        self.persist();
    }

    /// Remove a node by id, clearing the selection if it was selected.
    pub fn remove_node(&mut self, slide_id: SlideId, node_id: NodeId) {
        let Some(index) = self.document.slide_index(slide_id) else {
            return;
        };
        let slide = &mut self.document.slides[index];
        let before = slide.nodes.len();
        slide.nodes.retain(|n| n.id != node_id);
        if slide.nodes.len() == before {
            return;
        }
        if self.document.selected_node_id == Some(node_id) {
            self.document.selected_node_id = None;
        }
        self.persist();
    }

    /// Select a node on the current slide, or clear the selection with
    /// `None`. Selecting an id absent from the current slide is a no-op.
    pub fn select_node(&mut self, node_id: Option<NodeId>) {
        match node_id {
            Some(id) => {
                if self.document.current_slide().node(id).is_some() {
                    self.document.selected_node_id = Some(id);
                }
            }
            None => self.document.selected_node_id = None,
        }
    }

    // -----------------------------------------------------------------------
    // Canvas
    // -----------------------------------------------------------------------

    /// Flip between the two supported canvas presets. Node positions and
    /// sizes are deliberately not rescaled; each preset keeps its layout.
    pub fn toggle_canvas_size(&mut self) {
        self.document.canvas_preset = self.document.canvas_preset.toggled();
        self.persist();
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Focus a slide, clearing the selection when the focus actually moves.
    fn focus(&mut self, index: usize) {
        if self.document.current_slide_index != index {
            self.document.selected_node_id = None;
        }
        self.document.current_slide_index = index;
    }

    /// Write the current snapshot to disk, best-effort.
    ///
    /// No-op if the store was created without a data directory. A write
    /// failure (e.g. quota) is logged and never interrupts the mutation
    /// that triggered it.
    pub(crate) fn persist(&self) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let json = match snapshot::encode(&self.document) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize snapshot: {e}");
                return;
            }
        };
        let path = data_dir.join(SNAPSHOT_FILE);
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!("Failed to persist snapshot to {}: {e}", path.display());
        }
    }

    /// Access a node for tests and synchronization internals.
    #[must_use]
    pub(crate) fn node_on_current_slide(&self, node_id: NodeId) -> Option<&Node> {
        self.document.current_slide().node(node_id)
    }

    /// Mutable document access for the synchronization engine. Kept crate
    /// private so the store stays the single writer.
    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{available_templates, NodeKind, Position, Size};

    fn text_blueprint(content: &str) -> NodeBlueprint {
        NodeBlueprint {
            position: Position::new(10.0, 10.0),
            z_index: 0,
            kind: NodeKind::Text {
                content: content.to_string(),
                font_size: 24.0,
                font_family: "Inter".to_string(),
                fill_color: "#000000".to_string(),
                width: None,
                height: None,
                alignment: crate::Alignment::Left,
                font_style: crate::FontStyle::default(),
                background_color: None,
            },
        }
    }

    fn image_blueprint(source: &str) -> NodeBlueprint {
        NodeBlueprint {
            position: Position::new(0.0, 0.0),
            z_index: 0,
            kind: NodeKind::Image {
                source_reference: source.to_string(),
                size: Size::new(200.0, 200.0),
                opacity: None,
                rotation: None,
            },
        }
    }

    #[test]
    fn test_add_slide_focuses_new_slide() {
        let mut store = DocumentStore::new();
        store.add_slide(None);
        assert_eq!(store.document().slide_count(), 2);
        assert_eq!(store.document().current_slide_index, 1);
    }

    #[test]
    fn test_add_slide_from_template() {
        let mut store = DocumentStore::new();
        let templates = available_templates();
        store.add_slide(Some(&templates[0]));

        let slide = store.document().current_slide();
        assert!(!slide.nodes.is_empty());
        assert!(slide.nodes.iter().all(|n| n.draggable));
    }

    #[test]
    fn test_remove_last_slide_backfills_blank() {
        let mut store = DocumentStore::new();
        let id = store.document().slides[0].id;
        store.remove_slide(id);

        assert_eq!(store.document().slide_count(), 1);
        assert_eq!(store.document().current_slide_index, 0);
        assert_ne!(store.document().slides[0].id, id);
        assert!(store.document().slides[0].nodes.is_empty());
    }

    #[test]
    fn test_remove_slide_adjusts_focus() {
        let mut store = DocumentStore::new();
        store.add_slide(None);
        store.add_slide(None);
        // Focused on slide 2; remove slide 0.
        let first = store.document().slides[0].id;
        store.remove_slide(first);
        assert_eq!(store.document().slide_count(), 2);
        assert_eq!(store.document().current_slide_index, 1);
    }

    #[test]
    fn test_remove_slide_before_focus_keeps_selection() {
        let mut store = DocumentStore::new();
        store.add_slide(None);
        let focused = store.document().slides[1].id;
        store.add_node(focused, &text_blueprint("kept"));
        let selected = store.document().selected_node_id;
        assert!(selected.is_some());

        // Removing a slide before the focus only shifts the index; the
        // focused slide and its selection are untouched.
        let first = store.document().slides[0].id;
        store.remove_slide(first);

        let doc = store.document();
        assert_eq!(doc.current_slide_index, 0);
        assert_eq!(doc.slides[0].id, focused);
        assert_eq!(doc.selected_node_id, selected);
    }

    #[test]
    fn test_remove_focused_slide_clears_selection() {
        let mut store = DocumentStore::new();
        store.add_slide(None);
        let focused = store.document().slides[1].id;
        store.add_node(focused, &text_blueprint("gone"));
        assert!(store.document().selected_node_id.is_some());

        store.remove_slide(focused);

        assert!(store.document().selected_node_id.is_none());
        assert_eq!(store.document().current_slide_index, 0);
    }

    #[test]
    fn test_slide_invariants_hold_under_mutation_sequences() {
        let mut store = DocumentStore::new();
        for round in 0..20 {
            if round % 3 == 0 {
                store.add_slide(None);
            } else {
                let doc = store.document();
                let victim = doc.slides[round % doc.slide_count()].id;
                store.remove_slide(victim);
            }
            let doc = store.document();
            assert!(doc.slide_count() >= 1);
            assert!(doc.current_slide_index < doc.slide_count());
        }
    }

    #[test]
    fn test_duplicate_slide_inserts_after_source() {
        let mut store = DocumentStore::new();
        let first = store.document().slides[0].id;
        store.add_node(first, &text_blueprint("original"));
        store.duplicate_slide(first);

        let doc = store.document();
        assert_eq!(doc.slide_count(), 2);
        assert_eq!(doc.current_slide_index, 1);
        assert_ne!(doc.slides[1].id, first);
        assert_eq!(doc.slides[1].nodes.len(), 1);
        assert_ne!(doc.slides[1].nodes[0].id, doc.slides[0].nodes[0].id);
    }

    #[test]
    fn test_reorder_keeps_logical_focus() {
        let mut store = DocumentStore::new();
        store.add_slide(None);
        store.add_slide(None);
        store.add_slide(None);
        // Slides [A, B, C, D]; focus B.
        store.set_current_slide(1);
        let focused = store.document().slides[1].id;

        store.reorder_slides(0, 2);

        let doc = store.document();
        assert_eq!(doc.current_slide_index, 0);
        assert_eq!(doc.slides[0].id, focused);
    }

    #[test]
    fn test_reorder_moved_slide_stays_focused() {
        let mut store = DocumentStore::new();
        store.add_slide(None);
        store.add_slide(None);
        store.set_current_slide(0);
        let moved = store.document().slides[0].id;

        store.reorder_slides(0, 2);

        let doc = store.document();
        assert_eq!(doc.current_slide_index, 2);
        assert_eq!(doc.slides[2].id, moved);
    }

    #[test]
    fn test_background_update_three_way() {
        let mut store = DocumentStore::new();
        let id = store.document().slides[0].id;

        store.update_slide_background(id, "#112233", BackgroundUpdate::Set("bg.png".to_string()));
        assert_eq!(
            store.document().slides[0].background_image.as_deref(),
            Some("bg.png")
        );

        // Not supplied: image untouched.
        store.update_slide_background(id, "#445566", BackgroundUpdate::Keep);
        assert_eq!(store.document().slides[0].background_color, "#445566");
        assert_eq!(
            store.document().slides[0].background_image.as_deref(),
            Some("bg.png")
        );

        // Explicitly cleared.
        store.update_slide_background(id, "#445566", BackgroundUpdate::Clear);
        assert!(store.document().slides[0].background_image.is_none());
    }

    #[test]
    fn test_broadcast_background_image_keeps_colors() {
        let mut store = DocumentStore::new();
        store.add_slide(None);
        let first = store.document().slides[0].id;
        store.update_slide_background(first, "#ff0000", BackgroundUpdate::Keep);

        store.update_all_slides_background_image(Some("shared.png"));

        let doc = store.document();
        assert!(doc
            .slides
            .iter()
            .all(|s| s.background_image.as_deref() == Some("shared.png")));
        assert_eq!(doc.slides[0].background_color, "#ff0000");
        assert_ne!(doc.slides[1].background_color, "#ff0000");
    }

    #[test]
    fn test_add_node_selects_it() {
        let mut store = DocumentStore::new();
        let slide_id = store.document().slides[0].id;
        store.add_node(slide_id, &text_blueprint("hi"));

        let doc = store.document();
        assert_eq!(doc.slides[0].nodes.len(), 1);
        assert_eq!(doc.selected_node_id, Some(doc.slides[0].nodes[0].id));
    }

    #[test]
    fn test_remove_selected_node_clears_selection() {
        let mut store = DocumentStore::new();
        let slide_id = store.document().slides[0].id;
        store.add_node(slide_id, &text_blueprint("hi"));
        let node_id = store.document().slides[0].nodes[0].id;

        store.remove_node(slide_id, node_id);

        assert!(store.document().slides[0].nodes.is_empty());
        assert!(store.document().selected_node_id.is_none());
    }

    #[test]
    fn test_update_node_unknown_id_is_noop() {
        let mut store = DocumentStore::new();
        let slide_id = store.document().slides[0].id;
        store.add_node(slide_id, &text_blueprint("hi"));
        let before = store.document().clone();

        store.update_node(
            slide_id,
            NodeId::new(),
            &NodePatch {
                content: Some("changed".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_update_node_identity_patch_is_idempotent() {
        let mut store = DocumentStore::new();
        let slide_id = store.document().slides[0].id;
        store.add_node(slide_id, &image_blueprint("a.png"));
        let node_id = store.document().slides[0].nodes[0].id;
        let before = store.document().clone();

        store.update_node(
            slide_id,
            node_id,
            &NodePatch {
                source_reference: Some("a.png".to_string()),
                size: Some(Size::new(200.0, 200.0)),
                ..Default::default()
            },
        );

        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_slide_change_clears_selection() {
        let mut store = DocumentStore::new();
        let slide_id = store.document().slides[0].id;
        store.add_node(slide_id, &text_blueprint("hi"));
        assert!(store.document().selected_node_id.is_some());

        store.add_slide(None);
        assert!(store.document().selected_node_id.is_none());
    }

    #[test]
    fn test_toggle_canvas_size_involution() {
        let mut store = DocumentStore::new();
        let original = store.document().canvas_preset;
        store.toggle_canvas_size();
        assert_ne!(store.document().canvas_preset, original);
        store.toggle_canvas_size();
        assert_eq!(store.document().canvas_preset, original);
    }
}
