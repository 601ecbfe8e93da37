//! Cross-slide synchronization engine.
//!
//! Three deliberately distinct propagation operations over "node on the
//! current slide -> the rest of the deck". They differ in blast radius
//! (skip-current vs. include-current) and in whether they create nodes or
//! only restyle existing ones. Like every store mutation they never fail:
//! a stale id is a silent no-op.

use crate::{DocumentStore, NodeId, TextStyle};

impl DocumentStore {
    /// Propagate a node's styling/content to every *other* slide.
    ///
    /// Text source: its [`TextStyle`] subset is merged into every existing
    /// text node on every other slide; content and position stay untouched
    /// and slides without text nodes are unaffected - no node is created.
    ///
    /// Image source: a clone (fresh id) is inserted into each other slide
    /// unless a node with the same `source_reference` already exists there.
    pub fn apply_node_to_other_slides(&mut self, node_id: NodeId) {
        let Some(source) = self.node_on_current_slide(node_id) else {
            return;
        };

        if let Some(style) = TextStyle::extract(source) {
            let current = self.document().current_slide_index;
            let doc = self.document_mut();
            for (index, slide) in doc.slides.iter_mut().enumerate() {
                if index == current {
                    continue;
                }
                for node in slide.nodes.iter_mut().filter(|n| n.is_text()) {
                    style.apply(node);
                }
            }
        } else {
            let source = source.clone();
            let reference = source
                .source_reference()
                .map(str::to_string)
                .unwrap_or_default();
            let current = self.document().current_slide_index;
            let doc = self.document_mut();
            for (index, slide) in doc.slides.iter_mut().enumerate() {
                if index == current || slide.has_image_source(&reference) {
                    continue;
                }
                slide.nodes.push(source.clone_with_new_id());
            }
        }
        self.persist();
    }

    /// Unconditionally clone a node (fresh id, identical content, position,
    /// size, and style) onto every *other* slide. No dedup.
    pub fn copy_node_to_all_slides(&mut self, node_id: NodeId) {
        let Some(source) = self.node_on_current_slide(node_id) else {
            return;
        };
        let source = source.clone();
        let current = self.document().current_slide_index;

        let doc = self.document_mut();
        for (index, slide) in doc.slides.iter_mut().enumerate() {
            if index == current {
                continue;
            }
            slide.nodes.push(source.clone_with_new_id());
        }
        self.persist();
    }

    /// Broadcast a text node's [`TextStyle`] subset to every text node on
    /// every slide, *including* the current one. Content and position stay
    /// untouched everywhere. No-op when the source is not a text node.
    pub fn apply_text_styling_to_all_slides(&mut self, node_id: NodeId) {
        let Some(style) = self
            .node_on_current_slide(node_id)
            .and_then(TextStyle::extract)
        else {
            return;
        };

        for slide in &mut self.document_mut().slides {
            for node in slide.nodes.iter_mut().filter(|n| n.is_text()) {
                style.apply(node);
            }
        }
        self.persist();
    }
}
