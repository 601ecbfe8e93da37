//! Integration tests for snapshot persistence through the document store.

use carousel_core::{
    available_templates, BackgroundUpdate, DocumentStore, NodeBlueprint, NodeKind, Position, Size,
    SNAPSHOT_FILE,
};

fn image_blueprint(source: &str) -> NodeBlueprint {
    NodeBlueprint {
        position: Position::new(20.0, 30.0),
        z_index: 2,
        kind: NodeKind::Image {
            source_reference: source.to_string(),
            size: Size::new(640.0, 480.0),
            opacity: Some(0.8),
            rotation: Some(12.5),
        },
    }
}

#[test]
fn test_mutations_auto_persist_and_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = DocumentStore::with_data_dir(dir.path()).expect("store");

    let templates = available_templates();
    store.add_slide(Some(&templates[0]));
    let slide_id = store.document().current_slide().id;
    store.add_node(slide_id, &image_blueprint("hero.png"));
    store.update_slide_background(slide_id, "#222244", BackgroundUpdate::Keep);
    store.toggle_canvas_size();

    let path = dir.path().join(SNAPSHOT_FILE);
    assert!(path.exists(), "snapshot written on mutation");

    let reloaded = DocumentStore::with_data_dir(dir.path()).expect("reload");
    let original = store.document();
    let restored = reloaded.document();

    assert_eq!(restored.slides, original.slides);
    assert_eq!(restored.current_slide_index, original.current_slide_index);
    assert_eq!(restored.canvas_preset, original.canvas_preset);
    // Selection is editor-session state and is not persisted.
    assert!(restored.selected_node_id.is_none());
}

#[test]
fn test_corrupt_snapshot_falls_back_to_blank() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(SNAPSHOT_FILE), b"\x00garbage").expect("write");

    let store = DocumentStore::with_data_dir(dir.path()).expect("store");
    let doc = store.document();
    assert_eq!(doc.slide_count(), 1);
    assert_eq!(doc.current_slide_index, 0);
    assert!(doc.slides[0].nodes.is_empty());
}

#[test]
fn test_sync_operations_persist() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = DocumentStore::with_data_dir(dir.path()).expect("store");

    store.add_slide(None);
    let first = store.document().slides[0].id;
    store.add_node(first, &image_blueprint("logo.png"));
    store.set_current_slide(0);
    let node_id = store.document().slides[0].nodes[0].id;

    store.copy_node_to_all_slides(node_id);

    let reloaded = DocumentStore::with_data_dir(dir.path()).expect("reload");
    assert_eq!(reloaded.document().slides[1].nodes.len(), 1);
    assert!(reloaded.document().slides[1].has_image_source("logo.png"));
}
