//! Build a deck from the template catalog and export it as a PDF.
//!
//! Run with `cargo run --example export_deck`; writes `deck.pdf` to the
//! current directory.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carousel_core::{available_templates, DocumentStore, NodePatch};
use carousel_render::{DeckMetadata, ExportConfig, ExportEvent, Exporter, FontLibrary, SvgSurface};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carousel_core=debug,carousel_render=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut store = DocumentStore::new();
    let templates = available_templates();
    for template in &templates {
        store.add_slide(Some(template));
    }

    // Personalize the title slide.
    let title_slide = store.document().slides[1].id;
    if let Some(node_id) = store
        .document()
        .slides
        .get(1)
        .and_then(|slide| slide.nodes.first())
        .map(|node| node.id)
    {
        store.update_node(
            title_slide,
            node_id,
            &NodePatch {
                content: Some("Shipping the carousel editor".to_string()),
                ..NodePatch::default()
            },
        );
    }

    let surface = SvgSurface::new(FontLibrary::with_system_fonts());
    let mut exporter = Exporter::new(surface, ExportConfig::default());
    let mut events = exporter.subscribe();

    let watcher = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ExportEvent::Started { kind } => tracing::info!("Export started: {kind}"),
                ExportEvent::Progress {
                    completed,
                    total,
                    percent,
                } => tracing::info!("Captured slide {completed}/{total} ({percent}%)"),
                ExportEvent::Finished { outcome } => {
                    tracing::info!("Export finished: {outcome:?}");
                    break;
                }
            }
        }
    });

    let artifact = exporter
        .export_document(
            &mut store,
            DeckMetadata {
                title: "Carousel demo deck".to_string(),
                ..DeckMetadata::default()
            },
        )
        .await?;

    watcher.await?;
    std::fs::write("deck.pdf", &artifact.pdf)?;
    tracing::info!(
        "Wrote deck.pdf: {} pages, {} bytes",
        artifact.page_count,
        artifact.pdf.len()
    );
    Ok(())
}
