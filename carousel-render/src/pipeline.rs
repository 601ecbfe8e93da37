//! The export pipeline.
//!
//! Drives `Idle -> Preparing -> (SelectSlide -> AwaitReady -> Capture ->
//! Encode) x N -> Assembling -> Finalizing -> Idle` over one live surface,
//! reused sequentially. Finalization is a drop guard that runs on every
//! exit - success, per-slide degradation, abort, or the export future
//! being dropped at an await point - restoring the focused slide,
//! releasing the surface, and emitting the terminal event.
//!
//! At most one export runs at a time; a second request is rejected with
//! [`ExportError::Busy`] while the first keeps the surface.

use std::time::Duration;

use carousel_core::DocumentStore;
use tokio::sync::broadcast;

use crate::error::{ExportError, ExportResult};
use crate::pdf::{assemble_pdf, DeckMetadata};
use crate::surface::{parse_hex_color, CapturedFrame, RenderSurface};
use crate::{encode_jpeg, encode_png};

/// What is being exported; decides resolution and encoding tradeoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// The current slide as one downloadable image.
    Image,
    /// The whole deck as a paginated document.
    Document,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// Tunable pipeline parameters.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Settle time between focusing a slide and sampling pixels; the
    /// dominant latency source of a multi-slide export.
    pub settle_delay: Duration,
    /// Supersampling factor for single-image export (lossless kind).
    pub image_scale: f64,
    /// Supersampling factor for document export (lossy kind).
    pub document_scale: f64,
    /// JPEG quality for document pages, `1..=100`.
    pub jpeg_quality: u8,
    /// DPI used to size PDF pages from pixel dimensions.
    pub dpi: f32,
    /// Background blended under transparent pixels when encoding lossy
    /// pages.
    pub background: [u8; 4],
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(300),
            image_scale: 3.0,
            document_scale: 2.0,
            jpeg_quality: 80,
            dpi: 96.0,
            background: [255, 255, 255, 255],
        }
    }
}

/// Terminal result of an export, as surfaced to the user. Failure carries
/// no internal detail; that is logged instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A single image was produced.
    Image {
        /// Deterministic download name, `slide-{ordinal}.png`.
        file_name: String,
    },
    /// A paginated document was produced.
    Document {
        /// Number of pages, equal to the slide count.
        slide_count: usize,
    },
    /// The export failed.
    Failed,
}

/// Events observed by the presentation layer.
///
/// `Started` tells subscribers to hide interactive chrome, selection
/// outlines, and watermarks; `Finished` is guaranteed to follow every
/// `Started`, even on failure, so the hide is always reverted.
#[derive(Debug, Clone)]
pub enum ExportEvent {
    /// An export began.
    Started {
        /// What is being exported.
        kind: ExportKind,
    },
    /// One more slide finished capture and encoding.
    Progress {
        /// Slides completed so far.
        completed: usize,
        /// Total slides in this export.
        total: usize,
        /// Completion percentage, `0..=100`.
        percent: u8,
    },
    /// The export reached its terminal state.
    Finished {
        /// Success or generic failure.
        outcome: ExportOutcome,
    },
}

/// A downloadable single-slide raster.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    /// Deterministic file name from the slide ordinal.
    pub file_name: String,
    /// Lossless PNG bytes.
    pub png: Vec<u8>,
}

/// A paginated whole-deck document.
#[derive(Debug, Clone)]
pub struct DocumentArtifact {
    /// PDF bytes, one page per slide in original order.
    pub pdf: Vec<u8>,
    /// Title/creator/subject triple for the save API.
    pub metadata: DeckMetadata,
    /// Number of pages.
    pub page_count: usize,
}

/// Orchestrates capture, encoding, and assembly over one surface.
pub struct Exporter<S: RenderSurface> {
    surface: S,
    config: ExportConfig,
    events: broadcast::Sender<ExportEvent>,
    busy: bool,
}

impl<S: RenderSurface> Exporter<S> {
    /// Create an exporter owning the given surface.
    #[must_use]
    pub fn new(surface: S, config: ExportConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            surface,
            config,
            events,
            busy: false,
        }
    }

    /// Subscribe to export lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ExportEvent> {
        self.events.subscribe()
    }

    /// Whether an export is currently running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Export the current slide as a lossless PNG.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Busy`] if an export is already running, or
    /// the underlying failure after finalization has run. Capture failure
    /// for a single-slide export aborts rather than degrading.
    pub async fn export_slide_image(
        &mut self,
        store: &mut DocumentStore,
    ) -> ExportResult<ImageArtifact> {
        if self.busy {
            return Err(ExportError::Busy);
        }
        self.busy = true;
        let _ = self.events.send(ExportEvent::Started {
            kind: ExportKind::Image,
        });
        let saved_index = store.document().current_slide_index;

        let mut run = ExportRun {
            exporter: self,
            store,
            saved_index,
            outcome: None,
        };
        let result = run.capture_image().await;
        if let Ok(artifact) = &result {
            run.outcome = Some(ExportOutcome::Image {
                file_name: artifact.file_name.clone(),
            });
        }
        result
    }

    /// Export the whole deck as a paginated PDF, one page per slide in
    /// original order.
    ///
    /// A single slide's capture failure is logged and that page degrades
    /// to a background-colored blank; the page count never changes. Only
    /// surface acquisition or assembly failure aborts the export.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Busy`] if an export is already running, or
    /// the aborting failure after finalization has run.
    pub async fn export_document(
        &mut self,
        store: &mut DocumentStore,
        metadata: DeckMetadata,
    ) -> ExportResult<DocumentArtifact> {
        if self.busy {
            return Err(ExportError::Busy);
        }
        self.busy = true;
        let _ = self.events.send(ExportEvent::Started {
            kind: ExportKind::Document,
        });
        let saved_index = store.document().current_slide_index;

        let mut run = ExportRun {
            exporter: self,
            store,
            saved_index,
            outcome: None,
        };
        let result = run.capture_document(metadata).await;
        if let Ok(artifact) = &result {
            run.outcome = Some(ExportOutcome::Document {
                slide_count: artifact.page_count,
            });
        }
        result
    }
}

/// An in-flight export. Finalization lives in `Drop`, so every exit -
/// success, abort, or the whole future being dropped mid-await - releases
/// the surface, restores the pre-export focus, clears the busy flag, and
/// emits the terminal event.
struct ExportRun<'a, S: RenderSurface> {
    exporter: &'a mut Exporter<S>,
    store: &'a mut DocumentStore,
    saved_index: usize,
    /// Set by the caller on success; `None` at drop time means failure.
    outcome: Option<ExportOutcome>,
}

impl<S: RenderSurface> ExportRun<'_, S> {
    async fn capture_image(&mut self) -> ExportResult<ImageArtifact> {
        self.exporter.surface.acquire()?;
        if let Err(e) = self.exporter.surface.wait_ready().await {
            tracing::warn!("Resources degraded before capture: {e}");
        }
        tokio::time::sleep(self.exporter.config.settle_delay).await;

        let ordinal = self.store.document().current_slide_index + 1;
        let frame = self
            .exporter
            .surface
            .capture(self.store.document(), self.exporter.config.image_scale)?;
        let png = encode_png(&frame)?;

        Ok(ImageArtifact {
            file_name: format!("slide-{ordinal}.png"),
            png,
        })
    }

    async fn capture_document(&mut self, metadata: DeckMetadata) -> ExportResult<DocumentArtifact> {
        self.exporter.surface.acquire()?;

        let total = self.store.document().slide_count();
        let canvas = self.store.document().canvas_preset.size();
        let mut pages = Vec::with_capacity(total);

        for index in 0..total {
            self.store.set_current_slide(index);

            if let Err(e) = self.exporter.surface.wait_ready().await {
                tracing::warn!("Resources degraded before capturing slide {index}: {e}");
            }
            tokio::time::sleep(self.exporter.config.settle_delay).await;

            let frame = match self
                .exporter
                .surface
                .capture(self.store.document(), self.exporter.config.document_scale)
            {
                Ok(frame) => frame,
                Err(e) => {
                    // Skip-and-continue: the page count must not change.
                    tracing::warn!("Capture failed for slide {}, degrading page: {e}", index + 1);
                    degraded_frame(self.store, canvas, self.exporter.config.document_scale)
                }
            };
            pages.push(encode_jpeg(
                &frame,
                self.exporter.config.jpeg_quality,
                self.exporter.config.background,
            )?);

            let completed = index + 1;
            let _ = self.exporter.events.send(ExportEvent::Progress {
                completed,
                total,
                percent: percent(completed, total),
            });
        }

        let pdf = assemble_pdf(&pages, canvas, self.exporter.config.dpi, &metadata)?;
        Ok(DocumentArtifact {
            pdf,
            metadata,
            page_count: total,
        })
    }
}

impl<S: RenderSurface> Drop for ExportRun<'_, S> {
    fn drop(&mut self) {
        self.exporter.surface.release();
        self.store.set_current_slide(self.saved_index);
        self.exporter.busy = false;
        let outcome = self.outcome.take().unwrap_or(ExportOutcome::Failed);
        if outcome == ExportOutcome::Failed {
            tracing::warn!("Export finished without completing");
        }
        let _ = self.exporter.events.send(ExportEvent::Finished { outcome });
    }
}

/// Background-colored stand-in for a slide whose capture failed.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn degraded_frame(
    store: &DocumentStore,
    canvas: carousel_core::Size,
    scale: f64,
) -> CapturedFrame {
    let fill = parse_hex_color(&store.document().current_slide().background_color);
    CapturedFrame::blank(
        (canvas.width * scale).max(1.0) as u32,
        (canvas.height * scale).max(1.0) as u32,
        fill,
    )
}

/// Integer completion percentage.
#[allow(clippy::cast_possible_truncation)]
fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        100
    } else {
        ((completed * 100) / total) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_export_kind_display() {
        assert_eq!(ExportKind::Image.to_string(), "image");
        assert_eq!(ExportKind::Document.to_string(), "document");
    }
}
