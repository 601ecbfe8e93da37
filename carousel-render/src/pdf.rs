//! Multi-page PDF assembly.
//!
//! Page N of the container corresponds to slide N, in original slide order;
//! every page has the dimensions of the active canvas preset and embeds
//! that slide's raster capture.

use carousel_core::Size;

use crate::error::{ExportError, ExportResult};

/// Metadata carried by the assembled document.
///
/// printpdf takes only the title at document creation, so the full triple
/// also travels on the returned artifact for the save API to forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckMetadata {
    /// Document title.
    pub title: String,
    /// Producing application or author.
    pub creator: String,
    /// Subject line.
    pub subject: String,
}

impl Default for DeckMetadata {
    fn default() -> Self {
        Self {
            title: "Carousel".to_string(),
            creator: "carousel-render".to_string(),
            subject: "Carousel deck export".to_string(),
        }
    }
}

/// Assemble encoded JPEG pages into one PDF.
///
/// `page_size` is the canvas preset in pixels; pages are sized from it at
/// the given DPI regardless of the raster's supersampling factor.
///
/// # Errors
///
/// Returns [`ExportError::Assembly`] if a page cannot be embedded or the
/// document cannot be serialized.
#[allow(clippy::cast_possible_truncation)]
pub fn assemble_pdf(
    pages: &[Vec<u8>],
    page_size: Size,
    dpi: f32,
    metadata: &DeckMetadata,
) -> ExportResult<Vec<u8>> {
    if pages.is_empty() {
        return Err(ExportError::Assembly("No pages to assemble".to_string()));
    }

    // Pixel dimensions to mm: pixels / dpi * 25.4.
    let page_width_mm = page_size.width as f32 / dpi * 25.4;
    let page_height_mm = page_size.height as f32 / dpi * 25.4;

    let (doc, first_page, first_layer) = printpdf::PdfDocument::new(
        &metadata.title,
        printpdf::Mm(page_width_mm),
        printpdf::Mm(page_height_mm),
        "Slide 1",
    );

    for (index, jpeg) in pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                printpdf::Mm(page_width_mm),
                printpdf::Mm(page_height_mm),
                format!("Slide {}", index + 1),
            )
        };
        let current_layer = doc.get_page(page).get_layer(layer);

        // Decode with printpdf's bundled image crate for compatibility.
        let dynamic_image = printpdf::image_crate::load_from_memory(jpeg).map_err(|e| {
            ExportError::Assembly(format!("Failed to decode page {}: {e}", index + 1))
        })?;

        #[allow(clippy::cast_precision_loss)]
        let (scale_x, scale_y) = (
            page_width_mm / dynamic_image.width() as f32,
            page_height_mm / dynamic_image.height() as f32,
        );

        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);
        let transform = printpdf::ImageTransform {
            translate_x: Some(printpdf::Mm(0.0)),
            translate_y: Some(printpdf::Mm(0.0)),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            ..Default::default()
        };
        pdf_image.add_to_layer(current_layer, transform);
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Assembly(format!("PDF save failed: {e}")))
}
