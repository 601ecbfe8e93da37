//! The live rendering surface.
//!
//! A single surface is reused sequentially during multi-slide export: the
//! pipeline focuses each slide on the document and captures the surface,
//! rather than mounting one surface per slide. The trait seam lets tests
//! inject scripted surfaces with programmable failures.

use async_trait::async_trait;
use carousel_core::Document;

use crate::error::{ExportError, ExportResult};
use crate::fonts::FontLibrary;
use crate::svg::slide_to_svg;

/// A raster sample of the surface: straight (non-premultiplied) RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
    /// RGBA bytes, row-major, `width * height * 4` long.
    pub rgba: Vec<u8>,
}

impl CapturedFrame {
    /// A frame filled with a flat color; stands in for a slide whose
    /// capture failed so the page count stays unchanged.
    #[must_use]
    pub fn blank(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            rgba.extend_from_slice(&fill);
        }
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// The surface the pipeline captures from.
///
/// `acquire` failing means the surface cannot be obtained at all and the
/// whole export aborts. `wait_ready` suspends until embedded resources are
/// resolvable; resource failures there are degraded, not fatal. `capture`
/// rasterizes the document's *current* slide at full target resolution,
/// independent of any on-screen display scale.
#[async_trait]
pub trait RenderSurface: Send {
    /// Obtain the surface for an export run.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::SurfaceUnavailable`] when the surface cannot
    /// be acquired; the export aborts.
    fn acquire(&mut self) -> ExportResult<()>;

    /// Suspend until fonts and other embedded resources are loadable.
    ///
    /// # Errors
    ///
    /// Implementations should degrade rather than fail here; an error is
    /// treated as fatal for the current slide only.
    async fn wait_ready(&mut self) -> ExportResult<()>;

    /// Rasterize the current slide.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Capture`] when rasterization fails.
    fn capture(&mut self, document: &Document, scale: f64) -> ExportResult<CapturedFrame>;

    /// Release the surface after an export run. Always called during
    /// finalization, including on failure.
    fn release(&mut self) {}
}

/// Production surface: renders the current slide through the SVG
/// intermediate and rasterizes it with resvg/tiny-skia.
pub struct SvgSurface {
    fonts: FontLibrary,
    acquired: bool,
}

impl SvgSurface {
    /// Create a surface drawing from the given font library.
    #[must_use]
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            fonts,
            acquired: false,
        }
    }

    /// The font library backing this surface.
    #[must_use]
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }
}

#[async_trait]
impl RenderSurface for SvgSurface {
    fn acquire(&mut self) -> ExportResult<()> {
        self.acquired = true;
        Ok(())
    }

    async fn wait_ready(&mut self) -> ExportResult<()> {
        // fontdb resolves synchronously once loaded; nothing to await here.
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn capture(&mut self, document: &Document, scale: f64) -> ExportResult<CapturedFrame> {
        if !self.acquired {
            return Err(ExportError::SurfaceUnavailable(
                "capture before acquire".to_string(),
            ));
        }

        let canvas = document.canvas_preset.size();
        let svg_string = slide_to_svg(document.current_slide(), canvas, scale);

        let mut opt = usvg::Options::default();
        opt.fontdb = self.fonts.database();
        let tree = usvg::Tree::from_str(&svg_string, &opt)
            .map_err(|e| ExportError::Capture(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| ExportError::Capture("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        // Un-premultiply so encoders receive straight RGBA.
        let mut rgba = Vec::with_capacity((px_w as usize) * (px_h as usize) * 4);
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        Ok(CapturedFrame {
            width: pixmap.width(),
            height: pixmap.height(),
            rgba,
        })
    }

    fn release(&mut self) {
        self.acquired = false;
    }
}

/// Parse `#RRGGBB` (or `#RGB`) into RGBA bytes, defaulting to white.
#[must_use]
pub fn parse_hex_color(hex: &str) -> [u8; 4] {
    let digits = hex.trim_start_matches('#');
    let parsed = match digits.len() {
        6 => u32::from_str_radix(digits, 16)
            .ok()
            .map(|v| [(v >> 16) as u8, (v >> 8) as u8, v as u8, 255]),
        3 => u32::from_str_radix(digits, 16).ok().map(|v| {
            let r = ((v >> 8) & 0xF) as u8;
            let g = ((v >> 4) & 0xF) as u8;
            let b = (v & 0xF) as u8;
            [r * 17, g * 17, b * 17, 255]
        }),
        _ => None,
    };
    parsed.unwrap_or([255, 255, 255, 255])
}
