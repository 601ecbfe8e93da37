//! Slide to SVG intermediate representation.
//!
//! Export is a faithful high-resolution re-render of the same scene graph
//! the editor draws: nodes are emitted in painter order (z-index ascending,
//! list order breaking ties) over the slide background, then rasterized by
//! the surface. Image sources that are local file paths are inlined as
//! base64 data URIs so rasterization never depends on the filesystem layout.

use std::fmt::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use carousel_core::{Node, NodeKind, Size, Slide};

/// Line height multiplier for multi-line text blocks.
const LINE_HEIGHT: f64 = 1.25;

/// Render one slide to an SVG document string.
///
/// `canvas` is the logical slide size; `scale` is the supersampling factor.
/// The output raster is `canvas * scale` pixels while the view box keeps the
/// logical coordinate space, so node positions need no adjustment.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn slide_to_svg(slide: &Slide, canvas: Size, scale: f64) -> String {
    let out_w = (canvas.width * scale).max(1.0) as u32;
    let out_h = (canvas.height * scale).max(1.0) as u32;

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
        canvas.width, canvas.height,
    );

    let bg = escape_xml(&slide.background_color);
    let _ = write!(svg, "<rect width=\"100%\" height=\"100%\" fill=\"{bg}\"/>");

    if let Some(image) = &slide.background_image {
        let href = resolve_image_href(image);
        let _ = write!(
            svg,
            "<image x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid slice\" href=\"{href}\"/>",
            canvas.width, canvas.height,
        );
    }

    for node in slide.painter_order() {
        render_node_svg(&mut svg, node);
    }

    svg.push_str("</svg>");
    svg
}

/// Render a single node to SVG.
fn render_node_svg(svg: &mut String, node: &Node) {
    match &node.kind {
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
            let lines: Vec<&str> = content.split('\n').collect();
            let line_height = font_size * LINE_HEIGHT;

            if let Some(bg) = background_color {
                #[allow(clippy::cast_precision_loss)]
                let box_h = height.unwrap_or(line_height * lines.len() as f64);
                let box_w = width.unwrap_or(0.0);
                if box_w > 0.0 {
                    let _ = write!(
                        svg,
                        "<rect x=\"{}\" y=\"{}\" width=\"{box_w}\" height=\"{box_h}\" fill=\"{}\"/>",
                        node.position.x,
                        node.position.y,
                        escape_xml(bg),
                    );
                }
            }

            let (anchor, anchor_x) = match alignment {
                carousel_core::Alignment::Left => ("start", node.position.x),
                carousel_core::Alignment::Center => {
                    ("middle", node.position.x + width.unwrap_or(0.0) / 2.0)
                }
                carousel_core::Alignment::Right => {
                    ("end", node.position.x + width.unwrap_or(0.0))
                }
            };
            let weight = if font_style.bold { "bold" } else { "normal" };
            let style = if font_style.italic { "italic" } else { "normal" };
            let decoration = if font_style.underline {
                " text-decoration=\"underline\""
            } else {
                ""
            };

            for (i, line) in lines.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let baseline = node.position.y + font_size + line_height * i as f64;
                let _ = write!(
                    svg,
                    "<text x=\"{anchor_x}\" y=\"{baseline}\" font-size=\"{font_size}\" \
                     font-family=\"{}\" fill=\"{}\" font-weight=\"{weight}\" \
                     font-style=\"{style}\" text-anchor=\"{anchor}\"{decoration}>{}</text>",
                    escape_xml(font_family),
                    escape_xml(fill_color),
                    escape_xml(line),
                );
            }
        }

        NodeKind::Image {
            source_reference,
            size,
            opacity,
            rotation,
        } => {
            let href = resolve_image_href(source_reference);
            let mut attrs = String::new();
            if let Some(opacity) = opacity {
                let _ = write!(attrs, " opacity=\"{opacity}\"");
            }
            if let Some(degrees) = rotation {
                let cx = node.position.x + size.width / 2.0;
                let cy = node.position.y + size.height / 2.0;
                let _ = write!(attrs, " transform=\"rotate({degrees} {cx} {cy})\"");
            }
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{attrs} href=\"{href}\"/>",
                node.position.x, node.position.y, size.width, size.height,
            );
        }
    }
}

/// Turn an image source into an SVG-safe href.
///
/// Data URIs and URLs pass through; anything else is treated as a local
/// file path and inlined as base64. A source that fails to load is logged
/// and replaced with an empty href, degrading that node rather than
/// aborting the capture.
fn resolve_image_href(source: &str) -> String {
    if source.starts_with("data:") || source.starts_with("http://") || source.starts_with("https://")
    {
        return escape_xml(source);
    }

    match std::fs::read(source) {
        Ok(bytes) => {
            let mime = mime_for_path(source);
            format!("data:{mime};base64,{}", BASE64.encode(bytes))
        }
        Err(e) => {
            tracing::warn!("Failed to load image source {source:?}, rendering degraded: {e}");
            String::new()
        }
    }
}

/// Guess a mime type from the file extension, defaulting to PNG.
fn mime_for_path(path: &str) -> &'static str {
    match path.rsplit('.').next().map(str::to_ascii_lowercase) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "svg" => "image/svg+xml",
        _ => "image/png",
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
