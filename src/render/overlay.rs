//! Overlay drawables: styled captions, solid shapes and raw SVG.
//!
//! Every kind of content is lowered to an SVG document, parsed once into a `usvg::Tree` and
//! rasterized with `resvg` under the element's per-frame transform.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use kurbo::{Affine, Rect, Vec2};

use crate::{
    foundation::core::{Canvas, Rgb8},
    foundation::error::{ReelError, ReelResult},
    render::composite::over_rgb_in_place,
    render::frame::FrameRgb8,
};

/// Canvas width the text presets are authored for.
pub const REFERENCE_WIDTH: f64 = 720.0;
/// Horizontal margin kept free on each side when wrapping captions (reference pixels).
pub const TEXT_MARGIN: f64 = 20.0;

const WHITE: Rgb8 = [255, 255, 255];
const BLACK: Rgb8 = [0, 0, 0];
const YELLOW: Rgb8 = [255, 255, 0];
const RED: Rgb8 = [255, 0, 0];
const LIME: Rgb8 = [0, 255, 0];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub fill: Rgb8,
    #[serde(default)]
    pub bold: bool,
    pub stroke: Rgb8,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default = "default_family")]
    pub font_family: String,
    /// Wrap width in pixels; `None` wraps to the canvas width minus margins.
    #[serde(default)]
    pub max_width: Option<f64>,
}

fn default_family() -> String {
    "sans-serif".to_string()
}

impl TextStyle {
    fn preset_of(font_size: f64, fill: Rgb8, bold: bool, stroke: Rgb8, stroke_width: f64) -> Self {
        Self {
            font_size,
            fill,
            bold,
            stroke,
            stroke_width,
            font_family: default_family(),
            max_width: None,
        }
    }

    pub fn title() -> Self {
        Self::preset_of(50.0, WHITE, true, BLACK, 3.0)
    }

    pub fn subtitle() -> Self {
        Self::preset_of(35.0, YELLOW, false, BLACK, 2.0)
    }

    pub fn content() -> Self {
        Self::preset_of(40.0, WHITE, true, RED, 2.0)
    }

    pub fn cta() -> Self {
        Self::preset_of(45.0, LIME, true, BLACK, 3.0)
    }

    /// Named preset; unknown names fall back to `content`.
    pub fn preset(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => Self::title(),
            "subtitle" => Self::subtitle(),
            "cta" => Self::cta(),
            _ => Self::content(),
        }
    }

    /// Scale sizes authored for [`REFERENCE_WIDTH`] to `canvas`.
    pub fn for_canvas(self, canvas: Canvas) -> Self {
        self.scaled(f64::from(canvas.width) / REFERENCE_WIDTH)
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            font_size: self.font_size * factor,
            stroke_width: self.stroke_width * factor,
            max_width: self.max_width.map(|w| w * factor),
            ..self
        }
    }

    fn char_width(&self) -> f64 {
        self.font_size * if self.bold { 0.6 } else { 0.55 }
    }

    fn line_height(&self) -> f64 {
        self.font_size * 1.2
    }

    fn validate(&self) -> ReelResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ReelError::invalid_parameter("font_size must be finite and > 0"));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ReelError::invalid_parameter(
                "stroke_width must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::content()
    }
}

/// What an overlay element draws.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayContent {
    Text {
        text: String,
        #[serde(default)]
        style: TextStyle,
    },
    /// Solid (optionally rounded) rectangle.
    Shape {
        width: f64,
        height: f64,
        fill: Rgb8,
        #[serde(default)]
        corner_radius: f64,
    },
    /// Raw SVG markup; its intrinsic size is the drawable size.
    Svg { markup: String },
}

impl OverlayContent {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Self::Text {
            text: text.into(),
            style,
        }
    }

    pub fn rect(width: f64, height: f64, fill: Rgb8) -> Self {
        Self::Shape {
            width,
            height,
            fill,
            corner_radius: 0.0,
        }
    }

    /// Short human-readable label for logs and diagnostics.
    pub fn label(&self) -> String {
        match self {
            Self::Text { text, .. } => format!("text {text:?}"),
            Self::Shape { width, height, .. } => format!("shape {width}x{height}"),
            Self::Svg { markup } => format!("svg ({} bytes)", markup.len()),
        }
    }

    /// Lower to a standalone SVG document.
    pub fn to_svg(&self, canvas: Canvas) -> ReelResult<String> {
        match self {
            Self::Text { text, style } => text_svg(text, style, canvas),
            Self::Shape {
                width,
                height,
                fill,
                corner_radius,
            } => {
                for (name, v) in [("width", *width), ("height", *height)] {
                    if !v.is_finite() || v <= 0.0 {
                        return Err(ReelError::invalid_parameter(format!(
                            "shape {name} must be finite and > 0"
                        )));
                    }
                }
                let r = if corner_radius.is_finite() {
                    corner_radius.max(0.0)
                } else {
                    0.0
                };
                Ok(format!(
                    r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><rect width="{width}" height="{height}" rx="{r}" fill="{}"/></svg>"#,
                    css_rgb(*fill)
                ))
            }
            Self::Svg { markup } => {
                if markup.trim().is_empty() {
                    return Err(ReelError::invalid_parameter("svg markup is empty"));
                }
                Ok(markup.clone())
            }
        }
    }
}

fn css_rgb(c: Rgb8) -> String {
    format!("rgb({},{},{})", c[0], c[1], c[2])
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Greedy word wrap to at most `max_chars` per line. Over-long words get a line of their own.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn text_svg(text: &str, style: &TextStyle, canvas: Canvas) -> ReelResult<String> {
    style.validate()?;
    if text.trim().is_empty() {
        return Err(ReelError::invalid_parameter("overlay text is empty"));
    }
    let margin = TEXT_MARGIN * f64::from(canvas.width) / REFERENCE_WIDTH;
    let wrap_width = style
        .max_width
        .unwrap_or(f64::from(canvas.width) - 2.0 * margin)
        .max(style.char_width());
    let max_chars = (wrap_width / style.char_width()).floor() as usize;
    let lines = wrap_words(text, max_chars);

    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(1);
    let pad = style.stroke_width + 4.0;
    let width = (longest as f64 * style.char_width() + 2.0 * pad).ceil();
    let height = (lines.len() as f64 * style.line_height() + 2.0 * pad).ceil();
    let weight = if style.bold { "bold" } else { "normal" };

    let mut svg = String::new();
    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )
    .map_err(markup_error)?;
    for (i, line) in lines.iter().enumerate() {
        let baseline = pad + i as f64 * style.line_height() + style.font_size;
        write!(
            svg,
            r#"<text x="{}" y="{baseline}" text-anchor="middle" font-family="{}" font-size="{}" font-weight="{weight}" fill="{}" stroke="{}" stroke-width="{}" paint-order="stroke">{}</text>"#,
            width / 2.0,
            xml_escape(&style.font_family),
            style.font_size,
            css_rgb(style.fill),
            css_rgb(style.stroke),
            style.stroke_width,
            xml_escape(line),
        )
        .map_err(markup_error)?;
    }
    svg.push_str("</svg>");
    Ok(svg)
}

fn markup_error(err: std::fmt::Error) -> ReelError {
    ReelError::computation(format!("building overlay markup: {err}"))
}

/// Shared font database used when parsing overlay SVGs.
#[derive(Clone)]
pub struct FontLibrary {
    db: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl FontLibrary {
    /// System fonts only.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self { db: Arc::new(db) }
    }

    /// System fonts plus every `.ttf`/`.otf`/`.ttc` file in `dir`.
    pub fn with_font_dir(dir: &Path) -> ReelResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read font directory '{}'", dir.display()))?;
        for entry in rd.flatten() {
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            if matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc") {
                if let Err(err) = db.load_font_file(&path) {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable font");
                }
            }
        }
        Ok(Self { db: Arc::new(db) })
    }

    pub fn face_count(&self) -> usize {
        self.db.faces().count()
    }

    fn options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.db.clone(),
            font_resolver: font_resolver(),
            ..Default::default()
        }
    }
}

fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(s) => Family::Name(s),
                })
                .collect();
            families.push(Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };
            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch: Stretch::Normal,
                style,
            };
            // Any face beats dropping the caption.
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

/// Parsed overlay ready to rasterize at any transform.
#[derive(Clone, Debug)]
pub struct PreparedOverlay {
    tree: Arc<usvg::Tree>,
}

impl PreparedOverlay {
    pub fn prepare(content: &OverlayContent, canvas: Canvas, fonts: &FontLibrary) -> ReelResult<Self> {
        let svg = content.to_svg(canvas)?;
        let tree = usvg::Tree::from_data(svg.as_bytes(), &fonts.options())
            .map_err(|e| ReelError::invalid_parameter(format!("{}: {e}", content.label())))?;
        let size = tree.size();
        if !(size.width().is_finite() && size.height().is_finite()) {
            return Err(ReelError::invalid_parameter(format!(
                "{} has invalid size",
                content.label()
            )));
        }
        Ok(Self {
            tree: Arc::new(tree),
        })
    }

    /// Intrinsic drawable size in pixels.
    pub fn size(&self) -> Vec2 {
        let s = self.tree.size();
        Vec2::new(f64::from(s.width()), f64::from(s.height()))
    }

    /// Rasterize under `transform` (local to frame pixels) and composite onto `frame`.
    pub fn draw(&self, frame: &mut FrameRgb8, transform: Affine, opacity: f64) -> ReelResult<()> {
        if !(opacity.is_finite() && opacity > 0.0) {
            return Ok(());
        }
        let size = self.size();
        let bbox = transform.transform_rect_bbox(Rect::new(0.0, 0.0, size.x, size.y));
        let x0 = bbox.x0.floor().max(0.0);
        let y0 = bbox.y0.floor().max(0.0);
        let x1 = bbox.x1.ceil().min(f64::from(frame.width));
        let y1 = bbox.y1.ceil().min(f64::from(frame.height));
        if !(x1 > x0 && y1 > y0) {
            return Ok(());
        }
        let (ox, oy) = (x0 as usize, y0 as usize);
        let (w, h) = ((x1 - x0) as u32, (y1 - y0) as u32);

        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| ReelError::computation("failed to allocate overlay pixmap"))?;
        let [a, b, c, d, e, f] = (Affine::translate((-x0, -y0)) * transform).as_coeffs();
        let xform = resvg::tiny_skia::Transform::from_row(
            a as f32, b as f32, c as f32, d as f32, e as f32, f as f32,
        );
        resvg::render(&self.tree, xform, &mut pixmap.as_mut());

        let src = pixmap.data();
        let stride = frame.stride();
        let (w, h) = (w as usize, h as usize);
        for row in 0..h {
            let dst_start = (oy + row) * stride + ox * 3;
            let dst = &mut frame.data[dst_start..dst_start + w * 3];
            over_rgb_in_place(dst, &src[row * w * 4..(row + 1) * w * 4], opacity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
