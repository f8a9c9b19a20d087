//! Glyph placement inside a square canvas.
//!
//! Icons are centered horizontally by their advance (layout) width and
//! vertically by their ink bounds. Advance centering respects the side
//! bearings the font designer built into each glyph, while ascent-based
//! vertical centering makes most icon glyphs sit visibly low, so the vertical
//! axis uses the tight outline box instead.

use resvg::tiny_skia::{Path, PathBuilder, Rect, Transform};

use crate::font::SizedFont;

/// An integer rectangle in canvas pixels, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RectPx {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The smallest integer rectangle containing `rect`.
    pub fn enclosing(rect: Rect) -> Self {
        let left = rect.left().floor();
        let top = rect.top().floor();
        let right = rect.right().ceil();
        let bottom = rect.bottom().ceil();
        Self {
            x: left as i32,
            y: top as i32,
            width: (right - left) as i32,
            height: (bottom - top) as i32,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Baseline-left origin at which a glyph string is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawPoint {
    pub x: i32,
    pub y: i32,
}

/// A glyph string laid out on a baseline at the origin.
///
/// The outline is in pixels with y pointing down, so ink above the baseline
/// has negative y. Advances are rounded to whole pixels per glyph.
#[derive(Debug, Clone)]
pub struct GlyphRun {
    outline: Option<Path>,
    advance: f32,
}

impl GlyphRun {
    pub fn layout(font: &SizedFont, text: &str) -> Self {
        let scale = font.scale();
        let mut builder = PathBuilder::new();
        let mut advance = 0.0;

        for glyph in font.source().glyphs(text) {
            // Font units (y up) to pixels (y down), shifted to the pen position.
            let to_pixels = Transform::from_row(scale, 0.0, 0.0, -scale, advance, 0.0);
            if let Some(outline) = glyph.outline.and_then(|p| p.transform(to_pixels)) {
                builder.push_path(&outline);
            }
            advance += (f32::from(glyph.advance) * scale).round();
        }

        Self {
            outline: builder.finish(),
            advance,
        }
    }

    /// The combined outline, or `None` when nothing has ink.
    pub fn outline(&self) -> Option<&Path> {
        self.outline.as_ref()
    }

    /// Width of the layout box: the summed advances.
    pub fn string_width(&self) -> i32 {
        self.advance.ceil() as i32
    }

    /// Tight bounds of the ink, relative to the baseline origin.
    pub fn visual_bounds(&self) -> RectPx {
        self.outline
            .as_ref()
            .and_then(Path::compute_tight_bounds)
            .map(RectPx::enclosing)
            .unwrap_or_default()
    }

    /// Computes where to draw this run so it appears centered in a
    /// `canvas_size` square.
    ///
    /// `x` centers the layout box, `y` centers the ink box. Integer division
    /// truncates, matching the pixel grid the glyph is drawn on.
    pub fn draw_point(&self, canvas_size: u32) -> DrawPoint {
        let center = (canvas_size / 2) as i32;
        let visual = self.visual_bounds();
        DrawPoint {
            x: center - self.string_width() / 2,
            y: center - visual.height / 2 - visual.y,
        }
    }
}

/// Lays out `text` with `font` and returns its centered draw point.
pub fn calc_draw_point(font: &SizedFont, text: &str, canvas_size: u32) -> DrawPoint {
    GlyphRun::layout(font, text).draw_point(canvas_size)
}
