//! Icon compositing.
//!
//! Draw order is fixed and later draws layer over earlier ones:
//!
//! ```text
//! ┌──────────────────────┐
//! │ background fill      │ ◄── transparent mode only
//! ├──────────────────────┤
//! │ stacked glyph        │ ◄── stacked mode only, source-over
//! ├──────────────────────┤
//! │ front glyph          │ ◄── source-over, or punched out in transparent mode
//! └──────────────────────┘
//! ```
//!
//! In transparent mode the front glyph is drawn with a fully transparent color
//! under the source-in rule: it keeps the color of what lies beneath and only
//! removes alpha where the glyph covers. The glyph's coverage is kept as a
//! separate mask and applied when the canvas is exported, so partially
//! covered edge pixels keep the exact background color.

use image::{Rgba, RgbaImage};
use palette::Srgba;
use resvg::tiny_skia::{Color, FillRule, Mask, Paint, Pixmap, Transform};

use crate::error::{Error, Result};
use crate::font::FontProvider;
use crate::icon::IconEntry;
use crate::layout::{DrawPoint, GlyphRun};
use crate::options::RenderSpec;

// ============================================================================
// Canvas
// ============================================================================

/// A square RGBA pixel buffer owned by one render call.
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    /// Coverage of punched-out glyphs. `None` until something is punched.
    punch: Option<Mask>,
}

impl Canvas {
    /// Allocates a fully transparent `size` x `size` canvas.
    pub fn new(size: u32) -> Result<Self> {
        let pixmap = Pixmap::new(size, size).ok_or(Error::Canvas(size))?;
        Ok(Self { pixmap, punch: None })
    }

    pub fn size(&self) -> u32 {
        self.pixmap.width()
    }

    /// Fills every pixel with `color`.
    pub fn fill(&mut self, color: Srgba<u8>) {
        self.pixmap.fill(skia_color(color));
    }

    /// Fills the outline of `run` with its baseline origin at `at`.
    ///
    /// Glyph edges are always antialiased.
    pub fn draw_glyphs(&mut self, run: &GlyphRun, at: DrawPoint, color: Srgba<u8>) {
        let Some(outline) = run.outline() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(skia_color(color));
        paint.anti_alias = true;

        self.pixmap
            .fill_path(outline, &paint, FillRule::Winding, translate(at), None);
    }

    /// Removes alpha wherever `run` covers, keeping the color underneath.
    ///
    /// This is source-in with a transparent source: a pixel covered by
    /// fraction `c` keeps its color and `1 - c` of its alpha.
    pub fn punch_glyphs(&mut self, run: &GlyphRun, at: DrawPoint) -> Result<()> {
        let Some(outline) = run.outline() else {
            return Ok(());
        };

        if self.punch.is_none() {
            let size = self.size();
            self.punch = Some(Mask::new(size, size).ok_or(Error::Canvas(size))?);
        }
        if let Some(mask) = &mut self.punch {
            mask.fill_path(outline, FillRule::Winding, true, translate(at));
        }
        Ok(())
    }

    /// Returns the straight-alpha color of a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let p = self.pixmap.pixel(x, y)?;
        let (r, g, b, a) = unpremultiply(p.red(), p.green(), p.blue(), p.alpha());

        let coverage = match &self.punch {
            Some(mask) => mask.data()[(y * mask.width() + x) as usize],
            None => 0,
        };
        let a = (u32::from(a) * u32::from(255 - coverage) + 127) / 255;
        if a == 0 {
            return Some(Rgba([0, 0, 0, 0]));
        }
        Some(Rgba([r, g, b, a as u8]))
    }

    /// Converts to a straight-alpha image ready for encoding.
    pub fn to_image(&self) -> RgbaImage {
        let size = self.size();
        RgbaImage::from_fn(size, size, |x, y| {
            self.pixel(x, y).unwrap_or(Rgba([0, 0, 0, 0]))
        })
    }
}

fn translate(at: DrawPoint) -> Transform {
    Transform::from_translate(at.x as f32, at.y as f32)
}

fn skia_color(color: Srgba<u8>) -> Color {
    Color::from_rgba8(color.red, color.green, color.blue, color.alpha)
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Compositor
// ============================================================================

/// Renders icons according to one [`RenderSpec`].
///
/// Holds only shared references, so one compositor can serve many threads.
#[derive(Clone, Copy)]
pub struct Compositor<'a> {
    spec: &'a RenderSpec,
    fonts: &'a FontProvider,
}

impl<'a> Compositor<'a> {
    pub fn new(spec: &'a RenderSpec, fonts: &'a FontProvider) -> Self {
        Self { spec, fonts }
    }

    pub fn spec(&self) -> &RenderSpec {
        self.spec
    }

    /// Renders `icon` in `style`.
    pub fn render(&self, icon: &IconEntry, style: &str) -> Result<Canvas> {
        self.render_text(&icon.glyph_text(), style)
    }

    /// Renders an arbitrary glyph string in `style`.
    pub fn render_text(&self, text: &str, style: &str) -> Result<Canvas> {
        let spec = self.spec;
        let size = spec.canvas_size();
        let mut canvas = Canvas::new(size)?;

        if let Some(background) = spec.background() {
            canvas.fill(background);
        }

        if let Some(stacked) = spec.stacked() {
            let (icon, stacked_style) = stacked.resolve(style);
            let font = self
                .fonts
                .sized(stacked_style, spec.padding().apply(stacked.size()))?;
            let run = GlyphRun::layout(&font, &icon.glyph_text());
            let point = run.draw_point(size);
            log::trace!("stacked '{}' ({stacked_style}) at {point:?}", icon.name);
            canvas.draw_glyphs(&run, point, stacked.color());
        }

        let font = self.fonts.sized(style, spec.front_point_size())?;
        let run = GlyphRun::layout(&font, text);
        let point = run.draw_point(size);
        log::trace!("front glyph at {point:?}");
        if spec.is_transparent() {
            canvas.punch_glyphs(&run, point)?;
        } else {
            canvas.draw_glyphs(&run, point, spec.front_color());
        }

        Ok(canvas)
    }
}

// ============================================================================
// Tests
// ============================================================================
