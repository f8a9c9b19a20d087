//! Outline font loading and sizing.
//!
//! A [`FontProvider`] owns one parsed font per style tag. Rendering asks it for
//! a [`SizedFont`], a cheap handle pairing a shared outline source with a
//! pixel size, analogous to deriving a font at a point size.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use resvg::tiny_skia::{self, PathBuilder};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::{Error, Result};

/// One glyph in font units with the y axis pointing up, as stored in the font.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub advance: u16,
    /// `None` when the glyph has no ink (e.g. a space).
    pub outline: Option<tiny_skia::Path>,
}

/// Glyph metrics and outlines addressed by character.
pub trait OutlineSource: Send + Sync {
    fn units_per_em(&self) -> u16;

    /// Looks up every character of `text`, in order.
    fn glyphs(&self, text: &str) -> Vec<Glyph>;
}

/// A TrueType/OpenType font file held in memory.
///
/// Characters missing from the font resolve to glyph 0 (`.notdef`).
pub struct FontFace {
    path: PathBuf,
    data: Vec<u8>,
    units_per_em: u16,
}

impl FontFace {
    /// Reads and validates a font file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_data(path, data)
    }

    /// Validates font bytes that were read elsewhere.
    pub fn from_data(path: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self> {
        let path = path.into();
        let face = Face::parse(&data, 0).map_err(|e| Error::FontLoad {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let tables = face.tables();
        if tables.glyf.is_none() && tables.cff.is_none() {
            return Err(Error::FontLoad {
                path,
                reason: "font has no glyph outlines".into(),
            });
        }
        if tables.cmap.is_none() {
            return Err(Error::FontLoad {
                path,
                reason: "font has no character map".into(),
            });
        }

        let units_per_em = face.units_per_em();
        Ok(Self {
            path,
            data,
            units_per_em,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutlineSource for FontFace {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyphs(&self, text: &str) -> Vec<Glyph> {
        // Validated in `from_data`, so this only fails if the bytes changed.
        let face = match Face::parse(&self.data, 0) {
            Ok(face) => face,
            Err(e) => {
                log::warn!("cannot reparse '{}': {e}", self.path.display());
                return Vec::new();
            }
        };

        text.chars()
            .map(|ch| {
                let id = face.glyph_index(ch).unwrap_or(GlyphId(0));
                let mut collector = PathCollector::default();
                let outline = face
                    .outline_glyph(id, &mut collector)
                    .and_then(|_| collector.finish());
                Glyph {
                    advance: face.glyph_hor_advance(id).unwrap_or(0),
                    outline,
                }
            })
            .collect()
    }
}

/// Collects a glyph outline into a path without transforming it.
#[derive(Default)]
struct PathCollector(PathBuilder);

impl PathCollector {
    fn finish(self) -> Option<tiny_skia::Path> {
        self.0.finish()
    }
}

impl OutlineBuilder for PathCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

/// A font derived at a pixel size. This is the handle drawing code works with.
///
/// Cloning shares the underlying outlines.
#[derive(Clone)]
pub struct SizedFont {
    source: Arc<dyn OutlineSource>,
    size: f32,
}

impl SizedFont {
    pub fn new(source: Arc<dyn OutlineSource>, size: f32) -> Self {
        Self { source, size }
    }

    /// Pixel size of one em.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Font units to pixels.
    pub fn scale(&self) -> f32 {
        self.size / f32::from(self.source.units_per_em().max(1))
    }

    pub fn source(&self) -> &dyn OutlineSource {
        self.source.as_ref()
    }

    /// Returns the same font at another size.
    pub fn derive(&self, size: f32) -> Self {
        Self::new(Arc::clone(&self.source), size)
    }
}

/// Fonts keyed by style tag, shared read-only by every render call.
#[derive(Default, Clone)]
pub struct FontProvider {
    faces: BTreeMap<String, Arc<dyn OutlineSource>>,
}

impl FontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads one font per `(style, path)` pair. The first failure aborts.
    pub fn load<'a, I>(fonts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a Path)>,
    {
        let mut provider = Self::new();
        for (style, path) in fonts {
            let face = FontFace::load(path)?;
            log::debug!("loaded font '{}' for style '{style}'", path.display());
            provider.insert(style, Arc::new(face));
        }
        Ok(provider)
    }

    pub fn insert(&mut self, style: impl Into<String>, source: Arc<dyn OutlineSource>) {
        self.faces.insert(style.into(), source);
    }

    pub fn contains(&self, style: &str) -> bool {
        self.faces.contains_key(style)
    }

    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.faces.keys().map(String::as_str)
    }

    /// Returns the font for `style` at `size` pixels per em.
    pub fn sized(&self, style: &str, size: f32) -> Result<SizedFont> {
        self.faces
            .get(style)
            .map(|source| SizedFont::new(Arc::clone(source), size))
            .ok_or_else(|| Error::MissingStyle(style.to_string()))
    }
}
