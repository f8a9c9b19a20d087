//! iconfont-renderer: convert icon font glyphs into standalone images
//!
//! Icon fonts address each icon by code point. This crate reads the icon
//! names from the font's stylesheet or JSON catalog, renders each glyph
//! centered on a square canvas and writes one image file per icon and style.
//!
//! Three render modes are supported:
//!
//! - a solid glyph on a transparent canvas,
//! - a glyph-shaped cutout in a solid background (transparent mode),
//! - a glyph drawn over a second, independently sized "stacked" glyph.
//!
//! # Example
//!
//! ```no_run
//! use iconfont_renderer::{BatchOptions, ConverterProfile, RenderRequest, convert};
//!
//! let profile = ConverterProfile::new()
//!     .with_metadata("css/font-awesome.css")
//!     .with_font("regular", "fonts/fontawesome-webfont.ttf");
//!
//! let request = RenderRequest::from_args(&["plus-circle,minus-circle", "all", "128", "ff0000", "1/8"])?
//!     .expect("five arguments form a regular request");
//!
//! let report = convert(&profile, &request, BatchOptions::default())?;
//! println!("wrote {} images", report.written.len());
//! # Ok::<(), iconfont_renderer::Error>(())
//! ```
//!
//! # Rendering a single icon
//!
//! ```no_run
//! use iconfont_renderer::{Compositor, FontProvider, IconEntry, Padding, RenderSpec, parse_color};
//! use std::path::Path;
//!
//! let fonts = FontProvider::load([("solid", Path::new("fonts/fa-solid-900.ttf"))])?;
//! let spec = RenderSpec::new(64, parse_color("336699")?, Padding::parse("1/8")?)?;
//! let gear = IconEntry::new("gear", vec!['\u{f013}'], ["solid"]);
//!
//! let canvas = Compositor::new(&spec, &fonts).render(&gear, "solid")?;
//! canvas.to_image().save("gear.png").ok();
//! # Ok::<(), iconfont_renderer::Error>(())
//! ```

mod batch;
mod compositor;
mod error;
mod font;
mod icon;
mod layout;
mod options;
mod profile;
mod registry;

pub use batch::{BatchFailure, BatchOptions, BatchRenderer, BatchReport, OutputLayout, convert};
pub use compositor::{Canvas, Compositor};
pub use error::{Error, Result};
pub use font::{FontFace, FontProvider, OutlineSource, SizedFont};
pub use icon::{DEFAULT_STYLE, IconEntry, IconRegistry, SELECT_ALL, Selection};
pub use layout::{DrawPoint, GlyphRun, RectPx, calc_draw_point};
pub use options::{
    Padding, RenderRequest, RenderSpec, StackedGlyph, StackedRequest, TRANSPARENT,
    TRANSPARENT_KEYWORD, parse_color, parse_size,
};
pub use profile::{ConverterProfile, MetadataSettings, parse_binding};
pub use registry::{CatalogSource, MetadataKind, MetadataSource, StylesheetSource};
