//! Batch conversion.
//!
//! Every (icon, style) pair of a filtered registry becomes one image file.
//! Rendering inputs are shared read-only, so the loop may run on a rayon pool;
//! each iteration owns its canvas and its output file.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use rayon::prelude::*;

use crate::compositor::Compositor;
use crate::error::{Error, Result};
use crate::font::FontProvider;
use crate::icon::{IconEntry, IconRegistry};
use crate::options::{RenderRequest, RenderSpec};
use crate::profile::ConverterProfile;

// ============================================================================
// Output Layout
// ============================================================================

/// Maps icons to output files.
///
/// Files are named `<root>/<icon>.<ext>`, or `<root>/<style>/<icon>.<ext>`
/// when partitioned by style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    extension: String,
    format: ImageFormat,
    alpha: bool,
    partition: bool,
}

impl OutputLayout {
    /// Fails unless `extension` names an enabled encoder that accepts 8-bit
    /// RGBA or RGB pixels. Formats without alpha (JPEG) drop the alpha channel.
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Result<Self> {
        let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        let unsupported =
            || Error::InvalidArgument(format!("unsupported image format '{extension}'"));
        let format = ImageFormat::from_extension(&extension)
            .filter(ImageFormat::writing_enabled)
            .ok_or_else(unsupported)?;
        let alpha = encodes_alpha(format).ok_or_else(unsupported)?;

        Ok(Self {
            root: root.into(),
            extension,
            format,
            alpha,
            partition: false,
        })
    }

    pub fn with_partition(mut self, partition: bool) -> Self {
        self.partition = partition;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Whether written images keep their alpha channel.
    pub fn keeps_alpha(&self) -> bool {
        self.alpha
    }

    pub fn is_partitioned(&self) -> bool {
        self.partition
    }

    pub fn path_for(&self, icon: &str, style: &str) -> PathBuf {
        let file = format!("{icon}.{}", self.extension);
        if self.partition {
            self.root.join(style).join(file)
        } else {
            self.root.join(file)
        }
    }

    /// Creates every directory the given styles write into. Existing
    /// directories are left alone.
    pub fn prepare<'a>(&self, styles: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let dirs: Vec<PathBuf> = if self.partition {
            styles.into_iter().map(|s| self.root.join(s)).collect()
        } else {
            vec![self.root.clone()]
        };

        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|source| Error::Io { path: dir, source })?;
        }
        Ok(())
    }
}

/// `Some(true)` for encoders taking RGBA8, `Some(false)` for RGB8 only,
/// `None` for encoders that need other pixel types.
fn encodes_alpha(format: ImageFormat) -> Option<bool> {
    match format {
        ImageFormat::Png
        | ImageFormat::Gif
        | ImageFormat::Bmp
        | ImageFormat::Ico
        | ImageFormat::Tiff
        | ImageFormat::Tga
        | ImageFormat::WebP
        | ImageFormat::Qoi
        | ImageFormat::Avif => Some(true),
        ImageFormat::Jpeg => Some(false),
        _ => None,
    }
}

// ============================================================================
// Batch Results
// ============================================================================

/// Controls how a batch runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Render on the global rayon pool.
    pub parallel: bool,

    /// Record failures and continue instead of aborting on the first one.
    pub keep_going: bool,
}

/// An (icon, style) pair that could not be written.
#[derive(Debug)]
pub struct BatchFailure {
    pub icon: String,
    pub style: String,
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

// ============================================================================
// Batch Renderer
// ============================================================================

/// Renders a registry to image files.
pub struct BatchRenderer<'a> {
    compositor: Compositor<'a>,
    layout: &'a OutputLayout,
    options: BatchOptions,
}

impl<'a> BatchRenderer<'a> {
    pub fn new(compositor: Compositor<'a>, layout: &'a OutputLayout, options: BatchOptions) -> Self {
        Self {
            compositor,
            layout,
            options,
        }
    }

    /// Renders and writes every (icon, style) pair of `icons`.
    ///
    /// Unless `keep_going` is set, the first failure is returned and the
    /// remaining pairs are skipped.
    pub fn run(&self, icons: &IconRegistry) -> Result<BatchReport> {
        let styles = icons.styles();
        self.layout.prepare(styles.iter().map(String::as_str))?;

        let jobs: Vec<(&IconEntry, &str)> = icons
            .iter()
            .flat_map(|icon| icon.styles.iter().map(move |style| (icon, style.as_str())))
            .collect();
        log::info!("rendering {} images into '{}'", jobs.len(), self.layout.root().display());

        if !self.options.keep_going {
            let written: Result<Vec<PathBuf>> = if self.options.parallel {
                jobs.par_iter().map(|&(icon, style)| self.write(icon, style)).collect()
            } else {
                jobs.iter().map(|&(icon, style)| self.write(icon, style)).collect()
            };
            return Ok(BatchReport {
                written: written?,
                failed: Vec::new(),
            });
        }

        let outcomes: Vec<Result<PathBuf>> = if self.options.parallel {
            jobs.par_iter().map(|&(icon, style)| self.write(icon, style)).collect()
        } else {
            jobs.iter().map(|&(icon, style)| self.write(icon, style)).collect()
        };

        let mut report = BatchReport::default();
        for ((icon, style), outcome) in jobs.into_iter().zip(outcomes) {
            match outcome {
                Ok(path) => report.written.push(path),
                Err(error) => {
                    log::warn!("skipped '{}' ({style}): {error}", icon.name);
                    report.failed.push(BatchFailure {
                        icon: icon.name.clone(),
                        style: style.to_string(),
                        error,
                    });
                }
            }
        }
        Ok(report)
    }

    fn write(&self, icon: &IconEntry, style: &str) -> Result<PathBuf> {
        let path = self.layout.path_for(&icon.name, style);
        let image = self.compositor.render(icon, style)?.to_image();
        let format = self.layout.format();
        let saved = if self.layout.keeps_alpha() {
            image.save_with_format(&path, format)
        } else {
            DynamicImage::ImageRgba8(image)
                .to_rgb8()
                .save_with_format(&path, format)
        };
        saved.map_err(|source| Error::ImageEncode {
            path: path.clone(),
            source,
        })?;
        log::debug!("wrote '{}'", path.display());
        Ok(path)
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Runs a full conversion: load metadata, resolve the request, load the fonts
/// it needs and write every image.
pub fn convert(
    profile: &ConverterProfile,
    request: &RenderRequest,
    options: BatchOptions,
) -> Result<BatchReport> {
    let source = profile.metadata.source();
    let registry = source.load()?;
    log::info!(
        "loaded {} icons from '{}'",
        registry.len(),
        source.path().display()
    );

    // The stacked icon is looked up before filtering, so it need not be part
    // of the rendered selection.
    let stacked = request.stacked.as_ref().and_then(|s| registry.get(&s.icon));
    let spec = request.to_spec(stacked)?;

    let icons = registry.filter(&request.icons, &request.styles);
    if icons.is_empty() {
        log::warn!("no icons match the requested names and styles");
    }

    let fonts = load_fonts(profile, &required_styles(&icons, &spec))?;
    let layout = OutputLayout::new(&profile.output_dir, &profile.format)?
        .with_partition(icons.styles().len() > 1);

    let report = BatchRenderer::new(Compositor::new(&spec, &fonts), &layout, options).run(&icons)?;
    log::info!(
        "wrote {} of {} images",
        report.written.len(),
        report.total()
    );
    Ok(report)
}

/// Styles that need a font: every rendered style plus the styles the stacked
/// glyph resolves to.
fn required_styles(icons: &IconRegistry, spec: &RenderSpec) -> BTreeSet<String> {
    let mut styles = icons.styles();
    if let Some(stacked) = spec.stacked() {
        let extra: Vec<String> = styles
            .iter()
            .map(|style| stacked.resolve(style).1.to_string())
            .collect();
        styles.extend(extra);
    }
    styles
}

fn load_fonts(profile: &ConverterProfile, styles: &BTreeSet<String>) -> Result<FontProvider> {
    let fonts = styles
        .iter()
        .map(|style| {
            profile
                .font_path(style)
                .map(|path| (style.as_str(), path))
                .ok_or_else(|| Error::MissingStyle(style.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let provider = FontProvider::load(fonts)?;
    log::info!("loaded fonts for {} styles", styles.len());
    Ok(provider)
}

// ============================================================================
// Tests
// ============================================================================
