//! Serializable converter profile.
//!
//! A [`ConverterProfile`] names the inputs and outputs of a conversion: where
//! the icon metadata lives, which font file backs each style, and where images
//! are written in which format. Every field has a conventional default, so an
//! empty JSON object is a valid profile.
//!
//! # Example
//!
//! ```
//! use iconfont_renderer::ConverterProfile;
//!
//! let profile = ConverterProfile::new()
//!     .with_font("solid", "fonts/fa-solid-900.ttf")
//!     .with_format("gif");
//!
//! let json = profile.to_json().unwrap();
//! let restored = ConverterProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```
//!
//! The JSON shape:
//!
//! ```json
//! {
//!   "metadata": { "path": "css/font-awesome.css", "kind": "stylesheet", "prefixes": { "regular": "fa" } },
//!   "fonts": { "regular": "fonts/fontawesome-webfont.ttf" },
//!   "outputDir": "images",
//!   "format": "png"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::icon::DEFAULT_STYLE;
use crate::registry::{CatalogSource, MetadataKind, MetadataSource, StylesheetSource};

// ============================================================================
// Metadata Settings
// ============================================================================

/// Where icon metadata is read from and how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSettings {
    pub path: PathBuf,

    /// Explicit format. Inferred from the file extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MetadataKind>,

    /// Style tag -> selector prefix. Only read for stylesheets.
    #[serde(default = "default_prefixes")]
    pub prefixes: BTreeMap<String, String>,
}

impl MetadataSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: None,
            prefixes: default_prefixes(),
        }
    }

    /// The configured kind, or the one implied by the path.
    pub fn kind(&self) -> MetadataKind {
        self.kind.unwrap_or_else(|| MetadataKind::infer(&self.path))
    }

    /// Builds the metadata source these settings describe.
    pub fn source(&self) -> Box<dyn MetadataSource> {
        match self.kind() {
            MetadataKind::Stylesheet => {
                Box::new(StylesheetSource::new(&self.path, self.prefixes.clone()))
            }
            MetadataKind::Catalog => Box::new(CatalogSource::new(&self.path)),
        }
    }
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self::new("css/font-awesome.css")
    }
}

fn default_prefixes() -> BTreeMap<String, String> {
    BTreeMap::from([(DEFAULT_STYLE.to_string(), "fa".to_string())])
}

fn default_fonts() -> BTreeMap<String, PathBuf> {
    BTreeMap::from([(
        DEFAULT_STYLE.to_string(),
        PathBuf::from("fonts/fontawesome-webfont.ttf"),
    )])
}

// ============================================================================
// Converter Profile
// ============================================================================

/// Complete input/output configuration of a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterProfile {
    pub metadata: MetadataSettings,

    /// Style tag -> font file.
    pub fonts: BTreeMap<String, PathBuf>,

    /// Root of the image tree.
    pub output_dir: PathBuf,

    /// Image file extension, which also selects the encoder.
    pub format: String,
}

impl Default for ConverterProfile {
    fn default() -> Self {
        Self {
            metadata: MetadataSettings::default(),
            fonts: default_fonts(),
            output_dir: PathBuf::from("images"),
            format: "png".to_string(),
        }
    }
}

impl ConverterProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let profile_error = |reason: String| Error::Profile {
            path: path.to_path_buf(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| profile_error(e.to_string()))?;
        Self::from_json(&text).map_err(|e| profile_error(e.to_string()))
    }

    /// Replaces the metadata path, keeping the configured prefixes. The kind
    /// is inferred again from the new path.
    pub fn with_metadata(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata.path = path.into();
        self.metadata.kind = None;
        self
    }

    pub fn with_metadata_kind(mut self, kind: MetadataKind) -> Self {
        self.metadata.kind = Some(kind);
        self
    }

    /// Replaces all selector prefixes.
    pub fn with_prefixes(mut self, prefixes: BTreeMap<String, String>) -> Self {
        self.metadata.prefixes = prefixes;
        self
    }

    /// Sets the font file for `style`, replacing any earlier one.
    pub fn with_font(mut self, style: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.fonts.insert(style.into(), path.into());
        self
    }

    /// Replaces all font bindings.
    pub fn with_fonts(mut self, fonts: BTreeMap<String, PathBuf>) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Font file bound to `style`.
    pub fn font_path(&self, style: &str) -> Option<&Path> {
        self.fonts.get(style).map(PathBuf::as_path)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Parses a `key=value` pair as given to the `--font` and `--prefix` flags.
pub fn parse_binding(value: &str) -> Result<(String, String)> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() && !val.trim().is_empty() => {
            Ok((key.trim().to_string(), val.trim().to_string()))
        }
        _ => Err(Error::InvalidArgument(format!(
            "expected 'style=value', got '{value}'"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_uses_conventional_paths() {
        let profile = ConverterProfile::new();
        assert_eq!(profile.metadata.path, Path::new("css/font-awesome.css"));
        assert_eq!(profile.metadata.kind(), MetadataKind::Stylesheet);
        assert_eq!(profile.metadata.prefixes.get("regular").map(String::as_str), Some("fa"));
        assert_eq!(
            profile.font_path("regular"),
            Some(Path::new("fonts/fontawesome-webfont.ttf"))
        );
        assert_eq!(profile.output_dir, Path::new("images"));
        assert_eq!(profile.format, "png");
    }

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = ConverterProfile::new()
            .with_metadata("metadata/icons.json")
            .with_font("solid", "fonts/fa-solid-900.ttf")
            .with_font("brands", "fonts/fa-brands-400.ttf")
            .with_output_dir("out")
            .with_format("gif");

        let json = profile.to_json_pretty().unwrap();
        let restored = ConverterProfile::from_json(&json).unwrap();
        assert_eq!(restored, profile);
        assert_eq!(restored.metadata.kind(), MetadataKind::Catalog);
    }

    #[test]
    fn profile_json_format() {
        let json = ConverterProfile::new().to_json().unwrap();
        assert!(json.contains("\"outputDir\":\"images\""));
        assert!(json.contains("\"format\":\"png\""));
        assert!(!json.contains("\"kind\""));
    }

    #[test]
    fn empty_profile_deserializes() {
        let profile = ConverterProfile::from_json("{}").unwrap();
        assert_eq!(profile, ConverterProfile::default());
    }

    #[test]
    fn partial_metadata_keeps_default_prefixes() {
        let profile =
            ConverterProfile::from_json(r#"{ "metadata": { "path": "css/icons.css" } }"#).unwrap();
        assert_eq!(profile.metadata.path, Path::new("css/icons.css"));
        assert_eq!(profile.metadata.prefixes, default_prefixes());
        assert_eq!(profile.format, "png");
    }

    #[test]
    fn explicit_kind_overrides_extension() {
        let profile = ConverterProfile::from_json(
            r#"{ "metadata": { "path": "icons.txt", "kind": "catalog" } }"#,
        )
        .unwrap();
        assert_eq!(profile.metadata.kind(), MetadataKind::Catalog);
        assert_eq!(profile.metadata.source().path(), Path::new("icons.txt"));
    }

    #[test]
    fn with_metadata_reinfers_kind() {
        let profile = ConverterProfile::new()
            .with_metadata_kind(MetadataKind::Catalog)
            .with_metadata("css/other.css");
        assert_eq!(profile.metadata.kind(), MetadataKind::Stylesheet);
    }

    #[test]
    fn load_missing_file_fails() {
        let result = ConverterProfile::load("profiles/does-not-exist.json");
        assert!(matches!(result, Err(Error::Profile { .. })));
    }

    #[test]
    fn load_reads_file() {
        let dir = std::env::temp_dir().join(format!("iconfont-profile-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("profile.json");
        fs::write(&path, r#"{ "format": "bmp", "outputDir": "icons" }"#).unwrap();

        let profile = ConverterProfile::load(&path).unwrap();
        assert_eq!(profile.format, "bmp");
        assert_eq!(profile.output_dir, Path::new("icons"));

        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(ConverterProfile::load(&path), Err(Error::Profile { .. })));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn parse_binding_pairs() {
        assert_eq!(
            parse_binding("solid=fonts/fa-solid.ttf").unwrap(),
            ("solid".to_string(), "fonts/fa-solid.ttf".to_string())
        );
        assert!(parse_binding("solid").is_err());
        assert!(parse_binding("=x").is_err());
        assert!(parse_binding("solid=").is_err());
    }
}
