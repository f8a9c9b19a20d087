//! Icon metadata loading.
//!
//! Icon fonts ship their name-to-code-point table in one of two shapes:
//!
//! - a stylesheet, where `.prefix-name:before` selectors precede a rule whose
//!   `content` property holds the escaped code point ([`StylesheetSource`]);
//! - a JSON catalog keyed by icon name, listing the code point and the styles
//!   each icon is drawn in ([`CatalogSource`]).
//!
//! Both implement [`MetadataSource`] and produce an [`IconRegistry`].

pub mod catalog;
pub mod stylesheet;

pub use catalog::CatalogSource;
pub use stylesheet::StylesheetSource;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::icon::IconRegistry;

/// A source of icon metadata.
pub trait MetadataSource {
    /// Path the metadata is read from.
    fn path(&self) -> &Path;

    /// Parses already-read metadata text.
    fn parse(&self, text: &str) -> Result<IconRegistry>;

    /// Reads and parses the metadata.
    fn load(&self) -> Result<IconRegistry> {
        let text = read_metadata(self.path())?;
        let registry = self.parse(&text)?;
        log::debug!(
            "parsed {} icons from '{}'",
            registry.len(),
            self.path().display()
        );
        Ok(registry)
    }
}

/// The two supported metadata shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum MetadataKind {
    Stylesheet,
    Catalog,
}

impl MetadataKind {
    /// Guesses the kind from the file extension: `.json` is a catalog,
    /// anything else a stylesheet.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Catalog,
            _ => Self::Stylesheet,
        }
    }
}

fn read_metadata(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::MetadataUnavailable {
        path: PathBuf::from(path),
        source,
    })
}

/// Parses one hexadecimal code point such as `f013`.
pub(crate) fn parse_codepoint(hex: &str) -> Result<char> {
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| Error::MalformedMetadata(format!("invalid code point '{hex}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_kind_from_extension() {
        assert_eq!(MetadataKind::infer(Path::new("icons.json")), MetadataKind::Catalog);
        assert_eq!(MetadataKind::infer(Path::new("icons.JSON")), MetadataKind::Catalog);
        assert_eq!(
            MetadataKind::infer(Path::new("css/font-awesome.css")),
            MetadataKind::Stylesheet
        );
        assert_eq!(MetadataKind::infer(Path::new("metadata")), MetadataKind::Stylesheet);
    }

    #[test]
    fn parse_codepoint_accepts_hex() {
        assert_eq!(parse_codepoint("f013").unwrap(), '\u{f013}');
        assert_eq!(parse_codepoint("2795").unwrap(), '\u{2795}');
        assert_eq!(parse_codepoint("1F600").unwrap(), '\u{1f600}');
    }

    #[test]
    fn parse_codepoint_rejects_garbage() {
        assert!(matches!(parse_codepoint("zz"), Err(Error::MalformedMetadata(_))));
        // Surrogates are not scalar values.
        assert!(matches!(parse_codepoint("d800"), Err(Error::MalformedMetadata(_))));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let source = StylesheetSource::single("does/not/exist.css", "fa");
        assert!(matches!(source.load(), Err(Error::MetadataUnavailable { .. })));
    }
}
