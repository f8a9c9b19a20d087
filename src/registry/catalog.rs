//! JSON catalog-backed icon metadata.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{MetadataSource, parse_codepoint};
use crate::error::{Error, Result};
use crate::icon::{DEFAULT_STYLE, IconEntry, IconRegistry};

/// One record of the catalog. Fields other than these are ignored.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(default)]
    styles: Vec<String>,
    unicode: String,
}

/// Reads a catalog of the form
///
/// ```json
/// {
///   "address-book": { "styles": ["solid", "regular"], "unicode": "f2b9", "label": "Address Book" },
///   "github": { "styles": ["brands"], "unicode": "f09b" }
/// }
/// ```
///
/// Records without `styles` fall back to [`DEFAULT_STYLE`].
#[derive(Debug, Clone)]
pub struct CatalogSource {
    path: PathBuf,
}

impl CatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataSource for CatalogSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, text: &str) -> Result<IconRegistry> {
        let records: BTreeMap<String, CatalogRecord> = serde_json::from_str(text)
            .map_err(|e| Error::MalformedMetadata(format!("{}: {e}", self.path.display())))?;

        if records.is_empty() {
            return Err(Error::MalformedMetadata(format!(
                "no icons found in '{}'",
                self.path.display()
            )));
        }

        let mut registry = IconRegistry::new();
        for (name, record) in records {
            if !is_file_name(&name) {
                return Err(Error::MalformedMetadata(format!(
                    "icon name '{name}' cannot be used as a file name"
                )));
            }
            let codepoint = parse_codepoint(record.unicode.trim())?;
            let entry = if record.styles.is_empty() {
                IconEntry::new(name, vec![codepoint], [DEFAULT_STYLE])
            } else {
                IconEntry::new(name, vec![codepoint], record.styles)
            };
            registry.insert(entry);
        }
        Ok(registry)
    }
}

/// Icon names become output file names, so they must stay a single path
/// component.
fn is_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "address-book": {
            "changes": ["4.7", "5.0.0"],
            "label": "Address Book",
            "styles": ["solid", "regular"],
            "unicode": "f2b9"
        },
        "github": { "styles": ["brands"], "unicode": "f09b" },
        "plus-circle": { "unicode": "2795" }
    }"#;

    fn parse(text: &str) -> Result<IconRegistry> {
        CatalogSource::new("metadata/icons.json").parse(text)
    }

    #[test]
    fn parses_records_with_styles() {
        let registry = parse(CATALOG).unwrap();
        assert_eq!(registry.len(), 3);

        let book = &registry.get("address-book").unwrap()[0];
        assert_eq!(book.codepoints, vec!['\u{f2b9}']);
        assert!(book.has_style("solid"));
        assert!(book.has_style("regular"));

        let github = &registry.get("github").unwrap()[0];
        assert!(github.has_style("brands"));
        assert_eq!(registry.render_count(), 4);
    }

    #[test]
    fn missing_styles_use_default() {
        let registry = parse(CATALOG).unwrap();
        assert!(registry.get("plus-circle").unwrap()[0].has_style(DEFAULT_STYLE));
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(parse("{ not json"), Err(Error::MalformedMetadata(_))));
        assert!(matches!(parse("[]"), Err(Error::MalformedMetadata(_))));
    }

    #[test]
    fn empty_catalog_is_malformed() {
        assert!(matches!(parse("{}"), Err(Error::MalformedMetadata(_))));
    }

    #[test]
    fn bad_unicode_is_malformed() {
        let result = parse(r#"{ "x": { "styles": ["solid"], "unicode": "nothex" } }"#);
        assert!(matches!(result, Err(Error::MalformedMetadata(_))));
    }

    #[test]
    fn names_that_leave_the_output_dir_are_malformed() {
        for name in ["../escape", "nested/icon", "win\\\\dir", "..", "."] {
            let json = format!(r#"{{ "{name}": {{ "styles": ["solid"], "unicode": "f013" }} }}"#);
            assert!(
                matches!(parse(&json), Err(Error::MalformedMetadata(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn plain_names_are_file_names() {
        assert!(is_file_name("address-book"));
        assert!(is_file_name("500px"));
        assert!(!is_file_name(""));
        assert!(!is_file_name("a/b"));
        assert!(!is_file_name("a\\b"));
    }
}
