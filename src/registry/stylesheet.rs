//! Stylesheet-backed icon metadata.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::{MetadataSource, parse_codepoint};
use crate::error::{Error, Result};
use crate::icon::{DEFAULT_STYLE, IconEntry, IconRegistry};

/// Reads icon names from stylesheet rules of the form
///
/// ```css
/// .fa-close:before,
/// .fa-remove:before,
/// .fa-times:before {
///   content: "\f00d";
/// }
/// ```
///
/// Every selector line directly above a `content` line is an alias for that
/// code point. The run of aliases ends at the first line that is not a
/// matching selector.
///
/// Each configured selector prefix is bound to a style tag, so one stylesheet
/// can describe several fonts (e.g. `bt` for solid icons and `fab` for brands).
#[derive(Debug, Clone)]
pub struct StylesheetSource {
    path: PathBuf,
    /// Style tag -> selector prefix.
    prefixes: BTreeMap<String, String>,
}

impl StylesheetSource {
    pub fn new(path: impl Into<PathBuf>, prefixes: BTreeMap<String, String>) -> Self {
        Self {
            path: path.into(),
            prefixes,
        }
    }

    /// A stylesheet describing a single font under the default style tag.
    pub fn single(path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        let prefixes = BTreeMap::from([(DEFAULT_STYLE.to_string(), prefix.into())]);
        Self::new(path, prefixes)
    }

    fn selector_patterns(&self) -> Result<Vec<(&str, Regex)>> {
        self.prefixes
            .iter()
            .map(|(style, prefix)| {
                let pattern = format!(r"\.{}-([\w-]+)::?before", regex::escape(prefix));
                Regex::new(&pattern)
                    .map(|re| (style.as_str(), re))
                    .map_err(|e| Error::InvalidArgument(format!("selector prefix '{prefix}': {e}")))
            })
            .collect()
    }
}

impl MetadataSource for StylesheetSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, text: &str) -> Result<IconRegistry> {
        let content = Regex::new(r#"content:\s*["']((?:\\[0-9a-fA-F]{1,6}\s?)+)["']"#)
            .map_err(|e| Error::MalformedMetadata(e.to_string()))?;
        let escape = Regex::new(r"\\([0-9a-fA-F]{1,6})")
            .map_err(|e| Error::MalformedMetadata(e.to_string()))?;
        let selectors = self.selector_patterns()?;

        let lines: Vec<&str> = text.lines().collect();
        let mut registry = IconRegistry::new();
        let mut rules = 0usize;

        for (i, line) in lines.iter().enumerate() {
            let Some(value) = content.captures(line) else {
                continue;
            };
            let codepoints = escape
                .captures_iter(&value[1])
                .map(|c| parse_codepoint(&c[1]))
                .collect::<Result<Vec<char>>>()?;
            rules += 1;

            for (style, selector) in &selectors {
                for previous in lines[..i].iter().rev() {
                    let Some(key) = selector.captures(previous) else {
                        break;
                    };
                    registry.insert(IconEntry::new(&key[1], codepoints.clone(), [*style]));
                }
            }
        }

        if rules == 0 {
            return Err(Error::MalformedMetadata(format!(
                "no content rules found in '{}'",
                self.path.display()
            )));
        }

        Ok(registry)
    }
}
