//! Icon metadata types.
//!
//! An icon font addresses each glyph by code point; the registry maps the
//! human-readable icon names found in a stylesheet or catalog onto those code
//! points, together with the font styles the icon can be rendered in.

use std::collections::{BTreeMap, BTreeSet};

/// Style tag used when the metadata source does not name one.
pub const DEFAULT_STYLE: &str = "regular";

/// Sentinel selecting every icon or every style.
pub const SELECT_ALL: &str = "all";

/// A single named icon.
///
/// Most icons map to one code point. Composite icons carry several, which are
/// drawn as one glyph string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    /// Icon name without any selector prefix, e.g. `plus-circle`.
    pub name: String,

    /// Code points drawn for this icon, in order.
    pub codepoints: Vec<char>,

    /// Style tags (font variants) the icon exists in.
    pub styles: BTreeSet<String>,
}

impl IconEntry {
    pub fn new<I, S>(name: impl Into<String>, codepoints: Vec<char>, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            codepoints,
            styles: styles.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the string handed to the glyph layout.
    pub fn glyph_text(&self) -> String {
        self.codepoints.iter().collect()
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.styles.contains(style)
    }
}

/// A name or style filter: either everything or an explicit set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    /// Parses a comma-separated list. The `all` sentinel anywhere in the list
    /// selects everything.
    pub fn parse(list: &str) -> Self {
        let names: BTreeSet<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        if names.contains(SELECT_ALL) {
            Self::All
        } else {
            Self::Only(names)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(name),
        }
    }
}

/// Deduplicated icon metadata, keyed by icon name.
///
/// A name usually resolves to one entry. When the same name is bound to
/// different code points in different styles, each binding is kept as its own
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconRegistry {
    entries: BTreeMap<String, Vec<IconEntry>>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    ///
    /// An entry with the same name and code points merges its styles into the
    /// existing one. Otherwise the new binding replaces earlier bindings of
    /// that name for the styles it carries, so the last rule wins per style.
    pub fn insert(&mut self, entry: IconEntry) {
        let bindings = self.entries.entry(entry.name.clone()).or_default();

        if let Some(same) = bindings.iter_mut().find(|e| e.codepoints == entry.codepoints) {
            same.styles.extend(entry.styles);
            return;
        }

        for existing in bindings.iter_mut() {
            existing.styles.retain(|s| !entry.styles.contains(s));
        }
        bindings.retain(|e| !e.styles.is_empty());
        bindings.push(entry);
    }

    /// Returns the entries bound to `name`.
    pub fn get(&self, name: &str) -> Option<&[IconEntry]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Number of distinct icon names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over every entry, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &IconEntry> {
        self.entries.values().flatten()
    }

    /// All style tags referenced by at least one entry.
    pub fn styles(&self) -> BTreeSet<String> {
        self.iter().flat_map(|e| e.styles.iter().cloned()).collect()
    }

    /// Number of (icon, style) combinations, i.e. images a batch will write.
    pub fn render_count(&self) -> usize {
        self.iter().map(|e| e.styles.len()).sum()
    }

    /// Returns the subset matching both filters.
    ///
    /// Entries keep only the selected styles; entries left without any style
    /// are dropped.
    pub fn filter(&self, icons: &Selection, styles: &Selection) -> IconRegistry {
        let mut filtered = IconRegistry::new();
        for entry in self.iter().filter(|e| icons.contains(&e.name)) {
            let kept: BTreeSet<String> = entry
                .styles
                .iter()
                .filter(|s| styles.contains(s))
                .cloned()
                .collect();
            if kept.is_empty() {
                continue;
            }
            filtered.insert(IconEntry {
                styles: kept,
                ..entry.clone()
            });
        }
        filtered
    }
}

impl<'a> IntoIterator for &'a IconRegistry {
    type Item = &'a IconEntry;
    type IntoIter = std::iter::Flatten<std::collections::btree_map::Values<'a, String, Vec<IconEntry>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values().flatten()
    }
}

impl FromIterator<IconEntry> for IconRegistry {
    fn from_iter<T: IntoIterator<Item = IconEntry>>(iter: T) -> Self {
        let mut registry = IconRegistry::new();
        for entry in iter {
            registry.insert(entry);
        }
        registry
    }
}
