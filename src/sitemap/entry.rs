/// Sitemap entry and priority ordering
///
/// Priorities keep their original text so they can be reported verbatim, but
/// compare numerically whenever both sides parse as finite decimals.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Declared `<priority>` of a sitemap URL
///
/// Ordering rules:
/// - two finite decimals compare numerically (`"0.10" < "0.9"`, `"0.5" == "0.50"`)
/// - a value that doesn't parse, or parses to NaN/infinity, ranks below every
///   parsable value
/// - two unparsable values compare as strings
#[derive(Debug, Clone)]
pub struct Priority(String);

impl Priority {
    /// Priority assumed when a `<url>` has no `<priority>`
    pub const DEFAULT: &'static str = "0.0";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The priority as written in the sitemap
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value, if the text is a finite decimal
    pub fn value(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.value(), other.value()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `<url>` element of a sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Content of `<loc>`
    pub url: String,

    /// Content of `<priority>`, or the default
    pub priority: Priority,
}

impl SitemapEntry {
    pub fn new(url: impl Into<String>, priority: Priority) -> Self {
        Self {
            url: url.into(),
            priority,
        }
    }
}

/// Entries keyed by URL, in first-occurrence order
///
/// Re-inserting a URL replaces its priority but keeps its original position,
/// so ties in the final sort fall back to document order.
#[derive(Debug, Default)]
pub struct EntryMap {
    positions: HashMap<String, usize>,
    entries: Vec<SitemapEntry>,
}

impl EntryMap {
    pub fn insert(&mut self, entry: SitemapEntry) {
        match self.positions.get(&entry.url) {
            Some(&index) => self.entries[index].priority = entry.priority,
            None => {
                self.positions.insert(entry.url.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the map, returning entries by descending priority
    ///
    /// The sort is stable: equal priorities keep first-occurrence order.
    pub fn into_sorted(self) -> Vec<SitemapEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        entries
    }
}
