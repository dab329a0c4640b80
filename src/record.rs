//! Redirect records and the lookup table built from them.

use std::collections::HashMap;

use serde::Deserialize;

/// One routing rule: requests for `path` are redirected to `url`.
///
/// Both fields default to the empty string when absent from the source
/// document, and unknown fields are ignored. `url` is opaque; it is never
/// validated or normalized.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Record {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: String,
}

impl Record {
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self { path: path.into(), url: url.into() }
    }
}

/// Exact-match path → url lookup table.
///
/// Built once at startup and only read afterwards. Entries whose url is the
/// empty string are kept but never match: [`Table::lookup`] treats them the
/// same as an absent path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Table {
    entries: HashMap<String, String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from records in order. When several records share a
    /// path, the one that comes last wins.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        records.into_iter().map(|r| (r.path, r.url)).collect()
    }

    /// The url `path` redirects to, if it has a non-empty one.
    ///
    /// Matching is byte-for-byte against the already percent-decoded request
    /// path: no case folding, no trailing-slash normalization.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.entries.get(path)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    /// Number of distinct paths, including ones mapped to an empty url.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, String>> for Table {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Table {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries = HashMap::new();
        for (path, url) in iter {
            entries.insert(path.into(), url.into());
        }
        Self { entries }
    }
}
