//! In-memory skill catalog.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use serde::Serialize;

/// A loaded skill document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Skill name (unique within a catalog).
    pub name: String,
    pub description: String,
    /// Normalized tags: trimmed, lowercased, deduplicated.
    pub tags: BTreeSet<String>,
    /// Markdown body after the header.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// File the entry was loaded from.
    pub path: PathBuf,
    /// Header fields other than name, description and tags.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Entry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tags: BTreeSet::new(),
            body: String::new(),
            path: PathBuf::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .filter_map(|t| normalize_tag(t.as_ref()))
            .collect();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        normalize_tag(tag).is_some_and(|t| self.tags.contains(&t))
    }
}

/// Canonical form of a tag, or `None` if it is blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim().trim_start_matches('#').trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_lowercase())
    }
}

/// Entries in discovery order, indexed by name and by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
    by_tag: BTreeMap<String, Vec<usize>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. If the name is already taken the catalog is left
    /// unchanged and the rejected entry is handed back.
    pub fn insert(&mut self, entry: Entry) -> Result<(), Entry> {
        if self.by_name.contains_key(&entry.name) {
            return Err(entry);
        }
        let idx = self.entries.len();
        self.by_name.insert(entry.name.clone(), idx);
        for tag in &entry.tags {
            self.by_tag.entry(tag.clone()).or_default().push(idx);
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Entries carrying `tag`, in discovery order.
    pub fn with_tag(&self, tag: &str) -> Vec<&Entry> {
        let Some(tag) = normalize_tag(tag) else {
            return Vec::new();
        };
        self.by_tag
            .get(&tag)
            .map(|idxs| idxs.iter().map(|&idx| &self.entries[idx]).collect())
            .unwrap_or_default()
    }

    /// Names of the entries carrying `tag`.
    pub fn names_with_tag(&self, tag: &str) -> BTreeSet<&str> {
        self.with_tag(tag)
            .into_iter()
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Every tag with the number of entries carrying it, sorted by tag.
    pub fn tags(&self) -> Vec<(&str, usize)> {
        self.by_tag
            .iter()
            .map(|(tag, idxs)| (tag.as_str(), idxs.len()))
            .collect()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Catalog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
