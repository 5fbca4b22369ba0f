//! Name, tag and keyword queries over a catalog.

use std::fmt;
use std::str::FromStr;

use crate::catalog::{normalize_tag, Catalog, Entry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Exact, case-sensitive name.
    Name(String),
    /// Entries whose tag set contains the (normalized) tag.
    Tag(String),
    /// Case-insensitive substring over name, description and tags.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("empty query")]
    Empty,
    #[error("empty value after '{0}'")]
    EmptyValue(String),
}

impl FromStr for Query {
    type Err = QueryError;

    /// `tag:rust`, `#rust`, `name:react-hooks`, `text:docker compose`, or a bare name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(QueryError::Empty);
        }

        let (prefix, value) = if let Some(rest) = s.strip_prefix('#') {
            ("#", rest)
        } else if let Some((prefix, rest)) = s.split_once(':') {
            match prefix.trim().to_lowercase().as_str() {
                "tag" => ("tag:", rest),
                "name" => ("name:", rest),
                "text" => ("text:", rest),
                _ => return Ok(Query::Name(s.to_string())),
            }
        } else {
            return Ok(Query::Name(s.to_string()));
        };

        let value = value.trim();
        if value.is_empty() {
            return Err(QueryError::EmptyValue(prefix.to_string()));
        }
        Ok(match prefix {
            "#" | "tag:" => Query::Tag(value.to_string()),
            "text:" => Query::Text(value.to_string()),
            _ => Query::Name(value.to_string()),
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Name(name) => write!(f, "name:{}", name),
            Query::Tag(tag) => write!(f, "tag:{}", tag),
            Query::Text(text) => write!(f, "text:{}", text),
        }
    }
}

/// Entries matching `query`, in discovery order.
pub fn find<'a>(catalog: &'a Catalog, query: &Query) -> Vec<&'a Entry> {
    match query {
        Query::Name(name) => catalog.get(name).into_iter().collect(),
        Query::Tag(tag) => catalog.with_tag(tag),
        Query::Text(text) => {
            let needle = text.to_lowercase();
            catalog
                .iter()
                .filter(|e| matches_text(e, &needle))
                .collect()
        }
    }
}

fn matches_text(entry: &Entry, needle: &str) -> bool {
    entry.name.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
        || normalize_tag(needle).is_some_and(|t| entry.tags.iter().any(|tag| tag.contains(&t)))
}
