use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Problems found while turning files on disk into catalog entries.
///
/// None of these abort a load: the offending document is skipped and the
/// error is handed back to the caller alongside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{}: missing required field '{field}'", path.display())]
    MissingField { path: PathBuf, field: String },

    #[error(
        "{}: duplicate skill name '{name}' (first defined in {})",
        path.display(),
        first.display()
    )]
    DuplicateName {
        name: String,
        path: PathBuf,
        first: PathBuf,
    },

    #[error("{}: unreadable: {reason}", path.display())]
    UnreadablePath { path: PathBuf, reason: String },

    #[error("{}: malformed header: {reason}", path.display())]
    MalformedHeader { path: PathBuf, reason: String },
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::MissingField { .. } => ErrorKind::MissingField,
            CatalogError::DuplicateName { .. } => ErrorKind::DuplicateName,
            CatalogError::UnreadablePath { .. } => ErrorKind::UnreadablePath,
            CatalogError::MalformedHeader { .. } => ErrorKind::MalformedHeader,
        }
    }

    /// The file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            CatalogError::MissingField { path, .. }
            | CatalogError::DuplicateName { path, .. }
            | CatalogError::UnreadablePath { path, .. }
            | CatalogError::MalformedHeader { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingField,
    DuplicateName,
    UnreadablePath,
    MalformedHeader,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingField => write!(f, "missing-field"),
            ErrorKind::DuplicateName => write!(f, "duplicate-name"),
            ErrorKind::UnreadablePath => write!(f, "unreadable-path"),
            ErrorKind::MalformedHeader => write!(f, "malformed-header"),
        }
    }
}
