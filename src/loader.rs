//! Skill document discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Entry};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, ErrorKind};
use crate::frontmatter::{parse_document, HeaderError};

/// Outcome of a load: whatever could be loaded plus everything that was skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub catalog: Catalog,
    pub errors: Vec<CatalogError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind() == kind).count()
    }
}

pub struct Loader {
    patterns: Vec<Pattern>,
    exclude: Vec<Pattern>,
    include_hidden: bool,
    respect_gitignore: bool,
    infer_names: bool,
}

impl Default for Loader {
    fn default() -> Self {
        let defaults = CatalogConfig::default();
        Self {
            patterns: compile_lenient(&defaults.patterns),
            exclude: compile_lenient(&defaults.exclude),
            include_hidden: defaults.include_hidden,
            respect_gitignore: defaults.respect_gitignore,
            infer_names: defaults.infer_names,
        }
    }
}

fn compile_lenient(patterns: &[String]) -> Vec<Pattern> {
    patterns.iter().filter_map(|p| Pattern::new(p).ok()).collect()
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid file pattern '{}'", p)))
        .collect()
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Ok(Self {
            patterns: compile(&config.patterns)?,
            exclude: compile(&config.exclude)?,
            include_hidden: config.include_hidden,
            respect_gitignore: config.respect_gitignore,
            infer_names: config.infer_names,
        })
    }

    pub fn infer_names(mut self, yes: bool) -> Self {
        self.infer_names = yes;
        self
    }

    /// Load every skill document under `root` into a fresh catalog.
    ///
    /// Documents that cannot be read, have a malformed header, lack a name or
    /// description, or reuse a name already loaded are skipped and reported.
    /// Files without a header are not skill documents and are skipped silently.
    /// The first document in discovery order keeps a contested name.
    pub fn load(&self, root: &Path) -> LoadReport {
        let mut report = LoadReport::default();
        let (files, walk_errors) = self.discover(root);
        report.errors.extend(walk_errors);

        for path in files {
            let entry = match self.load_file(&path) {
                Ok(Some(entry)) => entry,
                Ok(None) => continue,
                Err(e) => {
                    warn!(path = %path.display(), "Skipping skill: {e}");
                    report.errors.push(e);
                    continue;
                }
            };

            if let Err(rejected) = report.catalog.insert(entry) {
                let first = report
                    .catalog
                    .get(&rejected.name)
                    .map(|e| e.path.clone())
                    .unwrap_or_default();
                let err = CatalogError::DuplicateName {
                    name: rejected.name,
                    path: rejected.path,
                    first,
                };
                warn!("Skipping skill: {err}");
                report.errors.push(err);
                continue;
            }
            debug!(path = %path.display(), "Loaded skill");
        }

        info!(
            root = %root.display(),
            entries = report.catalog.len(),
            errors = report.errors.len(),
            "Catalog loaded"
        );
        report
    }

    /// Candidate files under `root`, in discovery order (sorted by file name
    /// at each directory level).
    pub fn discover(&self, root: &Path) -> (Vec<PathBuf>, Vec<CatalogError>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();

        if !root.exists() {
            errors.push(CatalogError::UnreadablePath {
                path: root.to_path_buf(),
                reason: "no such file or directory".to_string(),
            });
            return (files, errors);
        }

        if root.is_file() {
            files.push(root.to_path_buf());
            return (files, errors);
        }

        let walker = WalkBuilder::new(root)
            .hidden(!self.include_hidden)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .git_global(false)
            .ignore(self.respect_gitignore)
            .parents(false)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            match result {
                Ok(dent) => {
                    let is_file = dent.file_type().is_some_and(|ft| ft.is_file());
                    if is_file && self.is_candidate(root, dent.path()) {
                        files.push(dent.into_path());
                    }
                }
                Err(err) => {
                    let path = walk_error_path(&err).unwrap_or_else(|| root.to_path_buf());
                    warn!(path = %path.display(), "Cannot walk: {err}");
                    errors.push(CatalogError::UnreadablePath {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        debug!(root = %root.display(), candidates = files.len(), "Discovered skill files");
        (files, errors)
    }

    fn is_candidate(&self, root: &Path, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let relative = path.strip_prefix(root).unwrap_or(path);
        let matches = |p: &Pattern| p.matches(file_name) || p.matches_path(relative);

        self.patterns.iter().any(matches) && !self.exclude.iter().any(matches)
    }

    /// Read and parse a single document into an entry. `Ok(None)` means the
    /// file has no header at all, so it is not a skill document.
    pub fn load_file(&self, path: &Path) -> Result<Option<Entry>, CatalogError> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::UnreadablePath {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let doc = match parse_document(&content) {
            Ok(doc) => doc,
            Err(HeaderError::MissingOpening) => {
                debug!(path = %path.display(), "No header, not a skill document");
                return Ok(None);
            }
            Err(e) => {
                return Err(CatalogError::MalformedHeader {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let name = match doc.name() {
            Some(name) => name,
            None if self.infer_names => match infer_name(path) {
                Some(name) => {
                    debug!(path = %path.display(), name = %name, "Inferred skill name");
                    name
                }
                None => return Err(missing(path, "name")),
            },
            None => return Err(missing(path, "name")),
        };
        let description = doc.description().ok_or_else(|| missing(path, "description"))?;

        Ok(Some(
            Entry::new(name, description)
                .with_tags(doc.tags())
                .with_metadata(doc.extra())
                .with_body(doc.body)
                .with_path(path),
        ))
    }
}

fn missing(path: &Path, field: &str) -> CatalogError {
    CatalogError::MissingField {
        path: path.to_path_buf(),
        field: field.to_string(),
    }
}

/// `skills/review-pr/SKILL.md` → `review-pr`; `docker.skill.md` → `docker`.
fn infer_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = if file_name.eq_ignore_ascii_case("SKILL.md") {
        path.parent()?.file_name()?.to_str()?
    } else {
        let stem = path.file_stem()?.to_str()?;
        stem.strip_suffix(".skill").unwrap_or(stem)
    };
    let name = name.trim();
    (!name.is_empty() && name != ".").then(|| name.to_string())
}

fn walk_error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        _ => None,
    }
}

/// Load `root` with default discovery settings.
pub fn load_catalog(root: &Path) -> LoadReport {
    Loader::new().load(root)
}
