use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::catalog::{Catalog, Entry};
use crate::config::ValidationConfig;
use crate::error::CatalogError;

static KEBAB_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub severity: Severity,
    pub category: String,
    /// Entry the violation is about; `None` for file-level problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    pub path: PathBuf,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Ordered from most to least severe, so `a <= b` means `a` is at least as severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error, // Must fix
    Warning, // Should fix
    Info,    // Nice to have
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// Violations at `fail_on` severity or worse.
    pub fn failing(&self, fail_on: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity <= fail_on)
            .count()
    }

    /// True when nothing reaches the `fail_on` threshold.
    pub fn passes(&self, fail_on: Severity) -> bool {
        self.failing(fail_on) == 0
    }

    pub fn for_entry<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.entry.as_deref() == Some(name))
    }

    /// Fold loader errors in as `load` errors, ahead of catalog violations.
    pub fn with_load_errors(mut self, errors: &[CatalogError]) -> Self {
        let mut load: Vec<Violation> = errors
            .iter()
            .map(|e| Violation {
                severity: Severity::Error,
                category: format!("load/{}", e.kind()),
                entry: match e {
                    CatalogError::DuplicateName { name, .. } => Some(name.clone()),
                    _ => None,
                },
                path: e.path().to_path_buf(),
                message: e.to_string(),
                suggestion: None,
            })
            .collect();
        load.append(&mut self.violations);
        self.violations = load;
        self
    }

    /// Print violations grouped by severity
    pub fn print(&self) {
        if self.violations.is_empty() {
            println!("✅ No validation issues found!");
            return;
        }

        println!("\n📋 Skill Catalog Validation Results:\n");

        for (severity, heading) in [
            (Severity::Error, "❌ Errors"),
            (Severity::Warning, "⚠️  Warnings"),
            (Severity::Info, "ℹ️  Info"),
        ] {
            let group: Vec<_> = self
                .violations
                .iter()
                .filter(|v| v.severity == severity)
                .collect();
            if group.is_empty() {
                continue;
            }
            println!("{} ({}):", heading, group.len());
            for v in group {
                match &v.entry {
                    Some(name) => println!("   • [{}] {}: {}", v.category, name, v.message),
                    None => println!("   • [{}] {}", v.category, v.message),
                }
                if let Some(suggestion) = &v.suggestion {
                    println!("     💡 {}", suggestion);
                }
            }
            println!();
        }

        println!(
            "Summary: {} errors, {} warnings, {} info",
            self.count(Severity::Error),
            self.count(Severity::Warning),
            self.count(Severity::Info)
        );
    }
}

pub struct Validator {
    rules: ValidationConfig,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl Validator {
    pub fn new(rules: ValidationConfig) -> Self {
        Self { rules }
    }

    /// Check every entry of the catalog against the rules.
    pub fn validate(&self, catalog: &Catalog) -> ValidationReport {
        let mut violations = Vec::new();

        for entry in catalog {
            violations.extend(self.check_fields(entry));
            violations.extend(self.check_tags(entry));
            violations.extend(self.check_name(entry));
            violations.extend(self.check_description(entry));
            violations.extend(self.check_body(entry));
        }
        violations.extend(self.check_name_collisions(catalog));

        ValidationReport { violations }
    }

    fn violation(
        entry: &Entry,
        severity: Severity,
        category: &str,
        message: String,
        suggestion: Option<String>,
    ) -> Violation {
        Violation {
            severity,
            category: category.to_string(),
            entry: Some(entry.name.clone()),
            path: entry.path.clone(),
            message,
            suggestion,
        }
    }

    fn check_fields(&self, entry: &Entry) -> Vec<Violation> {
        let mut issues = Vec::new();

        // The loader refuses entries without these, but catalogs can be built by hand.
        if entry.name.trim().is_empty() {
            issues.push(Self::violation(
                entry,
                Severity::Error,
                "fields",
                "Missing required field: name".to_string(),
                Some("Add 'name: <value>' to the header".to_string()),
            ));
        }
        if entry.description.trim().is_empty() {
            issues.push(Self::violation(
                entry,
                Severity::Error,
                "fields",
                "Missing required field: description".to_string(),
                Some("Add 'description: <value>' to the header".to_string()),
            ));
        }

        for field in &self.rules.required_fields {
            let key = field.trim().to_lowercase();
            if matches!(key.as_str(), "name" | "description" | "tags") {
                continue;
            }
            let present = entry
                .metadata
                .get(&key)
                .is_some_and(|v| !v.trim().is_empty());
            if !present {
                issues.push(Self::violation(
                    entry,
                    Severity::Error,
                    "fields",
                    format!("Missing required field: {}", key),
                    Some(format!("Add '{}: <value>' to the header", key)),
                ));
            }
        }

        issues
    }

    fn check_tags(&self, entry: &Entry) -> Vec<Violation> {
        if self.rules.require_tags && entry.tags.is_empty() {
            return vec![Self::violation(
                entry,
                Severity::Error,
                "tags",
                "No tags".to_string(),
                Some("Add 'tags: [topic, stack]' so the skill can be found by tag".to_string()),
            )];
        }
        Vec::new()
    }

    fn check_name(&self, entry: &Entry) -> Vec<Violation> {
        if entry.name.is_empty() || KEBAB_CASE.is_match(&entry.name) {
            return Vec::new();
        }
        vec![Self::violation(
            entry,
            Severity::Warning,
            "name",
            format!("Name '{}' is not kebab-case", entry.name),
            Some("Use lowercase letters, digits and single hyphens (e.g. 'react-hooks')".to_string()),
        )]
    }

    fn check_description(&self, entry: &Entry) -> Vec<Violation> {
        let len = entry.description.trim().chars().count();
        if len == 0 {
            return Vec::new();
        }
        if len < self.rules.min_description_len {
            return vec![Self::violation(
                entry,
                Severity::Warning,
                "description",
                format!(
                    "Description is very short ({} chars, minimum {})",
                    len, self.rules.min_description_len
                ),
                Some("Say what the skill covers and when to use it".to_string()),
            )];
        }
        if len > self.rules.max_description_len {
            return vec![Self::violation(
                entry,
                Severity::Warning,
                "description",
                format!(
                    "Description is too long ({} chars, maximum {})",
                    len, self.rules.max_description_len
                ),
                Some("Move detail into the body".to_string()),
            )];
        }
        Vec::new()
    }

    fn check_body(&self, entry: &Entry) -> Vec<Violation> {
        if entry.body.trim().is_empty() {
            return vec![Self::violation(
                entry,
                Severity::Warning,
                "body",
                "Body is empty".to_string(),
                Some("Add instructions and examples after the header".to_string()),
            )];
        }
        if !entry.body.contains("```") {
            return vec![Self::violation(
                entry,
                Severity::Info,
                "body",
                "No code examples found".to_string(),
                Some("Add at least one fenced code example".to_string()),
            )];
        }
        Vec::new()
    }

    /// Names are unique byte-for-byte; flag those that differ only by case.
    fn check_name_collisions(&self, catalog: &Catalog) -> Vec<Violation> {
        let mut seen: HashMap<String, &Entry> = HashMap::new();
        let mut issues = Vec::new();

        for entry in catalog {
            let folded = entry.name.to_lowercase();
            match seen.get(&folded) {
                Some(first) => issues.push(Self::violation(
                    entry,
                    Severity::Error,
                    "name",
                    format!(
                        "Name '{}' collides with '{}' ({}) ignoring case",
                        entry.name,
                        first.name,
                        first.path.display()
                    ),
                    Some("Rename one of the skills".to_string()),
                )),
                None => {
                    seen.insert(folded, entry);
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_entry(name: &str) -> Entry {
        Entry::new(name, "Patterns for writing reliable things")
            .with_tags(["testing"])
            .with_body("## Usage\n\n```sh\nrun\n```\n")
    }

    #[test]
    fn test_clean_entry_passes() {
        let mut catalog = Catalog::new();
        catalog.insert(good_entry("react-hooks")).unwrap();
        let report = Validator::default().validate(&catalog);
        assert!(report.violations.is_empty(), "{:?}", report.violations);
        assert!(report.passes(Severity::Warning));
    }

    #[test]
    fn test_empty_tags_is_error() {
        let mut catalog = Catalog::new();
        catalog
            .insert(good_entry("a").with_tags(Vec::<String>::new()))
            .unwrap();
        let report = Validator::default().validate(&catalog);
        assert_eq!(report.count(Severity::Error), 1);
        assert_eq!(report.violations[0].category, "tags");
        assert!(!report.passes(Severity::Error));
    }

    #[test]
    fn test_empty_tags_allowed_when_not_required() {
        let rules = ValidationConfig {
            require_tags: false,
            ..ValidationConfig::default()
        };
        let mut catalog = Catalog::new();
        catalog
            .insert(good_entry("a").with_tags(Vec::<String>::new()))
            .unwrap();
        assert!(Validator::new(rules).validate(&catalog).passes(Severity::Warning));
    }

    #[test]
    fn test_required_metadata_field() {
        let rules = ValidationConfig {
            required_fields: vec!["Version".to_string()],
            ..ValidationConfig::default()
        };
        let mut catalog = Catalog::new();
        catalog.insert(good_entry("a")).unwrap();
        let mut meta = std::collections::BTreeMap::new();
        meta.insert("version".to_string(), "1.0.0".to_string());
        catalog.insert(good_entry("b").with_metadata(meta)).unwrap();

        let report = Validator::new(rules).validate(&catalog);
        let errors: Vec<_> = report.for_entry("a").collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Missing required field: version");
        assert_eq!(report.for_entry("b").count(), 0);
    }

    #[test]
    fn test_hand_built_entry_without_description() {
        let mut catalog = Catalog::new();
        catalog
            .insert(Entry::new("a", "  ").with_tags(["x"]).with_body("```\n```"))
            .unwrap();
        let report = Validator::default().validate(&catalog);
        assert_eq!(report.count(Severity::Error), 1);
        assert!(report.violations[0].message.contains("description"));
    }

    #[test]
    fn test_name_style_warning() {
        let mut catalog = Catalog::new();
        catalog.insert(good_entry("React_Hooks")).unwrap();
        let report = Validator::default().validate(&catalog);
        assert_eq!(report.count(Severity::Warning), 1);
        assert!(report.passes(Severity::Error));
        assert!(!report.passes(Severity::Warning));
    }

    #[test]
    fn test_description_length_bounds() {
        let mut catalog = Catalog::new();
        for (name, description) in [("short", "tiny".to_string()), ("long", "x".repeat(2000))] {
            catalog
                .insert(
                    Entry::new(name, description)
                        .with_tags(["x"])
                        .with_body("```\n```"),
                )
                .unwrap();
        }
        let report = Validator::default().validate(&catalog);
        assert!(report.for_entry("short").any(|v| v.message.contains("very short")));
        assert!(report.for_entry("long").any(|v| v.message.contains("too long")));
    }

    #[test]
    fn test_body_checks() {
        let mut catalog = Catalog::new();
        catalog.insert(good_entry("empty").with_body("")).unwrap();
        catalog.insert(good_entry("prose").with_body("Only words.")).unwrap();
        let report = Validator::default().validate(&catalog);
        let empty: Vec<_> = report.for_entry("empty").collect();
        assert_eq!(empty[0].severity, Severity::Warning);
        let prose: Vec<_> = report.for_entry("prose").collect();
        assert_eq!(prose[0].severity, Severity::Info);
    }

    #[test]
    fn test_case_insensitive_collision() {
        let mut catalog = Catalog::new();
        catalog.insert(good_entry("docker")).unwrap();
        catalog.insert(good_entry("Docker")).unwrap();
        let report = Validator::default().validate(&catalog);
        let collisions: Vec<_> = report
            .violations
            .iter()
            .filter(|v| v.message.contains("collides"))
            .collect();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].entry.as_deref(), Some("Docker"));
    }

    #[test]
    fn test_load_errors_come_first() {
        let mut catalog = Catalog::new();
        catalog.insert(good_entry("a").with_tags(Vec::<String>::new())).unwrap();
        let errors = vec![CatalogError::UnreadablePath {
            path: PathBuf::from("x.md"),
            reason: "permission denied".to_string(),
        }];
        let report = Validator::default().validate(&catalog).with_load_errors(&errors);
        assert_eq!(report.violations.len(), 2);
        assert_eq!(report.violations[0].category, "load/unreadable-path");
        assert_eq!(report.violations[1].category, "tags");
    }

    #[test]
    fn test_fail_on_threshold() {
        let mut catalog = Catalog::new();
        catalog
            .insert(good_entry("Prose_Only").with_body("Just prose, no example."))
            .unwrap();
        let report = Validator::default().validate(&catalog);
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.count(Severity::Info), 1);

        assert!(report.passes(Severity::Error));
        assert_eq!(report.failing(Severity::Warning), 1);
        assert_eq!(report.failing(Severity::Info), 2);
        assert!(!report.passes(Severity::Info));
    }

    #[test]
    fn test_severity_value_names() {
        assert_eq!(Severity::from_str("warning", true), Ok(Severity::Warning));
        assert!(Severity::from_str("fatal", true).is_err());
        let names: Vec<_> = Severity::value_variants()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["error", "warning", "info"]);
    }
}
