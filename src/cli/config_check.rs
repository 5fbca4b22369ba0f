use anyhow::Result;
use std::path::Path;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Fail,
}

impl Status {
    fn marker(self) -> &'static str {
        match self {
            Status::Ok => "\u{2713}",
            Status::Warn => "!",
            Status::Fail => "\u{2717}",
        }
    }
}

/// Config diagnostics, in the order they were checked.
#[derive(Debug, Default)]
struct ConfigReport {
    lines: Vec<(Status, String)>,
}

impl ConfigReport {
    fn push(&mut self, status: Status, msg: impl Into<String>) {
        self.lines.push((status, msg.into()));
    }

    fn count(&self, status: Status) -> usize {
        self.lines.iter().filter(|(s, _)| *s == status).count()
    }

    fn messages(&self, status: Status) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(s, _)| *s == status)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let report = check(config_path);
    print_report(&report);
    Ok(())
}

fn check(config_path: Option<&Path>) -> ConfigReport {
    let mut report = ConfigReport::default();

    // 1. Load config. Failures are reported, not propagated.
    let (config, source) = match Config::load_with_source(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            report.push(Status::Fail, format!("Failed to load config: {:#}", e));
            return report;
        }
    };
    match &source {
        Some(path) => report.push(Status::Ok, format!("Config loaded from {}", path.display())),
        None => report.push(Status::Ok, "No config file found, using defaults"),
    }

    // 2. Library root
    let root = &config.catalog.root;
    if root.is_dir() {
        report.push(Status::Ok, format!("Library root: {}", root.display()));
    } else if root.exists() {
        report.push(Status::Warn, format!(
            "Library root {} is a file, only it will be loaded",
            root.display()
        ));
    } else {
        report.push(Status::Fail, format!("Library root {} does not exist", root.display()));
    }

    // 3. Discovery settings
    report.push(Status::Ok, format!(
        "Patterns: {} (excluding {})",
        config.catalog.patterns.join(", "),
        if config.catalog.exclude.is_empty() {
            "nothing".to_string()
        } else {
            config.catalog.exclude.join(", ")
        }
    ));
    if config.catalog.include_hidden {
        report.push(Status::Warn, "include_hidden is on: dot-directories such as .git are walked");
    }
    if !config.catalog.respect_gitignore {
        report.push(Status::Warn, "respect_gitignore is off: ignored files are loaded");
    }

    // 4. Validation rules
    if config.validation.required_fields.is_empty() {
        report.push(Status::Ok, "Required fields: name, description");
    } else {
        report.push(Status::Ok, format!(
            "Required fields: name, description, {}",
            config.validation.required_fields.join(", ")
        ));
    }
    report.push(Status::Ok, format!(
        "Description length: {}..={} chars, tags {}",
        config.validation.min_description_len,
        config.validation.max_description_len,
        if config.validation.require_tags {
            "required"
        } else {
            "optional"
        }
    ));

    report
}

fn print_report(report: &ConfigReport) {
    println!();
    for (status, msg) in &report.lines {
        println!("  {} {}", status.marker(), msg);
    }
    println!();
    println!(
        "{} ok, {} warnings, {} errors",
        report.count(Status::Ok),
        report.count(Status::Warn),
        report.count(Status::Fail)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_explicit_config_is_reported() {
        let report = check(Some(Path::new("/nonexistent/skillshelf.toml")));
        assert_eq!(report.count(Status::Fail), 1);
        assert!(report.messages(Status::Fail)[0].contains("Failed to load config"));
        assert!(run(Some(Path::new("/nonexistent/skillshelf.toml"))).is_ok());
    }

    #[test]
    fn test_explicit_config_with_missing_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skillshelf.toml");
        std::fs::write(
            &path,
            "[catalog]\nroot = \"/nonexistent/skills\"\ninclude_hidden = true\n",
        )
        .unwrap();
        let report = check(Some(path.as_path()));
        assert!(report.lines[0].1.contains("Config loaded from"));
        assert_eq!(report.count(Status::Warn), 1);
        assert_eq!(report.count(Status::Fail), 1);
        assert!(report.messages(Status::Fail)[0].contains("does not exist"));
    }

    #[test]
    fn test_explicit_config_with_valid_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skillshelf.toml");
        let root = dir.path().to_string_lossy().replace('\\', "/");
        std::fs::write(
            &path,
            format!(
                "[catalog]\nroot = \"{}\"\n\n[validation]\nrequired_fields = [\"version\"]\n",
                root
            ),
        )
        .unwrap();
        let report = check(Some(path.as_path()));
        assert_eq!(report.count(Status::Fail), 0, "{:?}", report.lines);
        assert!(report.messages(Status::Ok).iter().any(|m| m.contains("version")));
    }
}
