use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::{load, print_json, OutputFormat};
use crate::config::Config;

#[derive(Serialize)]
struct TagCount<'a> {
    tag: &'a str,
    count: usize,
}

pub fn run(root: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let report = load(root, config)?;
    let tags = report.catalog.tags();

    match format {
        OutputFormat::Json => {
            let counts: Vec<_> = tags
                .iter()
                .map(|&(tag, count)| TagCount { tag, count })
                .collect();
            print_json(&counts)?;
        }
        OutputFormat::Text => print!("{}", format_text(&tags)),
    }

    Ok(())
}

/// Tag names padded to a common width, one per line with their counts.
fn format_text(tags: &[(&str, usize)]) -> String {
    if tags.is_empty() {
        return "No tags found.\n".to_string();
    }
    let width = tags.iter().map(|(t, _)| t.len()).max().unwrap_or(0);
    tags.iter()
        .map(|(tag, count)| format!("{:width$}  {}\n", tag, count, width = width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn library() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("a.md"),
            "---\nname: a\ndescription: First skill\ntags: [Database, sql]\n---\nbody\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.md"),
            "---\nname: b\ndescription: Second skill\ntags: database\n---\nbody\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_format_text_aligns_counts() {
        let text = format_text(&[("database", 2), ("sql", 1)]);
        assert_eq!(text, "database  2\nsql       1\n");
        assert_eq!(format_text(&[]), "No tags found.\n");
    }

    #[test]
    fn test_run_text_and_json() {
        let dir = library();
        let config = Config::default();
        assert!(run(Some(dir.path()), &config, OutputFormat::Text).is_ok());
        assert!(run(Some(dir.path()), &config, OutputFormat::Json).is_ok());
    }

    #[test]
    fn test_json_shape() {
        let dir = library();
        let report = load(Some(dir.path()), &Config::default()).unwrap();
        let counts: Vec<_> = report
            .catalog
            .tags()
            .iter()
            .map(|&(tag, count)| TagCount { tag, count })
            .collect();
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "tag": "database", "count": 2 },
                { "tag": "sql", "count": 1 }
            ])
        );
    }

    #[test]
    fn test_run_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(run(Some(dir.path()), &Config::default(), OutputFormat::Text).is_ok());
    }
}
