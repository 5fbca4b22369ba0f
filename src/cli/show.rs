use std::path::Path;

use anyhow::{bail, Result};

use super::{format_tags, load, print_json, OutputFormat};
use crate::config::Config;

pub fn run(name: &str, root: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let report = load(root, config)?;
    let Some(entry) = report.catalog.get(name) else {
        bail!("No skill named '{}'", name);
    };

    match format {
        OutputFormat::Json => print_json(entry)?,
        OutputFormat::Text => {
            println!("name:        {}", entry.name);
            println!("description: {}", entry.description);
            println!("tags:        {}", format_tags(entry));
            println!("path:        {}", entry.path.display());
            for (key, value) in &entry.metadata {
                println!("{:12} {}", format!("{}:", key), value);
            }
            if !entry.body.is_empty() {
                println!();
                print!("{}", entry.body);
                if !entry.body.ends_with('\n') {
                    println!();
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_unknown_name() {
        let dir = TempDir::new().unwrap();
        let result = run("nope", Some(dir.path()), &Config::default(), OutputFormat::Text);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No skill named 'nope'"));
    }

    #[test]
    fn test_run_known_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("a.md"),
            "---\nname: a\ndescription: First skill\nversion: 1.0\n---\nbody",
        )
        .unwrap();
        let result = run("a", Some(dir.path()), &Config::default(), OutputFormat::Text);
        assert!(result.is_ok());
    }
}
