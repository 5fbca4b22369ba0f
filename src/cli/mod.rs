pub mod config_check;
pub mod find;
pub mod list;
pub mod show;
pub mod tags;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::catalog::Entry;
use crate::config::Config;
use crate::loader::{LoadReport, Loader};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Load the catalog at `root`, falling back to the configured library root.
pub(crate) fn load(root: Option<&Path>, config: &Config) -> Result<LoadReport> {
    let root: PathBuf = root
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.catalog.root.clone());
    let loader = Loader::from_config(&config.catalog)?;
    Ok(loader.load(&root))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn format_tags(entry: &Entry) -> String {
    entry
        .tags
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One aligned line per entry: name, tags, description.
pub(crate) fn print_entry_lines<'a>(entries: impl IntoIterator<Item = &'a Entry>) {
    let entries: Vec<&Entry> = entries.into_iter().collect();
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in entries {
        let tags = format_tags(entry);
        if tags.is_empty() {
            println!("{:width$}  {}", entry.name, entry.description, width = width);
        } else {
            println!(
                "{:width$}  [{}] {}",
                entry.name,
                tags,
                entry.description,
                width = width
            );
        }
    }
}
