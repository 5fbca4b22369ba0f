use std::path::Path;

use anyhow::Result;

use super::{load, print_entry_lines, print_json, OutputFormat};
use crate::config::Config;

pub fn run(root: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let report = load(root, config)?;

    match format {
        OutputFormat::Json => print_json(&report.catalog)?,
        OutputFormat::Text => {
            if report.catalog.is_empty() {
                println!("No skills found.");
            } else {
                print_entry_lines(&report.catalog);
                println!(
                    "\n{} skill(s), {} skipped",
                    report.catalog.len(),
                    report.errors.len()
                );
            }
        }
    }

    Ok(())
}
