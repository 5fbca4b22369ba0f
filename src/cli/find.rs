use std::path::Path;

use anyhow::Result;
use tracing::debug;

use super::{load, print_entry_lines, print_json, OutputFormat};
use crate::config::Config;
use crate::lookup::{find, Query};

pub fn run(query: &str, root: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let query: Query = query.parse()?;
    let report = load(root, config)?;
    let matches = find(&report.catalog, &query);
    debug!(query = %query, matches = matches.len(), "Lookup finished");

    match format {
        OutputFormat::Json => print_json(&matches)?,
        OutputFormat::Text => {
            if matches.is_empty() {
                println!("No skills match {}", query);
            } else {
                print_entry_lines(matches);
            }
        }
    }

    Ok(())
}
