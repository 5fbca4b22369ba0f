use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use super::{load, print_json, OutputFormat};
use crate::config::Config;
use crate::validator::{Severity, ValidationReport, Validator};

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    entries: usize,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

pub fn run(
    root: Option<&Path>,
    config: &Config,
    fail_on: Severity,
    format: OutputFormat,
) -> Result<()> {
    let loaded = load(root, config)?;
    let report = Validator::new(config.validation.clone())
        .validate(&loaded.catalog)
        .with_load_errors(&loaded.errors);
    let passed = report.passes(fail_on);

    match format {
        OutputFormat::Json => print_json(&JsonReport {
            passed,
            entries: loaded.catalog.len(),
            report: &report,
        })?,
        OutputFormat::Text => {
            println!("Checked {} skill(s)", loaded.catalog.len());
            report.print();
        }
    }

    if !passed {
        let errors = report.count(Severity::Error);
        if errors > 0 {
            bail!("{} validation error(s) found", errors);
        }
        bail!(
            "{} validation issue(s) at '{}' or worse found",
            report.failing(fail_on),
            fail_on
        );
    }

    Ok(())
}
