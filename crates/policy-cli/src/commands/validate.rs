//! Validate command: discovery and consistency checks, no remote calls

use colored::Colorize;
use serde::Serialize;

use policy_core::{ApiSummary, DiscoveryReport, PolicyScope, PolicySync, ValidationReport};

use crate::config::SyncConfig;
use crate::error::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentEntry {
    target: String,
    scope: PolicyScope,
    file_path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput<'a> {
    valid: bool,
    documents: Vec<DocumentEntry>,
    warnings: &'a [String],
    error: Option<&'a str>,
    violations: &'a [String],
    summaries: &'a [ApiSummary],
}

/// Run the validate command
pub fn run_validate(config: &SyncConfig, json: bool) -> Result<()> {
    let sync = PolicySync::new(config.sync_options());
    let (discovered, validation) = sync.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&render(&discovered, &validation))?);
    } else {
        print_human(&discovered, &validation);
    }

    if validation.is_valid() {
        Ok(())
    } else {
        Err(policy_core::Error::Validation {
            violations: validation.violations,
        }
        .into())
    }
}

fn render<'a>(discovered: &'a DiscoveryReport, validation: &'a ValidationReport) -> ValidateOutput<'a> {
    ValidateOutput {
        valid: validation.is_valid(),
        documents: discovered
            .documents
            .iter()
            .map(|d| DocumentEntry {
                target: d.target(),
                scope: d.scope(),
                file_path: d.file_path().to_string(),
            })
            .collect(),
        warnings: &discovered.warnings,
        error: discovered.error.as_deref(),
        violations: &validation.violations,
        summaries: &validation.summaries,
    }
}

fn print_human(discovered: &DiscoveryReport, validation: &ValidationReport) {
    println!("{} Validating policies...", "=>".blue().bold());

    for document in &discovered.documents {
        println!(
            "   {} {} ({})",
            "-".green(),
            document.target().cyan(),
            document.file_path().to_string().dimmed()
        );
    }
    for warning in &discovered.warnings {
        println!("   {} {}", "skipped".yellow(), warning);
    }

    println!();
    if validation.is_valid() {
        println!(
            "{} {} policies across {} APIs",
            "OK".green().bold(),
            discovered.documents.len(),
            validation.summaries.len()
        );
    } else {
        println!("{}", "INVALID".red().bold());
        for violation in &validation.violations {
            println!("   {} {}", "!".red(), violation);
        }
    }
}
