//! Sync command: apply the desired state and publish the etag

use colored::Colorize;

use policy_apim::ApimClient;
use policy_core::{PolicySync, PolicyUpdateResult, SyncReport, UpdateOutcome};

use crate::config::SyncConfig;
use crate::error::{CliError, Result};
use crate::output::publish_etag;

/// Run the sync command.
///
/// The etag is published on every path; fatal errors publish it empty.
/// With `strict`, any rejected or failed policy makes the command fail after
/// publishing.
pub async fn run_sync(config: &SyncConfig, strict: bool, json: bool) -> Result<()> {
    if !json {
        println!("{} Syncing API Management policies...", "=>".blue().bold());
    }

    let report = match execute(config).await {
        Ok(report) => report,
        Err(e) => {
            publish_etag("", !json)?;
            return Err(e);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    publish_etag(&report.etag, !json)?;

    if strict && !report.is_clean() {
        return Err(CliError::user(format!(
            "{} of {} policies were not applied",
            report.rejected + report.failed,
            report.results.len()
        )));
    }

    Ok(())
}

async fn execute(config: &SyncConfig) -> Result<SyncReport> {
    let client = ApimClient::new(config.apim_config()?)?;
    let sync = PolicySync::new(config.sync_options());
    Ok(sync.run(&client).await?)
}

fn print_report(report: &SyncReport) {
    for result in &report.results {
        print_result(result);
    }
    println!();
    println!(
        "{} applied, {} rejected, {} failed",
        report.applied.to_string().green(),
        report.rejected.to_string().yellow(),
        report.failed.to_string().red()
    );
}

fn print_result(result: &PolicyUpdateResult) {
    let target = match &result.operation_id {
        Some(operation_id) => format!("{}/{}", result.api_id, operation_id),
        None => result.api_id.clone(),
    };
    let detail = result.error.as_deref().unwrap_or_default();

    match result.outcome {
        UpdateOutcome::Applied => println!(
            "   {} {} ({})",
            "APPLIED".green().bold(),
            target.cyan(),
            result.file_path.dimmed()
        ),
        UpdateOutcome::Rejected => println!(
            "   {} {}: {}",
            "REJECTED".yellow().bold(),
            target.cyan(),
            detail
        ),
        UpdateOutcome::Failed => println!(
            "   {} {}: {}",
            "FAILED".red().bold(),
            target.cyan(),
            detail
        ),
    }
}
