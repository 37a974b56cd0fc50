//! Aggregate consistency check over the discovered desired state
//!
//! Runs after discovery and before any remote call. Every violation is
//! recorded; checking does not stop at the first one.

use serde::Serialize;

use crate::content;
use crate::model::{PolicyDocument, PolicyScope};

/// Policy counts for one API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    pub api_id: String,
    pub api_policies: usize,
    pub operation_policies: usize,
}

/// Outcome of checking a desired-state collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Every consistency violation found
    pub violations: Vec<String>,
    /// One entry per API, in first-seen order
    pub summaries: Vec<ApiSummary>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    fn violation(&mut self, message: String) {
        tracing::error!("{}", message);
        self.violations.push(message);
    }
}

/// Check a desired-state collection for consistency.
///
/// Violations:
/// - the collection is empty;
/// - an API has more than one API-level policy;
/// - a document fails the content check. Discovery already filters these,
///   but the check is repeated so that no source of documents can bypass it.
pub fn check_all(documents: &[PolicyDocument]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if documents.is_empty() {
        report.violation("No policy files discovered".to_string());
        return report;
    }

    for document in documents {
        let index = match report
            .summaries
            .iter()
            .position(|s| s.api_id == document.api_id())
        {
            Some(index) => index,
            None => {
                report.summaries.push(ApiSummary {
                    api_id: document.api_id().to_string(),
                    api_policies: 0,
                    operation_policies: 0,
                });
                report.summaries.len() - 1
            }
        };
        let summary = &mut report.summaries[index];
        match document.scope() {
            PolicyScope::Api => summary.api_policies += 1,
            PolicyScope::Operation => summary.operation_policies += 1,
        }
    }

    let duplicated: Vec<String> = report
        .summaries
        .iter()
        .filter(|s| s.api_policies > 1)
        .map(|s| s.api_id.clone())
        .collect();
    for api_id in duplicated {
        report.violation(format!("Multiple API policies found for {}", api_id));
    }

    for document in documents {
        if !content::validate(document.content()) {
            report.violation(format!("Invalid XML content in policy: {}", document.file_path()));
        }
    }

    for summary in &report.summaries {
        tracing::info!(
            "{}: {} API policy, {} operation policies",
            summary.api_id,
            summary.api_policies,
            summary.operation_policies
        );
    }

    report
}

/// Whether the collection may be reconciled. See [`check_all`].
pub fn validate_all(documents: &[PolicyDocument]) -> bool {
    check_all(documents).is_valid()
}
