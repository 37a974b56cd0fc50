//! Per-run accumulation of reconciliation results

use crate::model::{PolicyUpdateResult, UpdateOutcome};

/// Results of one reconciliation run, in processing order.
///
/// `last_etag` holds the token of the last applied result that carried a
/// non-empty one. It is "last by iteration order", not by scope or time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunAccumulator {
    results: Vec<PolicyUpdateResult>,
    last_etag: String,
}

impl RunAccumulator {
    /// Append a terminal result
    pub fn record(&mut self, result: PolicyUpdateResult) {
        if result.outcome == UpdateOutcome::Applied
            && let Some(etag) = result.etag.as_deref()
            && !etag.is_empty()
        {
            self.last_etag = etag.to_string();
        }
        self.results.push(result);
    }

    pub fn results(&self) -> &[PolicyUpdateResult] {
        &self.results
    }

    /// Empty when nothing was applied with a token
    pub fn last_etag(&self) -> &str {
        &self.last_etag
    }

    pub fn count(&self, outcome: UpdateOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn into_parts(self) -> (Vec<PolicyUpdateResult>, String) {
        (self.results, self.last_etag)
    }
}
