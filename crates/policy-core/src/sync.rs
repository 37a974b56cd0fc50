//! End-to-end sync run: connect, discover, validate, reconcile

use std::path::PathBuf;

use serde::Serialize;

use crate::aggregate::{self, ValidationReport};
use crate::discovery::{DiscoveryReport, PolicyDiscovery};
use crate::model::{PolicyUpdateResult, UpdateOutcome};
use crate::reconcile::Reconciler;
use crate::remote::PolicyAccessor;
use crate::{Error, Result};

/// Where the desired state comes from
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory containing `policies/`, and the root for manifest paths
    pub base_dir: PathBuf,
    /// Manifest to use instead of the directory convention
    pub manifest: Option<PathBuf>,
}

impl SyncOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            manifest: None,
        }
    }

    pub fn with_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }
}

/// Final state of a completed sync run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// One result per validated document, in processing order
    pub results: Vec<PolicyUpdateResult>,
    /// Token of the last applied update, empty when nothing was applied
    pub etag: String,
    pub applied: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl SyncReport {
    /// Whether every document was applied
    pub fn is_clean(&self) -> bool {
        self.rejected == 0 && self.failed == 0
    }
}

/// Runs the discovery, validation and reconciliation phases in order
pub struct PolicySync {
    options: SyncOptions,
    discovery: PolicyDiscovery,
}

impl PolicySync {
    pub fn new(options: SyncOptions) -> Self {
        let discovery = PolicyDiscovery::new(&options.base_dir);
        Self { options, discovery }
    }

    /// Discover the desired state without touching the remote service
    pub fn discover(&self) -> DiscoveryReport {
        self.discovery.discover(self.options.manifest.as_deref())
    }

    /// Discover and check the desired state without touching the remote
    /// service.
    ///
    /// A strategy-level discovery failure leads the violations, ahead of the
    /// consistency findings it causes.
    pub fn validate(&self) -> (DiscoveryReport, ValidationReport) {
        let discovered = self.discover();
        let mut validation = aggregate::check_all(&discovered.documents);
        if let Some(error) = &discovered.error {
            validation.violations.insert(0, error.clone());
        }
        (discovered, validation)
    }

    /// Run a full sync against `accessor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the accessor fails its connection
    /// check, and [`Error::Validation`] if the desired state is inconsistent.
    /// In both cases no policy is written. Per-policy failures are reported in
    /// the returned [`SyncReport`] instead.
    pub async fn run<A: PolicyAccessor + ?Sized>(&self, accessor: &A) -> Result<SyncReport> {
        if !accessor.test_connection().await {
            tracing::error!("Connection check against the API Management service failed");
            return Err(Error::Connection);
        }

        let (discovered, validation) = self.validate();
        if !validation.is_valid() {
            return Err(Error::Validation {
                violations: validation.violations,
            });
        }

        let accumulator = Reconciler::new(accessor)
            .reconcile(&discovered.documents)
            .await;

        let applied = accumulator.count(UpdateOutcome::Applied);
        let rejected = accumulator.count(UpdateOutcome::Rejected);
        let failed = accumulator.count(UpdateOutcome::Failed);
        tracing::info!(
            "Policy sync finished: {} applied, {} rejected, {} failed",
            applied,
            rejected,
            failed
        );

        let (results, etag) = accumulator.into_parts();
        Ok(SyncReport {
            results,
            etag,
            applied,
            rejected,
            failed,
        })
    }
}
