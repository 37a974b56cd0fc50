//! Discovery of the desired policy state from the repository
//!
//! Two strategies are available:
//! - **convention**: scan `policies/**/*.xml` and derive targets from the
//!   path grammar
//! - **manifest**: read a YAML manifest mapping API and operation ids to
//!   policy files
//!
//! A manifest path selects the manifest strategy; otherwise the convention
//! strategy runs. Problems with individual candidates are collected as
//! warnings and never stop discovery of the others. A strategy-level failure
//! yields no documents and records an error.

mod convention;
mod manifest;

use std::path::Path;

use policy_fs::NormalizedPath;
use serde::Serialize;

use crate::model::PolicyDocument;

pub use manifest::PolicyManifestEntry;

/// Documents found by one discovery call, with everything that was skipped
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    /// Documents that passed every per-item check, in discovery order
    #[serde(skip)]
    pub documents: Vec<PolicyDocument>,
    /// Per-item problems; each one skipped a single candidate
    pub warnings: Vec<String>,
    /// Strategy-level failure; when set, `documents` is empty
    pub error: Option<String>,
}

impl DiscoveryReport {
    /// Record a skipped candidate
    pub(crate) fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    /// Abort the strategy, discarding anything found so far
    pub(crate) fn fail(mut self, message: String) -> Self {
        tracing::error!("{}", message);
        self.documents.clear();
        self.error = Some(message);
        self
    }

    pub(crate) fn push(&mut self, document: PolicyDocument) {
        tracing::debug!(
            target_id = %document.target(),
            scope = %document.scope(),
            file = %document.file_path(),
            "Discovered policy"
        );
        self.documents.push(document);
    }
}

/// Resolves policy documents under a base directory
#[derive(Debug, Clone)]
pub struct PolicyDiscovery {
    /// Directory that `policies/` and relative manifest paths hang off
    base_dir: NormalizedPath,
}

impl PolicyDiscovery {
    /// Create a discovery rooted at `base_dir`.
    ///
    /// The directory is canonicalized when it exists so that discovered
    /// documents carry absolute paths.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = NormalizedPath::canonicalize(base_dir.as_ref())
            .unwrap_or_else(|_| NormalizedPath::new(base_dir.as_ref()));
        Self { base_dir }
    }

    /// Run the manifest strategy when `manifest_path` is given, the
    /// convention strategy otherwise.
    pub fn discover(&self, manifest_path: Option<&Path>) -> DiscoveryReport {
        let report = match manifest_path {
            Some(manifest_path) => {
                tracing::info!("Discovering policies from manifest {}", manifest_path.display());
                self.from_manifest(manifest_path)
            }
            None => {
                tracing::info!("Discovering policies by convention under {}", self.base_dir);
                self.from_convention()
            }
        };

        tracing::info!(
            "Discovered {} policy file(s), skipped {}",
            report.documents.len(),
            report.warnings.len()
        );
        report
    }
}

/// Discover the desired policy state.
///
/// This is the entry point the sync run consumes; use
/// [`PolicyDiscovery::discover`] to also see what was skipped.
pub fn discover(manifest_path: Option<&Path>, base_dir: impl AsRef<Path>) -> Vec<PolicyDocument> {
    PolicyDiscovery::new(base_dir).discover(manifest_path).documents
}
