//! Discovery, validation and reconciliation of API Management policies
//!
//! This crate turns a repository's declared policy files into writes against
//! a live API Management service:
//!
//! - **grammar**: maps `policies/{api}/api.xml` and
//!   `policies/{api}/operations/{op}.xml` paths to their targets
//! - **content**: shallow structural check of policy documents
//! - **discovery**: convention and manifest strategies for finding documents
//! - **aggregate**: consistency check over the whole desired state
//! - **reconcile**: sequential, existence-guarded application with per-item
//!   failure isolation
//! - **sync**: the end-to-end run tying the phases together
//!
//! # Architecture
//!
//! ```text
//!                 policy-cli
//!                     |
//!        +------------+-------------+
//!        |                          |
//!   policy-core  <---------  policy-apim
//!        |                (PolicyAccessor impl)
//!    policy-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use policy_core::{PolicySync, SyncOptions};
//!
//! async fn example(accessor: &impl policy_core::PolicyAccessor) -> policy_core::Result<()> {
//!     let report = PolicySync::new(SyncOptions::new(".")).run(accessor).await?;
//!     println!("etag={}", report.etag);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod content;
pub mod discovery;
pub mod error;
pub mod grammar;
pub mod model;
pub mod reconcile;
pub mod remote;
pub mod sync;

pub use aggregate::{ApiSummary, ValidationReport, check_all, validate_all};
pub use discovery::{DiscoveryReport, PolicyDiscovery, PolicyManifestEntry, discover};
pub use error::{Error, Result};
pub use grammar::PolicyTarget;
pub use model::{PolicyDocument, PolicyScope, PolicyUpdateResult, UpdateOutcome};
pub use reconcile::{Reconciler, RunAccumulator};
pub use remote::{PolicyAccessor, RemoteFault, WriteAck, extract_message};
pub use sync::{PolicySync, SyncOptions, SyncReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_validation_lists_every_violation() {
        let error = Error::Validation {
            violations: vec![
                "No policy files discovered".to_string(),
                "Multiple API policies found for orders".to_string(),
            ],
        };

        let display = error.to_string();
        assert!(display.contains("No policy files discovered"), "got: {}", display);
        assert!(display.contains("orders"), "got: {}", display);
    }
}
