//! Sequential application of policy documents to the remote service
//!
//! Each document moves through
//! `Discovered -> Validated -> ExistenceChecked -> {Applied | Rejected | Failed}`.
//! Documents are processed one at a time, in order, and every document ends
//! in exactly one terminal state. A fault on one document never stops the
//! ones after it.

mod accumulator;

use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::model::{PolicyDocument, PolicyUpdateResult};
use crate::remote::{PolicyAccessor, extract_message};

pub use accumulator::RunAccumulator;

/// Applies validated documents through a [`PolicyAccessor`]
pub struct Reconciler<'a, A: PolicyAccessor + ?Sized> {
    accessor: &'a A,
}

impl<'a, A: PolicyAccessor + ?Sized> Reconciler<'a, A> {
    pub fn new(accessor: &'a A) -> Self {
        Self { accessor }
    }

    /// Apply every document in order and collect the results.
    ///
    /// Callers must only pass a collection that passed
    /// [`crate::aggregate::validate_all`].
    pub async fn reconcile(&self, documents: &[PolicyDocument]) -> RunAccumulator {
        let mut accumulator = RunAccumulator::default();

        for document in documents {
            let result = match AssertUnwindSafe(self.apply(document)).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => {
                    let reason = panic_reason(panic.as_ref());
                    tracing::error!(
                        "Unexpected failure while applying policy {}: {}",
                        document.file_path(),
                        reason
                    );
                    PolicyUpdateResult::failed(document, format!("Unexpected failure: {}", reason))
                }
            };
            accumulator.record(result);
        }

        accumulator
    }

    /// Drive one document to its terminal state
    async fn apply(&self, document: &PolicyDocument) -> PolicyUpdateResult {
        let api_id = document.api_id();

        let apis = self.accessor.list_apis().await;
        if !apis.iter().any(|id| id == api_id) {
            let message = format!("API '{}' not found. Available APIs: {}", api_id, listing(&apis));
            tracing::warn!("{}", message);
            return PolicyUpdateResult::rejected(document, message);
        }

        let written = match document.operation_id() {
            None => {
                tracing::debug!("Updating API policy for {}", api_id);
                self.accessor.update_api_policy(api_id, document.content()).await
            }
            Some(operation_id) => {
                let operations = self.accessor.list_operations(api_id).await;
                if !operations.iter().any(|id| id == operation_id) {
                    let message = format!(
                        "Operation '{}' not found in API '{}'. Available operations: {}",
                        operation_id,
                        api_id,
                        listing(&operations)
                    );
                    tracing::warn!("{}", message);
                    return PolicyUpdateResult::rejected(document, message);
                }

                tracing::debug!("Updating operation policy for {}/{}", api_id, operation_id);
                self.accessor
                    .update_operation_policy(api_id, operation_id, document.content())
                    .await
            }
        };

        match written {
            Ok(ack) => {
                let etag = ack.etag.unwrap_or_default();
                tracing::info!("Updated policy for {} (etag: {})", document.target(), etag);
                PolicyUpdateResult::applied(document, etag)
            }
            Err(fault) => {
                let message = extract_message(&fault);
                tracing::warn!("Failed to update policy for {}: {}", document.target(), message);
                PolicyUpdateResult::failed(document, message)
            }
        }
    }
}

fn listing(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}

fn panic_reason(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
