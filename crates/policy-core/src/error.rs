//! Error types for policy-core

use std::path::PathBuf;

/// Result type for policy-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in policy-core operations
///
/// Only run-fatal conditions are errors. Per-policy problems (unreadable
/// candidates, missing remote resources, failed writes) become warnings or
/// result values instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote service is unreachable or rejected the credentials
    #[error("Failed to connect to the API Management service")]
    Connection,

    /// The manifest could not be used at all
    #[error("Invalid policy manifest at {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    /// The desired state is inconsistent and must not be applied
    #[error("Policy validation failed: {}", violations.join("; "))]
    Validation { violations: Vec<String> },
}
