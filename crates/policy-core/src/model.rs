//! Desired-state and result types shared across discovery and reconciliation

use policy_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// Which remote resource a policy document applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyScope {
    /// The policy applies to an entire API
    Api,
    /// The policy applies to one operation within an API
    Operation,
}

impl std::fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyScope::Api => write!(f, "api"),
            PolicyScope::Operation => write!(f, "operation"),
        }
    }
}

/// One desired policy unit, as read from the repository.
///
/// Constructed only through [`PolicyDocument::api`] and
/// [`PolicyDocument::operation`], so an operation id is present exactly
/// when the scope is [`PolicyScope::Operation`]. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    file_path: NormalizedPath,
    api_id: String,
    operation_id: Option<String>,
    content: String,
}

impl PolicyDocument {
    /// Create an API-level policy document
    pub fn api(
        file_path: impl Into<NormalizedPath>,
        api_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            api_id: api_id.into(),
            operation_id: None,
            content: content.into(),
        }
    }

    /// Create an operation-level policy document
    pub fn operation(
        file_path: impl Into<NormalizedPath>,
        api_id: impl Into<String>,
        operation_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            api_id: api_id.into(),
            operation_id: Some(operation_id.into()),
            content: content.into(),
        }
    }

    pub fn file_path(&self) -> &NormalizedPath {
        &self.file_path
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    pub fn scope(&self) -> PolicyScope {
        if self.operation_id.is_some() {
            PolicyScope::Operation
        } else {
            PolicyScope::Api
        }
    }

    /// Raw document text, exactly as read
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Human-readable target, `api` or `api/operation`
    pub fn target(&self) -> String {
        match &self.operation_id {
            Some(operation_id) => format!("{}/{}", self.api_id, operation_id),
            None => self.api_id.clone(),
        }
    }
}

/// Terminal state of one reconciliation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOutcome {
    /// The policy was written to the remote service
    Applied,
    /// The target API or operation does not exist remotely
    Rejected,
    /// The write was attempted and failed
    Failed,
}

/// Result of reconciling one [`PolicyDocument`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdateResult {
    pub api_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub file_path: String,
    pub outcome: UpdateOutcome,
    pub updated: bool,
    /// Resource version token, present iff `updated`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Failure description, present iff not `updated`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PolicyUpdateResult {
    /// The policy was written; `etag` is empty when the service returned none
    pub fn applied(document: &PolicyDocument, etag: impl Into<String>) -> Self {
        Self::new(document, UpdateOutcome::Applied, Some(etag.into()), None)
    }

    /// The target resource is missing; no write was attempted
    pub fn rejected(document: &PolicyDocument, error: impl Into<String>) -> Self {
        Self::new(document, UpdateOutcome::Rejected, None, Some(error.into()))
    }

    /// The write was attempted and failed
    pub fn failed(document: &PolicyDocument, error: impl Into<String>) -> Self {
        Self::new(document, UpdateOutcome::Failed, None, Some(error.into()))
    }

    fn new(
        document: &PolicyDocument,
        outcome: UpdateOutcome,
        etag: Option<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            api_id: document.api_id().to_string(),
            operation_id: document.operation_id().map(str::to_string),
            file_path: document.file_path().to_string(),
            outcome,
            updated: outcome == UpdateOutcome::Applied,
            etag,
            error,
        }
    }

    pub fn scope(&self) -> PolicyScope {
        if self.operation_id.is_some() {
            PolicyScope::Operation
        } else {
            PolicyScope::Api
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_follows_operation_id() {
        let api = PolicyDocument::api("/r/policies/a/api.xml", "a", "<policies></policies>");
        let op = PolicyDocument::operation(
            "/r/policies/a/operations/o.xml",
            "a",
            "o",
            "<policies></policies>",
        );

        assert_eq!(api.scope(), PolicyScope::Api);
        assert_eq!(api.operation_id(), None);
        assert_eq!(op.scope(), PolicyScope::Operation);
        assert_eq!(op.operation_id(), Some("o"));
        assert_eq!(op.target(), "a/o");
    }

    #[test]
    fn test_result_flags_match_outcome() {
        let doc = PolicyDocument::api("/r/policies/a/api.xml", "a", "<policies></policies>");

        let applied = PolicyUpdateResult::applied(&doc, "\"etag-1\"");
        assert!(applied.updated);
        assert_eq!(applied.etag.as_deref(), Some("\"etag-1\""));
        assert!(applied.error.is_none());

        let failed = PolicyUpdateResult::failed(&doc, "boom");
        assert!(!failed.updated);
        assert!(failed.etag.is_none());
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let doc = PolicyDocument::operation("/r/p.xml", "a", "get-users", "<policies></policies>");
        let json = serde_json::to_value(PolicyUpdateResult::rejected(&doc, "missing")).unwrap();

        assert_eq!(json["apiId"], "a");
        assert_eq!(json["operationId"], "get-users");
        assert_eq!(json["outcome"], "rejected");
        assert!(json.get("etag").is_none());
    }
}
