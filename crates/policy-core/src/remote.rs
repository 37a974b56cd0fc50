//! Boundary to the remote API Management service

use async_trait::async_trait;
use serde_json::Value;

/// Fallback when a fault carries no usable message
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Acknowledgement of a successful policy write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteAck {
    /// Resource version token returned by the service, if any
    pub etag: Option<String>,
}

impl WriteAck {
    pub fn with_etag(etag: impl Into<String>) -> Self {
        Self {
            etag: Some(etag.into()),
        }
    }
}

/// A failed policy write, as reported by the accessor
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteFault {
    /// The accessor's own description of the failure
    pub message: String,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
    /// Parsed response body, when one was returned
    pub body: Option<Value>,
}

impl RemoteFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn with_response(mut self, status: u16, body: Option<Value>) -> Self {
        self.status = Some(status);
        self.body = body;
        self
    }
}

/// Best-effort human-readable description of a fault.
///
/// Tried in order: the nested `error.message` of the response body, a
/// top-level `message` in the body, the fault's own message, and finally
/// [`UNKNOWN_ERROR`].
pub fn extract_message(fault: &RemoteFault) -> String {
    let body = fault.body.as_ref();
    let nested = body
        .and_then(|b| b.get("error"))
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str);
    let top_level = body.and_then(|b| b.get("message")).and_then(Value::as_str);
    let own = Some(fault.message.as_str());

    [nested, top_level, own]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|m| !m.is_empty())
        .unwrap_or(UNKNOWN_ERROR)
        .to_string()
}

/// Queries and mutates the live policy state of an API Management service.
///
/// Listing methods never fail: an accessor that cannot list returns an empty
/// collection, which the reconciler treats as "target not found".
#[async_trait]
pub trait PolicyAccessor: Send + Sync {
    /// Liveness and authentication check
    async fn test_connection(&self) -> bool;

    /// Ids of every API in the service
    async fn list_apis(&self) -> Vec<String>;

    /// Ids of every operation in `api_id`
    async fn list_operations(&self, api_id: &str) -> Vec<String>;

    /// Replace the API-level policy of `api_id`
    async fn update_api_policy(&self, api_id: &str, content: &str) -> Result<WriteAck, RemoteFault>;

    /// Replace the policy of one operation
    async fn update_operation_policy(
        &self,
        api_id: &str,
        operation_id: &str,
        content: &str,
    ) -> Result<WriteAck, RemoteFault>;
}
