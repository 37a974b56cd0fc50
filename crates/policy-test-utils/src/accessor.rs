//! [`ScriptedAccessor`], an in-memory stand-in for an API Management service.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use policy_core::{PolicyAccessor, RemoteFault, WriteAck};

/// One write received by a [`ScriptedAccessor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCall {
    pub api_id: String,
    pub operation_id: Option<String>,
    pub content: String,
}

impl WriteCall {
    /// `api` or `api/operation`
    pub fn target(&self) -> String {
        match &self.operation_id {
            Some(operation_id) => format!("{}/{}", self.api_id, operation_id),
            None => self.api_id.clone(),
        }
    }
}

/// An in-memory service with scripted write responses.
///
/// Writes succeed with `etag-{n}` (counting every write, from 1) unless a
/// response was scripted for the target. Targets are written `api` or
/// `api/operation`.
///
/// # Example
///
/// ```rust,no_run
/// use policy_core::RemoteFault;
/// use policy_test_utils::ScriptedAccessor;
///
/// let accessor = ScriptedAccessor::new()
///     .with_api("orders", &["get-order"])
///     .fail_write("orders", RemoteFault::new("HTTP 400"));
/// ```
pub struct ScriptedAccessor {
    connected: bool,
    apis: BTreeMap<String, Vec<String>>,
    responses: HashMap<String, Result<WriteAck, RemoteFault>>,
    panics: HashSet<String>,
    writes: Mutex<Vec<WriteCall>>,
    list_calls: Mutex<usize>,
}

impl Default for ScriptedAccessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedAccessor {
    /// A reachable service with no APIs.
    pub fn new() -> Self {
        Self {
            connected: true,
            apis: BTreeMap::new(),
            responses: HashMap::new(),
            panics: HashSet::new(),
            writes: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
        }
    }

    /// A service that fails the connection check.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new()
        }
    }

    /// Register an API and its operations.
    pub fn with_api(mut self, api_id: &str, operations: &[&str]) -> Self {
        self.apis.insert(
            api_id.to_string(),
            operations.iter().map(|o| o.to_string()).collect(),
        );
        self
    }

    /// Make writes to `target` fail with `fault`.
    pub fn fail_write(mut self, target: &str, fault: RemoteFault) -> Self {
        self.responses.insert(target.to_string(), Err(fault));
        self
    }

    /// Make writes to `target` succeed with a fixed acknowledgement.
    pub fn ack_write(mut self, target: &str, ack: WriteAck) -> Self {
        self.responses.insert(target.to_string(), Ok(ack));
        self
    }

    /// Make writes to `target` panic.
    pub fn panic_on_write(mut self, target: &str) -> Self {
        self.panics.insert(target.to_string());
        self
    }

    /// Every write received, in order.
    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }

    /// Number of `list_apis` and `list_operations` calls received.
    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    fn write(&self, call: WriteCall) -> Result<WriteAck, RemoteFault> {
        let target = call.target();
        let sequence = {
            let mut writes = self.writes.lock().unwrap();
            writes.push(call);
            writes.len()
        };

        if self.panics.contains(&target) {
            panic!("scripted panic writing {target}");
        }

        self.responses
            .get(&target)
            .cloned()
            .unwrap_or_else(|| Ok(WriteAck::with_etag(format!("etag-{sequence}"))))
    }
}

#[async_trait]
impl PolicyAccessor for ScriptedAccessor {
    async fn test_connection(&self) -> bool {
        self.connected
    }

    async fn list_apis(&self) -> Vec<String> {
        *self.list_calls.lock().unwrap() += 1;
        self.apis.keys().cloned().collect()
    }

    async fn list_operations(&self, api_id: &str) -> Vec<String> {
        *self.list_calls.lock().unwrap() += 1;
        self.apis.get(api_id).cloned().unwrap_or_default()
    }

    async fn update_api_policy(&self, api_id: &str, content: &str) -> Result<WriteAck, RemoteFault> {
        self.write(WriteCall {
            api_id: api_id.to_string(),
            operation_id: None,
            content: content.to_string(),
        })
    }

    async fn update_operation_policy(
        &self,
        api_id: &str,
        operation_id: &str,
        content: &str,
    ) -> Result<WriteAck, RemoteFault> {
        self.write(WriteCall {
            api_id: api_id.to_string(),
            operation_id: Some(operation_id.to_string()),
            content: content.to_string(),
        })
    }
}
