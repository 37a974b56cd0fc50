//! Path grammar for convention-based policy layouts
//!
//! Only two path shapes are recognized:
//!
//! ```text
//! .../policies/{apiId}/api.xml
//! .../policies/{apiId}/operations/{operationId}.xml
//! ```
//!
//! Both shapes are matched against the trailing segments of the path after
//! separator normalization, so a base directory that happens to contain a
//! `policies` segment of its own does not change the result. Segment and
//! extension comparisons are case-sensitive.

use std::path::Path;

use policy_fs::NormalizedPath;

use crate::model::PolicyScope;

const POLICIES_DIR: &str = "policies";
const OPERATIONS_DIR: &str = "operations";
const API_POLICY_FILE: &str = "api.xml";
const POLICY_EXTENSION: &str = ".xml";

/// The target a recognized policy path resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTarget {
    pub api_id: String,
    pub operation_id: Option<String>,
    pub scope: PolicyScope,
}

/// Resolve a path against both shapes in one pass.
///
/// When a path satisfies both shapes literally
/// (`policies/policies/operations/api.xml`) the operation-level reading wins,
/// keeping the two classifiers mutually exclusive.
pub fn classify(path: impl AsRef<Path>) -> Option<PolicyTarget> {
    let normalized = NormalizedPath::new(path);
    let segments = normalized.segments();

    if let Some((api_id, operation_id)) = operation_shape(&segments) {
        return Some(PolicyTarget {
            api_id: api_id.to_string(),
            operation_id: Some(operation_id.to_string()),
            scope: PolicyScope::Operation,
        });
    }

    api_shape(&segments).map(|api_id| PolicyTarget {
        api_id: api_id.to_string(),
        operation_id: None,
        scope: PolicyScope::Api,
    })
}

/// The `{apiId}` segment following `policies` in either recognized shape.
pub fn extract_api_id(path: impl AsRef<Path>) -> Option<String> {
    classify(path).map(|target| target.api_id)
}

/// The `{operationId}` file stem of an operation-level path.
pub fn extract_operation_id(path: impl AsRef<Path>) -> Option<String> {
    classify(path).and_then(|target| target.operation_id)
}

pub fn is_api_level(path: impl AsRef<Path>) -> bool {
    matches!(classify(path), Some(target) if target.scope == PolicyScope::Api)
}

pub fn is_operation_level(path: impl AsRef<Path>) -> bool {
    matches!(classify(path), Some(target) if target.scope == PolicyScope::Operation)
}

fn api_shape<'a>(segments: &[&'a str]) -> Option<&'a str> {
    let [.., policies, api_id, file] = segments else {
        return None;
    };
    (*policies == POLICIES_DIR && *file == API_POLICY_FILE && !api_id.is_empty()).then_some(*api_id)
}

fn operation_shape<'a>(segments: &[&'a str]) -> Option<(&'a str, &'a str)> {
    let [.., policies, api_id, operations, file] = segments else {
        return None;
    };
    if *policies != POLICIES_DIR || *operations != OPERATIONS_DIR || api_id.is_empty() {
        return None;
    }
    let operation_id = (*file).strip_suffix(POLICY_EXTENSION)?;
    (!operation_id.is_empty()).then_some((*api_id, operation_id))
}
