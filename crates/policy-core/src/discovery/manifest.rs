//! Manifest-driven discovery strategy
//!
//! The manifest is a YAML document of the form:
//!
//! ```yaml
//! policies:
//!   orders-api:
//!     apiPolicyPath: policies/orders/api.xml
//!     operations:
//!       get-order: policies/orders/get-order.xml
//! ```

use std::path::Path;

use policy_fs::{ConfigStore, NormalizedPath, io};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::{DiscoveryReport, PolicyDiscovery};
use crate::content;
use crate::model::PolicyDocument;
use crate::{Error, Result};

/// Policy paths declared for one API in the manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyManifestEntry {
    /// API-level policy file, relative to the base directory
    #[serde(default)]
    pub api_policy_path: Option<String>,
    /// Operation id to policy file, in manifest order.
    ///
    /// Kept as raw YAML so one malformed pair skips only that operation.
    #[serde(default)]
    pub operations: Option<Mapping>,
}

impl PolicyDiscovery {
    /// Resolve documents from the manifest at `manifest_path`.
    ///
    /// An unreadable or unparsable manifest, or one without a top-level
    /// `policies` mapping, aborts the strategy. Every other problem skips
    /// only the affected API or policy file.
    pub fn from_manifest(&self, manifest_path: &Path) -> DiscoveryReport {
        let report = DiscoveryReport::default();

        let policies = match load_manifest(manifest_path) {
            Ok(policies) => policies,
            Err(e) => return report.fail(e.to_string()),
        };

        policies
            .into_iter()
            .fold(report, |mut report, (key, value)| {
                let api_id = match scalar_key(&key) {
                    Some(api_id) if !api_id.is_empty() => api_id,
                    Some(_) => {
                        report.warn("Skipping manifest entry with an empty API id".to_string());
                        return report;
                    }
                    None => {
                        report.warn(format!("Skipping manifest entry with a non-scalar API id: {:?}", key));
                        return report;
                    }
                };
                match entry_from_value(value) {
                    Ok(entry) => self.resolve_entry(&api_id, &entry, &mut report),
                    Err(e) => {
                        report.warn(format!("Failed to process policies for {}: {}", api_id, e));
                    }
                }
                report
            })
    }

    fn resolve_entry(&self, api_id: &str, entry: &PolicyManifestEntry, report: &mut DiscoveryReport) {
        if entry.api_policy_path.is_none() && entry.operations.is_none() {
            tracing::debug!("No policy paths declared for {}", api_id);
        }

        if let Some(api_policy_path) = &entry.api_policy_path {
            let path = self.base_dir.resolve(api_policy_path);
            match io::read_text(&path) {
                Err(e) => report.warn(format!("Failed to read API policy for {}: {}", api_id, e)),
                Ok(content) if !content::validate(&content) => {
                    report.warn(format!("Invalid XML content in API policy for {}", api_id));
                }
                Ok(content) => report.push(PolicyDocument::api(path, api_id, content)),
            }
        }

        for (key, value) in entry.operations.iter().flatten() {
            let operation_id = match scalar_key(key) {
                Some(operation_id) if !operation_id.is_empty() => operation_id,
                Some(_) => {
                    report.warn(format!("Skipping operation with an empty id under {}", api_id));
                    continue;
                }
                None => {
                    report.warn(format!(
                        "Skipping operation with a non-scalar id under {}: {:?}",
                        api_id, key
                    ));
                    continue;
                }
            };
            let Value::String(operation_path) = value else {
                report.warn(format!(
                    "Invalid operation policy path for {}/{}: expected a string",
                    api_id, operation_id
                ));
                continue;
            };

            let path = self.base_dir.resolve(operation_path);
            match io::read_text(&path) {
                Err(e) => report.warn(format!(
                    "Failed to read operation policy for {}/{}: {}",
                    api_id, operation_id, e
                )),
                Ok(content) if !content::validate(&content) => report.warn(format!(
                    "Invalid XML content in operation policy for {}/{}",
                    api_id, operation_id
                )),
                Ok(content) => {
                    report.push(PolicyDocument::operation(path, api_id, operation_id, content));
                }
            }
        }
    }
}

/// Load the manifest and return its `policies` mapping.
fn load_manifest(manifest_path: &Path) -> Result<Mapping> {
    let invalid = |reason: String| Error::InvalidManifest {
        path: manifest_path.to_path_buf(),
        reason,
    };

    let document: Value = ConfigStore::new()
        .load_yaml(&NormalizedPath::new(manifest_path))
        .map_err(|e| invalid(e.to_string()))?;

    match document.get("policies") {
        Some(Value::Mapping(policies)) => Ok(policies.clone()),
        Some(Value::Null) | None => Err(invalid("missing top-level 'policies' section".to_string())),
        Some(_) => Err(invalid("'policies' must be a mapping of API ids".to_string())),
    }
}

/// String form of a scalar mapping key; `None` for sequences, mappings and
/// tagged values. A null key reads as the empty string.
fn scalar_key(key: &Value) -> Option<String> {
    match key {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn entry_from_value(value: Value) -> std::result::Result<PolicyManifestEntry, serde_yaml::Error> {
    match value {
        Value::Null => Ok(PolicyManifestEntry::default()),
        value => serde_yaml::from_value(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = "<policies><inbound><base /></inbound></policies>";

    fn setup(manifest: &str, files: &[(&str, &str)]) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let manifest_path = temp.path().join("policy-manifest.yaml");
        fs::write(&manifest_path, manifest).unwrap();
        (temp, manifest_path)
    }

    #[test]
    fn test_entry_decodes_camel_case_keys() {
        let value: Value = serde_yaml::from_str(
            "apiPolicyPath: a.xml\noperations:\n  get: g.xml\n  put: p.xml\n",
        )
        .unwrap();
        let entry = entry_from_value(value).unwrap();

        assert_eq!(entry.api_policy_path.as_deref(), Some("a.xml"));
        assert_eq!(entry.operations.unwrap().len(), 2);
    }

    #[test]
    fn test_null_entry_is_empty() {
        assert_eq!(entry_from_value(Value::Null).unwrap(), PolicyManifestEntry::default());
    }

    #[test]
    fn test_missing_policies_section_is_fatal() {
        let (temp, manifest) = setup("apis:\n  a: {}\n", &[]);
        let report = PolicyDiscovery::new(temp.path()).from_manifest(&manifest);

        assert!(report.documents.is_empty());
        assert!(report.error.unwrap().contains("missing top-level 'policies'"));
    }

    #[test]
    fn test_unparsable_manifest_is_fatal() {
        let (temp, manifest) = setup("policies: [unterminated", &[]);
        let report = PolicyDiscovery::new(temp.path()).from_manifest(&manifest);

        assert!(report.documents.is_empty());
        assert!(report.error.is_some());
    }

    #[test]
    fn test_unreadable_manifest_is_fatal() {
        let temp = TempDir::new().unwrap();
        let report = PolicyDiscovery::new(temp.path()).from_manifest(&temp.path().join("absent.yaml"));

        assert!(report.error.unwrap().contains("absent.yaml"));
    }

    #[test]
    fn test_structural_problem_skips_only_that_api() {
        let (temp, manifest) = setup(
            "policies:\n  broken:\n    operations: [not, a, map]\n  good:\n    apiPolicyPath: good.xml\n",
            &[("good.xml", VALID)],
        );
        let report = PolicyDiscovery::new(temp.path()).from_manifest(&manifest);

        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.documents[0].api_id(), "good");
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Failed to process policies for broken"));
    }

    #[test]
    fn test_numeric_api_id_is_kept() {
        let (temp, manifest) = setup(
            "policies:\n  42:\n    apiPolicyPath: p.xml\n",
            &[("p.xml", VALID)],
        );
        let report = PolicyDiscovery::new(temp.path()).from_manifest(&manifest);

        assert_eq!(report.documents[0].api_id(), "42");
    }

    #[test]
    fn test_empty_api_id_has_its_own_warning() {
        let (temp, manifest) = setup(
            "policies:\n  \"\":\n    apiPolicyPath: p.xml\n  kept:\n    apiPolicyPath: p.xml\n",
            &[("p.xml", VALID)],
        );
        let report = PolicyDiscovery::new(temp.path()).from_manifest(&manifest);

        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.documents[0].api_id(), "kept");
        assert_eq!(report.warnings, vec!["Skipping manifest entry with an empty API id"]);
    }

    #[test]
    fn test_numeric_operation_id_is_kept() {
        let (temp, manifest) = setup(
            "policies:\n  orders:\n    operations:\n      200: ok.xml\n      get: ok.xml\n",
            &[("ok.xml", VALID)],
        );
        let report = PolicyDiscovery::new(temp.path()).from_manifest(&manifest);

        let targets: Vec<String> = report.documents.iter().map(|d| d.target()).collect();
        assert_eq!(targets, vec!["orders/200", "orders/get"]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_bad_operation_pair_skips_only_that_operation() {
        let manifest = r#"
policies:
  orders:
    apiPolicyPath: ok.xml
    operations:
      "": ok.xml
      ? [a, b]
      : ok.xml
      nested: [x.xml]
      get: ok.xml
"#;
        let (temp, manifest) = setup(manifest, &[("ok.xml", VALID)]);
        let report = PolicyDiscovery::new(temp.path()).from_manifest(&manifest);

        let targets: Vec<String> = report.documents.iter().map(|d| d.target()).collect();
        assert_eq!(targets, vec!["orders", "orders/get"]);
        assert_eq!(report.warnings.len(), 3, "warnings: {:?}", report.warnings);
        assert_eq!(report.warnings[0], "Skipping operation with an empty id under orders");
        assert!(report.warnings[1].starts_with("Skipping operation with a non-scalar id under orders"));
        assert_eq!(
            report.warnings[2],
            "Invalid operation policy path for orders/nested: expected a string"
        );
        assert!(report.error.is_none());
    }
}
