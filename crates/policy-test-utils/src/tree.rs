//! [`PolicyTree`] builder for policy repository test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary repository directory laid out for policy discovery.
///
/// # Example
///
/// ```rust,no_run
/// use policy_test_utils::{PolicyTree, VALID_POLICY};
///
/// let tree = PolicyTree::new();
/// tree.api_policy("sample-api", VALID_POLICY);
/// tree.operation_policy("sample-api", "get-users", VALID_POLICY);
/// tree.assert_file_exists("policies/sample-api/operations/get-users.xml");
/// ```
pub struct PolicyTree {
    temp_dir: TempDir,
}

impl Default for PolicyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `path` relative to the root, creating parents.
    pub fn file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        fs::create_dir_all(full_path.parent().unwrap()).unwrap();
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write `policies/{api_id}/api.xml`.
    pub fn api_policy(&self, api_id: &str, content: &str) -> PathBuf {
        self.file(&format!("policies/{api_id}/api.xml"), content)
    }

    /// Write `policies/{api_id}/operations/{operation_id}.xml`.
    pub fn operation_policy(&self, api_id: &str, operation_id: &str, content: &str) -> PathBuf {
        self.file(
            &format!("policies/{api_id}/operations/{operation_id}.xml"),
            content,
        )
    }

    /// Write a manifest named `policy-manifest.yaml` at the root.
    pub fn manifest(&self, yaml: &str) -> PathBuf {
        self.file("policy-manifest.yaml", yaml)
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
