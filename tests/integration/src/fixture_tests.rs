//! Discovery and validation against the checked-in policy repositories
//! under `test-fixtures/`.

use std::path::PathBuf;

use policy_core::{PolicyScope, PolicySync, SyncOptions, discover, validate_all};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures")
        .join(name)
}

#[test]
fn convention_fixture_yields_api_and_operation_policy() {
    let documents = discover(None, fixture("convention"));

    let targets: Vec<(String, PolicyScope)> = documents
        .iter()
        .map(|d| (d.target(), d.scope()))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("sample-api".to_string(), PolicyScope::Api),
            ("sample-api/get-users".to_string(), PolicyScope::Operation),
        ]
    );
    assert!(documents[1].content().contains("rate-limit"));
    assert!(validate_all(&documents));
}

#[test]
fn manifest_fixture_skips_broken_and_missing_files() {
    let base = fixture("manifest");
    let sync = PolicySync::new(SyncOptions::new(&base).with_manifest(base.join("policy-manifest.yaml")));

    let report = sync.discover();

    let targets: Vec<String> = report.documents.iter().map(|d| d.target()).collect();
    assert_eq!(targets, vec!["users-api", "users-api/list-users"]);
    assert_eq!(report.warnings.len(), 2);
    assert_eq!(
        report.warnings[0],
        "Invalid XML content in operation policy for users-api/delete-user"
    );
    assert!(
        report.warnings[1].starts_with("Failed to read operation policy for reports-api/export"),
        "got: {}",
        report.warnings[1]
    );
    assert_eq!(report.error, None);
}

#[test]
fn manifest_fixture_is_ignored_without_manifest_option() {
    // No policies/ directory in the manifest fixture
    let documents = discover(None, fixture("manifest"));

    assert!(documents.is_empty());
    assert!(!validate_all(&documents));
}

#[test]
fn missing_manifest_yields_nothing() {
    let base = fixture("manifest");
    let missing = base.join("does-not-exist.yaml");

    let documents = discover(Some(missing.as_path()), &base);

    assert!(documents.is_empty());
}
