//! End-to-end sync runs: policy tree on disk, `PolicySync` in the middle,
//! `ApimClient` talking HTTP to a mock management endpoint.

use policy_apim::{ApimClient, ApimConfig};
use policy_core::{Error, PolicySync, SyncOptions, UpdateOutcome};
use policy_test_utils::{PolicyTree, VALID_POLICY};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICE: &str =
    "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.ApiManagement/service/apim-1";

fn client(server: &MockServer) -> ApimClient {
    ApimClient::new(ApimConfig::new("sub-1", "rg-1", "apim-1", "token").with_endpoint(server.uri())).unwrap()
}

async fn service(apis: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SERVICE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "apim-1"})))
        .mount(&server)
        .await;
    let value: Vec<_> = apis.iter().map(|name| json!({"name": name})).collect();
    Mock::given(method("GET"))
        .and(path(format!("{SERVICE}/apis")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": value})))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn convention_tree_is_applied_in_order() {
    let server = service(&["sample-api"]).await;
    Mock::given(method("GET"))
        .and(path(format!("{SERVICE}/apis/sample-api/operations")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"name": "get-users"}]})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{SERVICE}/apis/sample-api/policies/policy")))
        .and(body_partial_json(json!({"properties": {"format": "rawxml"}})))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"api-1\""))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{SERVICE}/apis/sample-api/operations/get-users/policies/policy")))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"op-1\""))
        .expect(1)
        .mount(&server)
        .await;

    let tree = PolicyTree::new();
    tree.api_policy("sample-api", VALID_POLICY);
    tree.operation_policy("sample-api", "get-users", VALID_POLICY);

    let report = PolicySync::new(SyncOptions::new(tree.root()))
        .run(&client(&server))
        .await
        .unwrap();

    assert_eq!(report.applied, 2);
    assert!(report.is_clean());
    assert_eq!(report.etag, "\"op-1\"");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_api_is_rejected_without_a_write() {
    let server = service(&["orders", "users"]).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tree = PolicyTree::new();
    tree.api_policy("api1", VALID_POLICY);

    let report = PolicySync::new(SyncOptions::new(tree.root()))
        .run(&client(&server))
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    let result = &report.results[0];
    assert_eq!(result.outcome, UpdateOutcome::Rejected);
    assert_eq!(
        result.error.as_deref(),
        Some("API 'api1' not found. Available APIs: orders, users")
    );
    assert_eq!(report.etag, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_write_is_isolated_and_later_etag_published() {
    let server = service(&["first", "second"]).await;
    Mock::given(method("PUT"))
        .and(path(format!("{SERVICE}/apis/first/policies/policy")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": "ValidationError", "message": "One or more fields contain incorrect values"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{SERVICE}/apis/second/policies/policy")))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"tok-2\""))
        .mount(&server)
        .await;

    let tree = PolicyTree::new();
    tree.api_policy("first", VALID_POLICY);
    tree.api_policy("second", VALID_POLICY);

    let report = PolicySync::new(SyncOptions::new(tree.root()))
        .run(&client(&server))
        .await
        .unwrap();

    let outcomes: Vec<UpdateOutcome> = report.results.iter().map(|r| r.outcome).collect();
    assert_eq!(outcomes, vec![UpdateOutcome::Failed, UpdateOutcome::Applied]);
    assert_eq!(
        report.results[0].error.as_deref(),
        Some("One or more fields contain incorrect values")
    );
    assert_eq!(report.etag, "\"tok-2\"");
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_credentials_stop_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tree = PolicyTree::new();
    tree.api_policy("orders", VALID_POLICY);

    let result = PolicySync::new(SyncOptions::new(tree.root()))
        .run(&client(&server))
        .await;

    assert!(matches!(result, Err(Error::Connection)));
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_api_policy_blocks_every_write() {
    let server = service(&["orders"]).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tree = PolicyTree::new();
    tree.file("a.xml", VALID_POLICY);
    tree.file("b.xml", VALID_POLICY);
    let manifest = tree.manifest(
        "policies:\n  orders:\n    apiPolicyPath: a.xml\n  \"1\":\n    apiPolicyPath: a.xml\n  1:\n    apiPolicyPath: b.xml\n",
    );

    let result = PolicySync::new(SyncOptions::new(tree.root()).with_manifest(manifest))
        .run(&client(&server))
        .await;

    match result {
        Err(Error::Validation { violations }) => {
            assert_eq!(violations, vec!["Multiple API policies found for 1"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
