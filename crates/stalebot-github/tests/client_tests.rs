//! HTTP-level tests for the GitHub client against a mock server

use serde_json::json;
use stalebot_config::{ConfigError, ValidationReport, Violation};
use stalebot_domain::{IssueTracker, Repository, SearchRequest, TrackerFailure};
use stalebot_github::{GitHubClient, GitHubError};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new("test-token", Repository::parse("octo-org/octo-repo").unwrap())
        .unwrap()
        .with_api_url(&server.uri())
        .unwrap()
}

#[tokio::test]
async fn test_search_sends_query_and_parses_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", "repo:octo-org/octo-repo is:open is:issue"))
        .and(query_param("sort", "updated"))
        .and(query_param("order", "desc"))
        .and(query_param("per_page", "30"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "items": [
                { "number": 1, "state": "open", "locked": false, "labels": [] },
                { "number": 2, "state": "open", "locked": true, "labels": [{ "name": "stale" }] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request =
        SearchRequest::recently_updated("repo:octo-org/octo-repo is:open is:issue", 30);
    let items = client(&server).await.search(&request).await.unwrap();

    assert_eq!(items.len(), 2);
    assert!(!items[0].locked);
    assert!(items[1].locked);
    assert!(items[1].has_label("stale"));
}

#[tokio::test]
async fn test_label_exists_maps_404_to_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo-org/octo-repo/labels/stale"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo-org/octo-repo/labels/pinned"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "pinned" })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    assert!(!client.label_exists("stale").await.unwrap());
    assert!(client.label_exists("pinned").await.unwrap());
}

#[tokio::test]
async fn test_mutations_send_expected_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo-org/octo-repo/labels"))
        .and(body_json(json!({ "name": "stale", "color": "ffffff" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/octo-org/octo-repo/issues/5/labels"))
        .and(body_json(json!({ "labels": ["stale"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/octo-org/octo-repo/issues/5/comments"))
        .and(body_json(json!({ "body": "Marked stale" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octo-org/octo-repo/issues/5"))
        .and(body_json(json!({ "state": "closed" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    client.create_label("stale", "ffffff").await.unwrap();
    client.add_labels(5, &["stale".to_string()]).await.unwrap();
    client.create_comment(5, "Marked stale").await.unwrap();
    client.close(5).await.unwrap();
}

#[tokio::test]
async fn test_remove_label_not_found_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/octo-org/octo-repo/issues/8/labels/stale"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Label does not exist" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repos/octo-org/octo-repo/issues/9/labels/stale"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client(&server).await;

    let err = client.remove_label(8, "stale").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Label does not exist"));

    let err = client.remove_label(9, "stale").await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err, GitHubError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_get_item_without_labels_and_deleted_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo-org/octo-repo/issues/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 3, "state": "closed", "labels": [{ "name": "stale" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo-org/octo-repo/issues/4"))
        .respond_with(ResponseTemplate::new(410).set_body_json(json!({ "message": "Gone" })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let item = client.get_item(3).await.unwrap();
    assert!(item.is_closed());
    assert!(item.has_label("stale"));

    assert!(client.get_item(4).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_check_run_carries_annotations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo-org/octo-repo/check-runs"))
        .and(body_partial_json(json!({
            "name": "Stale YAML validation",
            "head_sha": "abc123",
            "conclusion": "failure",
            "output": {
                "title": "Stale config validation",
                "annotations": [{
                    "path": ".github/stale.yml",
                    "start_line": 1,
                    "end_line": 1,
                    "annotation_level": "failure",
                    "message": "\"daysUntilStale\" must be a number"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let error = ConfigError::Invalid(vec![Violation::WrongType {
        field: "daysUntilStale".to_string(),
        expected: "a number",
    }]);
    let report =
        ValidationReport::from_error(&error, ".github/stale.yml", "daysUntilStale: soon\n");

    client(&server)
        .await
        .create_check_run("abc123", &report)
        .await
        .unwrap();
}
