use std::time::{Duration, SystemTime};

use serde_json::{Value, json};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gmcli::api::{ClientConfig, GmailClient, ThreadFormat};
use gmcli::auth::Credentials;
use gmcli::error::AppError;

const CLIENT_ID: &str = "1234567890-test.apps.googleusercontent.com";
const CLIENT_SECRET: &str = "GOCSPX-test-secret-value";
const REFRESH_TOKEN: &str = "1//refresh-token-value";

fn make_client(server: &MockServer) -> GmailClient {
    let config = ClientConfig {
        api_base: format!("{}/gmail/v1", server.uri()),
        token_endpoint: format!("{}/token", server.uri()),
        refresh_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_secs(5),
    };
    GmailClient::with_config(
        Credentials::new(CLIENT_ID, CLIENT_SECRET, REFRESH_TOKEN),
        config,
    )
}

fn seeded(server: &MockServer, token: &str) -> GmailClient {
    make_client(server).with_access_token(token, SystemTime::now() + Duration::from_secs(600))
}

async fn mount_token(server: &MockServer, access_token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "expires_in": 3599,
            "token_type": "Bearer",
        })))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn refreshes_before_first_request() {
    let server = MockServer::start().await;
    mount_token(&server, "fresh_token", 1).await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/labels"))
        .and(header("authorization", "Bearer fresh_token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "labels": [{"id": "INBOX", "name": "INBOX", "type": "system"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let mut client = make_client(&server);
    assert_eq!(client.access_token(), None);

    let labels = client.list_labels().await.expect("labels load");
    assert_eq!(labels.len(), 1);
    assert_eq!(client.access_token(), Some("fresh_token"));

    // cached token is reused
    client.list_labels().await.expect("labels load again");
}

#[tokio::test]
async fn token_near_expiry_is_refreshed() {
    let server = MockServer::start().await;
    mount_token(&server, "fresh_token", 1).await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/drafts"))
        .and(header("authorization", "Bearer fresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = make_client(&server)
        .with_access_token("stale_token", SystemTime::now() + Duration::from_secs(30));

    let drafts = client.list_drafts().await.expect("drafts load");
    assert!(drafts.drafts.is_empty());
}

#[tokio::test]
async fn retries_once_after_unauthorized() {
    let server = MockServer::start().await;
    mount_token(&server, "fresh_token", 1).await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/threads/abc"))
        .and(header("authorization", "Bearer old_token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/threads/abc"))
        .and(header("authorization", "Bearer fresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "messages": [{"id": "m1", "labelIds": ["INBOX"]}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "old_token");
    let thread = client
        .get_thread("abc", ThreadFormat::Full, &[])
        .await
        .expect("thread loads");

    assert_eq!(thread.messages.len(), 1);
    assert_eq!(client.access_token(), Some("fresh_token"));
}

#[tokio::test]
async fn second_unauthorized_is_an_api_error() {
    let server = MockServer::start().await;
    mount_token(&server, "fresh_token", 1).await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/threads/abc"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "message": "Request had invalid authentication credentials."}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "old_token");
    let err = client
        .get_thread("abc", ThreadFormat::Full, &[])
        .await
        .expect_err("should surface unauthorized");

    match err {
        AppError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Request had invalid authentication credentials.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_refresh_is_an_auth_error_without_secrets() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": format!("Bad refresh token {REFRESH_TOKEN}"),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = make_client(&server);
    let err = client
        .list_labels()
        .await
        .expect_err("refresh should fail");

    match err {
        AppError::Auth(message) => {
            assert_eq!(message, "Bad refresh token [REDACTED]");
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn api_errors_are_redacted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/threads/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": format!("Not found for client {CLIENT_ID}")}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "live_access_token");
    let err = client
        .get_thread("missing", ThreadFormat::Full, &[])
        .await
        .expect_err("should be not found");

    assert_eq!(err.status(), Some(404));
    let rendered = err.to_string();
    assert!(rendered.contains("[REDACTED]"));
    assert!(!rendered.contains(CLIENT_ID));
}

#[tokio::test]
async fn search_clamps_and_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/threads"))
        .and(query_param("q", "in:inbox"))
        .and(query_param("maxResults", "500"))
        .and(query_param("pageToken", "next-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "threads": [{"id": "t1"}, {"id": "t2"}],
            "nextPageToken": "next-2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "live_access_token");
    let list = client
        .search_threads("in:inbox", 1000, Some("next-1"))
        .await
        .expect("search works");

    assert_eq!(list.threads.len(), 2);
    assert_eq!(list.next_page_token.as_deref(), Some("next-2"));
}

#[tokio::test]
async fn modify_omits_empty_label_lists() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gmail/v1/users/me/threads/t1/modify"))
        .and(body_json(json!({"removeLabelIds": ["UNREAD"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "t1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "live_access_token");
    client
        .modify_thread_labels("t1", &[], &["UNREAD".to_string()])
        .await
        .expect("modify works");
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let server = MockServer::start().await;
    mount_token(&server, "fresh_token", 1).await;

    Mock::given(method("DELETE"))
        .and(path("/gmail/v1/users/me/drafts/r-123"))
        .and(header("authorization", "Bearer old_token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/gmail/v1/users/me/drafts/r-123"))
        .and(header("authorization", "Bearer fresh_token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "old_token");
    client.delete_draft("r-123").await.expect("delete works");
}

#[tokio::test]
async fn empty_success_body_reads_as_empty_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gmail/v1/users/me/drafts/send"))
        .and(body_json(json!({"id": "r-9"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "live_access_token");
    let value: Value = client
        .post("/users/me/drafts/send", &json!({"id": "r-9"}))
        .await
        .expect("post works");
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn attachment_download_decodes_base64url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/m1/attachments/att-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "size": 5,
            "data": "aGVsbG8",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "live_access_token");
    let bytes = client
        .download_attachment("m1", "att-1")
        .await
        .expect("download works");
    assert_eq!(bytes, b"hello");
}

#[tokio::test]
async fn unrepresentable_token_lifetime_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-abcdefghij",
            "expires_in": u64::MAX,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"labels": []})))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = make_client(&server);
    let err = client
        .list_labels()
        .await
        .expect_err("overflowing expiry should fail the refresh");

    match err {
        AppError::Auth(message) => assert!(message.contains("malformed token response")),
        other => panic!("expected auth error, got {other:?}"),
    }
    assert_eq!(client.access_token(), None);
}

#[tokio::test]
async fn slow_response_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/labels"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"labels": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        api_base: format!("{}/gmail/v1", server.uri()),
        token_endpoint: format!("{}/token", server.uri()),
        refresh_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_millis(200),
    };
    let mut client = GmailClient::with_config(
        Credentials::new(CLIENT_ID, CLIENT_SECRET, REFRESH_TOKEN),
        config,
    )
    .with_access_token("live_access_token", SystemTime::now() + Duration::from_secs(600));

    let err = client.list_labels().await.expect_err("should time out");
    assert_eq!(err.status(), None);
    match err {
        AppError::Transport(message) => assert!(message.contains("timed out"), "{message}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_redacted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "labels": "live_access_token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = seeded(&server, "live_access_token");
    let err = client.list_labels().await.expect_err("labels must be a list");

    match err {
        AppError::Decode(message) => {
            assert!(message.contains("[REDACTED]"), "{message}");
            assert!(!message.contains("live_access_token"));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}
