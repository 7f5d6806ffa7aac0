//! Integration tests using mock HTTP server
//!
//! Tests the full flow: secret → client → paginated HTTP requests → items

use saas_bridge::clients::{klaviyo_secret_name, ClientProvider, SHEETS_SECRET};
use saas_bridge::config::{AppConfig, KlaviyoConfig};
use saas_bridge::klaviyo::{fetch_resources, fetch_with_client, ResourceKind};
use saas_bridge::pagination::{NoopObserver, PaginatedFetcher, TruncationPolicy};
use saas_bridge::secrets::StaticSecretProvider;
use saas_bridge::sheets::{handle_event, HandlerEvent};
use saas_bridge::Error;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, path_regex, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_PRIVATE_KEY: &str = include_str!("fixtures/test_rsa_key.pem");

fn tags(prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "type": "tag",
                "id": format!("{prefix}-{i}"),
                "attributes": {"name": format!("Tag {prefix} {i}")}
            })
        })
        .collect()
}

fn klaviyo_config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.klaviyo = KlaviyoConfig {
        base_url: format!("{}/api", server.uri()),
        max_retries: 2,
        max_delay_secs: 1,
        rate_limit: None,
        ..KlaviyoConfig::default()
    };
    config
}

fn klaviyo_provider(server: &MockServer) -> ClientProvider<StaticSecretProvider> {
    let secrets = StaticSecretProvider::new()
        .with_secret(klaviyo_secret_name("invigor8"), r#"{"api_key": "pk_live"}"#);
    ClientProvider::new(secrets, klaviyo_config(server))
}

fn quiet() -> PaginatedFetcher {
    PaginatedFetcher::new().observer(Arc::new(NoopObserver))
}

// ============================================================================
// Klaviyo Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_three_page_tag_listing() {
    let server = MockServer::start().await;
    let next = |cursor: &str| format!("{}/api/tags/?page%5Bcursor%5D={cursor}", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param_is_missing("page[cursor]"))
        .and(header("authorization", "Klaviyo-API-Key pk_live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": tags("a", 100),
            "links": {"next": next("abc")}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page[cursor]", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": tags("b", 100),
            "links": {"next": next("def")}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .and(query_param("page[cursor]", "def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": tags("c", 37),
            "links": {"next": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = fetch_resources(&klaviyo_provider(&server), "invigor8", "tags", &quiet())
        .await
        .unwrap();

    assert_eq!(outcome.len(), 237);
    assert_eq!(outcome.pages, 3);
    assert_eq!(outcome.items[0].id, "a-0");
    assert_eq!(outcome.items[100].id, "b-0");
    assert_eq!(outcome.items[236].id, "c-36");
}

#[tokio::test]
async fn test_page_failure_discards_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/segments/"))
        .and(query_param_is_missing("page[cursor]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"type": "segment", "id": "s1", "attributes": {"name": "One"}}],
            "links": {"next": format!("{}/api/segments/?page%5Bcursor%5D=xyz", server.uri())}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/segments/"))
        .and(query_param("page[cursor]", "xyz"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad cursor"))
        .mount(&server)
        .await;

    let err = fetch_resources(&klaviyo_provider(&server), "invigor8", "segments", &quiet())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 400, .. }));
}

#[tokio::test]
async fn test_rate_limited_page_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": tags("a", 2),
            "links": {}
        })))
        .mount(&server)
        .await;

    let outcome = fetch_resources(&klaviyo_provider(&server), "invigor8", "tags", &quiet())
        .await
        .unwrap();

    assert_eq!(outcome.len(), 2);
}

#[tokio::test]
async fn test_link_without_cursor_per_policy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": tags("a", 3),
            "links": {"next": format!("{}/api/tags/?page=2", server.uri())}
        })))
        .mount(&server)
        .await;

    let provider = klaviyo_provider(&server);
    let client = provider.klaviyo_client("invigor8", None, None).await.unwrap();

    let outcome = fetch_with_client(&client, ResourceKind::Tags, &quiet())
        .await
        .unwrap();
    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.pages, 1);

    let strict = quiet().policy(TruncationPolicy::Error);
    let err = fetch_with_client(&client, ResourceKind::Tags, &strict)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PaginationTruncated { .. }));
}

// ============================================================================
// Sheets Tests
// ============================================================================

fn service_account(server: &MockServer) -> Value {
    json!({
        "type": "service_account",
        "project_id": "test-project",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "sheets-bot@test-project.iam.gserviceaccount.com",
        "token_uri": format!("{}/token", server.uri())
    })
}

async fn mount_sheets(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.integration",
            "expires_in": 3600
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [{"properties": {"title": "Contacts"}}]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex("^/v4/spreadsheets/sheet-1/values/"))
        .and(header("authorization", "Bearer ya29.integration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["Email", "Phone", "Company"]]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sheets_client_from_secret_reads_header_row() {
    let server = MockServer::start().await;
    mount_sheets(&server).await;

    let mut config = AppConfig::default();
    config.google.sheets_base_url = format!("{}/v4", server.uri());
    let secrets = StaticSecretProvider::new()
        .with_secret(SHEETS_SECRET, service_account(&server).to_string());
    let provider = ClientProvider::new(secrets, config);

    let client = provider.sheets_client(None).await.unwrap();
    let columns = client.get_sheet_columns("sheet-1", None).await.unwrap();

    assert_eq!(columns, vec![json!("Email"), json!("Phone"), json!("Company")]);
}

#[tokio::test]
async fn test_handler_event_round_trip() {
    let server = MockServer::start().await;
    mount_sheets(&server).await;

    let mut config = AppConfig::default();
    config.google.sheets_base_url = format!("{}/v4", server.uri());

    let event = HandlerEvent {
        body: Some(
            json!({
                "sheet_id": "sheet-1",
                "service_account_key": service_account(&server),
                "delegated_email": "ops@example.com"
            })
            .to_string(),
        ),
    };

    let response = handle_event(&event, &config.google, Duration::from_secs(5)).await;
    assert_eq!(response.status_code, 200);

    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["sheet_id"], "sheet-1");
    assert_eq!(body["columns"], json!(["Email", "Phone", "Company"]));
    assert_eq!(body["column_count"], 3);
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_yaml_config_overrides_defaults() {
    let config = AppConfig::from_yaml_str(
        r"
secrets:
  region: eu-west-1
klaviyo:
  max_retries: 7
",
    )
    .unwrap();

    assert_eq!(config.secrets.region, "eu-west-1");
    assert_eq!(config.klaviyo.max_retries, 7);
    assert_eq!(config.klaviyo.revision, "2024-10-15");
    assert_eq!(config.google.delegated_email, "automation@futuretilt.com");
}
