//! Tests for the auth module

use super::*;
use crate::error::Error;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/test_rsa_key.pem");
const TEST_PUBLIC_KEY: &str = include_str!("../../tests/fixtures/test_rsa_key.pub.pem");

fn test_key(token_uri: &str) -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: "automation-bot@test-project.iam.gserviceaccount.com".to_string(),
        private_key: TEST_PRIVATE_KEY.to_string(),
        private_key_id: Some("key-1".to_string()),
        token_uri: token_uri.to_string(),
        project_id: Some("test-project".to_string()),
    }
}

#[tokio::test]
async fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");

    let built = auth.apply(req).await.unwrap().build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
}

#[tokio::test]
async fn test_api_key_header_with_prefix() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        header: "Authorization".to_string(),
        prefix: Some("Klaviyo-API-Key ".to_string()),
        value: "pk_test".to_string(),
    });

    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api")).await.unwrap();

    let built = req.build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Klaviyo-API-Key pk_test"
    );
}

#[tokio::test]
async fn test_api_key_without_prefix() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        header: "X-API-Key".to_string(),
        prefix: None,
        value: "key-123".to_string(),
    });

    let client = reqwest::Client::new();
    let built = auth
        .apply(client.get("https://example.com/api"))
        .await
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(built.headers().get("X-API-Key").unwrap(), "key-123");
}

#[test]
fn test_sign_assertion_claims() {
    let key = test_key("https://oauth2.example.com/token");
    let jwt = sign_assertion(
        &key,
        &["https://www.googleapis.com/auth/spreadsheets".to_string()],
        Some("automation@example.com"),
        3600,
    )
    .unwrap();

    let header = decode_header(&jwt).unwrap();
    assert_eq!(header.alg, Algorithm::RS256);
    assert_eq!(header.kid.as_deref(), Some("key-1"));

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&["https://oauth2.example.com/token"]);
    let decoded = decode::<Value>(
        &jwt,
        &DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap(),
        &validation,
    )
    .unwrap();

    let claims = decoded.claims;
    assert_eq!(
        claims["iss"],
        "automation-bot@test-project.iam.gserviceaccount.com"
    );
    assert_eq!(claims["sub"], "automation@example.com");
    assert_eq!(claims["scope"], "https://www.googleapis.com/auth/spreadsheets");
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        3600
    );
}

#[test]
fn test_sign_assertion_without_subject() {
    let key = test_key("https://oauth2.example.com/token");
    let jwt = sign_assertion(&key, &[], None, 60).unwrap();

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&["https://oauth2.example.com/token"]);
    let decoded = decode::<Value>(
        &jwt,
        &DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap(),
        &validation,
    )
    .unwrap();

    assert!(decoded.claims.get("sub").is_none());
}

#[test]
fn test_sign_assertion_rejects_bad_key() {
    let mut key = test_key("https://oauth2.example.com/token");
    key.private_key = "not a pem".to_string();

    let err = sign_assertion(&key, &[], None, 60).unwrap_err();
    assert!(matches!(err, Error::JwtGeneration { .. }));
}

#[tokio::test]
async fn test_service_account_exchange_and_caching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthConfig::service_account(
        test_key(&format!("{}/token", mock_server.uri())),
        &["https://www.googleapis.com/auth/spreadsheets"],
        Some("automation@example.com".to_string()),
    ));

    let client = reqwest::Client::new();
    for _ in 0..3 {
        let built = auth
            .apply(client.get("https://sheets.example.com/v4"))
            .await
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            built.headers().get("Authorization").unwrap(),
            "Bearer ya29.test-token"
        );
    }
}

#[tokio::test]
async fn test_clear_cache_forces_new_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthConfig::service_account(
        test_key(&format!("{}/token", mock_server.uri())),
        &[],
        None,
    ));

    assert_eq!(auth.access_token().await.unwrap(), "fresh");
    auth.clear_cache().await;
    assert_eq!(auth.access_token().await.unwrap(), "fresh");
}

#[tokio::test]
async fn test_token_exchange_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized_client",
            "error_description": "Client is unauthorized to retrieve access tokens"
        })))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthConfig::service_account(
        test_key(&format!("{}/token", mock_server.uri())),
        &["https://www.googleapis.com/auth/spreadsheets"],
        Some("someone@example.com".to_string()),
    ));

    let err = auth.access_token().await.unwrap_err();
    match err {
        Error::TokenExchange { message } => {
            assert!(message.contains("401"));
            assert!(message.contains("unauthorized_client"));
        }
        other => panic!("Expected TokenExchange, got {other:?}"),
    }
}

#[tokio::test]
async fn test_access_token_not_supported_for_api_key() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        header: "Authorization".to_string(),
        prefix: None,
        value: "k".to_string(),
    });

    assert!(matches!(
        auth.access_token().await,
        Err(Error::Auth { .. })
    ));
}
