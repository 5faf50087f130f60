mod common;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agentchat::auth::{
    AuthError, AzureCliCredential, ChainedTokenCredential, ClientSecretCredential,
    ManagedIdentityCredential, TokenCredential,
};

const SCOPE: &str = "https://ai.azure.com/.default";

#[tokio::test]
async fn client_secret_requests_client_credentials_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-1"))
        .and(body_string_contains("scope=https%3A%2F%2Fai.azure.com%2F.default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "sp-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential =
        ClientSecretCredential::new(reqwest::Client::new(), "tenant-1", "app-1", "secret")
            .with_authority_host(server.uri());
    let token = credential.get_token(SCOPE).await.unwrap().unwrap();

    assert_eq!(token.token, "sp-token");
    assert!(token.expires_at.unwrap() > Utc::now());
}

#[tokio::test]
async fn client_secret_rejection_is_a_hard_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;

    let credential =
        ClientSecretCredential::new(reqwest::Client::new(), "tenant-1", "app-1", "wrong")
            .with_authority_host(server.uri());
    let err = credential.get_token(SCOPE).await.unwrap_err();

    match err {
        AuthError::Rejected { source_name, message } => {
            assert_eq!(source_name, "client-secret");
            assert!(message.contains("AADSTS7000215"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn client_secret_rejects_unrepresentable_lifetime() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": i64::MAX,
            "access_token": "sp-token"
        })))
        .mount(&server)
        .await;

    let credential =
        ClientSecretCredential::new(reqwest::Client::new(), "tenant-1", "app-1", "secret")
            .with_authority_host(server.uri());
    let err = credential.get_token(SCOPE).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidResponse(ref m) if m.contains("expires_in")));
}

#[tokio::test]
async fn client_secret_needs_all_three_variables() {
    let credential = ClientSecretCredential::from_lookup(
        reqwest::Client::new(),
        &common::env(&[("AZURE_TENANT_ID", "t"), ("AZURE_CLIENT_ID", "c")]),
    );
    assert!(credential.get_token(SCOPE).await.unwrap().is_none());
}

#[tokio::test]
async fn managed_identity_sends_resource_and_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/msi/token"))
        .and(query_param("resource", "https://ai.azure.com"))
        .and(query_param("api-version", "2019-08-01"))
        .and(query_param("client_id", "uami-1"))
        .and(header("x-identity-header", "secret-header"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "mi-token",
            "expires_on": "1900000000",
            "resource": "https://ai.azure.com",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = ManagedIdentityCredential::new(
        reqwest::Client::new(),
        format!("{}/msi/token", server.uri()),
        "secret-header",
    )
    .with_client_id("uami-1");
    let token = credential.get_token(SCOPE).await.unwrap().unwrap();

    assert_eq!(token.token, "mi-token");
    assert_eq!(token.expires_at.unwrap().timestamp(), 1_900_000_000);
}

#[tokio::test]
async fn chain_prefers_explicit_token_over_identity_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let endpoint = format!("{}/msi/token", server.uri());
    let chain = ChainedTokenCredential::from_lookup(
        reqwest::Client::new(),
        common::env(&[
            ("AZURE_ACCESS_TOKEN", "explicit"),
            ("IDENTITY_ENDPOINT", endpoint.as_str()),
            ("IDENTITY_HEADER", "h"),
        ]),
    );

    assert_eq!(chain.get_token(SCOPE).await.unwrap().unwrap().token, "explicit");
}

#[tokio::test]
async fn chain_falls_through_to_managed_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/msi/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "mi-token",
            "expires_on": 1_900_000_000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/msi/token", server.uri());
    let chain = ChainedTokenCredential::from_lookup(
        reqwest::Client::new(),
        common::env(&[
            ("IDENTITY_ENDPOINT", endpoint.as_str()),
            ("IDENTITY_HEADER", "h"),
        ]),
    );

    assert_eq!(chain.get_token(SCOPE).await.unwrap().unwrap().token, "mi-token");
    // Second lookup is served from the cache.
    assert_eq!(chain.get_token(SCOPE).await.unwrap().unwrap().token, "mi-token");
}

#[cfg(unix)]
mod azure_cli {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn fake_az(dir: &tempfile::TempDir, script: &str) -> PathBuf {
        let program = dir.path().join("az");
        std::fs::write(&program, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
        program
    }

    #[tokio::test]
    async fn signed_in_cli_provides_token() {
        let dir = tempfile::TempDir::new().unwrap();
        let program = fake_az(
            &dir,
            r#"echo '{"accessToken":"cli-token","expiresOn":"2030-01-01 00:00:00.000000","expires_on":1893456000,"tokenType":"Bearer"}'"#,
        );

        let credential = AzureCliCredential::new().with_program(program);
        let token = credential.get_token(SCOPE).await.unwrap().unwrap();

        assert_eq!(token.token, "cli-token");
        assert_eq!(token.expires_at.unwrap().timestamp(), 1_893_456_000);
    }

    #[tokio::test]
    async fn signed_out_cli_is_a_hard_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let program = fake_az(&dir, "echo \"ERROR: Please run 'az login' to setup account.\" >&2\nexit 1");

        let credential = AzureCliCredential::new().with_program(program);
        let err = credential.get_token(SCOPE).await.unwrap_err();

        assert!(matches!(err, AuthError::Rejected { ref message, .. } if message.contains("az login")));
    }
}
