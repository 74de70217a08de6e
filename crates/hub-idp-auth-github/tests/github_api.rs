// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub client behaviour against a mock GitHub.

use std::time::Duration;

use hub_common_secret::SecretString;
use hub_idp_auth::FederatedAuthenticator;
use hub_idp_auth_github::{
	GitHubAuthenticator, GitHubEndpoints, GitHubOAuthClient, GitHubOAuthConfig, OAuthError,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitHubOAuthClient {
	let config = GitHubOAuthConfig {
		client_id: "hub-client".to_string(),
		client_secret: SecretString::new("hub-secret"),
		redirect_uri: "https://idp.example/commonauth".to_string(),
		scopes: vec!["user:email".to_string(), "read:user".to_string()],
		endpoints: GitHubEndpoints::from_base_urls(&server.uri(), &server.uri()).unwrap(),
	};
	GitHubOAuthClient::new(config, Duration::from_secs(5)).unwrap()
}

async fn mount_emails(server: &MockServer, body: serde_json::Value) {
	Mock::given(method("GET"))
		.and(path("/user/emails"))
		.and(header("Authorization", "Bearer gho_token"))
		.respond_with(ResponseTemplate::new(200).set_body_json(body))
		.expect(1)
		.mount(server)
		.await;
}

#[tokio::test]
async fn resolves_primary_email_after_secondary() {
	let server = MockServer::start().await;
	mount_emails(
		&server,
		json!([
			{"email": "a@x.io", "primary": false, "verified": true},
			{"email": "b@x.io", "primary": true, "verified": true}
		]),
	)
	.await;

	let email = client_for(&server)
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap();
	assert_eq!(email, "b@x.io");
}

#[tokio::test]
async fn unverified_primary_is_returned() {
	let server = MockServer::start().await;
	mount_emails(&server, json!([{"email": "p@x.io", "primary": true, "verified": false}])).await;

	let email = client_for(&server)
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap();
	assert_eq!(email, "p@x.io");
}

#[tokio::test]
async fn no_primary_is_no_verified_email() {
	let server = MockServer::start().await;
	mount_emails(&server, json!([{"email": "a@x.io", "primary": false, "verified": true}])).await;

	let err = client_for(&server)
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap_err();
	match err {
		OAuthError::NoVerifiedEmail { username } => assert_eq!(username, "octocat"),
		other => panic!("unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn empty_array_is_no_verified_email() {
	let server = MockServer::start().await;
	mount_emails(&server, json!([])).await;

	let err = client_for(&server)
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap_err();
	assert!(matches!(err, OAuthError::NoVerifiedEmail { .. }));
}

#[tokio::test]
async fn empty_body_is_no_verified_email() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/user/emails"))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;

	let err = client_for(&server)
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap_err();
	assert!(matches!(err, OAuthError::NoVerifiedEmail { .. }));
}

#[tokio::test]
async fn error_status_is_github_error() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/user/emails"))
		.respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
		.mount(&server)
		.await;

	let err = client_for(&server)
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap_err();
	assert!(matches!(err, OAuthError::GitHubError(_)));
	assert!(err.is_transport());
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/user/emails"))
		.respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
		.mount(&server)
		.await;

	let err = client_for(&server)
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap_err();
	assert!(matches!(err, OAuthError::ParseError(_)));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
	let config = GitHubOAuthConfig {
		client_id: String::new(),
		client_secret: SecretString::default(),
		redirect_uri: String::new(),
		scopes: Vec::new(),
		endpoints: GitHubEndpoints::from_base_urls("http://127.0.0.1:1", "http://127.0.0.1:1")
			.unwrap(),
	};
	let client = GitHubOAuthClient::new(config, Duration::from_secs(2)).unwrap();

	let err = client
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap_err();
	assert!(matches!(err, OAuthError::Transport(_)));
	assert!(err.is_transport());
}

async fn mount_token(server: &MockServer, body: serde_json::Value) {
	Mock::given(method("POST"))
		.and(path("/login/oauth/access_token"))
		.and(body_string_contains("code=the-code"))
		.and(body_string_contains("client_id=hub-client"))
		.respond_with(ResponseTemplate::new(200).set_body_json(body))
		.expect(1)
		.mount(server)
		.await;
}

async fn mount_user(server: &MockServer, body: serde_json::Value) {
	Mock::given(method("GET"))
		.and(path("/user"))
		.respond_with(ResponseTemplate::new(200).set_body_json(body))
		.expect(1)
		.mount(server)
		.await;
}

#[tokio::test]
async fn resolve_identity_builds_identity_with_one_profile_call() {
	let server = MockServer::start().await;
	mount_token(
		&server,
		json!({"access_token": "gho_token", "token_type": "bearer", "scope": "user:email"}),
	)
	.await;
	mount_user(&server, json!({"id": 583231, "login": "octocat", "name": "null"})).await;
	mount_emails(
		&server,
		json!([{"email": "octo@github.example", "primary": true, "verified": true}]),
	)
	.await;

	let authenticator = GitHubAuthenticator::new(client_for(&server)).unwrap();
	let identity = authenticator.resolve_identity("the-code").await.unwrap();

	assert_eq!(identity.user_identifier, "583231");
	assert_eq!(identity.login, "octocat");
	assert_eq!(identity.display_name, None);
	assert_eq!(identity.email.as_deref(), Some("octo@github.example"));
}

#[tokio::test]
async fn resolve_identity_keeps_real_display_name() {
	let server = MockServer::start().await;
	mount_token(&server, json!({"access_token": "gho_token"})).await;
	mount_user(&server, json!({"id": 1, "login": "mona", "name": "Mona Lisa"})).await;
	mount_emails(&server, json!([{"email": "mona@x.io", "primary": true}])).await;

	let authenticator = GitHubAuthenticator::new(client_for(&server)).unwrap();
	let identity = authenticator.resolve_identity("the-code").await.unwrap();
	assert_eq!(identity.display_name.as_deref(), Some("Mona Lisa"));
}

#[tokio::test]
async fn blank_access_token_stops_the_login() {
	let server = MockServer::start().await;
	mount_token(&server, json!({"access_token": "", "token_type": "bearer"})).await;

	let authenticator = GitHubAuthenticator::new(client_for(&server)).unwrap();
	let err = authenticator.resolve_identity("the-code").await.unwrap_err();
	assert!(matches!(err, OAuthError::EmptyAccessToken));
}

#[tokio::test]
async fn token_endpoint_error_is_reported() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/login/oauth/access_token"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"error": "bad_verification_code",
			"error_description": "The code passed is incorrect or expired."
		})))
		.mount(&server)
		.await;

	let authenticator = GitHubAuthenticator::new(client_for(&server)).unwrap();
	let err = authenticator.resolve_identity("stale").await.unwrap_err();
	match err {
		OAuthError::GitHubError(message) => assert!(message.contains("incorrect or expired")),
		other => panic!("unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn profile_without_login_is_missing_claim() {
	let server = MockServer::start().await;
	mount_token(&server, json!({"access_token": "gho_token"})).await;
	mount_user(&server, json!({"id": 7})).await;

	let authenticator = GitHubAuthenticator::new(client_for(&server)).unwrap();
	let err = authenticator.resolve_identity("the-code").await.unwrap_err();
	assert!(matches!(err, OAuthError::MissingClaim("login")));
}

#[tokio::test]
async fn profile_without_id_is_missing_claim() {
	let server = MockServer::start().await;
	mount_token(&server, json!({"access_token": "gho_token"})).await;
	mount_user(&server, json!({"login": "octocat"})).await;

	let authenticator = GitHubAuthenticator::new(client_for(&server)).unwrap();
	let err = authenticator.resolve_identity("the-code").await.unwrap_err();
	assert!(matches!(err, OAuthError::MissingClaim("id")));
}
