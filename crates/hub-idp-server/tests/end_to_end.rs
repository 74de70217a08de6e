// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration file to gate decision, through the composed extensions.

use hub_idp_auth::{
	AuthenticatedIdentity, AuthenticationContext, FlowStatus, HttpExchange, PostAuthnHandler,
};
use hub_idp_db::testing;
use hub_idp_post_authn::CreateOrgEndpoint;
use hub_idp_server::Extensions;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(
	dir: &std::path::Path,
	database_url: &str,
	github_base: &str,
) -> std::path::PathBuf {
	let path = dir.join("idp.toml");
	std::fs::write(
		&path,
		format!(
			r#"
[database]
url = "{database_url}"
data_source_name = "jdbc/HUB_E2E"
max_connections = 2
acquire_timeout_secs = 5

[github]
api_base_url = "{github_base}"
oauth_base_url = "{github_base}"

[org_gate]
priority = -1

[org_gate.properties]
CREATE_ORG_ENDPOINT = "https://create.example/org"
"#
		),
	)
	.unwrap();
	path
}

fn cli_login(user: &str, key: &str) -> AuthenticationContext {
	let mut context = AuthenticationContext::new(key)
		.with_application("My-CLI-Tool")
		.with_subject(AuthenticatedIdentity {
			user_identifier: user.to_string(),
			login: user.to_string(),
			display_name: None,
			email: None,
		});
	context.mark_sequence_executed();
	context
}

#[tokio::test]
async fn configured_extensions_gate_cli_logins() {
	let dir = tempfile::tempdir().unwrap();
	let db = testing::membership_db_config(dir.path()).await;
	let config_path = write_config(dir.path(), &db.url, "https://api.github.com");

	let config = hub_idp_config::load_from_sources(vec![
		Box::new(hub_idp_config::DefaultsSource),
		Box::new(hub_idp_config::TomlSource::new(&config_path)),
	])
	.unwrap();
	// Only the configured property, whatever the process environment holds.
	let endpoint =
		CreateOrgEndpoint::new(config.org_gate.properties.clone()).with_env_lookup(|_| None);
	let extensions = Extensions::from_config_with_endpoint(&config, endpoint).unwrap();

	assert_eq!(extensions.org_gate.priority(), 21);
	assert_eq!(extensions.provider.data_source_name(), "jdbc/HUB_E2E");

	let pool = extensions.provider.data_source().await.unwrap();
	testing::insert_membership(pool, "u1", "acme").await;

	let mut exchange = HttpExchange::new();
	let status = extensions
		.post_authn
		.run(&mut exchange, &cli_login("u1", "s-1"))
		.await
		.unwrap();
	assert_eq!(status, FlowStatus::SuccessCompleted);

	let mut exchange = HttpExchange::new();
	let status = extensions
		.post_authn
		.run(&mut exchange, &cli_login("u2", "s-2"))
		.await
		.unwrap();
	assert_eq!(status, FlowStatus::Incomplete);
	assert_eq!(
		exchange.redirect_location(),
		Some("https://create.example/org?sessionDataKey=s-2")
	);

	let mut web_login = AuthenticationContext::new("s-3").with_application("WebConsole");
	web_login.mark_sequence_executed();
	let status = extensions
		.post_authn
		.run(&mut HttpExchange::new(), &web_login)
		.await
		.unwrap();
	assert_eq!(status, FlowStatus::SuccessCompleted);

	assert_eq!(extensions.provider.initialization_count(), 1);
}

#[tokio::test]
async fn configured_github_client_resolves_email() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/user/emails"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([
			{"email": "old@x.io", "primary": false, "verified": true},
			{"email": "main@x.io", "primary": true, "verified": true}
		])))
		.expect(1)
		.mount(&server)
		.await;

	let dir = tempfile::tempdir().unwrap();
	let config_path = write_config(dir.path(), "sqlite:./unused.db", &server.uri());
	let config = hub_idp_config::load_from_sources(vec![
		Box::new(hub_idp_config::DefaultsSource),
		Box::new(hub_idp_config::TomlSource::new(&config_path)),
	])
	.unwrap();

	let extensions = Extensions::from_config(&config).unwrap();
	let email = extensions
		.github
		.resolve_primary_email("gho_token", "octocat")
		.await
		.unwrap();

	assert_eq!(email, "main@x.io");
	assert_eq!(extensions.provider.initialization_count(), 0);
}
