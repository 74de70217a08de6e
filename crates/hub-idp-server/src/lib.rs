// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hub identity-provider extensions, wired together.
//!
//! [`Extensions::from_config`] is the one place where the pooled data
//! source, the membership store, the organization gate, the handler chain
//! and the GitHub login are built and connected. The host keeps the
//! returned value for the life of the process.

pub mod error;

use std::sync::Arc;

use hub_common_secret::REDACTED;
use hub_idp_auth_github::{GitHubAuthenticator, GitHubOAuthClient, GitHubOAuthConfig};
use hub_idp_config::IdpConfig;
use hub_idp_db::{ConnectionProvider, SqlMembershipStore};
use hub_idp_post_authn::{CreateOrgEndpoint, OrganizationGate, PostAuthnChain};
use serde_json::{json, Value};
use url::Url;

pub use error::{Result, ServerError};

/// Everything the host registers at startup.
pub struct Extensions {
	pub provider: Arc<ConnectionProvider>,
	pub org_gate: Arc<OrganizationGate>,
	pub post_authn: PostAuthnChain,
	pub github: GitHubOAuthClient,
	/// Present only when the GitHub OAuth credentials are configured.
	pub authenticator: Option<GitHubAuthenticator>,
}

impl Extensions {
	/// Build the extensions. No connection is opened and no request is sent;
	/// the pool is created on first use.
	pub fn from_config(config: &IdpConfig) -> Result<Self> {
		Self::from_config_with_endpoint(
			config,
			CreateOrgEndpoint::new(config.org_gate.properties.clone()),
		)
	}

	/// Like [`from_config`](Self::from_config), with the organization
	/// creation endpoint supplied by the caller.
	#[tracing::instrument(skip_all)]
	pub fn from_config_with_endpoint(
		config: &IdpConfig,
		endpoint: CreateOrgEndpoint,
	) -> Result<Self> {
		let provider = Arc::new(ConnectionProvider::new(config.database.clone()));
		let store = Arc::new(SqlMembershipStore::new(Arc::clone(&provider)));

		let org_gate =
			Arc::new(OrganizationGate::new(store, &config.org_gate).with_endpoint(endpoint));
		let post_authn = PostAuthnChain::new().with(org_gate.clone());

		let oauth = GitHubOAuthConfig::from_config(&config.github)?;
		let github = GitHubOAuthClient::new(oauth, config.http.timeout())?;

		let authenticator = if config.github.has_oauth_credentials() {
			Some(GitHubAuthenticator::new(github.clone())?)
		} else {
			tracing::info!("GitHub OAuth credentials not configured, federated login disabled");
			None
		};

		Ok(Self {
			provider,
			org_gate,
			post_authn,
			github,
			authenticator,
		})
	}
}

/// The resolved configuration as JSON, with secrets and database
/// passwords replaced by [`REDACTED`].
pub fn describe_config(config: &IdpConfig) -> Value {
	json!({
		"database": {
			"url": redact_database_url(&config.database.url),
			"data_source_name": config.database.data_source_name,
			"max_connections": config.database.max_connections,
			"acquire_timeout_secs": config.database.acquire_timeout_secs,
		},
		"github": {
			"client_id": config.github.client_id,
			"client_secret": config.github.client_secret.as_ref().map(|_| REDACTED),
			"redirect_uri": config.github.redirect_uri,
			"api_base_url": config.github.api_base_url,
			"oauth_base_url": config.github.oauth_base_url,
		},
		"org_gate": {
			"enabled": config.org_gate.enabled,
			"priority": config.org_gate.priority,
			"properties": config.org_gate.properties,
		},
		"http": {
			"timeout_secs": config.http.timeout_secs,
		},
		"logging": {
			"level": config.logging.level,
		},
	})
}

fn redact_database_url(raw: &str) -> String {
	match Url::parse(raw) {
		Ok(mut url) if url.password().is_some() => {
			if url.set_password(Some(REDACTED)).is_err() {
				return REDACTED.to_string();
			}
			url.to_string()
		}
		_ => raw.to_string(),
	}
}
