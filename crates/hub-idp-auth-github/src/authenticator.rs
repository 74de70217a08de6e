// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The GitHub login step as the host sees it.

use async_trait::async_trait;
use hub_idp_auth::{AuthenticatedIdentity, FederatedAuthenticator};

use crate::{ConfigError, GitHubOAuthClient, OAuthError};

pub const AUTHENTICATOR_NAME: &str = "HubGithubAuthenticator";
pub const AUTHENTICATOR_FRIENDLY_NAME: &str = "Hub GitHub";

/// Federated GitHub login.
///
/// Fetches the profile once and always looks the email up through the
/// emails endpoint, so accounts with a private address still get one.
#[derive(Debug, Clone)]
pub struct GitHubAuthenticator {
	client: GitHubOAuthClient,
}

impl GitHubAuthenticator {
	/// Wrap a client whose configuration carries complete OAuth credentials.
	pub fn new(client: GitHubOAuthClient) -> Result<Self, ConfigError> {
		client.config().validate()?;
		Ok(Self { client })
	}

	pub fn client(&self) -> &GitHubOAuthClient {
		&self.client
	}
}

/// GitHub reports an unset profile name as `null`, sometimes as the string.
pub fn normalize_display_name(name: Option<String>) -> Option<String> {
	name.filter(|n| !n.is_empty() && !n.eq_ignore_ascii_case("null"))
}

#[async_trait]
impl FederatedAuthenticator for GitHubAuthenticator {
	type Error = OAuthError;

	fn name(&self) -> &str {
		AUTHENTICATOR_NAME
	}

	fn friendly_name(&self) -> &str {
		AUTHENTICATOR_FRIENDLY_NAME
	}

	fn authorization_url(&self, state: &str) -> String {
		self.client.authorization_url(state)
	}

	#[tracing::instrument(skip_all, name = "GitHubAuthenticator::resolve_identity")]
	async fn resolve_identity(&self, code: &str) -> Result<AuthenticatedIdentity, OAuthError> {
		let token = self.client.exchange_code(code).await?;
		if token.access_token.is_blank() {
			return Err(OAuthError::EmptyAccessToken);
		}
		let access_token = token.access_token.expose();

		let user = self.client.get_user(access_token).await?;
		let login = user
			.login
			.filter(|l| !l.is_empty())
			.ok_or(OAuthError::MissingClaim("login"))?;
		let id = user.id.ok_or(OAuthError::MissingClaim("id"))?;

		let email = self
			.client
			.resolve_primary_email(access_token, &login)
			.await?;

		tracing::debug!(%login, "GitHub user authenticated");
		Ok(AuthenticatedIdentity {
			user_identifier: id.to_string(),
			login,
			display_name: normalize_display_name(user.name),
			email: Some(email),
		})
	}
}
