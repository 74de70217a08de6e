// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub OAuth 2.0 login for the hub identity provider.
//!
//! # OAuth Flow
//!
//! 1. **Authorization URL Generation**: [`GitHubOAuthClient::authorization_url`]
//!    sends the browser to GitHub with a CSRF `state` value.
//!
//! 2. **Code Exchange**: GitHub redirects back with a `code`, which
//!    [`GitHubOAuthClient::exchange_code`] trades for an access token.
//!
//! 3. **Profile**: a single `/user` call supplies the subject id, login and
//!    display name.
//!
//! 4. **Email**: [`GitHubOAuthClient::resolve_primary_email`] reads
//!    `/user/emails`, which also covers users whose public profile hides
//!    their address.
//!
//! [`GitHubAuthenticator`] strings these steps together behind the host's
//! [`FederatedAuthenticator`](hub_idp_auth::FederatedAuthenticator) trait.
//!
//! # Example
//!
//! ```rust,no_run
//! use hub_idp_auth_github::{GitHubOAuthClient, GitHubOAuthConfig};
//!
//! # async fn example(config: hub_idp_config::IdpConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let oauth = GitHubOAuthConfig::from_config(&config.github)?;
//! let client = GitHubOAuthClient::new(oauth, config.http.timeout())?;
//!
//! let email = client.resolve_primary_email("gho_token", "octocat").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Security Considerations
//!
//! - The `client_secret` and access tokens are wrapped in [`SecretString`].
//! - All tracing instrumentation skips tokens and authorization codes.

mod authenticator;
mod email;
mod error;

pub use authenticator::{
	normalize_display_name, GitHubAuthenticator, AUTHENTICATOR_FRIENDLY_NAME, AUTHENTICATOR_NAME,
};
pub use email::select_primary_email;
pub use error::{ConfigError, OAuthError};

use std::time::Duration;

use hub_common_secret::SecretString;
use hub_idp_config::{GitHubConfig, DEFAULT_GITHUB_API_BASE_URL, DEFAULT_GITHUB_OAUTH_BASE_URL};
use serde::{Deserialize, Serialize};
use url::Url;

const GITHUB_API_VERSION: &str = "2022-11-28";

// =============================================================================
// Configuration
// =============================================================================

/// The four GitHub URLs the login touches.
///
/// Derived from the OAuth and API base URLs so GitHub Enterprise hosts and
/// local mock servers can stand in for github.com.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubEndpoints {
	pub authorize_url: Url,
	pub token_url: Url,
	pub user_url: Url,
	pub emails_url: Url,
}

impl GitHubEndpoints {
	/// Build the endpoint set from base URLs such as `https://github.com`
	/// and `https://api.github.com`.
	pub fn from_base_urls(oauth_base_url: &str, api_base_url: &str) -> Result<Self, ConfigError> {
		let oauth = oauth_base_url.trim_end_matches('/');
		let api = api_base_url.trim_end_matches('/');

		Ok(Self {
			authorize_url: parse_url(&format!("{oauth}/login/oauth/authorize"))?,
			token_url: parse_url(&format!("{oauth}/login/oauth/access_token"))?,
			user_url: parse_url(&format!("{api}/user"))?,
			emails_url: parse_url(&format!("{api}/user/emails"))?,
		})
	}

	pub fn github_com() -> Result<Self, ConfigError> {
		Self::from_base_urls(DEFAULT_GITHUB_OAUTH_BASE_URL, DEFAULT_GITHUB_API_BASE_URL)
	}
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|e| ConfigError::InvalidConfig(format!("invalid URL {raw}: {e}")))
}

/// Configuration for the GitHub OAuth client.
///
/// Credentials may be left empty when the client is only used for email
/// resolution with an existing token; [`validate`](Self::validate) is what
/// the login flow checks.
#[derive(Debug, Clone)]
pub struct GitHubOAuthConfig {
	pub client_id: String,
	/// The OAuth application client secret (wrapped to prevent logging).
	pub client_secret: SecretString,
	/// The callback URL where GitHub redirects after authorization.
	pub redirect_uri: String,
	/// OAuth scopes to request (e.g., "user:email", "read:user").
	pub scopes: Vec<String>,
	pub endpoints: GitHubEndpoints,
}

impl GitHubOAuthConfig {
	/// Build from the loaded `[github]` configuration section.
	///
	/// Requests the `user:email` and `read:user` scopes. Missing credentials
	/// become empty values; only malformed base URLs fail here.
	pub fn from_config(config: &GitHubConfig) -> Result<Self, ConfigError> {
		Ok(Self {
			client_id: config.client_id.clone().unwrap_or_default(),
			client_secret: config.client_secret.clone().unwrap_or_default(),
			redirect_uri: config.redirect_uri.clone().unwrap_or_default(),
			scopes: vec!["user:email".to_string(), "read:user".to_string()],
			endpoints: GitHubEndpoints::from_base_urls(
				&config.oauth_base_url,
				&config.api_base_url,
			)?,
		})
	}

	/// Check that the credentials needed for the login flow are present.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingSetting("client_id"));
		}
		if self.client_secret.is_blank() {
			return Err(ConfigError::MissingSetting("client_secret"));
		}
		if self.redirect_uri.is_empty() {
			return Err(ConfigError::MissingSetting("redirect_uri"));
		}
		Ok(())
	}

	/// Join scopes into a space-separated string for the authorization URL.
	pub fn scopes_string(&self) -> String {
		self.scopes.join(" ")
	}
}

// =============================================================================
// Response types
// =============================================================================

/// Response from GitHub's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubTokenResponse {
	/// Empty when GitHub omitted it; callers must check.
	#[serde(default)]
	pub access_token: SecretString,
	#[serde(default)]
	pub token_type: String,
	/// Granted OAuth scopes (comma or space-separated).
	#[serde(default)]
	pub scope: String,
}

/// User profile from GitHub's `/user` endpoint.
///
/// Every field is optional on the wire; the login decides which ones it
/// cannot do without.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubUser {
	/// Numeric user id, stable across username changes.
	#[serde(default)]
	pub id: Option<i64>,
	#[serde(default)]
	pub login: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	/// Public email only; see [`GitHubOAuthClient::resolve_primary_email`].
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub avatar_url: Option<String>,
}

/// One entry from GitHub's `/user/emails` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubEmail {
	pub email: String,
	#[serde(default)]
	pub primary: bool,
	/// Reported by GitHub but not consulted when picking the address.
	#[serde(default)]
	pub verified: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
	error: String,
	error_description: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// OAuth client for authenticating users via GitHub.
#[derive(Debug, Clone)]
pub struct GitHubOAuthClient {
	config: GitHubOAuthConfig,
	http_client: reqwest::Client,
}

impl GitHubOAuthClient {
	/// Create a client whose requests time out after `timeout`.
	#[tracing::instrument(skip_all, name = "GitHubOAuthClient::new")]
	pub fn new(config: GitHubOAuthConfig, timeout: Duration) -> Result<Self, OAuthError> {
		let http_client = hub_common_http::client_with_timeout(timeout)?;
		Ok(Self::with_http_client(config, http_client))
	}

	pub fn with_http_client(config: GitHubOAuthConfig, http_client: reqwest::Client) -> Self {
		Self {
			config,
			http_client,
		}
	}

	pub fn config(&self) -> &GitHubOAuthConfig {
		&self.config
	}

	/// Generate the GitHub authorization URL carrying `client_id`,
	/// `redirect_uri`, `scope` and the CSRF `state`.
	#[tracing::instrument(skip(self), fields(client_id = %self.config.client_id))]
	pub fn authorization_url(&self, state: &str) -> String {
		let mut url = self.config.endpoints.authorize_url.clone();

		url
			.query_pairs_mut()
			.append_pair("client_id", &self.config.client_id)
			.append_pair("redirect_uri", &self.config.redirect_uri)
			.append_pair("scope", &self.config.scopes_string())
			.append_pair("state", state);

		url.to_string()
	}

	/// Exchange an authorization code for an access token.
	///
	/// # Errors
	///
	/// - [`OAuthError::Transport`]: Network error or timeout.
	/// - [`OAuthError::GitHubError`]: GitHub rejected the code (expired, invalid, etc.).
	/// - [`OAuthError::ParseError`]: Unexpected response format.
	#[tracing::instrument(skip(self, code), name = "GitHubOAuthClient::exchange_code")]
	pub async fn exchange_code(&self, code: &str) -> Result<GitHubTokenResponse, OAuthError> {
		tracing::debug!("exchanging authorization code for access token");

		let response = self
			.http_client
			.post(self.config.endpoints.token_url.clone())
			.header("Accept", "application/json")
			.form(&[
				("client_id", self.config.client_id.as_str()),
				("client_secret", self.config.client_secret.expose().as_str()),
				("code", code),
				("redirect_uri", self.config.redirect_uri.as_str()),
				("grant_type", "authorization_code"),
			])
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if let Ok(error_response) = serde_json::from_str::<GitHubErrorResponse>(&body) {
			if !error_response.error.is_empty() {
				let message = error_response
					.error_description
					.unwrap_or(error_response.error);
				return Err(OAuthError::GitHubError(message));
			}
		}

		if !status.is_success() {
			return Err(OAuthError::GitHubError(format!(
				"token endpoint returned {status}: {body}"
			)));
		}

		serde_json::from_str(&body)
			.map_err(|e| OAuthError::ParseError(format!("failed to parse token response: {e}")))
	}

	/// Fetch the authenticated user's profile from GitHub.
	#[tracing::instrument(skip(self, access_token), name = "GitHubOAuthClient::get_user")]
	pub async fn get_user(&self, access_token: &str) -> Result<GitHubUser, OAuthError> {
		tracing::debug!("fetching GitHub user info");

		let response = self
			.api_get(self.config.endpoints.user_url.clone(), access_token)
			.await?;

		if !response.status().is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(OAuthError::GitHubError(format!("failed to get user: {body}")));
		}

		response
			.json()
			.await
			.map_err(|e| OAuthError::ParseError(format!("failed to parse user response: {e}")))
	}

	async fn api_get(&self, url: Url, access_token: &str) -> Result<reqwest::Response, OAuthError> {
		Ok(
			self
				.http_client
				.get(url)
				.header("Accept", "application/vnd.github+json")
				.header("Authorization", format!("Bearer {access_token}"))
				.header("X-GitHub-Api-Version", GITHUB_API_VERSION)
				.send()
				.await?,
		)
	}
}
