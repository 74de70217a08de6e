// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Primary email resolution.

use crate::{GitHubEmail, GitHubOAuthClient, OAuthError};

/// The first address flagged primary with a non-empty value, in the order
/// GitHub listed them.
pub fn select_primary_email(emails: &[GitHubEmail]) -> Option<&str> {
	emails
		.iter()
		.find(|e| e.primary && !e.email.is_empty())
		.map(|e| e.email.as_str())
}

impl GitHubOAuthClient {
	/// Fetch every address on the account, including private ones.
	#[tracing::instrument(skip(self, access_token), name = "GitHubOAuthClient::get_emails")]
	pub async fn get_emails(&self, access_token: &str) -> Result<Vec<GitHubEmail>, OAuthError> {
		tracing::debug!("fetching GitHub user emails");

		let response = self
			.api_get(self.config.endpoints.emails_url.clone(), access_token)
			.await?;

		if !response.status().is_success() {
			let status = response.status();
			let body = response.text().await.unwrap_or_default();
			return Err(OAuthError::GitHubError(format!(
				"failed to get emails ({status}): {body}"
			)));
		}

		let body = response.text().await?;
		if body.trim().is_empty() {
			return Ok(Vec::new());
		}

		serde_json::from_str(&body)
			.map_err(|e| OAuthError::ParseError(format!("failed to parse emails response: {e}")))
	}

	/// Resolve the user's primary email address with one call to the emails
	/// endpoint.
	///
	/// `username` only labels log lines and the error.
	///
	/// # Errors
	///
	/// - [`OAuthError::Transport`] / [`OAuthError::GitHubError`]: the call failed.
	/// - [`OAuthError::ParseError`]: the body is not an email list.
	/// - [`OAuthError::NoVerifiedEmail`]: no entry is primary with a non-empty address.
	#[tracing::instrument(skip(self, access_token), name = "GitHubOAuthClient::resolve_primary_email")]
	pub async fn resolve_primary_email(
		&self,
		access_token: &str,
		username: &str,
	) -> Result<String, OAuthError> {
		let emails = self.get_emails(access_token).await?;

		match select_primary_email(&emails) {
			Some(email) => {
				tracing::debug!("found a primary email for user");
				Ok(email.to_string())
			}
			None => {
				tracing::debug!(candidates = emails.len(), "no primary email for user");
				Err(OAuthError::NoVerifiedEmail {
					username: username.to_string(),
				})
			}
		}
	}
}
