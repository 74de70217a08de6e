// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Errors that can occur when building the OAuth configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// A required setting was not provided.
	#[error("missing GitHub setting: {0}")]
	MissingSetting(&'static str),

	/// A configuration value was empty or invalid.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Errors that can occur during OAuth operations.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
	/// The HTTP request to GitHub failed (network error, timeout, etc.).
	#[error("HTTP request failed: {0}")]
	Transport(#[from] reqwest::Error),

	/// The response from GitHub could not be parsed as expected.
	#[error("failed to parse response: {0}")]
	ParseError(String),

	/// GitHub returned an error response (invalid code, expired token, etc.).
	#[error("GitHub API error: {0}")]
	GitHubError(String),

	/// The token endpoint answered without an access token.
	#[error("access token is empty or missing")]
	EmptyAccessToken,

	/// The user profile lacks a claim the login cannot proceed without.
	#[error("GitHub user profile has no {0}")]
	MissingClaim(&'static str),

	/// None of the user's addresses is flagged primary.
	#[error("no primary email found for GitHub user {username}")]
	NoVerifiedEmail { username: String },
}

impl OAuthError {
	/// True for failures talking to GitHub, as opposed to what GitHub said.
	pub fn is_transport(&self) -> bool {
		matches!(self, OAuthError::Transport(_) | OAuthError::GitHubError(_))
	}
}
