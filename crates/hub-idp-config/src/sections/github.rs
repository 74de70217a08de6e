// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub OAuth configuration section.

use hub_common_secret::SecretString;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_OAUTH_BASE_URL: &str = "https://github.com";

/// GitHub configuration (runtime, fully resolved).
///
/// The OAuth credentials are optional: deployments that only run the
/// organization gate never talk to GitHub.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
	pub client_id: Option<String>,
	pub client_secret: Option<SecretString>,
	pub redirect_uri: Option<String>,
	pub api_base_url: String,
	pub oauth_base_url: String,
}

impl Default for GitHubConfig {
	fn default() -> Self {
		GitHubConfigLayer::default().finalize()
	}
}

impl GitHubConfig {
	/// True when all three OAuth credentials are present and non-empty.
	pub fn has_oauth_credentials(&self) -> bool {
		let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
		present(&self.client_id)
			&& present(&self.redirect_uri)
			&& self.client_secret.as_ref().is_some_and(|s| !s.is_blank())
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfigLayer {
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default, skip_serializing)]
	pub client_secret: Option<SecretString>,
	#[serde(default)]
	pub redirect_uri: Option<String>,
	#[serde(default)]
	pub api_base_url: Option<String>,
	#[serde(default)]
	pub oauth_base_url: Option<String>,
}

impl GitHubConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.redirect_uri.is_some() {
			self.redirect_uri = other.redirect_uri;
		}
		if other.api_base_url.is_some() {
			self.api_base_url = other.api_base_url;
		}
		if other.oauth_base_url.is_some() {
			self.oauth_base_url = other.oauth_base_url;
		}
	}

	pub fn finalize(self) -> GitHubConfig {
		GitHubConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			redirect_uri: self.redirect_uri,
			api_base_url: trim_base(
				self
					.api_base_url
					.unwrap_or_else(|| DEFAULT_GITHUB_API_BASE_URL.to_string()),
			),
			oauth_base_url: trim_base(
				self
					.oauth_base_url
					.unwrap_or_else(|| DEFAULT_GITHUB_OAUTH_BASE_URL.to_string()),
			),
		}
	}
}

fn trim_base(url: String) -> String {
	url.trim_end_matches('/').to_string()
}
