// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("configuration error: {0}")]
	Config(#[from] hub_idp_config::ConfigError),

	#[error("GitHub configuration error: {0}")]
	GitHubConfig(#[from] hub_idp_auth_github::ConfigError),

	#[error("GitHub client error: {0}")]
	GitHub(#[from] hub_idp_auth_github::OAuthError),
}

pub type Result<T> = std::result::Result<T, ServerError>;
