// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error code reported when the organization lookup fails.
pub const ERROR_CODE_ORGANIZATION_CHECK: &str = "CLI001";
/// Error code reported when the gate cannot complete its redirect decision.
pub const ERROR_CODE_REDIRECTION: &str = "CLI002";

/// Failure writing a redirect into an [`HttpExchange`](crate::HttpExchange).
#[derive(Debug, thiserror::Error)]
pub enum RedirectWriteError {
	#[error("response already committed")]
	AlreadyCommitted,

	#[error("invalid redirect location: {0}")]
	InvalidLocation(#[from] http::Error),
}

/// A post-authentication handler failure. Always fatal to the flow.
#[derive(Debug, thiserror::Error)]
pub enum PostAuthnError {
	/// The gate could not finish deciding or could not write its redirect.
	#[error("failed to redirect to {redirect_uri}")]
	Redirection {
		redirect_uri: String,
		#[source]
		source: BoxError,
	},

	/// The pooled data source could not hand out a connection.
	#[error("data source unavailable: {0}")]
	DataSourceUnavailable(#[source] BoxError),

	/// A redirect was required but no target endpoint is configured.
	#[error("redirect endpoint {key} is not configured")]
	EndpointNotConfigured { key: String },
}

impl PostAuthnError {
	pub fn redirection(
		redirect_uri: impl Into<String>,
		source: impl Into<BoxError>,
	) -> Self {
		PostAuthnError::Redirection {
			redirect_uri: redirect_uri.into(),
			source: source.into(),
		}
	}

	/// Host-facing error code.
	pub fn code(&self) -> &'static str {
		match self {
			PostAuthnError::Redirection { .. } => ERROR_CODE_REDIRECTION,
			PostAuthnError::DataSourceUnavailable(_) => ERROR_CODE_ORGANIZATION_CHECK,
			PostAuthnError::EndpointNotConfigured { .. } => ERROR_CODE_REDIRECTION,
		}
	}

	/// The redirect target that was being attempted, if any.
	pub fn redirect_uri(&self) -> Option<&str> {
		match self {
			PostAuthnError::Redirection { redirect_uri, .. } => Some(redirect_uri),
			_ => None,
		}
	}
}
