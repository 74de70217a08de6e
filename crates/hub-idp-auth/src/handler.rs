// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::PostAuthnError;
use crate::exchange::HttpExchange;
use crate::types::{AuthenticatedIdentity, AuthenticationContext, FlowStatus};

/// An external identity provider login step.
#[async_trait]
pub trait FederatedAuthenticator: Send + Sync {
	type Error: std::error::Error + Send + Sync + 'static;

	/// Stable identifier the host registers the authenticator under.
	fn name(&self) -> &str;

	/// Name shown to administrators.
	fn friendly_name(&self) -> &str;

	/// Where to send the browser to start the login, bound to `state`.
	fn authorization_url(&self, state: &str) -> String;

	/// Complete the login from the callback's authorization code.
	async fn resolve_identity(&self, code: &str) -> Result<AuthenticatedIdentity, Self::Error>;
}

/// A decision point the host runs after authentication, in priority order.
#[async_trait]
pub trait PostAuthnHandler: Send + Sync {
	fn name(&self) -> &str;

	/// Lower values run earlier.
	fn priority(&self) -> i32;

	fn is_enabled(&self) -> bool {
		true
	}

	/// Decide whether the flow continues.
	///
	/// Returning [`FlowStatus::Incomplete`] means a response has been written
	/// to `exchange` and the host must suspend the flow.
	async fn handle(
		&self,
		exchange: &mut HttpExchange,
		context: &AuthenticationContext,
	) -> Result<FlowStatus, PostAuthnError>;
}
