// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CLI organization gate.
//!
//! Logging in to the CLI requires an organization. The gate checks the
//! registry mapping for the authenticated user and, when there is none,
//! suspends the flow with a redirect to the create-organization page. The
//! page resumes the flow through `sessionDataKey`.

use std::sync::Arc;

use async_trait::async_trait;
use hub_idp_auth::{
	AuthenticationContext, FlowStatus, HttpExchange, PendingRedirect, PostAuthnError,
	PostAuthnHandler,
};
use hub_idp_config::{OrgGateConfig, DEFAULT_ORG_GATE_PRIORITY};
use hub_idp_db::MembershipStore;

use crate::endpoint::{CreateOrgEndpoint, CREATE_ORG_ENDPOINT};

/// Applications whose name contains this (in any case) are gated.
pub const APPLICATION_MARKER: &str = "cli";
pub const ORG_GATE_HANDLER_NAME: &str = "CliOrganizationValidationHandler";

/// True when `application_name` identifies a CLI client.
pub fn is_cli_application(application_name: Option<&str>) -> bool {
	application_name
		.filter(|name| !name.is_empty())
		.is_some_and(|name| name.to_lowercase().contains(APPLICATION_MARKER))
}

pub struct OrganizationGate {
	store: Arc<dyn MembershipStore>,
	endpoint: CreateOrgEndpoint,
	priority: i32,
	enabled: bool,
}

impl OrganizationGate {
	pub fn new(store: Arc<dyn MembershipStore>, config: &OrgGateConfig) -> Self {
		Self {
			store,
			endpoint: CreateOrgEndpoint::new(config.properties.clone()),
			priority: config.priority,
			enabled: config.enabled,
		}
	}

	pub fn with_endpoint(mut self, endpoint: CreateOrgEndpoint) -> Self {
		self.endpoint = endpoint;
		self
	}
}

#[async_trait]
impl PostAuthnHandler for OrganizationGate {
	fn name(&self) -> &str {
		ORG_GATE_HANDLER_NAME
	}

	fn priority(&self) -> i32 {
		if self.priority == -1 {
			DEFAULT_ORG_GATE_PRIORITY
		} else {
			self.priority
		}
	}

	fn is_enabled(&self) -> bool {
		self.enabled
	}

	#[tracing::instrument(
		skip_all,
		fields(context = %context.context_identifier())
	)]
	async fn handle(
		&self,
		exchange: &mut HttpExchange,
		context: &AuthenticationContext,
	) -> Result<FlowStatus, PostAuthnError> {
		let endpoint = self.endpoint.resolve();

		if !context.is_sequence_executed() {
			return Ok(FlowStatus::SuccessCompleted);
		}

		let application = context.application_name();
		tracing::debug!(
			application = application.unwrap_or_default(),
			"intercepted for application"
		);
		if !is_cli_application(application) {
			return Ok(FlowStatus::SuccessCompleted);
		}

		let user = context
			.subject()
			.map(|subject| subject.user_identifier.as_str())
			.ok_or_else(|| {
				PostAuthnError::redirection(
					endpoint.clone().unwrap_or_default(),
					"no authenticated subject in context",
				)
			})?;

		match self.store.find_membership(user).await {
			Ok(Some(record)) => {
				tracing::debug!(
					organization = ?record.organization_name,
					"organization found for user"
				);
				return Ok(FlowStatus::SuccessCompleted);
			}
			Ok(None) => {
				tracing::debug!(%user, "no organization found for user");
			}
			Err(e) if e.is_unavailable() => {
				return Err(PostAuthnError::DataSourceUnavailable(Box::new(e)));
			}
			Err(e) => {
				return Err(PostAuthnError::redirection(
					endpoint.unwrap_or_default(),
					e,
				));
			}
		}

		let target = endpoint.ok_or_else(|| PostAuthnError::EndpointNotConfigured {
			key: CREATE_ORG_ENDPOINT.to_string(),
		})?;
		let redirect = PendingRedirect::new(target, context.context_identifier());
		let location = redirect.location();

		exchange
			.send_redirect(&location)
			.map_err(|e| PostAuthnError::redirection(location.clone(), e))?;

		tracing::debug!(%location, "redirected to create organization");
		Ok(FlowStatus::Incomplete)
	}
}
