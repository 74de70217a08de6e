// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use hub_idp_auth::{
	AuthenticationContext, FlowStatus, HttpExchange, PostAuthnError, PostAuthnHandler,
};

/// Post-authentication handlers in the order the host runs them.
///
/// Handlers are kept sorted by ascending priority; equal priorities keep
/// registration order. The chain stops at the first handler that suspends
/// the flow.
#[derive(Default, Clone)]
pub struct PostAuthnChain {
	handlers: Vec<Arc<dyn PostAuthnHandler>>,
}

impl PostAuthnChain {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, handler: Arc<dyn PostAuthnHandler>) {
		tracing::debug!(
			handler = handler.name(),
			priority = handler.priority(),
			"registering post-authentication handler"
		);
		self.handlers.push(handler);
		self.handlers.sort_by_key(|h| h.priority());
	}

	pub fn with(mut self, handler: Arc<dyn PostAuthnHandler>) -> Self {
		self.register(handler);
		self
	}

	pub fn handler_names(&self) -> Vec<&str> {
		self.handlers.iter().map(|h| h.name()).collect()
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	#[tracing::instrument(skip_all, fields(context = %context.context_identifier()))]
	pub async fn run(
		&self,
		exchange: &mut HttpExchange,
		context: &AuthenticationContext,
	) -> Result<FlowStatus, PostAuthnError> {
		for handler in &self.handlers {
			if !handler.is_enabled() {
				tracing::trace!(handler = handler.name(), "handler disabled, skipping");
				continue;
			}

			let status = handler.handle(exchange, context).await?;
			if !status.is_complete() {
				tracing::debug!(handler = handler.name(), "flow suspended by handler");
				return Ok(status);
			}
		}
		Ok(FlowStatus::SuccessCompleted)
	}
}
