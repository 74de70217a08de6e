// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request authentication state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Query parameter the host uses to resume a suspended flow.
pub const SESSION_DATA_KEY_PARAM: &str = "sessionDataKey";

/// The user produced by a federated login step.
///
/// Created once per authentication attempt and owned by the
/// [`AuthenticationContext`] of that request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
	/// Stable external subject identifier (for GitHub, the numeric user id).
	pub user_identifier: String,
	/// Login handle at the identity provider. May change over time.
	pub login: String,
	pub display_name: Option<String>,
	pub email: Option<String>,
}

/// Outcome of a post-authentication handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStatus {
	/// Continue with the next handler.
	SuccessCompleted,
	/// Suspend the flow; a response has been written to the exchange.
	Incomplete,
}

impl FlowStatus {
	/// The status name the host pipeline understands.
	pub fn as_str(&self) -> &'static str {
		match self {
			FlowStatus::SuccessCompleted => "SUCCESS_COMPLETED",
			FlowStatus::Incomplete => "INCOMPLETE",
		}
	}

	pub fn is_complete(&self) -> bool {
		matches!(self, FlowStatus::SuccessCompleted)
	}
}

impl fmt::Display for FlowStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The slice of the host's authentication context that extensions read.
#[derive(Debug, Clone)]
pub struct AuthenticationContext {
	context_identifier: String,
	step_based_sequence_executed: bool,
	application_name: Option<String>,
	subject: Option<AuthenticatedIdentity>,
}

impl AuthenticationContext {
	/// Create a context for a new login attempt.
	///
	/// `context_identifier` is the correlation key the host uses to resume
	/// the flow after an external redirect.
	pub fn new(context_identifier: impl Into<String>) -> Self {
		Self {
			context_identifier: context_identifier.into(),
			step_based_sequence_executed: false,
			application_name: None,
			subject: None,
		}
	}

	pub fn with_application(mut self, application_name: impl Into<String>) -> Self {
		self.application_name = Some(application_name.into());
		self
	}

	pub fn with_subject(mut self, subject: AuthenticatedIdentity) -> Self {
		self.subject = Some(subject);
		self
	}

	/// Record that the credential/federated login steps have run.
	pub fn mark_sequence_executed(&mut self) {
		self.step_based_sequence_executed = true;
	}

	pub fn context_identifier(&self) -> &str {
		&self.context_identifier
	}

	pub fn is_sequence_executed(&self) -> bool {
		self.step_based_sequence_executed
	}

	pub fn application_name(&self) -> Option<&str> {
		self.application_name.as_deref()
	}

	pub fn subject(&self) -> Option<&AuthenticatedIdentity> {
		self.subject.as_ref()
	}
}

/// A redirect that will suspend the flow until the user returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRedirect {
	target: String,
	session_data_key: String,
}

impl PendingRedirect {
	pub fn new(target: impl Into<String>, session_data_key: impl Into<String>) -> Self {
		Self {
			target: target.into(),
			session_data_key: session_data_key.into(),
		}
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	pub fn session_data_key(&self) -> &str {
		&self.session_data_key
	}

	/// `<target>?sessionDataKey=<key>`, exactly as the host expects it back.
	pub fn location(&self) -> String {
		format!(
			"{}?{}={}",
			self.target, SESSION_DATA_KEY_PARAM, self.session_data_key
		)
	}
}


#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn redirect_location_is_target_plus_key(
			target in "https://[a-z]{1,20}\\.[a-z]{2,5}/[a-z]{1,20}",
			key in "[a-f0-9-]{1,40}",
		) {
			let redirect = PendingRedirect::new(target.clone(), key.clone());
			let expected = format!("{target}?sessionDataKey={key}");
			prop_assert_eq!(redirect.location(), expected);
		}
	}
}
