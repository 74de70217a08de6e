// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction.
//!
//! Every outbound call made by the identity extensions goes through a client
//! built here so that the `User-Agent` and timeout handling are consistent.
//! Failed calls are never retried here; they surface to the host.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Creates a client builder with the standard `User-Agent` header.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a client with the standard `User-Agent` and the given timeout.
///
/// # Errors
/// Returns the underlying `reqwest` error if the TLS backend cannot be
/// initialized.
#[tracing::instrument(name = "hub_common_http::client_with_timeout")]
pub fn client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	builder().timeout(timeout).build()
}

/// Returns the `User-Agent` string, `hub-idp/{version}`.
pub fn user_agent() -> String {
	format!("hub-idp/{}", env!("CARGO_PKG_VERSION"))
}
