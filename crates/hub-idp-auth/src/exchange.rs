// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The response side of the in-flight HTTP exchange.

use http::{header::LOCATION, Response, StatusCode};

use crate::error::RedirectWriteError;

/// Response slot a handler may write into while the host owns the request.
///
/// At most one response can be written; a second write fails the same way a
/// committed servlet response does.
#[derive(Debug, Default)]
pub struct HttpExchange {
	response: Option<Response<()>>,
}

impl HttpExchange {
	pub fn new() -> Self {
		Self::default()
	}

	/// Write a `302 Found` redirect to `location`.
	pub fn send_redirect(&mut self, location: &str) -> Result<(), RedirectWriteError> {
		if self.response.is_some() {
			return Err(RedirectWriteError::AlreadyCommitted);
		}

		let response = Response::builder()
			.status(StatusCode::FOUND)
			.header(LOCATION, location)
			.body(())?;

		tracing::trace!(%location, "redirect written");
		self.response = Some(response);
		Ok(())
	}

	pub fn is_committed(&self) -> bool {
		self.response.is_some()
	}

	pub fn response(&self) -> Option<&Response<()>> {
		self.response.as_ref()
	}

	/// The `Location` header of the written redirect, if any.
	pub fn redirect_location(&self) -> Option<&str> {
		self
			.response
			.as_ref()
			.and_then(|r| r.headers().get(LOCATION))
			.and_then(|v| v.to_str().ok())
	}

	pub fn into_response(self) -> Option<Response<()>> {
		self.response
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn redirect_sets_status_and_location() {
		let mut exchange = HttpExchange::new();
		exchange
			.send_redirect("https://create.example/org?sessionDataKey=k1")
			.unwrap();

		assert!(exchange.is_committed());
		assert_eq!(
			exchange.redirect_location(),
			Some("https://create.example/org?sessionDataKey=k1")
		);
		let response = exchange.into_response().unwrap();
		assert_eq!(response.status(), StatusCode::FOUND);
	}

	#[test]
	fn second_write_is_rejected() {
		let mut exchange = HttpExchange::new();
		exchange.send_redirect("https://a.example/").unwrap();
		let err = exchange.send_redirect("https://b.example/").unwrap_err();
		assert!(matches!(err, RedirectWriteError::AlreadyCommitted));
		assert_eq!(exchange.redirect_location(), Some("https://a.example/"));
	}

	#[test]
	fn control_characters_are_rejected() {
		let mut exchange = HttpExchange::new();
		let err = exchange
			.send_redirect("https://a.example/\r\nSet-Cookie: x=y")
			.unwrap_err();
		assert!(matches!(err, RedirectWriteError::InvalidLocation(_)));
		assert!(!exchange.is_committed());
	}
}
