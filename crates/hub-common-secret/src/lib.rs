// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret wrapper for sensitive string values.
//!
//! [`SecretString`] holds OAuth access tokens and client secrets. Its `Debug`
//! and `Display` output is always [`REDACTED`], and the backing buffer is
//! zeroized when the value is dropped. Call [`SecretString::expose`] at the
//! single point where the raw value is needed (an `Authorization` header, a
//! token request body).

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Placeholder printed instead of a secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A string that never appears in logs or debug output.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Access the raw secret value.
	pub fn expose(&self) -> &String {
		&self.0
	}

	/// True if the secret is empty or whitespace only.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString({REDACTED})")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		String::deserialize(deserializer).map(Self)
	}
}

#[cfg(feature = "serde")]
impl serde::Serialize for SecretString {
	/// Serializes as [`REDACTED`]; secrets are never written back out.
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(REDACTED)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_and_display_are_redacted() {
		let secret = SecretString::new("gho_abc123");
		assert_eq!(format!("{secret}"), REDACTED);
		assert!(!format!("{secret:?}").contains("gho_abc123"));
	}

	#[test]
	fn expose_returns_raw_value() {
		let secret = SecretString::from("value");
		assert_eq!(secret.expose(), "value");
	}

	#[test]
	fn blank_detection() {
		assert!(SecretString::new("").is_blank());
		assert!(SecretString::new("   ").is_blank());
		assert!(!SecretString::new("x").is_blank());
	}

	#[test]
	fn deserializes_raw_and_serializes_redacted() {
		let secret: SecretString = serde_json::from_str(r#""hunter2""#).unwrap();
		assert_eq!(secret.expose(), "hunter2");
		assert_eq!(serde_json::to_string(&secret).unwrap(), r#""[REDACTED]""#);
	}
}
