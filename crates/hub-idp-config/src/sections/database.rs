// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_URL: &str = "sqlite:./hub.db";
const DEFAULT_DATA_SOURCE_NAME: &str = "jdbc/HUB_DB";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Database configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
	/// sqlx connection URL (`sqlite:...` or `postgres://...`).
	pub url: String,
	/// Name the pooled source is known by in logs and diagnostics.
	pub data_source_name: String,
	pub max_connections: u32,
	pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		DatabaseConfigLayer::default().finalize()
	}
}

/// Database configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub data_source_name: Option<String>,
	#[serde(default)]
	pub max_connections: Option<u32>,
	#[serde(default)]
	pub acquire_timeout_secs: Option<u64>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.data_source_name.is_some() {
			self.data_source_name = other.data_source_name;
		}
		if other.max_connections.is_some() {
			self.max_connections = other.max_connections;
		}
		if other.acquire_timeout_secs.is_some() {
			self.acquire_timeout_secs = other.acquire_timeout_secs;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			url: self.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
			data_source_name: self
				.data_source_name
				.unwrap_or_else(|| DEFAULT_DATA_SOURCE_NAME.to_string()),
			max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
			acquire_timeout_secs: self
				.acquire_timeout_secs
				.unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = DatabaseConfigLayer::default().finalize();
		assert_eq!(config.url, "sqlite:./hub.db");
		assert_eq!(config.data_source_name, "jdbc/HUB_DB");
		assert_eq!(config.max_connections, 10);
		assert_eq!(config.acquire_timeout_secs, 30);
	}

	#[test]
	fn test_merge_overrides_only_set_fields() {
		let mut base = DatabaseConfigLayer {
			url: Some("sqlite:/var/lib/hub/hub.db".to_string()),
			max_connections: Some(4),
			..Default::default()
		};
		base.merge(DatabaseConfigLayer {
			url: Some("postgres://hub@db/hub".to_string()),
			..Default::default()
		});
		let config = base.finalize();
		assert_eq!(config.url, "postgres://hub@db/hub");
		assert_eq!(config.max_connections, 4);
	}

	#[test]
	fn test_deserialize_from_toml() {
		let layer: DatabaseConfigLayer = toml::from_str(
			r#"
			url = "sqlite:/tmp/x.db"
			data_source_name = "jdbc/TEST"
			"#,
		)
		.unwrap();
		assert_eq!(layer.url.as_deref(), Some("sqlite:/tmp/x.db"));
		assert_eq!(layer.data_source_name.as_deref(), Some("jdbc/TEST"));
		assert!(layer.max_connections.is_none());
	}
}
