// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the hub identity extensions.
//!
//! Configuration is assembled from layered sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML properties file (`/etc/hub-idp/idp.toml` unless overridden)
//! 3. Environment variables (`HUB_IDP_*`)
//!
//! # Usage
//!
//! ```ignore
//! let config = hub_idp_config::load_config()?;
//! println!("database: {}", config.database.url);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::IdpConfigLayer;
pub use sections::*;
pub use sources::{
	load_secret_env, ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource,
	SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct IdpConfig {
	pub database: DatabaseConfig,
	pub github: GitHubConfig,
	pub org_gate: OrgGateConfig,
	pub http: HttpClientConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
pub fn load_config() -> Result<IdpConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom properties file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<IdpConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<IdpConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = IdpConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Resolve a merged layer into a validated configuration.
pub fn finalize(layer: IdpConfigLayer) -> Result<IdpConfig, ConfigError> {
	let config = IdpConfig {
		database: layer.database.unwrap_or_default().finalize(),
		github: layer.github.unwrap_or_default().finalize(),
		org_gate: layer.org_gate.unwrap_or_default().finalize(),
		http: layer.http.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		database = %config.database.data_source_name,
		max_connections = config.database.max_connections,
		github_oauth_configured = config.github.has_oauth_credentials(),
		org_gate_enabled = config.org_gate.enabled,
		org_gate_priority = config.org_gate.priority,
		"identity extension configuration loaded"
	);

	Ok(config)
}

fn validate_config(config: &IdpConfig) -> Result<(), ConfigError> {
	if config.database.url.trim().is_empty() {
		return Err(ConfigError::Validation(
			"database.url cannot be empty".to_string(),
		));
	}
	if config.database.max_connections == 0 {
		return Err(ConfigError::Validation(
			"database.max_connections must be at least 1".to_string(),
		));
	}
	if config.database.acquire_timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"database.acquire_timeout_secs must be at least 1".to_string(),
		));
	}
	if config.http.timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"http.timeout_secs must be at least 1".to_string(),
		));
	}
	Ok(())
}
