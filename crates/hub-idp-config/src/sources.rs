// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML properties file, and
//! environment variables.

use std::path::{Path, PathBuf};

use hub_common_secret::SecretString;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::IdpConfigLayer;
use crate::sections::{
	DatabaseConfigLayer, GitHubConfigLayer, HttpClientConfigLayer, LoggingConfigLayer,
	OrgGateConfigLayer,
};

/// Default location of the properties file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hub-idp/idp.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<IdpConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<IdpConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(IdpConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<IdpConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(IdpConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: IdpConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `HUB_IDP_<SECTION>_<FIELD>`. Handler properties are only read
/// from the TOML file; `CREATE_ORG_ENDPOINT` is consulted by the gate itself.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<IdpConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(IdpConfigLayer {
			database: Some(load_database_from_env()?),
			github: Some(load_github_from_env()?),
			org_gate: Some(load_org_gate_from_env()?),
			http: Some(load_http_from_env()?),
			logging: Some(load_logging_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

/// Load a secret from `NAME`, or from the file named by `NAME_FILE`.
///
/// `NAME` wins when both are set. File contents are trimmed of trailing
/// newlines.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, ConfigError> {
	if let Some(value) = env_var(name) {
		return Ok(Some(SecretString::new(value)));
	}

	let file_var = format!("{name}_FILE");
	match env_var(&file_var) {
		Some(path) => {
			let content = std::fs::read_to_string(&path)
				.map_err(|e| ConfigError::Secret(format!("{file_var}={path}: {e}")))?;
			Ok(Some(SecretString::new(
				content.trim_end_matches(['\n', '\r']).to_string(),
			)))
		}
		None => Ok(None),
	}
}

fn load_database_from_env() -> Result<DatabaseConfigLayer, ConfigError> {
	Ok(DatabaseConfigLayer {
		url: env_var("HUB_IDP_DATABASE_URL"),
		data_source_name: env_var("HUB_IDP_DATA_SOURCE_NAME"),
		max_connections: env_parse("HUB_IDP_DATABASE_MAX_CONNECTIONS", "u32")?,
		acquire_timeout_secs: env_parse("HUB_IDP_DATABASE_ACQUIRE_TIMEOUT_SECS", "u64")?,
	})
}

fn load_github_from_env() -> Result<GitHubConfigLayer, ConfigError> {
	Ok(GitHubConfigLayer {
		client_id: env_var("HUB_IDP_GITHUB_CLIENT_ID"),
		client_secret: load_secret_env("HUB_IDP_GITHUB_CLIENT_SECRET")?,
		redirect_uri: env_var("HUB_IDP_GITHUB_REDIRECT_URI"),
		api_base_url: env_var("HUB_IDP_GITHUB_API_BASE_URL"),
		oauth_base_url: env_var("HUB_IDP_GITHUB_OAUTH_BASE_URL"),
	})
}

fn load_org_gate_from_env() -> Result<OrgGateConfigLayer, ConfigError> {
	Ok(OrgGateConfigLayer {
		enabled: env_bool("HUB_IDP_ORG_GATE_ENABLED"),
		priority: env_parse("HUB_IDP_ORG_GATE_PRIORITY", "i32")?,
		properties: None,
	})
}

fn load_http_from_env() -> Result<HttpClientConfigLayer, ConfigError> {
	Ok(HttpClientConfigLayer {
		timeout_secs: env_parse("HUB_IDP_HTTP_TIMEOUT_SECS", "u64")?,
	})
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("HUB_IDP_LOG_LEVEL"),
	}
}
