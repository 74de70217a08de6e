// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::fmt;

/// Environment variable and handler property naming the create-org page.
pub const CREATE_ORG_ENDPOINT: &str = "CREATE_ORG_ENDPOINT";

type Lookup = fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
	std::env::var(key).ok()
}

/// Where users without an organization are sent.
///
/// The environment wins over the handler properties. Nothing is cached, so
/// a changed environment is picked up by the next login.
#[derive(Clone)]
pub struct CreateOrgEndpoint {
	properties: BTreeMap<String, String>,
	env: Lookup,
}

impl CreateOrgEndpoint {
	pub fn new(properties: BTreeMap<String, String>) -> Self {
		Self {
			properties,
			env: process_env,
		}
	}

	/// Replace the process environment with `env`.
	pub fn with_env_lookup(mut self, env: Lookup) -> Self {
		self.env = env;
		self
	}

	/// The configured target, or `None` if neither source has a non-empty
	/// value.
	pub fn resolve(&self) -> Option<String> {
		(self.env)(CREATE_ORG_ENDPOINT)
			.filter(|v| !v.is_empty())
			.or_else(|| {
				self
					.properties
					.get(CREATE_ORG_ENDPOINT)
					.filter(|v| !v.is_empty())
					.cloned()
			})
	}
}

impl fmt::Debug for CreateOrgEndpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CreateOrgEndpoint")
			.field("properties", &self.properties)
			.finish_non_exhaustive()
	}
}

impl Default for CreateOrgEndpoint {
	fn default() -> Self {
		Self::new(BTreeMap::new())
	}
}
