// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization gate handler configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Runs after identity resolution and before session establishment.
pub const DEFAULT_ORG_GATE_PRIORITY: i32 = 21;

#[derive(Debug, Clone, PartialEq)]
pub struct OrgGateConfig {
	pub enabled: bool,
	/// Lower runs earlier. `-1` means "not configured" and maps to the default.
	pub priority: i32,
	/// Static handler properties, e.g. `CREATE_ORG_ENDPOINT`.
	pub properties: BTreeMap<String, String>,
}

impl Default for OrgGateConfig {
	fn default() -> Self {
		OrgGateConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrgGateConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub priority: Option<i32>,
	#[serde(default)]
	pub properties: Option<BTreeMap<String, String>>,
}

impl OrgGateConfigLayer {
	/// Property maps merge key by key; later layers win per key.
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.priority.is_some() {
			self.priority = other.priority;
		}
		if let Some(props) = other.properties {
			self.properties.get_or_insert_with(BTreeMap::new).extend(props);
		}
	}

	pub fn finalize(self) -> OrgGateConfig {
		let priority = match self.priority {
			None | Some(-1) => DEFAULT_ORG_GATE_PRIORITY,
			Some(p) => p,
		};
		OrgGateConfig {
			enabled: self.enabled.unwrap_or(true),
			priority,
			properties: self.properties.unwrap_or_default(),
		}
	}
}
