// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::sections::{
	DatabaseConfigLayer, GitHubConfigLayer, HttpClientConfigLayer, LoggingConfigLayer,
	OrgGateConfigLayer,
};

/// A partial configuration produced by one source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdpConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub github: Option<GitHubConfigLayer>,
	#[serde(default)]
	pub org_gate: Option<OrgGateConfigLayer>,
	#[serde(default)]
	pub http: Option<HttpClientConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl IdpConfigLayer {
	/// Overlay `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: IdpConfigLayer) {
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.github, other.github, GitHubConfigLayer::merge);
		merge_section(&mut self.org_gate, other.org_gate, OrgGateConfigLayer::merge);
		merge_section(&mut self.http, other.http, HttpClientConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(b), Some(o)) => merge(b, o),
		(None, Some(o)) => *base = Some(o),
		(_, None) => {}
	}
}
