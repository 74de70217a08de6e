// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound HTTP client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
	pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
	fn default() -> Self {
		Self {
			timeout_secs: DEFAULT_TIMEOUT_SECS,
		}
	}
}

impl HttpClientConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HttpClientConfigLayer {
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl HttpClientConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> HttpClientConfig {
		HttpClientConfig {
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
		}
	}
}
