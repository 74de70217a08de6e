// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each section has a resolved type and a partial
//! `*Layer` type used while merging sources.

mod database;
mod github;
mod http;
mod logging;
mod org_gate;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use github::{
	GitHubConfig, GitHubConfigLayer, DEFAULT_GITHUB_API_BASE_URL, DEFAULT_GITHUB_OAUTH_BASE_URL,
};
pub use http::{HttpClientConfig, HttpClientConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use org_gate::{OrgGateConfig, OrgGateConfigLayer, DEFAULT_ORG_GATE_PRIORITY};
