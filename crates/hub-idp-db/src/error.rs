// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Data source {name} unavailable: {source}")]
	DataSourceUnavailable {
		name: String,
		#[source]
		source: sqlx::Error,
	},

	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),
}

impl DbError {
	pub fn is_unavailable(&self) -> bool {
		matches!(self, DbError::DataSourceUnavailable { .. })
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
