// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::Path;

use hub_idp_config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::AnyPool;

/// Create an empty SQLite database file under `dir` and return a config
/// pointing at it. The config allows a single pooled connection.
pub async fn empty_db_config(dir: &Path) -> DatabaseConfig {
	let path = dir.join("hub.db");
	let options = SqliteConnectOptions::new()
		.filename(&path)
		.create_if_missing(true);
	let pool = SqlitePool::connect_with(options).await.unwrap();
	pool.close().await;

	DatabaseConfig {
		url: format!("sqlite:{}", path.display()),
		data_source_name: "jdbc/HUB_TEST".to_string(),
		max_connections: 1,
		acquire_timeout_secs: 5,
	}
}

/// Like [`empty_db_config`], with the registry mapping table created.
pub async fn membership_db_config(dir: &Path) -> DatabaseConfig {
	let config = empty_db_config(dir).await;
	let pool = SqlitePool::connect(&config.url).await.unwrap();
	create_membership_table(&pool).await;
	pool.close().await;
	config
}

pub async fn create_membership_table(pool: &SqlitePool) {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS REGISTRY_ORG_USER_MAPPING (
			USER_UUID VARCHAR(255) NOT NULL,
			ORG_NAME VARCHAR(255),
			UNIQUE (USER_UUID, ORG_NAME)
		)
		"#,
	)
	.execute(pool)
	.await
	.unwrap();
}

/// Insert a membership row through the shared pool.
pub async fn insert_membership(pool: &AnyPool, user_identifier: &str, organization_name: &str) {
	sqlx::query("INSERT INTO REGISTRY_ORG_USER_MAPPING (USER_UUID, ORG_NAME) VALUES ($1, $2)")
		.bind(user_identifier)
		.bind(organization_name)
		.execute(pool)
		.await
		.unwrap();
}

/// Insert a mapping row whose `ORG_NAME` is NULL.
pub async fn insert_membership_without_organization(pool: &AnyPool, user_identifier: &str) {
	sqlx::query("INSERT INTO REGISTRY_ORG_USER_MAPPING (USER_UUID, ORG_NAME) VALUES ($1, NULL)")
		.bind(user_identifier)
		.execute(pool)
		.await
		.unwrap();
}
