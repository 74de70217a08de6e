// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization membership lookups.
//!
//! Membership rows are written by the hub's registry service; this crate only
//! ever reads them.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::Row;

use crate::error::DbError;
use crate::pool::ConnectionProvider;

const FIND_MEMBERSHIP_QUERY: &str =
	"SELECT ORG_NAME FROM REGISTRY_ORG_USER_MAPPING WHERE USER_UUID = $1";

/// One `(user, organization)` row from the registry mapping table.
///
/// The row's presence is what counts; `ORG_NAME` is nullable and only
/// carried along for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgMembershipRecord {
	pub user_identifier: String,
	pub organization_name: Option<String>,
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
	/// Any organization the user belongs to, or `None` if they have none.
	async fn find_membership(
		&self,
		user_identifier: &str,
	) -> Result<Option<OrgMembershipRecord>, DbError>;
}

/// [`MembershipStore`] backed by the registry database.
///
/// Each lookup checks out its own connection and returns it before
/// completing, whether or not the query succeeds.
#[derive(Clone)]
pub struct SqlMembershipStore {
	provider: Arc<ConnectionProvider>,
}

impl SqlMembershipStore {
	pub fn new(provider: Arc<ConnectionProvider>) -> Self {
		Self { provider }
	}
}

#[async_trait]
impl MembershipStore for SqlMembershipStore {
	#[tracing::instrument(skip(self), fields(data_source = %self.provider.data_source_name()))]
	async fn find_membership(
		&self,
		user_identifier: &str,
	) -> Result<Option<OrgMembershipRecord>, DbError> {
		let mut conn = self.provider.acquire().await?;

		let row = sqlx::query(FIND_MEMBERSHIP_QUERY)
			.bind(user_identifier)
			.fetch_optional(conn.connection())
			.await?;

		let record = row
			.map(|r| r.try_get::<Option<String>, _>(0))
			.transpose()?
			.map(|organization_name| OrgMembershipRecord {
				user_identifier: user_identifier.to_string(),
				organization_name,
			});

		conn.release().await?;

		match &record {
			Some(r) => tracing::debug!(organization = ?r.organization_name, "organization found for user"),
			None => tracing::debug!("no organization found for user"),
		}
		Ok(record)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing;

	async fn make_store(dir: &std::path::Path) -> (SqlMembershipStore, Arc<ConnectionProvider>) {
		let config = testing::membership_db_config(dir).await;
		let provider = Arc::new(ConnectionProvider::new(config));
		(SqlMembershipStore::new(Arc::clone(&provider)), provider)
	}

	#[tokio::test]
	async fn finds_existing_membership() {
		let dir = tempfile::tempdir().unwrap();
		let (store, provider) = make_store(dir.path()).await;
		testing::insert_membership(provider.data_source().await.unwrap(), "u1", "acme").await;

		let record = store.find_membership("u1").await.unwrap();
		assert_eq!(
			record,
			Some(OrgMembershipRecord {
				user_identifier: "u1".to_string(),
				organization_name: Some("acme".to_string()),
			})
		);
	}

	#[tokio::test]
	async fn missing_membership_is_none() {
		let dir = tempfile::tempdir().unwrap();
		let (store, provider) = make_store(dir.path()).await;
		testing::insert_membership(provider.data_source().await.unwrap(), "u1", "acme").await;

		assert!(store.find_membership("u2").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn user_in_several_orgs_yields_one_record() {
		let dir = tempfile::tempdir().unwrap();
		let (store, provider) = make_store(dir.path()).await;
		let pool = provider.data_source().await.unwrap();
		testing::insert_membership(pool, "u3", "acme").await;
		testing::insert_membership(pool, "u3", "globex").await;

		let record = store.find_membership("u3").await.unwrap().unwrap();
		assert_eq!(record.user_identifier, "u3");
		assert!(["acme", "globex"].contains(&record.organization_name.as_deref().unwrap()));
	}

	#[tokio::test]
	async fn row_with_null_organization_still_counts() {
		let dir = tempfile::tempdir().unwrap();
		let (store, provider) = make_store(dir.path()).await;
		testing::insert_membership_without_organization(provider.data_source().await.unwrap(), "u4")
			.await;

		let record = store.find_membership("u4").await.unwrap();
		assert_eq!(
			record,
			Some(OrgMembershipRecord {
				user_identifier: "u4".to_string(),
				organization_name: None,
			})
		);
	}

	#[tokio::test]
	async fn connections_are_returned_after_each_lookup() {
		let dir = tempfile::tempdir().unwrap();
		let (store, provider) = make_store(dir.path()).await;

		// The test pool holds a single connection, so a leak would time out.
		for _ in 0..5 {
			assert!(store.find_membership("nobody").await.unwrap().is_none());
		}
		assert_eq!(provider.initialization_count(), 1);
	}

	#[tokio::test]
	async fn query_failure_surfaces_as_sqlx_error() {
		let dir = tempfile::tempdir().unwrap();
		let config = testing::empty_db_config(dir.path()).await;
		let store = SqlMembershipStore::new(Arc::new(ConnectionProvider::new(config)));

		let err = store.find_membership("u1").await.unwrap_err();
		assert!(matches!(err, DbError::Sqlx(_)));
	}
}
