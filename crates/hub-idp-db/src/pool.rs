// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The shared pooled data source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hub_idp_config::DatabaseConfig;
use sqlx::any::AnyPoolOptions;
use sqlx::{Any, AnyConnection, AnyPool, Transaction};
use tokio::sync::OnceCell;

use crate::error::DbError;

const POSTGRESQL_BACKEND: &str = "PostgreSQL";
/// SQLSTATE for "active SQL transaction".
const PG_ACTIVE_SQL_TRANSACTION_STATE: &str = "25001";

/// Hands out request-scoped connections from one lazily created pool.
///
/// The pool is created on the first [`acquire`](Self::acquire) and reused for
/// the life of the provider. Concurrent first callers wait on the same
/// initialization; a failed initialization is retried by the next caller.
pub struct ConnectionProvider {
	config: DatabaseConfig,
	pool: OnceCell<AnyPool>,
	initializations: AtomicUsize,
}

impl ConnectionProvider {
	pub fn new(config: DatabaseConfig) -> Self {
		Self {
			config,
			pool: OnceCell::new(),
			initializations: AtomicUsize::new(0),
		}
	}

	pub fn data_source_name(&self) -> &str {
		&self.config.data_source_name
	}

	/// Number of times the pool has been created. Stays at 1 once initialized.
	pub fn initialization_count(&self) -> usize {
		self.initializations.load(Ordering::SeqCst)
	}

	/// The shared pool, creating it on first use.
	///
	/// # Errors
	/// Returns `DbError::DataSourceUnavailable` if the pool cannot connect.
	pub async fn data_source(&self) -> Result<&AnyPool, DbError> {
		self
			.pool
			.get_or_try_init(|| async {
				sqlx::any::install_default_drivers();
				self.initializations.fetch_add(1, Ordering::SeqCst);

				let pool = AnyPoolOptions::new()
					.max_connections(self.config.max_connections)
					.acquire_timeout(Duration::from_secs(self.config.acquire_timeout_secs))
					.connect(&self.config.url)
					.await
					.map_err(|e| self.unavailable(e))?;

				tracing::info!(
					data_source = %self.config.data_source_name,
					max_connections = self.config.max_connections,
					"database pool created"
				);
				Ok::<_, DbError>(pool)
			})
			.await
	}

	/// Acquire a connection inside a read-committed transaction.
	///
	/// The connection goes back to the pool when the returned value is
	/// dropped or released, on every path.
	///
	/// # Errors
	/// Returns `DbError::DataSourceUnavailable` if the pool cannot be created
	/// or no connection can be checked out.
	#[tracing::instrument(skip(self), fields(data_source = %self.config.data_source_name))]
	pub async fn acquire(&self) -> Result<ScopedConnection, DbError> {
		let pool = self.data_source().await?;
		let mut tx = pool.begin().await.map_err(|e| self.unavailable(e))?;
		let backend = tx.backend_name().to_string();

		if let Err(e) = set_read_committed(&mut tx, &backend).await {
			match isolation_recovery(&backend, sqlstate(&e).as_deref()) {
				IsolationRecovery::CommitAndRetry => {
					tracing::debug!(
						%backend,
						"active transaction on fresh connection, committing before isolation change"
					);
					tx.commit().await?;
					tx = pool.begin().await.map_err(|e| self.unavailable(e))?;
					set_read_committed(&mut tx, &backend).await?;
				}
				IsolationRecovery::Restart => {
					tracing::warn!(
						%backend,
						error = %e,
						"could not set read-committed isolation, using backend default"
					);
					// The failed statement may have aborted the transaction.
					tx.rollback().await.map_err(|e| self.unavailable(e))?;
					tx = pool.begin().await.map_err(|e| self.unavailable(e))?;
				}
			}
		}

		Ok(ScopedConnection { tx, backend })
	}

	fn unavailable(&self, source: sqlx::Error) -> DbError {
		DbError::DataSourceUnavailable {
			name: self.config.data_source_name.clone(),
			source,
		}
	}
}

/// A pooled connection with auto-commit off, valid for one unit of work.
pub struct ScopedConnection {
	tx: Transaction<'static, Any>,
	backend: String,
}

impl ScopedConnection {
	/// Driver name, e.g. `PostgreSQL` or `SQLite`.
	pub fn backend(&self) -> &str {
		&self.backend
	}

	pub fn connection(&mut self) -> &mut AnyConnection {
		&mut *self.tx
	}

	/// Return the connection to the pool, discarding the read transaction.
	pub async fn release(self) -> Result<(), DbError> {
		self.tx.rollback().await?;
		Ok(())
	}
}

async fn set_read_committed(
	tx: &mut Transaction<'static, Any>,
	backend: &str,
) -> Result<(), sqlx::Error> {
	if backend.contains(POSTGRESQL_BACKEND) {
		sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
			.execute(&mut **tx)
			.await?;
	} else {
		// SQLite has no read-committed mode.
		tracing::trace!(%backend, "keeping backend default isolation");
	}
	Ok(())
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
	match err {
		sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
		_ => None,
	}
}

/// What `acquire` does after the isolation change fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IsolationRecovery {
	/// Commit, begin again and repeat the isolation change.
	CommitAndRetry,
	/// Discard the transaction and begin a new one at the backend default.
	Restart,
}

/// PostgreSQL rejects an isolation change once the transaction is active.
/// Committing first clears it. No other backend gets this treatment.
fn isolation_recovery(backend: &str, sqlstate: Option<&str>) -> IsolationRecovery {
	if backend.contains(POSTGRESQL_BACKEND) && sqlstate == Some(PG_ACTIVE_SQL_TRANSACTION_STATE) {
		IsolationRecovery::CommitAndRetry
	} else {
		IsolationRecovery::Restart
	}
}
