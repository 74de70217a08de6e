// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database access for the identity extensions.
//!
//! - [`ConnectionProvider`]: the process-wide pooled data source, created
//!   lazily on first use and shared by every caller.
//! - [`MembershipStore`]: read-only organization membership lookups.

pub mod error;
pub mod membership;
pub mod pool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{DbError, Result};
pub use membership::{MembershipStore, OrgMembershipRecord, SqlMembershipStore};
pub use pool::{ConnectionProvider, ScopedConnection};

pub use sqlx;
