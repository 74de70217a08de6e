// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Types shared between the identity-provider host and its extensions.
//!
//! The host drives authentication; extensions plug in through two narrow
//! capability traits:
//!
//! - [`FederatedAuthenticator`]: turns an OAuth callback into an
//!   [`AuthenticatedIdentity`].
//! - [`PostAuthnHandler`]: inspects a finished [`AuthenticationContext`] and
//!   either lets the flow continue or suspends it with a redirect written to
//!   the [`HttpExchange`].

pub mod error;
pub mod exchange;
pub mod handler;
pub mod types;

pub use error::{PostAuthnError, RedirectWriteError};
pub use exchange::HttpExchange;
pub use handler::{FederatedAuthenticator, PostAuthnHandler};
pub use types::{AuthenticatedIdentity, AuthenticationContext, FlowStatus, PendingRedirect};
