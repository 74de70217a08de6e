// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Post-authentication handlers for the hub identity provider.
//!
//! The [`OrganizationGate`] stops CLI logins for users who do not belong to
//! any organization yet and sends them to the create-organization page.
//! [`PostAuthnChain`] runs registered handlers in priority order.

mod chain;
mod endpoint;
mod org_gate;

pub use chain::PostAuthnChain;
pub use endpoint::{CreateOrgEndpoint, CREATE_ORG_ENDPOINT};
pub use org_gate::{is_cli_application, OrganizationGate, APPLICATION_MARKER, ORG_GATE_HANDLER_NAME};
