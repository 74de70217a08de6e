// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator CLI for the hub identity-provider extensions.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hub_idp_auth::{AuthenticatedIdentity, AuthenticationContext, HttpExchange};
use hub_idp_server::{describe_config, Extensions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// hub-idp - exercise the identity-provider extensions outside the host.
#[derive(Parser, Debug)]
#[command(name = "hub-idp", about = "Hub identity-provider extensions", version)]
struct Args {
	/// Properties file to load instead of /etc/hub-idp/idp.toml
	#[arg(long, env = "HUB_IDP_CONFIG", global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the CLI organization gate for one login
	CheckOrg {
		/// External subject identifier of the authenticated user
		#[arg(long)]
		user: String,
		/// Name of the application the user is logging in to
		#[arg(long)]
		app: String,
		/// Context identifier the host would resume the flow with
		#[arg(long)]
		session_key: String,
	},
	/// Resolve the primary email for a GitHub access token
	ResolveEmail {
		#[arg(long, env = "HUB_IDP_GITHUB_TOKEN", hide_env_values = true)]
		token: String,
		/// GitHub login, used in messages only
		#[arg(long, default_value = "unknown")]
		username: String,
	},
	/// Print the resolved configuration with secrets redacted
	Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => hub_idp_config::load_config_with_file(path),
		None => hub_idp_config::load_config(),
	}
	.context("failed to load configuration")?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	match args.command {
		Command::Config => {
			println!("{}", serde_json::to_string_pretty(&describe_config(&config))?);
		}
		Command::CheckOrg {
			user,
			app,
			session_key,
		} => {
			let extensions = Extensions::from_config(&config)?;

			let mut context = AuthenticationContext::new(session_key)
				.with_application(app)
				.with_subject(AuthenticatedIdentity {
					user_identifier: user.clone(),
					login: user,
					display_name: None,
					email: None,
				});
			context.mark_sequence_executed();

			let mut exchange = HttpExchange::new();
			let status = extensions
				.post_authn
				.run(&mut exchange, &context)
				.await
				.map_err(|e| anyhow::anyhow!("[{}] {e}", e.code()))?;

			println!("{status}");
			if let Some(location) = exchange.redirect_location() {
				println!("redirect: {location}");
			}
		}
		Command::ResolveEmail { token, username } => {
			let extensions = Extensions::from_config(&config)?;
			let email = extensions
				.github
				.resolve_primary_email(&token, &username)
				.await?;
			println!("{email}");
		}
	}

	Ok(())
}
