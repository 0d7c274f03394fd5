pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = porter_cli::VERSION,
	rename_all = "kebab",
	styles = porter_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = porter_config::load(&args.config)?;

	init_tracing(&config);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let sweep_interval = Duration::from_secs(config.suggestions.sweep_interval_seconds);
	let state = AppState::new(config).await?;

	spawn_suggestion_sweeper(state.clone(), sweep_interval);

	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

fn init_tracing(config: &porter_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn spawn_suggestion_sweeper(state: AppState, interval: Duration) {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(interval);

		// The first tick completes immediately; skip it so sweeps start one
		// full interval after boot.
		ticker.tick().await;

		loop {
			ticker.tick().await;

			let removed = state.service.sweep_suggestions();

			if removed > 0 {
				tracing::debug!(removed, "Swept expired suggestion cache entries.");
			}
		}
	});
}
