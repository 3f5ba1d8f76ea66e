use cinema::Config;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	// Logs go to stderr so --json output stays clean on stdout
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cinema=info,choreo=info".into()))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	let config = Config::parse();
	tracing::info!("🎬 Starting cinema");

	let cancel = CancellationToken::new();
	let shutdown = cancel.clone();
	tokio::spawn(async move {
		match tokio::signal::ctrl_c().await {
			Ok(()) => {
				tracing::info!("🛑 Received shutdown signal (Ctrl+C)");
				shutdown.cancel();
			}
			Err(e) => {
				tracing::error!("Failed to listen for shutdown signal: {}", e);
			}
		}
	});

	let outcome = cinema::run(config, cancel).await?;

	tracing::info!(
		scene = %outcome.scene,
		avoided_loss = outcome.metrics.avoided_loss,
		realized_gain = outcome.metrics.realized_gain,
		objectives = outcome.objectives.values().filter(|done| **done).count(),
		"👋 Presentation finished"
	);
	Ok(())
}
