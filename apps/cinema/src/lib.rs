mod audio;
mod config;
mod renderer;

pub use audio::TracingCuePlayer;
pub use config::Config;
pub use renderer::{describe_changes, spawn_renderer, SnapshotRenderer};

use choreo::core::{ScenarioEngine, ScenarioPlayer, Snapshot};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Play the configured scenario to its summary, replaying as many times as
/// asked. Returns the last snapshot seen.
pub async fn run(config: Config, cancel: CancellationToken) -> anyhow::Result<Snapshot> {
	let scenario = config.load_scenario()?;
	let engine_config = config.engine_config()?;

	info!(scenes = scenario.content_count(), speed = %engine_config.speed, replays = config.replays, "📋 Configuration loaded");

	let engine = ScenarioEngine::new(scenario, engine_config)?.with_cue_player(Box::new(TracingCuePlayer::default()));
	let player = ScenarioPlayer::new(engine);

	let render_cancel = cancel.child_token();
	let render_handle = spawn_renderer(player.subscribe(), config.json, render_cancel.clone());

	if config.skip_intro {
		player.start().await?;
	}

	let mut replays_left = config.replays;
	let outcome = loop {
		tokio::select! {
			_ = cancel.cancelled() => {
				info!("🛑 Presentation interrupted");
				break player.current_snapshot();
			}
			summary = player.wait_until(Snapshot::is_finished) => {
				let summary = summary?;
				info!(avoided_loss = summary.metrics.avoided_loss, realized_gain = summary.metrics.realized_gain, replays_left, "🏁 Summary reached");
				if replays_left == 0 {
					break summary;
				}
				replays_left -= 1;
				player.replay().await?;
			}
		}
	};

	player.shutdown().await;
	render_cancel.cancel();
	let _ = render_handle.await;

	Ok(outcome)
}
