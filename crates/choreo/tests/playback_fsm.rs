// Drives the player actor through its façade on tokio's paused clock

use choreo::core::*;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

// ============================================================================
// Test harness
// ============================================================================

fn player() -> ScenarioPlayer {
	ScenarioPlayer::from_scenario(builtin::scenario(), EngineConfig::default()).unwrap()
}

async fn wait_for_scene(player: &ScenarioPlayer, scene: SceneId) -> Snapshot {
	timeout(Duration::from_secs(120), player.wait_until(|s| s.scene == scene))
		.await
		.expect("scene never reached")
		.unwrap()
}

// ============================================================================
// Transitions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn intro_autoplays_into_first_scene() {
	let player = player();
	let started = Instant::now();

	sleep(Duration::from_millis(1000)).await;
	assert_eq!(player.current_snapshot().scene, SceneId::Intro);
	assert_eq!(player.current_snapshot().enabled_control, Some(ControlRef::Start));

	let snapshot = wait_for_scene(&player, SceneId::Content(0)).await;
	assert!(started.elapsed() >= Duration::from_millis(3100));
	assert_eq!(snapshot.step, 0);

	player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn manual_start_guards() {
	let player = player();

	assert!(matches!(player.replay().await, Err(ChoreoError::InvalidTransition { .. })));
	player.start().await.unwrap();
	assert!(matches!(player.start().await, Err(ChoreoError::AlreadyStarted)));
	assert!(player.replay().await.unwrap_err().is_recoverable());

	assert_eq!(player.current_snapshot().scene, SceneId::Content(0));
	player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn skip_walks_scenes_and_stops_at_summary() {
	let player = player();
	player.start().await.unwrap();
	let first = player.current_snapshot().epoch;

	player.skip_scene().await.unwrap();
	player.skip_scene().await.unwrap();
	let snapshot = player.current_snapshot();
	assert_eq!(snapshot.scene, SceneId::Content(2));
	assert!(snapshot.epoch > first);

	player.skip_scene().await.unwrap();
	assert_eq!(player.current_snapshot().scene, SceneId::Summary);

	// No next scene: handled as a no-op
	assert!(player.skip_scene().await.is_ok());
	assert_eq!(player.current_snapshot().scene, SceneId::Summary);

	player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn replay_from_summary_resets_scoreboard() {
	let player = player();
	player.start().await.unwrap();

	let summary = wait_for_scene(&player, SceneId::Summary).await;
	assert_eq!(summary.metrics.avoided_loss, 2180);
	assert_eq!(summary.metrics.realized_gain, 1790);
	assert_eq!(summary.log.len(), 6);

	player.replay().await.unwrap();
	let snapshot = player.current_snapshot();
	assert_eq!(snapshot.scene, SceneId::Content(0));
	assert_eq!(snapshot.metrics, Metrics::default());
	assert!(snapshot.log.is_empty());
	assert!(snapshot.objectives.values().all(|done| !done));

	player.shutdown().await;
}

// ============================================================================
// Playback
// ============================================================================

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_presentation() {
	let player = player();
	player.start().await.unwrap();
	sleep(Duration::from_millis(1500)).await;

	player.pause().await.unwrap();
	assert!(player.pause().await.is_ok(), "Pause must be idempotent");
	let frozen = player.current_snapshot();
	assert!(frozen.playback.paused);
	assert!(frozen.overlay.is_some());

	sleep(Duration::from_secs(30)).await;
	let later = player.current_snapshot();
	assert_eq!(later.scene, frozen.scene);
	assert_eq!(later.overlay, frozen.overlay);
	assert_eq!(later.clock, frozen.clock);

	player.resume().await.unwrap();
	assert!(!player.current_snapshot().playback.paused);

	// The problem card goes away 3000ms into the scene, paused time excluded
	sleep(Duration::from_millis(1600)).await;
	assert!(player.current_snapshot().overlay.is_none());

	player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn double_speed_halves_the_run() {
	let player = player();
	assert_eq!(player.set_speed(2).unwrap(), Speed::X2);
	player.start().await.unwrap();
	let started = Instant::now();

	wait_for_scene(&player, SceneId::Summary).await;
	assert!(started.elapsed() < Duration::from_secs(25));
	assert_eq!(player.current_snapshot().playback.speed, Speed::X2);

	player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn unsupported_speed_is_rejected_up_front() {
	let player = player();
	assert!(matches!(player.set_speed(3), Err(ChoreoError::UnsupportedSpeed(3))));
	player.resume().await.unwrap();
	assert_eq!(player.current_snapshot().playback.speed, Speed::X1);
	player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn mute_shows_in_snapshot() {
	let player = player();
	player.toggle_mute().unwrap();
	// Commands are handled in order; a request flushes the fire-and-forget ones
	player.resume().await.unwrap();
	assert!(player.current_snapshot().playback.muted);

	player.set_muted(false).unwrap();
	player.resume().await.unwrap();
	assert!(!player.current_snapshot().playback.muted);

	player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn commands_after_shutdown_fail() {
	let player = player();
	player.shutdown().await;
	assert!(matches!(player.start().await, Err(ChoreoError::Internal(_))));
}
