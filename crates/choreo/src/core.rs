mod audio;
pub mod builtin;
mod channels;
mod clock;
mod commands;
mod config;
mod engine;
mod error;
mod playback;
mod player;
mod runtime;
mod scheduler;
mod script;
mod snapshot;
mod types;

pub use audio::{AudioBus, CuePlayer};
pub use channels::{ChatChannel, ChatMessage, ChatView, Entity, EntityMap, LogChannel, LogEntry, MergeOutcome, Metrics, Objectives, Overlay, OverlayChannel, OverlayView, PointerChannel, PointerState, TypeProgress};
pub use clock::{ClockReading, VirtualClock};
pub use config::{ControlLayout, EngineConfig};
pub use engine::ScenarioEngine;
pub use error::{ChoreoError, Result};
pub use playback::{PlaybackController, PlaybackState};
pub use player::ScenarioPlayer;
pub use scheduler::{ActionHandle, ScheduledAction, Scheduler};
pub use script::{Beat, Cue, Scenario, SceneScript};
pub use snapshot::Snapshot;
pub use types::{AudioCue, ControlRef, EntityKind, Epoch, Point, Polarity, SceneId, Speed, StepIndex};

use commands::PlayerCommand;
use runtime::PlayerRuntime;

/// Time in milliseconds
pub type TimeMs = i64;

#[cfg(test)]
mod tests {
	use super::*;

	// ============================================================================
	// Fixtures
	// ============================================================================

	fn engine() -> ScenarioEngine {
		let mut engine = ScenarioEngine::new(builtin::scenario(), EngineConfig::default()).unwrap();
		engine.boot().unwrap();
		engine
	}

	/// Drive the engine on a fixed tick until `until`, collecting a snapshot per tick
	fn run_until(engine: &mut ScenarioEngine, from: TimeMs, until: TimeMs, tick: TimeMs) -> Vec<Snapshot> {
		let mut snapshots = Vec::new();
		let mut now = from;
		while now < until {
			now = (now + tick).min(until);
			engine.advance(now);
			snapshots.push(engine.snapshot());
		}
		snapshots
	}

	/// Run the whole presentation and return the time the summary was reached
	fn play_to_summary(engine: &mut ScenarioEngine, from: TimeMs) -> TimeMs {
		let mut now = from;
		while engine.scene() != SceneId::Summary {
			now += 100;
			engine.advance(now);
			assert!(now < 600_000, "presentation never reached the summary");
		}
		now
	}

	#[derive(Debug, Clone, PartialEq)]
	struct ComparableState {
		scene: SceneId,
		step: StepIndex,
		epoch: Epoch,
		overlay: Option<String>,
		entities: usize,
		log: Vec<LogEntry>,
		metrics: Metrics,
	}

	impl From<&Snapshot> for ComparableState {
		fn from(snapshot: &Snapshot) -> Self {
			Self {
				scene: snapshot.scene,
				step: snapshot.step,
				epoch: snapshot.epoch,
				overlay: snapshot.overlay.as_ref().map(|o| o.overlay.title.clone()),
				entities: snapshot.entities.len(),
				log: snapshot.log.clone(),
				metrics: snapshot.metrics,
			}
		}
	}

	// ============================================================================
	// Determinism
	// ============================================================================

	#[test]
	fn determinism() {
		let mut first = engine();
		let mut second = engine();
		let a = run_until(&mut first, 0, 60_000, 100);
		let b = run_until(&mut second, 0, 60_000, 100);

		for (s1, s2) in a.iter().zip(b.iter()) {
			assert_eq!(ComparableState::from(s1), ComparableState::from(s2));
		}
	}

	#[test]
	fn tick_granularity_does_not_change_outcome() {
		let mut coarse = engine();
		let mut fine = engine();
		let mut from = 0;
		for until in [20_000, 30_000, 45_000] {
			run_until(&mut coarse, from, until, 250);
			run_until(&mut fine, from, until, 10);
			from = until;

			assert_eq!(ComparableState::from(&coarse.snapshot()), ComparableState::from(&fine.snapshot()));
			assert_eq!(coarse.clock().current_time(), fine.clock().current_time(), "clock drifted by {until}ms");
		}
	}

	// ============================================================================
	// No stale-action leakage across transitions
	// ============================================================================

	#[test]
	fn skipping_mid_scene_never_leaks_old_cues() {
		let mut engine = engine();
		engine.start().unwrap();
		let entered = engine.epoch();

		// Into the first scene: problem overlay up, bad choice pending
		run_until(&mut engine, 0, 1500, 100);
		assert_eq!(engine.scene(), SceneId::Content(0));
		assert!(engine.snapshot().overlay.is_some());

		engine.skip_scene().unwrap();
		assert!(engine.epoch() > entered);

		// Scene 2 seeds its own map; nothing from scene 1 may show up again
		for snapshot in run_until(&mut engine, 1500, 3000, 50) {
			assert_eq!(snapshot.scene, SceneId::Content(1));
			assert!(snapshot.entities.iter().all(|e| e.id != "truck-gisors" && e.id != "tiles"));
			assert!(snapshot.overlay.as_ref().map_or(true, |o| o.overlay.title != "DOUBLE BILLING"));
			assert_eq!(snapshot.metrics.avoided_loss, 0);
		}
	}

	#[test]
	fn entity_map_only_holds_current_scene() {
		let mut engine = engine();
		engine.start().unwrap();
		run_until(&mut engine, 0, 500, 100);
		assert_eq!(engine.entities().len(), 4);

		engine.skip_scene().unwrap();
		assert!(engine.entities().is_empty());
		run_until(&mut engine, 500, 1000, 100);
		assert_eq!(engine.entities().len(), 2);
	}

	// ============================================================================
	// Metrics and log
	// ============================================================================

	#[test]
	fn metrics_are_monotone_and_log_is_append_only() {
		let mut engine = engine();
		let snapshots = run_until(&mut engine, 0, 90_000, 100);

		for pair in snapshots.windows(2) {
			assert!(pair[1].metrics.dominates(&pair[0].metrics));
			assert!(pair[1].log.len() >= pair[0].log.len());
			assert_eq!(&pair[1].log[..pair[0].log.len()], &pair[0].log[..]);
		}
	}

	#[test]
	fn full_playthrough_totals() {
		let mut engine = engine();
		play_to_summary(&mut engine, 0);

		let snapshot = engine.snapshot();
		assert_eq!(snapshot.metrics.avoided_loss, 180 + 2000);
		assert_eq!(snapshot.metrics.realized_gain, 90 + 500 + 1200);
		assert_eq!(snapshot.log.len(), 6);
		assert!(snapshot.objectives.values().all(|done| *done));
		assert_eq!(snapshot.enabled_control, Some(ControlRef::Replay));
	}

	#[test]
	fn replay_resets_scoreboard_and_reenters_first_scene() {
		let mut engine = engine();
		let now = play_to_summary(&mut engine, 0);
		let before = engine.epoch();

		engine.replay().unwrap();

		assert_eq!(engine.scene(), SceneId::Content(0));
		assert_eq!(engine.step(), 0);
		assert!(engine.epoch() > before);
		assert_eq!(engine.metrics(), Metrics::default());
		assert!(engine.log().is_empty());
		assert_eq!(engine.objectives().completed_count(), 0);

		play_to_summary(&mut engine, now);
		assert_eq!(engine.metrics().realized_gain, 1790);
		assert_eq!(engine.log().len(), 6);
	}

	#[test]
	fn replay_outside_summary_is_rejected() {
		let mut engine = engine();
		assert!(matches!(engine.replay(), Err(ChoreoError::InvalidTransition { .. })));
		engine.start().unwrap();
		assert!(engine.replay().is_err());
		assert_eq!(engine.scene(), SceneId::Content(0));
	}
}
