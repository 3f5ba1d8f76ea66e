use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{PlayerCommand, Result, ScenarioEngine, Snapshot, TimeMs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
	Playing,
	Paused,
}

/// Pure FSM: pause and resume are idempotent, everything else keeps the mode
const fn transition(mode: PlayerMode, cmd: &PlayerCommand) -> PlayerMode {
	match cmd {
		PlayerCommand::Pause { .. } => PlayerMode::Paused,
		PlayerCommand::Resume { .. } => PlayerMode::Playing,
		_ => mode,
	}
}

// ============================================================================
// TimeBase - engine time with pauses taken out
// ============================================================================

#[derive(Debug)]
struct TimeBase {
	started_at: Instant,
	paused_at: Option<Instant>,
	accumulated_pause: Duration,
}

impl TimeBase {
	fn new() -> Self {
		Self {
			started_at: Instant::now(),
			paused_at: None,
			accumulated_pause: Duration::ZERO,
		}
	}

	fn now_ms(&self) -> TimeMs {
		let until = self.paused_at.unwrap_or_else(Instant::now);
		let elapsed = until.saturating_duration_since(self.started_at).saturating_sub(self.accumulated_pause);
		TimeMs::try_from(elapsed.as_millis()).unwrap_or(TimeMs::MAX)
	}

	fn pause(&mut self) {
		if self.paused_at.is_none() {
			self.paused_at = Some(Instant::now());
		}
	}

	fn resume(&mut self) {
		if let Some(paused_at) = self.paused_at.take() {
			self.accumulated_pause += paused_at.elapsed();
		}
	}
}

// ============================================================================
// PlayerRuntime - owns the engine inside one task
// ============================================================================

pub struct PlayerRuntime {
	engine: ScenarioEngine,
	state_tx: watch::Sender<Snapshot>,
	published: Option<u64>,
}

impl PlayerRuntime {
	pub fn new(engine: ScenarioEngine) -> (Self, watch::Receiver<Snapshot>) {
		let (state_tx, state_rx) = watch::channel(engine.snapshot());
		let runtime = Self {
			engine,
			state_tx,
			published: None,
		};
		(runtime, state_rx)
	}

	pub async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<PlayerCommand>, cancel: CancellationToken) {
		let mut ticker = interval(self.engine.config().tick_interval());
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		let mut time = TimeBase::new();
		let mut mode = PlayerMode::Playing;

		if let Err(e) = self.engine.boot() {
			warn!(error = %e, "Engine was booted before the runtime took it");
		}
		self.publish();

		info!(tick_ms = self.engine.config().tick_interval_ms, "Player runtime started");

		loop {
			tokio::select! {
				// Tick only while playing
				_ = async {
					if mode == PlayerMode::Playing {
						ticker.tick().await;
					} else {
						std::future::pending::<()>().await;
					}
				} => {
					self.engine.advance(time.now_ms());
					self.publish();
				}

				Some(cmd) = command_rx.recv() => {
					let name = cmd.name();
					let result = self.handle_command(&cmd, &mut mode, &mut time);
					// Publish first so a caller awaiting the answer sees the new state
					self.publish();

					match (cmd.into_responder(), result) {
						(Some(response), result) => {
							let _ = response.send(result);
						}
						(None, Err(e)) => warn!(command = name, error = %e, "Command failed"),
						(None, Ok(())) => {}
					}
				}

				_ = cancel.cancelled() => {
					info!("Player runtime cancelled");
					break;
				}
			}
		}
	}

	fn handle_command(&mut self, cmd: &PlayerCommand, mode: &mut PlayerMode, time: &mut TimeBase) -> Result<()> {
		// Commands act at the current engine time, not at the last tick
		if *mode == PlayerMode::Playing {
			self.engine.advance(time.now_ms());
		}

		let next = transition(*mode, cmd);
		if next != *mode {
			match next {
				PlayerMode::Paused => {
					time.pause();
					info!(at = time.now_ms(), "Playback paused");
				}
				PlayerMode::Playing => {
					time.resume();
					info!(at = time.now_ms(), "Playback resumed");
				}
			}
			self.engine.set_paused(next == PlayerMode::Paused);
			*mode = next;
		}

		match cmd {
			PlayerCommand::Start { .. } => self.engine.start(),
			PlayerCommand::Replay { .. } => self.engine.replay(),
			PlayerCommand::SkipScene { .. } => self.engine.skip_scene(),
			PlayerCommand::Pause { .. } | PlayerCommand::Resume { .. } => Ok(()),
			PlayerCommand::SetSpeed(speed) => self.engine.set_speed(speed.multiplier()).map(|_| ()),
			PlayerCommand::SetMuted(muted) => {
				self.engine.set_muted(*muted);
				Ok(())
			}
			PlayerCommand::ToggleMute => {
				self.engine.toggle_mute();
				Ok(())
			}
		}
	}

	/// Push a snapshot only when something observable changed
	fn publish(&mut self) {
		let revision = self.engine.revision();
		if self.published == Some(revision) {
			return;
		}
		self.published = Some(revision);
		self.state_tx.send_replace(self.engine.snapshot());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::sync::oneshot;

	#[test]
	fn pause_and_resume_are_idempotent() {
		let (tx, _rx) = oneshot::channel();
		let pause = PlayerCommand::Pause { response: tx };
		assert_eq!(transition(PlayerMode::Playing, &pause), PlayerMode::Paused);
		assert_eq!(transition(PlayerMode::Paused, &pause), PlayerMode::Paused);

		let (tx, _rx) = oneshot::channel();
		let resume = PlayerCommand::Resume { response: tx };
		assert_eq!(transition(PlayerMode::Paused, &resume), PlayerMode::Playing);
		assert_eq!(transition(PlayerMode::Playing, &resume), PlayerMode::Playing);

		assert_eq!(transition(PlayerMode::Paused, &PlayerCommand::ToggleMute), PlayerMode::Paused);
	}

	#[tokio::test(start_paused = true)]
	async fn time_base_excludes_pauses() {
		let mut time = TimeBase::new();
		tokio::time::advance(Duration::from_millis(1000)).await;
		assert_eq!(time.now_ms(), 1000);

		time.pause();
		tokio::time::advance(Duration::from_millis(5000)).await;
		assert_eq!(time.now_ms(), 1000);

		time.resume();
		tokio::time::advance(Duration::from_millis(250)).await;
		assert_eq!(time.now_ms(), 1250);
	}
}
