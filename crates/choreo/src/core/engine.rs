use chrono::NaiveTime;
use tracing::{debug, info, trace, warn};

use super::{AudioBus, AudioCue, ChatChannel, ChatMessage, ChoreoError, ControlRef, Cue, CuePlayer, EngineConfig, EntityMap, Epoch, LogChannel, LogEntry, MergeOutcome, Metrics};
use super::{Objectives, OverlayChannel, PlaybackController, PlaybackState, PointerChannel, PointerState, Result, Scenario, SceneId, SceneScript, ScheduledAction, Scheduler};
use super::{Snapshot, Speed, StepIndex, TimeMs, TypeProgress, VirtualClock};

/// Work the engine hands to its own scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
	/// Apply beat `n` of the current scene
	Beat(usize),
	PointerDown { then: usize },
	PointerUp { then: usize },
	BlurOverlay { serial: u64 },
	TypeKey { then: usize },
}

/// Scene state machine and sole writer of every channel.
///
/// The engine is synchronous: the caller feeds it engine time through
/// [`ScenarioEngine::advance`] and reads the result back as a [`Snapshot`].
/// Every scene entry cancels the previous epoch, so nothing a finished scene
/// scheduled can touch the channels afterwards.
#[derive(Debug)]
pub struct ScenarioEngine {
	scenario: Scenario,
	config: EngineConfig,
	scheduler: Scheduler<Effect>,
	clock: VirtualClock,
	playback: PlaybackController,
	audio: AudioBus,

	scene: SceneId,
	step: StepIndex,
	epoch: Epoch,
	booted: bool,
	revision: u64,

	pointer: PointerChannel,
	overlay: OverlayChannel,
	entities: EntityMap,
	chat: ChatChannel,
	log: LogChannel,
	objectives: Objectives,
	metrics: Metrics,
}

impl ScenarioEngine {
	pub fn new(scenario: Scenario, config: EngineConfig) -> Result<Self> {
		config.validate().map_err(ChoreoError::InvalidConfig)?;
		scenario.validate()?;

		let day_start = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN);
		let objectives = Objectives::new(scenario.objectives.iter().cloned());

		info!(scenes = scenario.content_count(), speed = %config.speed, "ScenarioEngine created");

		Ok(Self {
			scheduler: Scheduler::new(config.speed),
			clock: VirtualClock::new(day_start, config.clock_rate),
			playback: PlaybackController::new(config.speed, config.muted),
			audio: AudioBus::default(),
			scene: SceneId::Intro,
			step: 0,
			epoch: Epoch::default(),
			booted: false,
			revision: 0,
			pointer: PointerChannel::new(config.controls.rest),
			overlay: OverlayChannel::default(),
			entities: EntityMap::default(),
			chat: ChatChannel::default(),
			log: LogChannel::default(),
			objectives,
			metrics: Metrics::default(),
			scenario,
			config,
		})
	}

	#[must_use]
	pub fn with_cue_player(mut self, player: Box<dyn CuePlayer>) -> Self {
		self.audio.attach(player);
		self
	}

	/// Schedule the intro script. Called once, before the first `advance`.
	pub fn boot(&mut self) -> Result<()> {
		if self.booted || self.scene != SceneId::Intro {
			return Err(ChoreoError::AlreadyStarted);
		}
		self.booted = true;
		info!(epoch = %self.epoch, "Presentation booted");
		self.continue_from(0);
		self.touch();
		Ok(())
	}

	// ============================================================================
	// Controls
	// ============================================================================

	/// Leave the intro for the first content scene
	pub fn start(&mut self) -> Result<()> {
		if self.scene != SceneId::Intro {
			return Err(ChoreoError::AlreadyStarted);
		}
		info!("Start requested");
		self.next_scene();
		Ok(())
	}

	/// Reset the scoreboard and play the content scenes again
	pub fn replay(&mut self) -> Result<()> {
		if !self.scene.is_terminal() {
			return Err(ChoreoError::InvalidTransition {
				scene: self.scene,
				command: "replay",
			});
		}
		info!(previous_total = self.metrics.avoided_loss + self.metrics.realized_gain, "Replay requested");
		self.metrics.reset_for_replay();
		self.log.reset_for_replay();
		self.objectives.reset_for_replay();
		self.enter_scene(SceneId::first_content());
		Ok(())
	}

	/// Jump to the next scene; a warning and nothing else on the summary
	pub fn skip_scene(&mut self) -> Result<()> {
		if self.scene.is_terminal() {
			warn!("No next scene to skip to");
			return Ok(());
		}
		info!(from = %self.scene, "Skipping scene");
		self.next_scene();
		Ok(())
	}

	pub fn set_speed(&mut self, multiplier: u32) -> Result<Speed> {
		let speed = self.playback.set_speed(multiplier)?;
		self.scheduler.set_speed(speed);
		self.touch();
		Ok(speed)
	}

	pub fn set_muted(&mut self, muted: bool) {
		self.playback.set_muted(muted);
		self.touch();
	}

	pub fn toggle_mute(&mut self) -> bool {
		let muted = self.playback.toggle_mute();
		self.touch();
		muted
	}

	pub(crate) fn set_paused(&mut self, paused: bool) {
		self.playback.set_paused(paused);
		self.touch();
	}

	// ============================================================================
	// Time
	// ============================================================================

	/// Bring the presentation up to engine time `now`.
	///
	/// Every live action due by `now` runs in due order, with the virtual clock
	/// first moved up to the action's due time. Follow-ups scheduled along the
	/// way are timed from the action that issued them and run in the same call
	/// if due. The clock covers the rest of the interval once nothing is due.
	pub fn advance(&mut self, now: TimeMs) {
		let mut reached = self.scheduler.now();
		while let Some(scheduled) = self.scheduler.pop_due(now) {
			self.run_clock(scheduled.due_at - reached);
			reached = reached.max(scheduled.due_at);
			self.apply(scheduled);
		}
		self.run_clock(now - reached);
		self.scheduler.settle(now);
	}

	fn run_clock(&mut self, elapsed: TimeMs) {
		if elapsed <= 0 {
			return;
		}
		let before = self.clock.current_time();
		self.clock.advance(elapsed, self.playback.speed());
		if self.clock.current_time() != before {
			self.touch();
		}
	}

	fn apply(&mut self, scheduled: ScheduledAction<Effect>) {
		if scheduled.epoch != self.epoch {
			debug!(action_epoch = %scheduled.epoch, epoch = %self.epoch, "Dropping action from a finished scene");
			return;
		}

		match scheduled.action {
			Effect::Beat(index) => self.run_beat(index),
			Effect::PointerDown { then } => {
				self.pointer.press();
				self.sound(AudioCue::Click);
				self.schedule(self.config.pointer_press_ms, Effect::PointerUp { then });
			}
			Effect::PointerUp { then } => {
				self.pointer.release();
				self.continue_from(then);
			}
			Effect::BlurOverlay { serial } => {
				if !self.overlay.blur(serial) {
					trace!(serial, "Overlay already gone");
				}
			}
			Effect::TypeKey { then } => {
				self.sound(AudioCue::Keystroke);
				match self.chat.type_next() {
					TypeProgress::Typing => self.schedule(self.config.keystroke_ms, Effect::TypeKey { then }),
					TypeProgress::Sent => self.continue_from(then),
				}
			}
		}
		self.touch();
	}

	fn run_beat(&mut self, index: usize) {
		let Some(cue) = self.script().and_then(|s| s.beats.get(index)).map(|b| b.cue.clone()) else {
			warn!(scene = %self.scene, beat = index, "Beat out of range");
			return;
		};
		debug!(scene = %self.scene, beat = index, "Beat");

		let next = index + 1;
		let continues = match cue {
			Cue::SetClock { start, target, label } => {
				if let Some(start) = start {
					self.clock.reset_to(start);
				}
				self.clock.set_target(target, label);
				true
			}
			Cue::SeedEntities { entities } => {
				self.entities.clear();
				for entity in entities {
					self.entities.merge(entity);
				}
				true
			}
			Cue::MoveEntity { entity } => {
				let moving = entity.travel_ms > 0;
				if self.entities.merge(entity) == MergeOutcome::Updated && moving {
					self.sound(AudioCue::Whoosh);
				}
				true
			}
			Cue::ShowOverlay { overlay } => {
				self.sound(overlay.polarity.cue());
				let serial = self.overlay.show(overlay);
				self.schedule(self.config.overlay_focus_ms, Effect::BlurOverlay { serial });
				true
			}
			Cue::DismissOverlay => {
				self.overlay.dismiss();
				true
			}
			Cue::Click { control } => {
				self.pointer.move_to(control, self.config.controls.position(control));
				self.schedule(self.config.pointer_travel_ms, Effect::PointerDown { then: next });
				false
			}
			Cue::AddMetrics { avoided_loss, realized_gain } => {
				self.metrics.add(avoided_loss, realized_gain);
				true
			}
			Cue::Log {
				text,
				polarity,
				impact_label,
				flagged,
			} => {
				self.log.append(LogEntry {
					timestamp: self.clock.display(),
					text,
					polarity,
					impact_label,
					flagged,
				});
				true
			}
			Cue::OpenChat { title } => {
				self.chat.open(title);
				true
			}
			Cue::TypeMessage { author, text, is_self } => {
				let message = ChatMessage {
					text,
					author,
					is_self,
					timestamp: self.clock.display(),
				};
				match self.chat.begin_typing(message) {
					TypeProgress::Typing => {
						self.schedule(self.config.keystroke_ms, Effect::TypeKey { then: next });
						false
					}
					TypeProgress::Sent => true,
				}
			}
			Cue::PostMessage { author, text, is_self } => {
				self.chat.append(ChatMessage {
					text,
					author,
					is_self,
					timestamp: self.clock.display(),
				});
				true
			}
			Cue::CompleteObjective { key } => {
				match self.objectives.complete(&key) {
					Ok(true) => info!(objective = %key, "Objective completed"),
					Ok(false) => {}
					Err(e) => warn!(error = %e, "Ignoring objective"),
				}
				true
			}
			Cue::Sound { sound } => {
				self.sound(sound);
				true
			}
			Cue::SetStep { step } => {
				self.step = step;
				true
			}
			Cue::Advance => {
				self.next_scene();
				false
			}
		};

		if continues {
			self.continue_from(next);
		}
	}

	/// Schedule beat `index` of the current scene after its own delay
	fn continue_from(&mut self, index: usize) {
		let Some(delay) = self.script().and_then(|s| s.beats.get(index)).map(|b| b.delay_ms) else {
			debug!(scene = %self.scene, "Script finished");
			return;
		};
		self.schedule(delay, Effect::Beat(index));
	}

	fn schedule(&mut self, delay: TimeMs, effect: Effect) {
		self.scheduler.schedule(delay, effect, self.epoch);
	}

	fn next_scene(&mut self) {
		match self.scene.next(self.scenario.content_count()) {
			Some(scene) => self.enter_scene(scene),
			None => warn!(scene = %self.scene, "Already on the last scene"),
		}
	}

	fn enter_scene(&mut self, scene: SceneId) {
		let from = self.scene;
		self.scheduler.cancel_epoch(self.epoch);
		self.epoch = self.epoch.next();
		self.scene = scene;
		self.step = 0;

		self.pointer.clear_target();
		self.overlay.dismiss();
		self.entities.clear();
		self.chat.close();

		info!(%from, to = %scene, epoch = %self.epoch, "Scene transition");
		self.continue_from(0);
		self.touch();
	}

	fn sound(&mut self, cue: AudioCue) {
		self.audio.emit(cue, self.playback.is_muted());
	}

	fn touch(&mut self) {
		self.revision = self.revision.wrapping_add(1);
	}

	fn script(&self) -> Option<&SceneScript> {
		self.scenario.script(self.scene)
	}

	// ============================================================================
	// Reads
	// ============================================================================

	pub const fn scene(&self) -> SceneId {
		self.scene
	}

	pub const fn step(&self) -> StepIndex {
		self.step
	}

	pub const fn epoch(&self) -> Epoch {
		self.epoch
	}

	/// Engine time of the last `advance`
	pub const fn now(&self) -> TimeMs {
		self.scheduler.now()
	}

	/// Bumped on every observable change
	pub const fn revision(&self) -> u64 {
		self.revision
	}

	pub const fn clock(&self) -> &VirtualClock {
		&self.clock
	}

	pub const fn pointer(&self) -> PointerState {
		self.pointer.state()
	}

	pub const fn overlay(&self) -> &OverlayChannel {
		&self.overlay
	}

	pub const fn entities(&self) -> &EntityMap {
		&self.entities
	}

	pub const fn chat(&self) -> &ChatChannel {
		&self.chat
	}

	pub fn log(&self) -> &[LogEntry] {
		self.log.entries()
	}

	pub const fn objectives(&self) -> &Objectives {
		&self.objectives
	}

	pub const fn metrics(&self) -> Metrics {
		self.metrics
	}

	pub const fn playback(&self) -> PlaybackState {
		self.playback.state()
	}

	pub const fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub const fn scenario(&self) -> &Scenario {
		&self.scenario
	}

	/// Live actions still waiting in the scheduler
	pub fn pending_actions(&self) -> usize {
		self.scheduler.live_len()
	}

	/// Actions from finished scenes that came due and were dropped
	pub const fn discarded_actions(&self) -> u64 {
		self.scheduler.neutered()
	}

	pub const fn cues_emitted(&self) -> u64 {
		self.audio.emitted()
	}

	pub const fn enabled_control(&self) -> Option<ControlRef> {
		match self.scene {
			SceneId::Intro => Some(ControlRef::Start),
			SceneId::Summary => Some(ControlRef::Replay),
			SceneId::Content(_) if self.step == 0 => Some(ControlRef::BadChoice),
			SceneId::Content(_) => Some(ControlRef::GoodChoice),
		}
	}

	pub fn snapshot(&self) -> Snapshot {
		Snapshot {
			scene: self.scene,
			scene_title: self.script().map(|s| s.title.clone()).unwrap_or_default(),
			step: self.step,
			epoch: self.epoch,
			now: self.scheduler.now(),
			revision: self.revision,
			clock: self.clock.reading(),
			pointer: self.pointer.state(),
			overlay: self.overlay.view(),
			entities: self.entities.to_vec(),
			chat: self.chat.view(),
			log: self.log.entries().to_vec(),
			objectives: self.objectives.as_map().clone(),
			metrics: self.metrics,
			playback: self.playback.state(),
			enabled_control: self.enabled_control(),
		}
	}
}
