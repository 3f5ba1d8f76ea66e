use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{ChoreoError, EngineConfig, PlayerCommand, PlayerRuntime, Result, Scenario, ScenarioEngine, Snapshot, Speed};

/// The presentation actor façade.
///
/// Owns the task running the engine; every control goes through the command
/// channel and every observation through the snapshot watch channel.
pub struct ScenarioPlayer {
	command_tx: mpsc::UnboundedSender<PlayerCommand>,
	state_rx: watch::Receiver<Snapshot>,
	task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
	cancel_token: CancellationToken,
}

impl ScenarioPlayer {
	/// Spawn the runtime for `engine`. Must be called from within a tokio runtime.
	pub fn new(engine: ScenarioEngine) -> Self {
		let cancel_token = CancellationToken::new();
		let (command_tx, command_rx) = mpsc::unbounded_channel();

		let (runtime, state_rx) = PlayerRuntime::new(engine);
		let task_handle = tokio::spawn(runtime.run(command_rx, cancel_token.clone()));

		info!("ScenarioPlayer created");

		Self {
			command_tx,
			state_rx,
			task_handle: Arc::new(Mutex::new(Some(task_handle))),
			cancel_token,
		}
	}

	pub fn from_scenario(scenario: Scenario, config: EngineConfig) -> Result<Self> {
		Ok(Self::new(ScenarioEngine::new(scenario, config)?))
	}

	/// Send a command carrying a responder and await the engine's answer
	async fn request(&self, make: impl FnOnce(oneshot::Sender<Result<()>>) -> PlayerCommand) -> Result<()> {
		let (tx, rx) = oneshot::channel();
		self.command_tx.send(make(tx)).map_err(|_| ChoreoError::Internal("Failed to send command".into()))?;
		rx.await.map_err(|_| ChoreoError::Internal("Player runtime dropped".into()))?
	}

	fn send(&self, cmd: PlayerCommand) -> Result<()> {
		self.command_tx.send(cmd).map_err(|_| ChoreoError::Internal("Failed to send command".into()))
	}

	pub async fn start(&self) -> Result<()> {
		self.request(|response| PlayerCommand::Start { response }).await
	}
	pub async fn replay(&self) -> Result<()> {
		self.request(|response| PlayerCommand::Replay { response }).await
	}
	pub async fn skip_scene(&self) -> Result<()> {
		self.request(|response| PlayerCommand::SkipScene { response }).await
	}
	pub async fn pause(&self) -> Result<()> {
		self.request(|response| PlayerCommand::Pause { response }).await
	}
	pub async fn resume(&self) -> Result<()> {
		self.request(|response| PlayerCommand::Resume { response }).await
	}

	// Fire-and-forget commands

	/// Rejects anything but 1 or 2 before it reaches the runtime
	pub fn set_speed(&self, multiplier: u32) -> Result<Speed> {
		let speed = Speed::try_from(multiplier)?;
		self.send(PlayerCommand::SetSpeed(speed))?;
		Ok(speed)
	}

	pub fn set_muted(&self, muted: bool) -> Result<()> {
		self.send(PlayerCommand::SetMuted(muted))
	}

	pub fn toggle_mute(&self) -> Result<()> {
		self.send(PlayerCommand::ToggleMute)
	}

	// Access state
	pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
		self.state_rx.clone()
	}
	pub fn current_snapshot(&self) -> Snapshot {
		self.state_rx.borrow().clone()
	}

	/// Wait until a published snapshot satisfies `predicate`
	pub async fn wait_until(&self, predicate: impl FnMut(&Snapshot) -> bool) -> Result<Snapshot> {
		let mut rx = self.state_rx.clone();
		let snapshot = rx.wait_for(predicate).await.map_err(|_| ChoreoError::Internal("Player runtime stopped".into()))?;
		Ok(snapshot.clone())
	}

	pub async fn shutdown(&self) {
		self.cancel_token.cancel();
		if let Some(handle) = self.task_handle.lock().await.take() {
			let _ = handle.await;
		}
	}
}

impl Drop for ScenarioPlayer {
	fn drop(&mut self) {
		self.cancel_token.cancel();
	}
}
