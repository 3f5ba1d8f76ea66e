use choreo::core::{AudioCue, CuePlayer};
use tracing::debug;

/// Stands in for a sound device: every cue becomes a debug event
#[derive(Debug, Default)]
pub struct TracingCuePlayer {
	played: u64,
}

impl TracingCuePlayer {
	pub const fn played(&self) -> u64 {
		self.played
	}
}

impl CuePlayer for TracingCuePlayer {
	fn play(&mut self, cue: AudioCue) {
		self.played += 1;
		debug!(?cue, n = self.played, "♪ Audio cue");
	}
}
