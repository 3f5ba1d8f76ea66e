use super::AudioCue;
use std::fmt;
use tracing::trace;

/// Consumer of abstract sound identifiers.
///
/// Implementations must not block; the engine calls `play` from inside its
/// event loop.
pub trait CuePlayer: Send {
	fn play(&mut self, cue: AudioCue);
}

impl<F> CuePlayer for F
where
	F: FnMut(AudioCue) + Send,
{
	fn play(&mut self, cue: AudioCue) {
		self(cue);
	}
}

/// Routes cues to the attached player unless muted. Having no player is fine.
#[derive(Default)]
pub struct AudioBus {
	player: Option<Box<dyn CuePlayer>>,
	emitted: u64,
}

impl AudioBus {
	pub fn new(player: Option<Box<dyn CuePlayer>>) -> Self {
		Self { player, emitted: 0 }
	}

	pub fn attach(&mut self, player: Box<dyn CuePlayer>) {
		self.player = Some(player);
	}

	pub fn emit(&mut self, cue: AudioCue, muted: bool) {
		if muted {
			trace!(?cue, "Muted cue");
			return;
		}
		self.emitted += 1;
		if let Some(player) = self.player.as_mut() {
			player.play(cue);
		}
	}

	/// Cues that went out while unmuted, whether or not a player was attached
	pub const fn emitted(&self) -> u64 {
		self.emitted
	}
}

impl fmt::Debug for AudioBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AudioBus").field("attached", &self.player.is_some()).field("emitted", &self.emitted).finish()
	}
}
