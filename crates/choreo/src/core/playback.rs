use super::{Result, Speed};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
	pub speed: Speed,
	pub muted: bool,
	pub paused: bool,
}

/// Speed and mute settings chosen by the viewer.
///
/// Speed only reaches delays scheduled after the change; mute only reaches
/// the audio bus.
#[derive(Debug, Clone, Default)]
pub struct PlaybackController {
	state: PlaybackState,
}

impl PlaybackController {
	pub const fn new(speed: Speed, muted: bool) -> Self {
		Self {
			state: PlaybackState { speed, muted, paused: false },
		}
	}

	pub fn set_speed(&mut self, multiplier: u32) -> Result<Speed> {
		let speed = Speed::try_from(multiplier)?;
		if speed != self.state.speed {
			info!(%speed, "Playback speed changed");
		}
		self.state.speed = speed;
		Ok(speed)
	}

	/// Flip mute; returns the new value
	pub fn toggle_mute(&mut self) -> bool {
		self.set_muted(!self.state.muted);
		self.state.muted
	}

	pub fn set_muted(&mut self, muted: bool) {
		if muted != self.state.muted {
			info!(muted, "Mute toggled");
		}
		self.state.muted = muted;
	}

	pub(crate) fn set_paused(&mut self, paused: bool) {
		self.state.paused = paused;
	}

	pub const fn speed(&self) -> Speed {
		self.state.speed
	}

	pub const fn is_muted(&self) -> bool {
		self.state.muted
	}

	pub const fn state(&self) -> PlaybackState {
		self.state
	}
}
