use super::{Result, Speed};
use tokio::sync::oneshot;

/// Internal command type sent from the player façade to its runtime
#[derive(Debug)]
pub enum PlayerCommand {
	// Transitions with response
	Start {
		response: oneshot::Sender<Result<()>>,
	},
	Replay {
		response: oneshot::Sender<Result<()>>,
	},
	SkipScene {
		response: oneshot::Sender<Result<()>>,
	},
	Pause {
		response: oneshot::Sender<Result<()>>,
	},
	Resume {
		response: oneshot::Sender<Result<()>>,
	},

	// Fire-and-forget
	SetSpeed(Speed),
	SetMuted(bool),
	ToggleMute,
}

impl PlayerCommand {
	pub const fn name(&self) -> &'static str {
		match self {
			Self::Start { .. } => "start",
			Self::Replay { .. } => "replay",
			Self::SkipScene { .. } => "skip",
			Self::Pause { .. } => "pause",
			Self::Resume { .. } => "resume",
			Self::SetSpeed(_) => "set_speed",
			Self::SetMuted(_) => "set_muted",
			Self::ToggleMute => "toggle_mute",
		}
	}

	/// Split off the responder, if the command carries one
	pub fn into_responder(self) -> Option<oneshot::Sender<Result<()>>> {
		match self {
			Self::Start { response } | Self::Replay { response } | Self::SkipScene { response } | Self::Pause { response } | Self::Resume { response } => Some(response),
			Self::SetSpeed(_) | Self::SetMuted(_) | Self::ToggleMute => None,
		}
	}
}
