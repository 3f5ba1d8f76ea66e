use super::SceneId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChoreoError>;

#[derive(Debug, Error)]
pub enum ChoreoError {
	#[error("Unsupported playback speed: x{0}")]
	UnsupportedSpeed(u32),

	#[error("Cannot {command} while in {scene}")]
	InvalidTransition { scene: SceneId, command: &'static str },

	#[error("Presentation already started")]
	AlreadyStarted,

	#[error("Unknown objective: {0}")]
	UnknownObjective(String),

	#[error("Invalid scenario: {0}")]
	InvalidScenario(String),

	#[error("Invalid engine configuration: {0}")]
	InvalidConfig(String),

	#[error("Scenario parse error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Scenario read error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Internal error: {0}")]
	Internal(String),
}

impl ChoreoError {
	/// Control-surface misuse the caller can simply ignore
	pub const fn is_recoverable(&self) -> bool {
		matches!(self, Self::InvalidTransition { .. } | Self::AlreadyStarted | Self::UnsupportedSpeed(_))
	}
}
