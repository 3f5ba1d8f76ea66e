use super::{ChoreoError, TimeMs};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sub-state within a scene ("problem shown", "solution shown", ...)
pub type StepIndex = u8;

/// Stage of the presentation. Variant order is presentation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum SceneId {
	#[default]
	Intro,
	Content(u8),
	Summary,
}

impl SceneId {
	pub const fn first_content() -> Self {
		Self::Content(0)
	}

	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::Summary)
	}

	/// Scene that follows `self` in a presentation with `content_count` content scenes.
	/// `None` once the terminal scene is reached.
	pub fn next(self, content_count: usize) -> Option<Self> {
		match self {
			Self::Intro if content_count > 0 => Some(Self::Content(0)),
			Self::Intro => Some(Self::Summary),
			Self::Content(i) if usize::from(i) + 1 < content_count => Some(Self::Content(i + 1)),
			Self::Content(_) => Some(Self::Summary),
			Self::Summary => None,
		}
	}
}

impl fmt::Display for SceneId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Intro => write!(f, "intro"),
			Self::Content(i) => write!(f, "scene {}", u16::from(*i) + 1),
			Self::Summary => write!(f, "summary"),
		}
	}
}

/// Generation counter identifying which scene's actions are still valid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(pub u64);

impl Epoch {
	#[must_use]
	pub const fn next(self) -> Self {
		Self(self.0 + 1)
	}
}

impl fmt::Display for Epoch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "e{}", self.0)
	}
}

/// Playback speed factor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Speed {
	#[default]
	X1,
	X2,
}

impl Speed {
	pub const fn multiplier(self) -> u32 {
		match self {
			Self::X1 => 1,
			Self::X2 => 2,
		}
	}

	/// Real delay for a nominal delay at this speed
	pub const fn scale(self, delay: TimeMs) -> TimeMs {
		let delay = if delay < 0 { 0 } else { delay };
		delay / self.multiplier() as TimeMs
	}
}

impl TryFrom<u32> for Speed {
	type Error = ChoreoError;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(Self::X1),
			2 => Ok(Self::X2),
			other => Err(ChoreoError::UnsupportedSpeed(other)),
		}
	}
}

impl From<Speed> for u32 {
	fn from(speed: Speed) -> Self {
		speed.multiplier()
	}
}

impl fmt::Display for Speed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "x{}", self.multiplier())
	}
}

/// Abstract sound identifiers understood by the audio cue player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
	Click,
	Whoosh,
	Alert,
	Keystroke,
	Success,
}

/// Controls the pointer can travel to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlRef {
	Start,
	BadChoice,
	GoodChoice,
	Replay,
}

/// Screen-space point in renderer units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f32,
	pub y: f32,
}

impl Point {
	pub const fn new(x: f32, y: f32) -> Self {
		Self { x, y }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
	Favorable,
	Adverse,
}

impl Polarity {
	/// Sound that accompanies a card of this polarity
	pub const fn cue(self) -> AudioCue {
		match self {
			Self::Favorable => AudioCue::Success,
			Self::Adverse => AudioCue::Alert,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	Vehicle,
	Parcel,
}
