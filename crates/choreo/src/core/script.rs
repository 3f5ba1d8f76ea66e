//! Data-described scene scripts.
//!
//! A scene is an ordered list of beats. Each beat waits `delay_ms` after the
//! previous beat has completed, then applies its cue. Most cues complete at
//! once; a click completes when the pointer is released and a typed message
//! when its last character lands.

use super::{AudioCue, ChoreoError, ControlRef, Entity, Overlay, Polarity, Result, SceneId, StepIndex, TimeMs};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "cue")]
pub enum Cue {
	/// Point the clock at the scene's deadline, optionally jumping the current time
	SetClock {
		#[serde(default)]
		start: Option<NaiveTime>,
		target: NaiveTime,
		label: String,
	},
	/// Replace whatever is on the map
	SeedEntities { entities: Vec<Entity> },
	/// Merge one entity by id
	MoveEntity { entity: Entity },
	ShowOverlay { overlay: Overlay },
	DismissOverlay,
	/// Pointer travels to the control and clicks it
	Click { control: ControlRef },
	AddMetrics {
		#[serde(default)]
		avoided_loss: u64,
		#[serde(default)]
		realized_gain: u64,
	},
	Log {
		text: String,
		polarity: Polarity,
		#[serde(default)]
		impact_label: String,
		#[serde(default)]
		flagged: bool,
	},
	OpenChat { title: String },
	/// Reveal a message character by character, then append it
	TypeMessage {
		author: String,
		text: String,
		#[serde(default)]
		is_self: bool,
	},
	/// Append a message as a whole (incoming messages)
	PostMessage {
		author: String,
		text: String,
		#[serde(default)]
		is_self: bool,
	},
	CompleteObjective { key: String },
	Sound { sound: AudioCue },
	SetStep { step: StepIndex },
	/// Leave for the next scene
	Advance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
	#[serde(default)]
	pub delay_ms: TimeMs,
	#[serde(flatten)]
	pub cue: Cue,
}

impl Beat {
	pub const fn now(cue: Cue) -> Self {
		Self { delay_ms: 0, cue }
	}

	pub const fn after(delay_ms: TimeMs, cue: Cue) -> Self {
		Self { delay_ms, cue }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneScript {
	pub title: String,
	pub beats: Vec<Beat>,
}

impl SceneScript {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			beats: Vec::new(),
		}
	}

	#[must_use]
	pub fn then(mut self, cue: Cue) -> Self {
		self.beats.push(Beat::now(cue));
		self
	}

	#[must_use]
	pub fn then_after(mut self, delay_ms: TimeMs, cue: Cue) -> Self {
		self.beats.push(Beat::after(delay_ms, cue));
		self
	}

	pub fn len(&self) -> usize {
		self.beats.len()
	}

	pub fn is_empty(&self) -> bool {
		self.beats.is_empty()
	}
}

/// The whole presentation: intro, content scenes and the closing summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
	pub intro: SceneScript,
	pub scenes: Vec<SceneScript>,
	pub summary: SceneScript,
	#[serde(default)]
	pub objectives: Vec<String>,
}

impl Scenario {
	pub fn script(&self, scene: SceneId) -> Option<&SceneScript> {
		match scene {
			SceneId::Intro => Some(&self.intro),
			SceneId::Content(i) => self.scenes.get(usize::from(i)),
			SceneId::Summary => Some(&self.summary),
		}
	}

	pub fn content_count(&self) -> usize {
		self.scenes.len()
	}

	pub fn from_json_str(json: &str) -> Result<Self> {
		let scenario: Self = serde_json::from_str(json)?;
		scenario.validate()?;
		Ok(scenario)
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let json = std::fs::read_to_string(path)?;
		Self::from_json_str(&json)
	}

	pub fn validate(&self) -> Result<()> {
		if self.scenes.is_empty() {
			return Err(ChoreoError::InvalidScenario("at least one content scene is required".to_string()));
		}
		if self.scenes.len() > usize::from(u8::MAX) {
			return Err(ChoreoError::InvalidScenario(format!("too many content scenes ({})", self.scenes.len())));
		}

		let mut seen = HashSet::new();
		for key in &self.objectives {
			if !seen.insert(key.as_str()) {
				return Err(ChoreoError::InvalidScenario(format!("objective '{key}' declared twice")));
			}
		}

		let scripts = std::iter::once((SceneId::Intro, &self.intro))
			.chain(self.scenes.iter().enumerate().map(|(i, s)| (SceneId::Content(i as u8), s)))
			.chain(std::iter::once((SceneId::Summary, &self.summary)));

		for (scene, script) in scripts {
			for (index, beat) in script.beats.iter().enumerate() {
				let fail = |reason: String| ChoreoError::InvalidScenario(format!("{scene}, beat {index}: {reason}"));

				if beat.delay_ms < 0 {
					return Err(fail(format!("negative delay {}ms", beat.delay_ms)));
				}
				match &beat.cue {
					Cue::CompleteObjective { key } if !seen.contains(key.as_str()) => {
						return Err(fail(format!("undeclared objective '{key}'")));
					}
					Cue::Advance if scene.is_terminal() => {
						return Err(fail("the summary cannot advance".to_string()));
					}
					Cue::Advance if index + 1 != script.beats.len() => {
						return Err(fail("advance must be the last beat".to_string()));
					}
					_ => {}
				}
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::builtin;

	#[test]
	fn builtin_scenario_is_valid() {
		let scenario = builtin::scenario();
		assert!(scenario.validate().is_ok());
		assert_eq!(scenario.content_count(), 3);
	}

	#[test]
	fn json_round_trip_keeps_scripts() {
		let scenario = builtin::scenario();
		let json = serde_json::to_string(&scenario).unwrap();
		let parsed = Scenario::from_json_str(&json).unwrap();
		assert_eq!(parsed, scenario);
	}

	#[test]
	fn beats_parse_from_flat_json() {
		let beat: Beat = serde_json::from_str(r#"{ "delayMs": 3000, "cue": "click", "control": "bad_choice" }"#).unwrap();
		assert_eq!(beat, Beat::after(3000, Cue::Click { control: ControlRef::BadChoice }));

		let beat: Beat = serde_json::from_str(r#"{ "cue": "set_clock", "target": "15:30:00", "label": "Carrier check" }"#).unwrap();
		assert_eq!(beat.delay_ms, 0);
		assert!(matches!(beat.cue, Cue::SetClock { start: None, .. }));
	}

	#[test]
	fn rejects_undeclared_objective() {
		let mut scenario = builtin::scenario();
		scenario.scenes[0].beats.insert(0, Beat::now(Cue::CompleteObjective { key: "nope".into() }));
		assert!(matches!(scenario.validate(), Err(ChoreoError::InvalidScenario(_))));
	}

	#[test]
	fn rejects_advance_from_summary_and_mid_script() {
		let mut scenario = builtin::scenario();
		scenario.summary.beats.push(Beat::now(Cue::Advance));
		assert!(scenario.validate().is_err());

		let mut scenario = builtin::scenario();
		scenario.scenes[1].beats.insert(0, Beat::now(Cue::Advance));
		assert!(scenario.validate().is_err());
	}

	#[test]
	fn rejects_empty_presentation() {
		let scenario = Scenario {
			intro: SceneScript::new("intro"),
			scenes: Vec::new(),
			summary: SceneScript::new("summary"),
			objectives: Vec::new(),
		};
		assert!(scenario.validate().is_err());
	}
}
