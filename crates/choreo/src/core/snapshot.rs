use super::{ChatView, ClockReading, ControlRef, Entity, Epoch, LogEntry, Metrics, OverlayView, PlaybackState, PointerState, SceneId, StepIndex, TimeMs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only picture of every channel, handed to renderers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
	pub scene: SceneId,
	pub scene_title: String,
	pub step: StepIndex,
	pub epoch: Epoch,
	/// Engine time in milliseconds, pauses excluded
	pub now: TimeMs,
	pub revision: u64,
	pub clock: ClockReading,
	pub pointer: PointerState,
	pub overlay: Option<OverlayView>,
	pub entities: Vec<Entity>,
	pub chat: ChatView,
	pub log: Vec<LogEntry>,
	pub objectives: BTreeMap<String, bool>,
	pub metrics: Metrics,
	pub playback: PlaybackState,
	/// Control the viewer could press at this point of the scene
	pub enabled_control: Option<ControlRef>,
}

impl Snapshot {
	pub fn is_finished(&self) -> bool {
		self.scene.is_terminal()
	}

	/// Net impact shown on the summary card
	pub const fn total_impact(&self) -> u64 {
		self.metrics.avoided_loss.saturating_add(self.metrics.realized_gain)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_camel_case_for_renderers() {
		let snapshot = Snapshot {
			scene: SceneId::Content(1),
			enabled_control: Some(ControlRef::GoodChoice),
			metrics: Metrics {
				avoided_loss: 2000,
				realized_gain: 500,
			},
			..Snapshot::default()
		};

		let json = serde_json::to_value(&snapshot).unwrap();
		assert_eq!(json["scene"]["kind"], "content");
		assert_eq!(json["scene"]["index"], 1);
		assert_eq!(json["enabledControl"], "good_choice");
		assert_eq!(json["metrics"]["avoidedLoss"], 2000);
		assert_eq!(snapshot.total_impact(), 2500);
	}
}
