use choreo::core::{LogEntry, Polarity, Snapshot};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Human-readable lines for what changed between two snapshots
pub fn describe_changes(previous: Option<&Snapshot>, next: &Snapshot) -> Vec<String> {
	let empty = Snapshot::default();
	let before = previous.unwrap_or(&empty);
	let mut lines = Vec::new();

	let new_scene = previous.map_or(true, |p| p.scene != next.scene || p.epoch != next.epoch);
	if new_scene {
		lines.push(format!("🎬 {} \"{}\" (epoch {})", next.scene, next.scene_title, next.epoch));
	}

	// Scene-local channels restart empty on entry; log, metrics and objectives carry over
	let stage = if new_scene { &empty } else { before };

	if !new_scene && stage.step != next.step {
		lines.push(format!("↪ step {}", next.step));
	}
	if !next.clock.label.is_empty() && (stage.clock.target != next.clock.target || stage.clock.label != next.clock.label) {
		lines.push(format!("🕒 {} -> {} {}", next.clock.time, next.clock.target, next.clock.label));
	}
	if next.pointer.pressed && !stage.pointer.pressed {
		if let Some(target) = next.pointer.target {
			lines.push(format!("🖱 click {target:?}"));
		}
	}

	describe_channels(stage, next, &mut lines);
	describe_log(&before.log, next, &mut lines);

	if before.metrics != next.metrics {
		lines.push(format!("📊 impact {} € avoided / {} € gained", next.metrics.avoided_loss, next.metrics.realized_gain));
	}
	for (key, done) in &next.objectives {
		if *done && !before.objectives.get(key).copied().unwrap_or(false) {
			lines.push(format!("✅ objective {key}"));
		}
	}
	if before.playback != next.playback {
		let p = &next.playback;
		lines.push(format!("⏯ speed {} muted {} paused {}", p.speed, p.muted, p.paused));
	}

	lines
}

fn describe_channels(previous: &Snapshot, next: &Snapshot, lines: &mut Vec<String>) {
	match (&previous.overlay, &next.overlay) {
		(_, Some(view)) if previous.overlay.as_ref().map(|v| &v.overlay) != Some(&view.overlay) => {
			let mark = match view.overlay.polarity {
				Polarity::Adverse => "⚠",
				Polarity::Favorable => "★",
			};
			lines.push(format!("{mark} {}: {}", view.overlay.title, view.overlay.body));
		}
		(Some(_), None) => lines.push("  card dismissed".to_string()),
		_ => {}
	}

	for entity in &next.entities {
		match previous.entities.iter().find(|e| e.id == entity.id) {
			None => lines.push(format!("🚚 {} appears at ({:.0}, {:.0})", entity.id, entity.position.x, entity.position.y)),
			Some(before) if before.position != entity.position => {
				lines.push(format!("🚚 {} moves to ({:.0}, {:.0}) in {}ms", entity.id, entity.position.x, entity.position.y, entity.travel_ms));
			}
			Some(_) => {}
		}
	}

	if next.chat.title.is_some() && previous.chat.title != next.chat.title {
		lines.push(format!("💬 chat opened: {}", next.chat.title.as_deref().unwrap_or_default()));
	}
	let known = if previous.chat.title == next.chat.title { previous.chat.messages.len() } else { 0 };
	for message in next.chat.messages.iter().skip(known) {
		lines.push(format!("💬 [{}] {}: {}", message.timestamp, message.author, message.text));
	}
}

fn describe_log(previous: &[LogEntry], next: &Snapshot, lines: &mut Vec<String>) {
	let known = if next.log.len() >= previous.len() { previous.len() } else { 0 };
	for entry in next.log.iter().skip(known) {
		let flag = if entry.flagged { "!" } else { " " };
		lines.push(format!("📝{flag}[{}] {} ({})", entry.timestamp, entry.text, entry.impact_label));
	}
}

/// Turns the snapshot stream into log lines, and JSON lines when asked
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
	previous: Option<Snapshot>,
	json: bool,
}

impl SnapshotRenderer {
	pub const fn new(json: bool) -> Self {
		Self { previous: None, json }
	}

	pub fn render(&mut self, snapshot: &Snapshot) -> usize {
		let lines = describe_changes(self.previous.as_ref(), snapshot);
		for line in &lines {
			info!(target: "cinema::stage", "{line}");
		}
		if self.json {
			match serde_json::to_string(snapshot) {
				Ok(json) => println!("{json}"),
				Err(e) => warn!(error = %e, "Failed to serialize snapshot"),
			}
		}
		self.previous = Some(snapshot.clone());
		lines.len()
	}
}

pub fn spawn_renderer(mut state_rx: watch::Receiver<Snapshot>, json: bool, cancel: CancellationToken) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut renderer = SnapshotRenderer::new(json);
		let first = state_rx.borrow_and_update().clone();
		renderer.render(&first);

		loop {
			tokio::select! {
				_ = cancel.cancelled() => {
					info!("Renderer cancelled");
					break;
				}
				result = state_rx.changed() => {
					if result.is_err() {
						info!("Snapshot stream closed");
						break;
					}
					let snapshot = state_rx.borrow_and_update().clone();
					renderer.render(&snapshot);
				}
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use choreo::core::{builtin, EngineConfig, ScenarioEngine, SceneId};

	fn engine() -> ScenarioEngine {
		let mut engine = ScenarioEngine::new(builtin::scenario(), EngineConfig::default()).unwrap();
		engine.boot().unwrap();
		engine
	}

	#[test]
	fn first_frame_names_the_scene() {
		let snapshot = engine().snapshot();
		let lines = describe_changes(None, &snapshot);
		assert!(lines[0].contains("intro"));
	}

	#[test]
	fn scene_entry_lists_seeded_map_and_card() {
		let mut engine = engine();
		let before = engine.snapshot();
		engine.start().unwrap();
		engine.advance(0);
		let after = engine.snapshot();
		assert_eq!(after.scene, SceneId::Content(0));

		let lines = describe_changes(Some(&before), &after);
		assert!(lines[0].contains("scene 1"));
		assert!(lines.iter().any(|l| l.contains("THE PROBLEM")));
		assert_eq!(lines.iter().filter(|l| l.contains("appears")).count(), 4);
	}

	#[test]
	fn no_changes_no_lines() {
		let snapshot = engine().snapshot();
		assert!(describe_changes(Some(&snapshot), &snapshot).is_empty());
	}

	#[test]
	fn new_log_entries_and_metrics_are_reported() {
		let mut engine = engine();
		engine.start().unwrap();
		engine.advance(3000);
		let before = engine.snapshot();
		// Bad choice lands after the pointer travels and presses
		engine.advance(4100);
		let after = engine.snapshot();

		let lines = describe_changes(Some(&before), &after);
		assert!(lines.iter().any(|l| l.contains("Two separate orders")));
		assert!(lines.iter().any(|l| l.contains("180 € avoided")));
		assert!(lines.iter().any(|l| l.contains("DOUBLE BILLING")));
	}

	#[test]
	fn renderer_remembers_previous_frame() {
		let snapshot = engine().snapshot();
		let mut renderer = SnapshotRenderer::new(false);
		assert!(renderer.render(&snapshot) > 0);
		assert_eq!(renderer.render(&snapshot), 0);
	}
}
