use super::{ControlRef, Point, Speed, TimeMs};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where each control sits on screen, as laid out by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlLayout {
	pub rest: Point,
	pub start: Point,
	pub bad_choice: Point,
	pub good_choice: Point,
	pub replay: Point,
}

impl ControlLayout {
	pub const fn position(&self, control: ControlRef) -> Point {
		match control {
			ControlRef::Start => self.start,
			ControlRef::BadChoice => self.bad_choice,
			ControlRef::GoodChoice => self.good_choice,
			ControlRef::Replay => self.replay,
		}
	}
}

impl Default for ControlLayout {
	fn default() -> Self {
		Self {
			rest: Point::new(960.0, 540.0),
			start: Point::new(960.0, 620.0),
			bad_choice: Point::new(790.0, 760.0),
			good_choice: Point::new(1130.0, 760.0),
			replay: Point::new(960.0, 820.0),
		}
	}
}

/// Engine timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
	pub tick_interval_ms: u64,
	pub pointer_travel_ms: TimeMs,
	pub pointer_press_ms: TimeMs,
	pub overlay_focus_ms: TimeMs,
	pub keystroke_ms: TimeMs,
	/// Simulated milliseconds per real millisecond at x1
	pub clock_rate: i64,
	pub speed: Speed,
	pub muted: bool,
	pub controls: ControlLayout,
}

impl EngineConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub const fn with_tick_interval(mut self, ms: u64) -> Self {
		self.tick_interval_ms = ms;
		self
	}

	pub const fn with_pointer_timing(mut self, travel_ms: TimeMs, press_ms: TimeMs) -> Self {
		self.pointer_travel_ms = travel_ms;
		self.pointer_press_ms = press_ms;
		self
	}

	pub const fn with_overlay_focus(mut self, ms: TimeMs) -> Self {
		self.overlay_focus_ms = ms;
		self
	}

	pub const fn with_keystroke(mut self, ms: TimeMs) -> Self {
		self.keystroke_ms = ms;
		self
	}

	pub const fn with_clock_rate(mut self, rate: i64) -> Self {
		self.clock_rate = rate;
		self
	}

	pub const fn with_speed(mut self, speed: Speed) -> Self {
		self.speed = speed;
		self
	}

	pub const fn with_muted(mut self, muted: bool) -> Self {
		self.muted = muted;
		self
	}

	pub const fn with_controls(mut self, controls: ControlLayout) -> Self {
		self.controls = controls;
		self
	}

	pub const fn tick_interval(&self) -> Duration {
		Duration::from_millis(self.tick_interval_ms)
	}

	pub fn validate(&self) -> Result<(), String> {
		if self.tick_interval_ms == 0 {
			return Err("tick interval must be at least 1ms".to_string());
		}
		let timings = [
			("pointer travel", self.pointer_travel_ms),
			("pointer press", self.pointer_press_ms),
			("overlay focus", self.overlay_focus_ms),
			("keystroke", self.keystroke_ms),
		];
		for (name, value) in timings {
			if value < 0 {
				return Err(format!("{name} duration cannot be negative ({value}ms)"));
			}
		}
		if self.clock_rate < 0 {
			return Err(format!("clock rate cannot be negative ({})", self.clock_rate));
		}
		Ok(())
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			tick_interval_ms: 100,
			pointer_travel_ms: 800,
			pointer_press_ms: 300,
			overlay_focus_ms: 2500,
			keystroke_ms: 35,
			clock_rate: 60,
			speed: Speed::X1,
			muted: false,
			controls: ControlLayout::default(),
		}
	}
}
