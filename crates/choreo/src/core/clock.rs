//! Simulated time-of-day shown alongside the presentation.
//!
//! The clock moves on the runtime's fixed tick, compressed by the configured
//! rate and the playback speed, and never runs past the target set by the
//! current scene.

use super::{Speed, TimeMs};
use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct VirtualClock {
	now: NaiveTime,
	target: NaiveTime,
	label: String,
	/// Simulated milliseconds per real millisecond at x1
	rate: i64,
}

impl VirtualClock {
	pub fn new(start: NaiveTime, rate: i64) -> Self {
		Self {
			now: start,
			target: start,
			label: String::new(),
			rate: rate.max(0),
		}
	}

	/// Move forward by one real tick, clamped to the target
	pub fn advance(&mut self, real_tick_ms: TimeMs, speed: Speed) {
		if real_tick_ms <= 0 {
			return;
		}

		let remaining = self.remaining();
		if remaining <= Duration::zero() {
			return;
		}

		let step = Duration::milliseconds(real_tick_ms.saturating_mul(i64::from(speed.multiplier())).saturating_mul(self.rate));
		if step >= remaining {
			self.now = self.target;
		} else {
			self.now += step;
		}
	}

	pub fn set_target(&mut self, target: NaiveTime, label: impl Into<String>) {
		self.target = target;
		self.label = label.into();
	}

	/// Jump the displayed time, e.g. when a scene opens at a different hour
	pub fn reset_to(&mut self, now: NaiveTime) {
		self.now = now;
	}

	pub const fn current_time(&self) -> NaiveTime {
		self.now
	}

	pub const fn target(&self) -> NaiveTime {
		self.target
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	/// Time left until the target, never negative
	pub fn remaining(&self) -> Duration {
		self.target.signed_duration_since(self.now).max(Duration::zero())
	}

	/// `HH:MM` rendering of the current time
	pub fn display(&self) -> String {
		format_hm(self.now)
	}

	pub fn reading(&self) -> ClockReading {
		ClockReading {
			time: self.display(),
			target: format_hm(self.target),
			remaining_minutes: self.remaining().num_minutes(),
			label: self.label.clone(),
		}
	}
}

fn format_hm(time: NaiveTime) -> String {
	format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Renderer-facing view of the clock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockReading {
	pub time: String,
	pub target: String,
	pub remaining_minutes: i64,
	pub label: String,
}
