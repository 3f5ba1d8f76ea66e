use crate::core::Polarity;
use serde::{Deserialize, Serialize};

/// Flash card shown over the stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
	pub title: String,
	pub body: String,
	#[serde(default)]
	pub why: String,
	#[serde(default)]
	pub impact_label: String,
	pub polarity: Polarity,
}

impl Overlay {
	pub fn new(title: impl Into<String>, body: impl Into<String>, polarity: Polarity) -> Self {
		Self {
			title: title.into(),
			body: body.into(),
			why: String::new(),
			impact_label: String::new(),
			polarity,
		}
	}

	pub fn with_why(mut self, why: impl Into<String>) -> Self {
		self.why = why.into();
		self
	}

	pub fn with_impact(mut self, impact_label: impl Into<String>) -> Self {
		self.impact_label = impact_label.into();
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView {
	pub overlay: Overlay,
	pub focused: bool,
}

/// At most one overlay at a time. Each `show` gets a fresh serial so a
/// blur aimed at an earlier card cannot touch a later one.
#[derive(Debug, Clone, Default)]
pub struct OverlayChannel {
	current: Option<Overlay>,
	focused: bool,
	serial: u64,
}

impl OverlayChannel {
	pub fn current(&self) -> Option<&Overlay> {
		self.current.as_ref()
	}

	pub const fn is_focused(&self) -> bool {
		self.current.is_some() && self.focused
	}

	pub fn view(&self) -> Option<OverlayView> {
		self.current.clone().map(|overlay| OverlayView { overlay, focused: self.focused })
	}

	pub(crate) fn show(&mut self, overlay: Overlay) -> u64 {
		self.serial += 1;
		self.current = Some(overlay);
		self.focused = true;
		self.serial
	}

	/// End the focus window of overlay `serial`; false if it is no longer shown
	pub(crate) fn blur(&mut self, serial: u64) -> bool {
		if self.current.is_none() || serial != self.serial {
			return false;
		}
		self.focused = false;
		true
	}

	pub(crate) fn dismiss(&mut self) {
		self.current = None;
		self.focused = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn show_replaces_previous() {
		let mut channel = OverlayChannel::default();
		channel.show(Overlay::new("The problem", "Two trucks", Polarity::Adverse));
		channel.show(Overlay::new("The fix", "One truck", Polarity::Favorable));

		assert_eq!(channel.current().map(|o| o.title.as_str()), Some("The fix"));
		assert!(channel.is_focused());
	}

	#[test]
	fn stale_blur_is_ignored() {
		let mut channel = OverlayChannel::default();
		let first = channel.show(Overlay::new("first", "", Polarity::Adverse));
		let second = channel.show(Overlay::new("second", "", Polarity::Favorable));

		assert!(!channel.blur(first));
		assert!(channel.is_focused());

		assert!(channel.blur(second));
		assert!(!channel.is_focused());
		assert!(channel.current().is_some());
	}

	#[test]
	fn blur_after_dismiss_is_ignored() {
		let mut channel = OverlayChannel::default();
		let serial = channel.show(Overlay::new("card", "", Polarity::Adverse));
		channel.dismiss();

		assert!(!channel.blur(serial));
		assert!(channel.view().is_none());
	}
}
