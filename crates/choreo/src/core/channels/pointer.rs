use crate::core::{ControlRef, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerState {
	pub position: Point,
	pub pressed: bool,
	pub target: Option<ControlRef>,
}

/// Simulated pointer. Only the engine's move/click primitive writes here.
#[derive(Debug, Clone, Default)]
pub struct PointerChannel {
	state: PointerState,
}

impl PointerChannel {
	pub const fn new(rest: Point) -> Self {
		Self {
			state: PointerState {
				position: rest,
				pressed: false,
				target: None,
			},
		}
	}

	pub const fn state(&self) -> PointerState {
		self.state
	}

	pub(crate) fn move_to(&mut self, control: ControlRef, position: Point) {
		self.state.position = position;
		self.state.target = Some(control);
		self.state.pressed = false;
	}

	pub(crate) fn press(&mut self) {
		self.state.pressed = true;
	}

	pub(crate) fn release(&mut self) {
		self.state.pressed = false;
	}

	/// Forget the current target; the pointer stays where it is
	pub(crate) fn clear_target(&mut self) {
		self.state.target = None;
		self.state.pressed = false;
	}
}
