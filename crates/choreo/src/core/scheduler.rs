use super::{Epoch, Speed, TimeMs};
use std::collections::BTreeMap;
use tracing::trace;

/// Identifies one pending action. Ordering key is (due time, issue order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionHandle {
	due_at: TimeMs,
	seq: u64,
}

impl ActionHandle {
	pub const fn due_at(&self) -> TimeMs {
		self.due_at
	}
}

/// An action handed back to the caller once it is due and still live
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAction<A> {
	pub handle: ActionHandle,
	pub due_at: TimeMs,
	pub epoch: Epoch,
	pub action: A,
}

#[derive(Debug)]
struct Pending<A> {
	epoch: Epoch,
	action: A,
}

/// Owns every delayed action of the presentation.
///
/// Delays are divided by the speed factor in force when `schedule` is
/// called; later speed changes leave issued actions untouched. Cancellation
/// is cooperative: `cancel_epoch` only raises a floor, and actions under the
/// floor are discarded when they come due instead of being delivered.
#[derive(Debug)]
pub struct Scheduler<A> {
	pending: BTreeMap<ActionHandle, Pending<A>>,
	next_seq: u64,
	now: TimeMs,
	speed: Speed,
	cancelled_through: Option<Epoch>,
	neutered: u64,
}

impl<A> Scheduler<A> {
	pub const fn new(speed: Speed) -> Self {
		Self {
			pending: BTreeMap::new(),
			next_seq: 0,
			now: 0,
			speed,
			cancelled_through: None,
			neutered: 0,
		}
	}

	pub fn schedule(&mut self, delay: TimeMs, action: A, epoch: Epoch) -> ActionHandle {
		let handle = ActionHandle {
			due_at: self.now + self.speed.scale(delay),
			seq: self.next_seq,
		};
		self.next_seq += 1;
		self.pending.insert(handle, Pending { epoch, action });
		handle
	}

	/// Invalidate every action tagged with `epoch` or earlier
	pub fn cancel_epoch(&mut self, epoch: Epoch) {
		self.cancelled_through = Some(self.cancelled_through.map_or(epoch, |floor| floor.max(epoch)));
	}

	/// Drop a single pending action. Returns false if it already fired or was unknown.
	pub fn cancel(&mut self, handle: ActionHandle) -> bool {
		self.pending.remove(&handle).is_some()
	}

	pub fn is_live(&self, epoch: Epoch) -> bool {
		self.cancelled_through.map_or(true, |floor| epoch > floor)
	}

	/// Next live action due at or before `until`, in due order.
	///
	/// Moves the scheduler's clock to the action's due time so that anything
	/// scheduled while handling it is timed from its firing, not from `until`.
	pub fn pop_due(&mut self, until: TimeMs) -> Option<ScheduledAction<A>> {
		while let Some(entry) = self.pending.first_entry() {
			let handle = *entry.key();
			if handle.due_at > until {
				return None;
			}

			let pending = entry.remove();
			self.now = self.now.max(handle.due_at);

			if !self.is_live(pending.epoch) {
				self.neutered += 1;
				trace!(epoch = %pending.epoch, due_at = handle.due_at, "Discarding stale action");
				continue;
			}

			return Some(ScheduledAction {
				handle,
				due_at: handle.due_at,
				epoch: pending.epoch,
				action: pending.action,
			});
		}

		None
	}

	/// Record that real time has reached `now` once nothing more is due
	pub fn settle(&mut self, now: TimeMs) {
		self.now = self.now.max(now);
	}

	pub const fn now(&self) -> TimeMs {
		self.now
	}

	pub const fn speed(&self) -> Speed {
		self.speed
	}

	/// Affects only actions scheduled after this call
	pub fn set_speed(&mut self, speed: Speed) {
		self.speed = speed;
	}

	pub fn next_due(&self) -> Option<TimeMs> {
		self.pending.keys().next().map(ActionHandle::due_at)
	}

	/// Pending actions, including cancelled ones not yet discarded
	pub fn pending_len(&self) -> usize {
		self.pending.len()
	}

	pub fn live_len(&self) -> usize {
		self.pending.values().filter(|p| self.is_live(p.epoch)).count()
	}

	/// Number of stale actions discarded at fire time so far
	pub const fn neutered(&self) -> u64 {
		self.neutered
	}
}
