use serde::{Deserialize, Serialize};

/// Running totals shown in the header and on the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
	pub avoided_loss: u64,
	pub realized_gain: u64,
}

impl Metrics {
	pub(crate) fn add(&mut self, avoided_loss: u64, realized_gain: u64) {
		self.avoided_loss = self.avoided_loss.saturating_add(avoided_loss);
		self.realized_gain = self.realized_gain.saturating_add(realized_gain);
	}

	pub(crate) fn reset_for_replay(&mut self) {
		*self = Self::default();
	}

	/// True if no total in `self` is below the one in `earlier`
	pub const fn dominates(&self, earlier: &Self) -> bool {
		self.avoided_loss >= earlier.avoided_loss && self.realized_gain >= earlier.realized_gain
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn additions_only_grow() {
		let mut metrics = Metrics::default();
		let before = metrics;
		metrics.add(180, 0);
		metrics.add(0, 90);
		assert!(metrics.dominates(&before));
		assert_eq!(metrics, Metrics { avoided_loss: 180, realized_gain: 90 });

		metrics.add(u64::MAX, 0);
		assert_eq!(metrics.avoided_loss, u64::MAX);

		metrics.reset_for_replay();
		assert_eq!(metrics, Metrics::default());
	}
}
