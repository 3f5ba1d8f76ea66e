use crate::core::Polarity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
	pub timestamp: String,
	pub text: String,
	pub polarity: Polarity,
	pub impact_label: String,
	pub flagged: bool,
}

/// Running audit trail of the playthrough. Only a replay empties it.
#[derive(Debug, Clone, Default)]
pub struct LogChannel {
	entries: Vec<LogEntry>,
}

impl LogChannel {
	pub(crate) fn append(&mut self, entry: LogEntry) {
		self.entries.push(entry);
	}

	pub fn entries(&self) -> &[LogEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub(crate) fn reset_for_replay(&mut self) {
		self.entries.clear();
	}
}
