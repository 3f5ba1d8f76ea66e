use crate::core::{ChoreoError, Result};
use std::collections::BTreeMap;

/// Fixed set of named flags, each settable once per playthrough
#[derive(Debug, Clone, Default)]
pub struct Objectives {
	flags: BTreeMap<String, bool>,
}

impl Objectives {
	pub fn new<I, S>(keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			flags: keys.into_iter().map(|k| (k.into(), false)).collect(),
		}
	}

	/// Set `key`; returns true if it was newly completed
	pub(crate) fn complete(&mut self, key: &str) -> Result<bool> {
		let flag = self.flags.get_mut(key).ok_or_else(|| ChoreoError::UnknownObjective(key.to_string()))?;
		let newly = !*flag;
		*flag = true;
		Ok(newly)
	}

	pub fn is_complete(&self, key: &str) -> bool {
		self.flags.get(key).copied().unwrap_or(false)
	}

	pub fn completed_count(&self) -> usize {
		self.flags.values().filter(|done| **done).count()
	}

	pub fn as_map(&self) -> &BTreeMap<String, bool> {
		&self.flags
	}

	pub(crate) fn reset_for_replay(&mut self) {
		self.flags.values_mut().for_each(|done| *done = false);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn completion_is_monotonic() {
		let mut objectives = Objectives::new(["consolidate", "reassure"]);
		assert!(objectives.complete("consolidate").unwrap());
		assert!(!objectives.complete("consolidate").unwrap());
		assert!(objectives.is_complete("consolidate"));
		assert_eq!(objectives.completed_count(), 1);
	}

	#[test]
	fn unknown_key_is_rejected() {
		let mut objectives = Objectives::new(["consolidate"]);
		assert!(matches!(objectives.complete("teleport"), Err(ChoreoError::UnknownObjective(_))));
		assert_eq!(objectives.as_map().len(), 1);
	}

	#[test]
	fn replay_clears_flags_but_keeps_keys() {
		let mut objectives = Objectives::new(["a", "b"]);
		objectives.complete("a").unwrap();
		objectives.reset_for_replay();
		assert_eq!(objectives.completed_count(), 0);
		assert_eq!(objectives.as_map().len(), 2);
	}
}
