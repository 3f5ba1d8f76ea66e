use crate::core::{EntityKind, Point, TimeMs};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
	pub id: String,
	pub position: Point,
	/// How long the renderer should take to glide to `position`
	#[serde(default)]
	pub travel_ms: TimeMs,
	pub color: String,
	#[serde(default)]
	pub label: Option<String>,
	pub kind: EntityKind,
}

impl Entity {
	pub fn new(id: impl Into<String>, kind: EntityKind, position: Point, color: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			position,
			travel_ms: 0,
			color: color.into(),
			label: None,
			kind,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub const fn travelling(mut self, travel_ms: TimeMs) -> Self {
		self.travel_ms = travel_ms;
		self
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
	Inserted,
	Updated,
}

/// Entities on the stage map, merged by id. Insertion order is kept.
#[derive(Debug, Clone, Default)]
pub struct EntityMap {
	entities: SmallVec<[Entity; 8]>,
}

impl EntityMap {
	/// Insert a new id or update the known one in place
	pub(crate) fn merge(&mut self, entity: Entity) -> MergeOutcome {
		if let Some(existing) = self.entities.iter_mut().find(|e| e.id == entity.id) {
			*existing = entity;
			MergeOutcome::Updated
		} else {
			self.entities.push(entity);
			MergeOutcome::Inserted
		}
	}

	pub(crate) fn clear(&mut self) {
		self.entities.clear();
	}

	pub fn get(&self, id: &str) -> Option<&Entity> {
		self.entities.iter().find(|e| e.id == id)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Entity> {
		self.entities.iter()
	}

	pub fn len(&self) -> usize {
		self.entities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	pub fn to_vec(&self) -> Vec<Entity> {
		self.entities.to_vec()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn truck(id: &str, x: f32) -> Entity {
		Entity::new(id, EntityKind::Vehicle, Point::new(x, 0.0), "blue")
	}

	#[test]
	fn unseen_id_grows_by_one() {
		let mut map = EntityMap::default();
		assert_eq!(map.merge(truck("t1", 0.0)), MergeOutcome::Inserted);
		assert_eq!(map.merge(truck("t2", 0.0)), MergeOutcome::Inserted);
		assert_eq!(map.len(), 2);
	}

	#[test]
	fn known_id_moves_without_growing() {
		let mut map = EntityMap::default();
		map.merge(truck("t1", 0.0));
		map.merge(truck("t2", 5.0));

		let outcome = map.merge(truck("t1", 100.0).travelling(1200).with_label("Beauvais"));
		assert_eq!(outcome, MergeOutcome::Updated);
		assert_eq!(map.len(), 2);

		let moved = map.get("t1").unwrap();
		assert_eq!(moved.position, Point::new(100.0, 0.0));
		assert_eq!(moved.travel_ms, 1200);
		assert_eq!(moved.label.as_deref(), Some("Beauvais"));

		// Order of first insertion is stable
		let ids: Vec<_> = map.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, vec!["t1", "t2"]);
	}

	#[test]
	fn clear_empties_map() {
		let mut map = EntityMap::default();
		map.merge(truck("t1", 0.0));
		map.clear();
		assert!(map.is_empty());
	}
}
