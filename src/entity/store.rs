//! Scene-owned entity table

use rustc_hash::FxHashMap;

use super::{Entity, EntityId};

/// Entities of one scene, in insertion order, keyed by name and by id
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    by_name: FxHashMap<String, usize>,
    by_id: FxHashMap<EntityId, usize>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, replacing any entity with the same name
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        if let Some(&slot) = self.by_name.get(&entity.name) {
            let old = std::mem::replace(&mut self.entities[slot], entity);
            log::debug!("Replacing entity '{}'", old.name);
            self.by_id.remove(&old.id());
            self.by_id.insert(id, slot);
        } else {
            let slot = self.entities.len();
            self.by_name.insert(entity.name.clone(), slot);
            self.by_id.insert(id, slot);
            self.entities.push(entity);
        }
        id
    }

    /// Get an entity by name
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|&slot| &self.entities[slot])
    }

    /// Get an entity by name (mutable)
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.by_name.get(name).map(|&slot| &mut self.entities[slot])
    }

    /// Get an entity by handle
    pub fn by_id(&self, id: EntityId) -> Option<&Entity> {
        self.by_id.get(&id).map(|&slot| &self.entities[slot])
    }

    /// Get an entity by handle (mutable)
    pub fn by_id_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.by_id.get(&id).map(|&slot| &mut self.entities[slot])
    }

    /// Slot index of a handle
    pub fn slot_of(&self, id: EntityId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Entity at a slot index
    pub fn at(&self, slot: usize) -> Option<&Entity> {
        self.entities.get(slot)
    }

    /// Entity at a slot index (mutable)
    pub fn at_mut(&mut self, slot: usize) -> Option<&mut Entity> {
        self.entities.get_mut(slot)
    }

    /// Mutable access to two distinct slots at once
    ///
    /// # Panics
    ///
    /// Panics if `a == b` or either slot is out of range
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Entity, &mut Entity) {
        assert_ne!(a, b, "pair_mut needs two distinct slots");
        if a < b {
            let (left, right) = self.entities.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.entities.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Remove every inactive entity, returning their handles
    pub fn sweep_inactive(&mut self) -> Vec<EntityId> {
        if self.entities.iter().all(|e| e.active) {
            return Vec::new();
        }
        let mut removed = Vec::new();
        self.entities.retain(|e| {
            if !e.active {
                removed.push(e.id());
            }
            e.active
        });
        self.reindex();
        removed
    }

    /// Remove an entity by name
    pub fn remove(&mut self, name: &str) -> Option<Entity> {
        let slot = self.by_name.get(name).copied()?;
        let entity = self.entities.remove(slot);
        self.reindex();
        Some(entity)
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        self.by_id.clear();
        for (slot, entity) in self.entities.iter().enumerate() {
            self.by_name.insert(entity.name.clone(), slot);
            self.by_id.insert(entity.id(), slot);
        }
    }

    /// Remove all entities
    pub fn clear(&mut self) {
        self.entities.clear();
        self.by_name.clear();
        self.by_id.clear();
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut store = EntityStore::new();
        let id = store.insert(Entity::new("player"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("player").map(Entity::id), Some(id));
        assert_eq!(store.by_id(id).map(|e| e.name.as_str()), Some("player"));
    }

    #[test]
    fn test_same_name_replaces() {
        let mut store = EntityStore::new();
        let first = store.insert(Entity::new("coin"));
        let second = store.insert(Entity::new("coin"));

        assert_eq!(store.len(), 1);
        assert!(store.by_id(first).is_none());
        assert!(store.by_id(second).is_some());
    }

    #[test]
    fn test_sweep_inactive_reindexes() {
        let mut store = EntityStore::new();
        store.insert(Entity::new("a"));
        let b = store.insert(Entity::new("b"));
        let c = store.insert(Entity::new("c"));

        store.get_mut("a").unwrap().active = false;
        let removed = store.sweep_inactive();

        assert_eq!(removed.len(), 1);
        assert!(store.get("a").is_none());
        assert_eq!(store.slot_of(b), Some(0));
        assert_eq!(store.slot_of(c), Some(1));
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut store = EntityStore::new();
        store.insert(Entity::new("a"));
        store.insert(Entity::new("b"));

        let (b, a) = store.pair_mut(1, 0);
        assert_eq!(a.name, "a");
        assert_eq!(b.name, "b");
        a.mass = 5.0;
        b.mass = 7.0;

        assert_eq!(store.get("a").unwrap().mass, 5.0);
        assert_eq!(store.get("b").unwrap().mass, 7.0);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = EntityStore::new();
        store.insert(Entity::new("a"));
        store.insert(Entity::new("b"));

        assert!(store.remove("a").is_some());
        assert!(store.get("b").is_some());
        assert_eq!(store.slot_of(store.get("b").unwrap().id()), Some(0));

        store.clear();
        assert!(store.is_empty());
    }
}
