//! Revision storage collaborator and an in-memory implementation.

use crate::error::StoreError;
use crate::overview::EntityContext;
use revdiff_types::{EntityId, Revision, RevisionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::error;

/// Read access to an entity's revision history.
pub trait RevisionStore: Send + Sync {
    /// One page of revision ids for `entity_id`, newest first.
    fn list_revision_ids(
        &self,
        entity_id: &EntityId,
        limit: usize,
        page: usize,
    ) -> Result<Vec<RevisionId>, StoreError>;

    /// Loads a revision. `None` when it no longer exists.
    fn load_revision(&self, id: RevisionId) -> Option<Revision>;

    fn current_revision_id(&self, entity_id: &EntityId) -> Result<RevisionId, StoreError>;
}

#[derive(Debug, Clone, Default)]
struct EntityHistory {
    current: Option<RevisionId>,
    /// Every id ever listed for the entity, including deleted ones.
    ids: Vec<RevisionId>,
}

/// In-memory revision store. Revisions can be deleted while their id stays
/// listed, which is what a concurrent delete looks like to a reader.
#[derive(Debug, Default)]
pub struct MemoryRevisionStore {
    entities: RwLock<HashMap<EntityId, EntityHistory>>,
    revisions: RwLock<HashMap<RevisionId, Revision>>,
}

impl MemoryRevisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds revisions to an entity's history. `current` defaults to the
    /// newest revision.
    pub fn insert_entity(
        &self,
        entity_id: EntityId,
        revisions: Vec<Revision>,
        current: Option<RevisionId>,
    ) -> Result<(), StoreError> {
        let mut entities = self.entities.write().map_err(lock_error)?;
        let mut stored = self.revisions.write().map_err(lock_error)?;

        let history = entities.entry(entity_id).or_default();
        for revision in revisions {
            if !history.ids.contains(&revision.id) {
                history.ids.push(revision.id);
            }
            stored.insert(revision.id, revision);
        }
        history.ids.sort_unstable_by(|a, b| b.cmp(a));
        history.current = current.or_else(|| history.ids.first().copied());
        Ok(())
    }

    /// Removes the revision body but keeps its id listed.
    pub fn delete_revision(&self, id: RevisionId) -> Result<Option<Revision>, StoreError> {
        let mut stored = self.revisions.write().map_err(lock_error)?;
        Ok(stored.remove(&id))
    }

    pub fn set_current(&self, entity_id: &EntityId, id: RevisionId) -> Result<(), StoreError> {
        let mut entities = self.entities.write().map_err(lock_error)?;
        let history = entities
            .get_mut(entity_id)
            .ok_or_else(|| StoreError::EntityNotFound(entity_id.clone()))?;
        history.current = Some(id);
        Ok(())
    }
}

fn lock_error<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("revision store lock poisoned".to_string())
}

impl RevisionStore for MemoryRevisionStore {
    fn list_revision_ids(
        &self,
        entity_id: &EntityId,
        limit: usize,
        page: usize,
    ) -> Result<Vec<RevisionId>, StoreError> {
        let entities = self.entities.read().map_err(lock_error)?;
        let history = entities
            .get(entity_id)
            .ok_or_else(|| StoreError::EntityNotFound(entity_id.clone()))?;
        Ok(history
            .ids
            .iter()
            .skip(limit.saturating_mul(page))
            .take(limit)
            .copied()
            .collect())
    }

    fn load_revision(&self, id: RevisionId) -> Option<Revision> {
        match self.revisions.read() {
            Ok(revisions) => revisions.get(&id).cloned(),
            Err(_) => {
                error!(revision_id = %id, "Revision store lock poisoned, revision treated as missing");
                None
            }
        }
    }

    fn current_revision_id(&self, entity_id: &EntityId) -> Result<RevisionId, StoreError> {
        let entities = self.entities.read().map_err(lock_error)?;
        let history = entities
            .get(entity_id)
            .ok_or_else(|| StoreError::EntityNotFound(entity_id.clone()))?;
        history
            .current
            .ok_or_else(|| StoreError::NoRevisions(entity_id.clone()))
    }
}

/// One entity in a JSON fixture: its context, current revision and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureEntity {
    #[serde(flatten)]
    pub context: EntityContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_revision: Option<RevisionId>,
    pub revisions: Vec<Revision>,
    /// Ids listed in the history whose body is gone.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<RevisionId>,
}

/// JSON fixture describing a set of entities and their revisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevisionFixture {
    pub entities: Vec<FixtureEntity>,
}

impl RevisionFixture {
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn entity(&self, entity_id: &EntityId) -> Option<&EntityContext> {
        self.entities
            .iter()
            .map(|e| &e.context)
            .find(|context| &context.id == entity_id)
    }

    /// Loads every entity into a fresh in-memory store.
    pub fn to_store(&self) -> Result<MemoryRevisionStore, StoreError> {
        let store = MemoryRevisionStore::new();
        for entity in &self.entities {
            store.insert_entity(
                entity.context.id.clone(),
                entity.revisions.clone(),
                entity.current_revision,
            )?;
            for id in &entity.deleted {
                store.delete_revision(*id)?;
            }
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<RevisionId> {
        raw.iter().copied().map(RevisionId::new).collect()
    }

    fn seeded() -> (MemoryRevisionStore, EntityId) {
        let store = MemoryRevisionStore::new();
        let entity = EntityId::new("node-1");
        let revisions = [3, 1, 5, 4, 2]
            .into_iter()
            .map(|id| Revision::new(id, id as i64 * 1000, "editor"))
            .collect();
        store.insert_entity(entity.clone(), revisions, None).unwrap();
        (store, entity)
    }

    #[test]
    fn lists_newest_first_and_pages() {
        let (store, entity) = seeded();
        assert_eq!(store.list_revision_ids(&entity, 2, 0).unwrap(), ids(&[5, 4]));
        assert_eq!(store.list_revision_ids(&entity, 2, 1).unwrap(), ids(&[3, 2]));
        assert_eq!(store.list_revision_ids(&entity, 2, 2).unwrap(), ids(&[1]));
        assert!(store.list_revision_ids(&entity, 2, 3).unwrap().is_empty());
    }

    #[test]
    fn current_defaults_to_newest() {
        let (store, entity) = seeded();
        assert_eq!(store.current_revision_id(&entity).unwrap(), RevisionId::new(5));

        store.set_current(&entity, RevisionId::new(3)).unwrap();
        assert_eq!(store.current_revision_id(&entity).unwrap(), RevisionId::new(3));
    }

    #[test]
    fn deleted_revision_stays_listed() {
        let (store, entity) = seeded();
        assert!(store.delete_revision(RevisionId::new(4)).unwrap().is_some());

        assert!(store.load_revision(RevisionId::new(4)).is_none());
        assert_eq!(store.list_revision_ids(&entity, 10, 0).unwrap(), ids(&[5, 4, 3, 2, 1]));
    }

    #[test]
    fn poisoned_store_reports_backend_error() {
        let (store, entity) = seeded();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.revisions.write().unwrap();
            panic!("writer died");
        }));
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.entities.write().unwrap();
            panic!("writer died");
        }));

        assert!(store.load_revision(RevisionId::new(5)).is_none());
        assert!(matches!(
            store.list_revision_ids(&entity, 10, 0),
            Err(StoreError::Backend(_))
        ));
        assert!(matches!(
            store.delete_revision(RevisionId::new(5)),
            Err(StoreError::Backend(_))
        ));
    }

    #[test]
    fn unknown_entity_is_error() {
        let store = MemoryRevisionStore::new();
        let missing = EntityId::new("nope");
        assert!(matches!(
            store.list_revision_ids(&missing, 10, 0),
            Err(StoreError::EntityNotFound(_))
        ));
        assert!(store.current_revision_id(&missing).is_err());
    }
}
