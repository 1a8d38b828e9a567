//! In-memory storage backend.

use crate::document::{from_document, to_document, Document};
use crate::entity::{Entity, EntityId};
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::store::Store;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

type Collection = BTreeMap<EntityId, Document>;

/// A process-local storage backend.
///
/// Each collection is an identifier-ordered map of documents behind
/// its own lock, so operations on different collections never contend.
/// Entities are stored in document form, which exercises the same
/// codec path as remote backends.
///
/// All operations complete without I/O but are exposed through the
/// same async contract, so callers stay backend-agnostic. Mutations
/// hold a write lock only for the map operation itself — there is no
/// suspension point inside a critical section, so concurrent writes to
/// one identifier behave as if totally ordered and a cancelled write
/// either fully applied or never started.
///
/// This backend provides the reference semantics against which other
/// backends are validated.
///
/// # Example
///
/// ```rust,ignore
/// let store = MemoryStore::new();
/// store.update(&customer).await?;
/// let found: Customer = store.get(customer.id()).await?;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<&'static str, Arc<RwLock<Collection>>>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entities in the named collection.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, |c| c.read().len())
    }

    /// Returns true if the named collection holds no entities.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Removes every entity from every collection.
    pub fn clear(&self) {
        self.collections.write().clear();
    }

    fn collection(&self, name: &'static str) -> Arc<RwLock<Collection>> {
        if let Some(collection) = self.collections.read().get(name) {
            return Arc::clone(collection);
        }
        let mut collections = self.collections.write();
        Arc::clone(collections.entry(name).or_default())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn update<T: Entity>(&self, entity: &T) -> StoreResult<()> {
        let doc = to_document(entity)?;
        let collection = self.collection(T::collection_name());
        collection.write().insert(entity.id(), doc);
        tracing::debug!(
            collection = T::collection_name(),
            id = %entity.id(),
            "upserted entity"
        );
        Ok(())
    }

    async fn get<T: Entity>(&self, id: EntityId) -> StoreResult<T> {
        let collection = self.collection(T::collection_name());
        let doc = collection
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::unknown_entity(T::collection_name(), id))?;
        from_document(doc)
    }

    async fn get_all<T: Entity>(&self) -> StoreResult<BTreeMap<EntityId, T>> {
        let collection = self.collection(T::collection_name());
        let docs: Vec<(EntityId, Document)> = collection
            .read()
            .iter()
            .map(|(id, doc)| (*id, doc.clone()))
            .collect();

        let mut entities = BTreeMap::new();
        for (id, doc) in docs {
            entities.insert(id, from_document(doc)?);
        }
        Ok(entities)
    }

    async fn delete<T: Entity>(&self, id: EntityId, cascade: bool) -> StoreResult<()> {
        if cascade {
            tracing::warn!(
                collection = T::collection_name(),
                id = %id,
                "cascading delete requested but not implemented; deleting the entity only"
            );
        }
        let collection = self.collection(T::collection_name());
        collection
            .write()
            .remove(&id)
            .ok_or_else(|| StoreError::unknown_entity(T::collection_name(), id))?;
        tracing::debug!(collection = T::collection_name(), id = %id, "deleted entity");
        Ok(())
    }

    async fn find<T: Entity>(&self, filter: &Filter) -> StoreResult<Option<BTreeMap<EntityId, T>>> {
        let collection = self.collection(T::collection_name());
        let matches: Vec<(EntityId, Document)> = collection
            .read()
            .iter()
            .filter(|(_, doc)| filter.matches(doc))
            .map(|(id, doc)| (*id, doc.clone()))
            .collect();

        let mut entities = BTreeMap::new();
        for (id, doc) in matches {
            entities.insert(id, from_document(doc)?);
        }
        Ok(Some(entities))
    }

    async fn find_one<T: Entity>(&self, filter: &Filter) -> StoreResult<Option<T>> {
        let collection = self.collection(T::collection_name());
        // The collection is ordered by identifier, so the first match
        // is the smallest-id match.
        let doc = collection
            .read()
            .iter()
            .find(|(_, doc)| filter.matches(doc))
            .map(|(_, doc)| doc.clone());

        doc.map(from_document).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Customer {
        #[serde(default)]
        id: EntityId,
        name: String,
        city: String,
    }

    impl Entity for Customer {
        fn collection_name() -> &'static str {
            "customer"
        }

        fn id(&self) -> EntityId {
            self.id
        }

        fn validate(&self) -> StoreResult<()> {
            if self.name.is_empty() {
                return Err(StoreError::validation("name must not be empty"));
            }
            Ok(())
        }
    }

    fn customer(name: &str, city: &str) -> Customer {
        Customer {
            id: EntityId::new(),
            name: name.into(),
            city: city.into(),
        }
    }

    #[tokio::test]
    async fn update_then_get() {
        let store = MemoryStore::new();
        let entity = customer("Eve", "Berlin");

        store.update(&entity).await.unwrap();
        let found: Customer = store.get(entity.id()).await.unwrap();

        assert_eq!(found.id, entity.id);
        assert_eq!(found.name, "Eve");
    }

    #[tokio::test]
    async fn get_unknown_fails() {
        let store = MemoryStore::new();
        let err = store.get::<Customer>(EntityId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownEntity { .. }));
    }

    #[tokio::test]
    async fn update_overwrites_all_fields() {
        let store = MemoryStore::new();
        let mut entity = customer("Eve", "Berlin");
        store.update(&entity).await.unwrap();

        entity.city = "Oslo".into();
        store.update(&entity).await.unwrap();

        let found: Customer = store.get(entity.id()).await.unwrap();
        assert_eq!(found.city, "Oslo");
        assert_eq!(found.name, "Eve");
        assert_eq!(store.len("customer"), 1);
    }

    #[tokio::test]
    async fn validation_failure_never_reaches_storage() {
        let store = MemoryStore::new();
        let entity = customer("", "Berlin");

        let err = store.update(&entity).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
        assert!(store.is_empty("customer"));
    }

    #[tokio::test]
    async fn delete_removes_and_repeat_fails() {
        let store = MemoryStore::new();
        let entity = customer("Eve", "Berlin");
        store.update(&entity).await.unwrap();

        store.delete::<Customer>(entity.id(), false).await.unwrap();

        let err = store.get::<Customer>(entity.id()).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownEntity { .. }));

        let err = store
            .delete::<Customer>(entity.id(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownEntity { .. }));
    }

    #[tokio::test]
    async fn cascade_flag_deletes_the_entity_only() {
        let store = MemoryStore::new();
        let entity = customer("Eve", "Berlin");
        store.update(&entity).await.unwrap();

        store.delete::<Customer>(entity.id(), true).await.unwrap();
        assert!(store.is_empty("customer"));
    }

    #[tokio::test]
    async fn find_matches_exactly() {
        let store = MemoryStore::new();
        let eve = customer("Eve", "Berlin");
        let frank = customer("Frank", "Berlin");
        store.update(&eve).await.unwrap();
        store.update(&frank).await.unwrap();

        let matches = store
            .find::<Customer>(&Filter::new().eq("name", "Eve"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert!(matches.contains_key(&eve.id()));
    }

    #[tokio::test]
    async fn find_no_match_is_empty_not_error() {
        let store = MemoryStore::new();
        store.update(&customer("Eve", "Berlin")).await.unwrap();

        let matches = store
            .find::<Customer>(&Filter::new().eq("name", "Nobody"))
            .await
            .unwrap()
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn find_one_smallest_id_wins() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let entity = customer("Eve", "Berlin");
            ids.push(entity.id());
            store.update(&entity).await.unwrap();
        }
        ids.sort();

        let found = store
            .find_one::<Customer>(&Filter::new().eq("name", "Eve"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), ids[0]);
    }

    #[tokio::test]
    async fn get_all_returns_the_collection() {
        let store = MemoryStore::new();
        let a = customer("Eve", "Berlin");
        let b = customer("Frank", "Oslo");
        store.update(&a).await.unwrap();
        store.update(&b).await.unwrap();

        let all = store.get_all::<Customer>().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.contains_key(&a.id()));
        assert!(all.contains_key(&b.id()));
    }

    #[tokio::test]
    async fn collections_are_independent() {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        struct Order {
            #[serde(default)]
            id: EntityId,
            total: i64,
        }

        impl Entity for Order {
            fn collection_name() -> &'static str {
                "order"
            }

            fn id(&self) -> EntityId {
                self.id
            }
        }

        let store = MemoryStore::new();
        store.update(&customer("Eve", "Berlin")).await.unwrap();
        store
            .update(&Order {
                id: EntityId::new(),
                total: 9,
            })
            .await
            .unwrap();

        assert_eq!(store.len("customer"), 1);
        assert_eq!(store.len("order"), 1);
        assert!(store.get_all::<Order>().await.unwrap().len() == 1);
    }

    #[tokio::test]
    async fn concurrent_updates_on_one_id_are_ordered() {
        let store = Arc::new(MemoryStore::new());
        let entity = customer("Eve", "Berlin");
        store.update(&entity).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let mut entity = entity.clone();
            handles.push(tokio::spawn(async move {
                entity.city = format!("city-{i}");
                store.update(&entity).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // One of the writes won; the entity is whole either way.
        let found: Customer = store.get(entity.id()).await.unwrap();
        assert!(found.city.starts_with("city-"));
        assert_eq!(store.len("customer"), 1);
    }
}
