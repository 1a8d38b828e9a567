//! Entity type registry.
//!
//! The store contract is generic over entity types, but a request
//! names its collection as a path string. The registry bridges the
//! two: each entity type is registered against a chosen backend at
//! construction time, producing erased document-level handlers keyed
//! by collection name. The contract itself stays free of any
//! transport concern.

use docstore_core::{
    from_document, to_document, Document, Entity, EntityId, Filter, Store, StoreError, StoreResult,
};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;

type UpdateFn = Box<dyn Fn(Document) -> BoxFuture<'static, StoreResult<()>> + Send + Sync>;
type GetFn = Box<dyn Fn(EntityId) -> BoxFuture<'static, StoreResult<Document>> + Send + Sync>;
type GetAllFn = Box<dyn Fn() -> BoxFuture<'static, StoreResult<Vec<Document>>> + Send + Sync>;
type DeleteFn = Box<dyn Fn(EntityId, bool) -> BoxFuture<'static, StoreResult<()>> + Send + Sync>;
type FindFn =
    Box<dyn Fn(Filter) -> BoxFuture<'static, StoreResult<Option<Vec<Document>>>> + Send + Sync>;
type FindOneFn =
    Box<dyn Fn(Filter) -> BoxFuture<'static, StoreResult<Option<Document>>> + Send + Sync>;

/// Document-level handlers for one registered entity type.
pub struct Resource {
    update: UpdateFn,
    get: GetFn,
    get_all: GetAllFn,
    delete: DeleteFn,
    find: FindFn,
    find_one: FindOneFn,
}

impl Resource {
    fn bind<T: Entity, S: Store + 'static>(store: Arc<S>) -> Self {
        Self {
            update: {
                let store = Arc::clone(&store);
                Box::new(move |doc| {
                    let store = Arc::clone(&store);
                    Box::pin(async move {
                        // A body that does not fit the declared shape is
                        // the caller's mistake, not data corruption.
                        let entity: T = from_document(doc)
                            .map_err(|e| StoreError::validation(e.to_string()))?;
                        store.update(&entity).await
                    })
                })
            },
            get: {
                let store = Arc::clone(&store);
                Box::new(move |id| {
                    let store = Arc::clone(&store);
                    Box::pin(async move {
                        let entity: T = store.get(id).await?;
                        to_document(&entity)
                    })
                })
            },
            get_all: {
                let store = Arc::clone(&store);
                Box::new(move || {
                    let store = Arc::clone(&store);
                    Box::pin(async move {
                        let entities = store.get_all::<T>().await?;
                        entities.values().map(to_document).collect()
                    })
                })
            },
            delete: {
                let store = Arc::clone(&store);
                Box::new(move |id, cascade| {
                    let store = Arc::clone(&store);
                    Box::pin(async move { store.delete::<T>(id, cascade).await })
                })
            },
            find: {
                let store = Arc::clone(&store);
                Box::new(move |filter| {
                    let store = Arc::clone(&store);
                    Box::pin(async move {
                        match store.find::<T>(&filter).await? {
                            Some(matches) => Ok(Some(
                                matches
                                    .values()
                                    .map(to_document)
                                    .collect::<StoreResult<Vec<_>>>()?,
                            )),
                            None => Ok(None),
                        }
                    })
                })
            },
            find_one: {
                let store = Arc::clone(&store);
                Box::new(move |filter| {
                    let store = Arc::clone(&store);
                    Box::pin(async move {
                        store
                            .find_one::<T>(&filter)
                            .await?
                            .as_ref()
                            .map(to_document)
                            .transpose()
                    })
                })
            },
        }
    }

    /// Upserts the document as its entity type.
    pub async fn update(&self, doc: Document) -> StoreResult<()> {
        (self.update)(doc).await
    }

    /// Fetches one entity as a document.
    pub async fn get(&self, id: EntityId) -> StoreResult<Document> {
        (self.get)(id).await
    }

    /// Fetches the whole collection as documents.
    pub async fn get_all(&self) -> StoreResult<Vec<Document>> {
        (self.get_all)().await
    }

    /// Deletes one entity.
    pub async fn delete(&self, id: EntityId, cascade: bool) -> StoreResult<()> {
        (self.delete)(id, cascade).await
    }

    /// Evaluates a filter over the collection.
    pub async fn find(&self, filter: Filter) -> StoreResult<Option<Vec<Document>>> {
        (self.find)(filter).await
    }

    /// Evaluates a filter expecting at most one result.
    pub async fn find_one(&self, filter: Filter) -> StoreResult<Option<Document>> {
        (self.find_one)(filter).await
    }
}

/// Maps collection names to the handlers of their registered types.
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::new());
/// let mut registry = Registry::new();
/// registry.register::<Customer, _>(Arc::clone(&store));
/// registry.register::<Product, _>(store);
/// ```
#[derive(Default)]
pub struct Registry {
    resources: HashMap<&'static str, Resource>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity type against a backend.
    ///
    /// Requests for the type's collection name will be served through
    /// the given store. Registering the same collection twice replaces
    /// the earlier entry.
    pub fn register<T: Entity, S: Store + 'static>(&mut self, store: Arc<S>) {
        self.resources
            .insert(T::collection_name(), Resource::bind::<T, S>(store));
    }

    /// Looks up the handlers for a collection name.
    #[must_use]
    pub fn resource(&self, collection: &str) -> Option<&Resource> {
        self.resources.get(collection)
    }

    /// Names of all registered collections.
    pub fn collections(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }
}
