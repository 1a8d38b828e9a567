//! MongoDB implementation of the store contract.

use crate::codec;
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson};
use docstore_core::{
    from_document, to_document, Entity, EntityId, Filter, Store, StoreError, StoreResult, ID_KEY,
};
use futures_util::TryStreamExt;
use mongodb::{Client, Database};
use std::collections::BTreeMap;

const BACKEND_NAME: &str = "mongodb";

/// A MongoDB-backed store.
///
/// Maps each entity type to one remote collection named after the
/// type. A single `update` or `delete` call is atomic at the document
/// level; that guarantee is delegated to the server. The store owns
/// its database handle for its lifetime.
///
/// `get_all` is declined with
/// [`StoreError::NotSupported`] rather than streaming an entire remote
/// collection.
///
/// # Example
///
/// ```rust,ignore
/// let store = MongoStore::connect("mongodb://localhost:27017", "app").await?;
/// store.update(&customer).await?;
/// let found: Customer = store.get(customer.id()).await?;
/// ```
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl std::fmt::Debug for MongoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoStore")
            .field("database", &self.database.name())
            .finish()
    }
}

impl MongoStore {
    /// Creates a store over an existing client.
    #[must_use]
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            database: client.database(database),
        }
    }

    /// Connects to the given URI and opens the named database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the client cannot be
    /// constructed.
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await.map_err(driver_error)?;
        Ok(Self::new(&client, database))
    }

    /// Name of the underlying database.
    #[must_use]
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    fn collection(&self, name: &str) -> mongodb::Collection<bson::Document> {
        self.database.collection(name)
    }
}

fn driver_error(err: mongodb::error::Error) -> StoreError {
    StoreError::unavailable(err.to_string())
}

fn object_id(id: EntityId) -> ObjectId {
    ObjectId::from_bytes(*id.as_bytes())
}

#[async_trait]
impl Store for MongoStore {
    async fn update<T: Entity>(&self, entity: &T) -> StoreResult<()> {
        let mut doc = codec::to_bson_document(to_document(entity)?)?;
        let id = doc
            .remove(ID_KEY)
            .ok_or_else(|| StoreError::validation("document has no _id"))?;

        // Filtered upsert keyed by identifier; the id itself never
        // appears in the replacement fields.
        self.collection(T::collection_name())
            .update_one(doc! { "_id": id }, doc! { "$set": Bson::Document(doc) })
            .upsert(true)
            .await
            .map_err(driver_error)?;
        tracing::debug!(
            collection = T::collection_name(),
            id = %entity.id(),
            "upserted entity"
        );
        Ok(())
    }

    async fn get<T: Entity>(&self, id: EntityId) -> StoreResult<T> {
        let found = self
            .collection(T::collection_name())
            .find_one(doc! { "_id": object_id(id) })
            .await
            .map_err(driver_error)?;

        match found {
            Some(bdoc) => from_document(codec::from_bson_document(T::collection_name(), bdoc)?),
            None => Err(StoreError::unknown_entity(T::collection_name(), id)),
        }
    }

    async fn get_all<T: Entity>(&self) -> StoreResult<BTreeMap<EntityId, T>> {
        Err(StoreError::not_supported(BACKEND_NAME, "get_all"))
    }

    async fn delete<T: Entity>(&self, id: EntityId, cascade: bool) -> StoreResult<()> {
        if cascade {
            tracing::warn!(
                collection = T::collection_name(),
                id = %id,
                "cascading delete requested but not implemented; deleting the entity only"
            );
        }
        let result = self
            .collection(T::collection_name())
            .delete_one(doc! { "_id": object_id(id) })
            .await
            .map_err(driver_error)?;

        if result.deleted_count != 1 {
            return Err(StoreError::unknown_entity(T::collection_name(), id));
        }
        tracing::debug!(collection = T::collection_name(), id = %id, "deleted entity");
        Ok(())
    }

    async fn find<T: Entity>(&self, filter: &Filter) -> StoreResult<Option<BTreeMap<EntityId, T>>> {
        let mut cursor = self
            .collection(T::collection_name())
            .find(codec::filter_to_bson(filter)?)
            .sort(doc! { "_id": 1 })
            .await
            .map_err(driver_error)?;

        let mut entities = BTreeMap::new();
        while let Some(bdoc) = cursor.try_next().await.map_err(driver_error)? {
            let entity: T = from_document(codec::from_bson_document(T::collection_name(), bdoc)?)?;
            entities.insert(entity.id(), entity);
        }
        Ok(Some(entities))
    }

    async fn find_one<T: Entity>(&self, filter: &Filter) -> StoreResult<Option<T>> {
        // Ascending id sort makes the smallest-id match win when
        // several entities match.
        let found = self
            .collection(T::collection_name())
            .find_one(codec::filter_to_bson(filter)?)
            .sort(doc! { "_id": 1 })
            .await
            .map_err(driver_error)?;

        found
            .map(|bdoc| from_document(codec::from_bson_document(T::collection_name(), bdoc)?))
            .transpose()
    }
}
