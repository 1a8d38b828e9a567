//! The storage contract every backend implements.

use crate::entity::{Entity, EntityId};
use crate::error::StoreResult;
use crate::filter::Filter;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// The uniform backend contract.
///
/// Every storage engine implements these operations with identical
/// externally observable behavior, so application code can swap the
/// engine underneath without changing. All operations are asynchronous
/// I/O-bound calls: they may suspend while awaiting the medium but
/// contain no internal parallelism, and a transient medium failure
/// surfaces as [`StoreError::Unavailable`](crate::StoreError::Unavailable)
/// for the caller to retry — never retried or swallowed internally.
///
/// Backends must ensure a cancelled write either fully applies or not
/// at all; no partially written entity is ever observable.
///
/// # Implementors
///
/// - [`MemoryStore`](crate::MemoryStore) — reference semantics, used by
///   the parity suite
/// - `MongoStore` (in `docstore_mongo`) — one remote collection per
///   entity type
#[async_trait]
pub trait Store: Send + Sync {
    /// Upserts an entity into its collection, keyed by identifier.
    ///
    /// Validates first (a malformed entity never reaches the backend),
    /// then writes if absent or overwrites all declared fields if
    /// present. There is no insert-vs-update distinction.
    ///
    /// # Errors
    ///
    /// [`Validation`](crate::StoreError::Validation) or
    /// [`Unavailable`](crate::StoreError::Unavailable).
    async fn update<T: Entity>(&self, entity: &T) -> StoreResult<()>;

    /// Returns the entity with the given identifier.
    ///
    /// Never returns a partially populated entity.
    ///
    /// # Errors
    ///
    /// [`UnknownEntity`](crate::StoreError::UnknownEntity) if absent.
    async fn get<T: Entity>(&self, id: EntityId) -> StoreResult<T>;

    /// Returns the full collection as a mapping from identifier to
    /// entity.
    ///
    /// # Errors
    ///
    /// A backend that cannot support this efficiently declines with
    /// [`NotSupported`](crate::StoreError::NotSupported) rather than
    /// attempt it — never a silent empty result.
    async fn get_all<T: Entity>(&self) -> StoreResult<BTreeMap<EntityId, T>>;

    /// Removes the entity with the given identifier.
    ///
    /// Deletion is not idempotent on absence: deleting an identifier
    /// that does not exist fails, including a repeat delete.
    ///
    /// `cascade` requests removal of dependents reachable via
    /// reference fields. No shipped backend implements cascading yet;
    /// they perform the direct deletion only and log a warning so the
    /// gap is never silent.
    ///
    /// # Errors
    ///
    /// [`UnknownEntity`](crate::StoreError::UnknownEntity) if the
    /// entity did not exist before the call.
    async fn delete<T: Entity>(&self, id: EntityId, cascade: bool) -> StoreResult<()>;

    /// Returns every entity whose document form matches the filter.
    ///
    /// `Some(map)` is the evaluated result (possibly empty: nothing
    /// matched). `None` means the backend could not evaluate the
    /// filter at all; both shipped backends always evaluate.
    async fn find<T: Entity>(&self, filter: &Filter) -> StoreResult<Option<BTreeMap<EntityId, T>>>;

    /// Returns the single entity matching the filter, or `None`.
    ///
    /// When several entities match, the one with the smallest
    /// identifier wins — deterministic across backends and calls.
    async fn find_one<T: Entity>(&self, filter: &Filter) -> StoreResult<Option<T>>;
}
