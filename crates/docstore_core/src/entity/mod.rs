//! Entity model: identifiers, the entity trait, and typed references.

mod id;
mod reference;

pub use id::{EntityId, ID_HEX_LEN, ID_LEN};
pub use reference::{IntoReference, Reference};

use crate::error::StoreResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A persisted typed object.
///
/// Every entity has exactly one [`EntityId`] field plus zero or more
/// declared data fields. The identifier is assigned at construction
/// (fresh via [`EntityId::new`] or caller-supplied) and never changes
/// for the entity's lifetime.
///
/// Identity is the identifier alone: two instances with equal IDs are
/// the same entity regardless of field contents. Use
/// [`impl_entity_identity!`](crate::impl_entity_identity) to derive
/// `PartialEq`/`Eq`/`Hash` with exactly that meaning.
///
/// # Example
///
/// ```
/// use docstore_core::{Entity, EntityId};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Customer {
///     #[serde(default)]
///     id: EntityId,
///     name: String,
/// }
///
/// impl Entity for Customer {
///     fn collection_name() -> &'static str {
///         "customer"
///     }
///
///     fn id(&self) -> EntityId {
///         self.id
///     }
/// }
///
/// docstore_core::impl_entity_identity!(Customer);
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the collection holding entities of this type.
    fn collection_name() -> &'static str;

    /// The entity's identifier.
    fn id(&self) -> EntityId;

    /// Declared name of the identifier field.
    ///
    /// Used by the document codec to map between the in-process field
    /// name and the conventional `_id` key on the wire.
    fn id_field() -> &'static str {
        "id"
    }

    /// Checks the entity's declared fields before a write.
    ///
    /// Runs before any I/O; a failure surfaces as
    /// [`StoreError::Validation`](crate::StoreError::Validation) and the
    /// entity is never sent to a backend.
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Implements identity-based equality and hashing for an entity type.
///
/// Two instances compare equal, and hash identically, if and only if
/// their identifiers are equal. Field contents are irrelevant.
#[macro_export]
macro_rules! impl_entity_identity {
    ($entity:ty) => {
        impl ::core::cmp::PartialEq for $entity {
            fn eq(&self, other: &Self) -> bool {
                $crate::Entity::id(self) == $crate::Entity::id(other)
            }
        }

        impl ::core::cmp::Eq for $entity {}

        impl ::core::hash::Hash for $entity {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(&$crate::Entity::id(self), state);
            }
        }
    };
}
