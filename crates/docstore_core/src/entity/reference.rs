//! Typed cross-entity references.

use crate::entity::{Entity, EntityId};
use crate::error::{StoreError, StoreResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A reference to an entity of a specific type.
///
/// A reference records a relation only: it carries the target type and
/// the target's identifier, nothing else. It is never resolved or
/// validated against a store at construction time, and it does not own
/// the entity it points at.
///
/// Two references are equal iff their target type and target
/// identifier match; cross-type comparison is unrepresentable because
/// the target type is a type parameter.
///
/// On the wire and in storage a reference is just the target's hex
/// identifier string.
///
/// # Example
///
/// ```
/// # use docstore_core::{Entity, EntityId, Reference};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Debug, Clone, Serialize, Deserialize)]
/// # struct Customer {
/// #     #[serde(default)]
/// #     id: EntityId,
/// #     name: String,
/// # }
/// # impl Entity for Customer {
/// #     fn collection_name() -> &'static str { "customer" }
/// #     fn id(&self) -> EntityId { self.id }
/// # }
/// let customer = Customer { id: EntityId::new(), name: "Eve".into() };
///
/// let by_instance = Reference::of(&customer)?;
/// let by_string = Reference::<Customer>::of(customer.id().to_hex().as_str())?;
/// let by_reference = Reference::of(by_instance.clone())?;
///
/// assert_eq!(by_instance, by_string);
/// assert_eq!(by_string, by_reference);
/// # Ok::<(), docstore_core::StoreError>(())
/// ```
pub struct Reference<T: Entity> {
    target: EntityId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Reference<T> {
    /// Creates a reference to the entity with the given identifier.
    #[must_use]
    pub fn from_id(target: EntityId) -> Self {
        Self {
            target,
            _marker: PhantomData,
        }
    }

    /// Normalizes any accepted input shape into a reference.
    ///
    /// Accepts an instance of the target type, a raw identifier
    /// string, an [`EntityId`], or another reference to the same
    /// target type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReferenceConversion`] if an identifier
    /// string is malformed.
    pub fn of(value: impl IntoReference<T>) -> StoreResult<Self> {
        value.into_reference()
    }

    /// The identifier of the referenced entity.
    #[must_use]
    pub fn target(&self) -> EntityId {
        self.target
    }

    /// Name of the collection the referenced entity lives in.
    #[must_use]
    pub fn target_collection(&self) -> &'static str {
        T::collection_name()
    }
}

/// Conversion into a [`Reference`], used by [`Reference::of`].
///
/// Implemented for the three accepted input shapes; anything else does
/// not convert.
pub trait IntoReference<T: Entity> {
    /// Performs the conversion.
    fn into_reference(self) -> StoreResult<Reference<T>>;
}

impl<T: Entity> IntoReference<T> for Reference<T> {
    fn into_reference(self) -> StoreResult<Reference<T>> {
        Ok(self)
    }
}

impl<T: Entity> IntoReference<T> for &T {
    fn into_reference(self) -> StoreResult<Reference<T>> {
        Ok(Reference::from_id(self.id()))
    }
}

impl<T: Entity> IntoReference<T> for EntityId {
    fn into_reference(self) -> StoreResult<Reference<T>> {
        Ok(Reference::from_id(self))
    }
}

impl<T: Entity> IntoReference<T> for &str {
    fn into_reference(self) -> StoreResult<Reference<T>> {
        let target = EntityId::parse_str(self)
            .map_err(|_| StoreError::reference_conversion(T::collection_name(), self))?;
        Ok(Reference::from_id(target))
    }
}

impl<T: Entity> IntoReference<T> for String {
    fn into_reference(self) -> StoreResult<Reference<T>> {
        self.as_str().into_reference()
    }
}

impl<T: Entity> Clone for Reference<T> {
    fn clone(&self) -> Self {
        Self::from_id(self.target)
    }
}

impl<T: Entity> Copy for Reference<T> {}

impl<T: Entity> PartialEq for Reference<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl<T: Entity> Eq for Reference<T> {}

impl<T: Entity> Hash for Reference<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        T::collection_name().hash(state);
        self.target.hash(state);
    }
}

impl<T: Entity> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reference({}:{})", T::collection_name(), self.target)
    }
}

impl<T: Entity> fmt::Display for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.target, f)
    }
}

impl<T: Entity> From<&T> for Reference<T> {
    fn from(entity: &T) -> Self {
        Self::from_id(entity.id())
    }
}

impl<T: Entity> From<EntityId> for Reference<T> {
    fn from(id: EntityId) -> Self {
        Self::from_id(id)
    }
}

impl<T: Entity> Serialize for Reference<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.target.serialize(serializer)
    }
}

impl<'de, T: Entity> Deserialize<'de> for Reference<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.into_reference().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, Serialize, serde::Deserialize)]
    struct Customer {
        #[serde(default)]
        id: EntityId,
        name: String,
    }

    impl Entity for Customer {
        fn collection_name() -> &'static str {
            "customer"
        }

        fn id(&self) -> EntityId {
            self.id
        }
    }

    fn customer() -> Customer {
        Customer {
            id: EntityId::new(),
            name: "Eve".into(),
        }
    }

    #[test]
    fn normalizes_all_input_shapes() {
        let entity = customer();

        let by_instance = Reference::of(&entity).unwrap();
        let by_id = Reference::<Customer>::of(entity.id()).unwrap();
        let by_string = Reference::<Customer>::of(entity.id().to_hex()).unwrap();
        let by_reference = Reference::of(by_instance).unwrap();

        assert_eq!(by_instance, by_id);
        assert_eq!(by_id, by_string);
        assert_eq!(by_string, by_reference);
    }

    #[test]
    fn malformed_string_fails_conversion() {
        let err = Reference::<Customer>::of("not-an-identifier").unwrap_err();
        assert!(matches!(err, StoreError::ReferenceConversion { .. }));
    }

    #[test]
    fn equal_references_hash_identically() {
        let entity = customer();
        let a = Reference::of(&entity).unwrap();
        let b = Reference::<Customer>::of(entity.id().to_hex()).unwrap();

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn references_to_distinct_targets_differ() {
        let a = Reference::of(&customer()).unwrap();
        let b = Reference::of(&customer()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn serde_as_identifier_string() {
        let entity = customer();
        let reference = Reference::of(&entity).unwrap();

        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, format!("\"{}\"", entity.id().to_hex()));

        let back: Reference<Customer> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }

    #[test]
    fn serde_rejects_malformed_target() {
        assert!(serde_json::from_str::<Reference<Customer>>("\"bogus\"").is_err());
    }

    #[test]
    fn no_store_access_on_construction() {
        // A reference to an entity that was never persisted is fine;
        // resolution is the caller's concern.
        let reference = Reference::<Customer>::of(EntityId::new()).unwrap();
        assert_eq!(reference.target_collection(), "customer");
    }
}
