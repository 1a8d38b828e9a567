//! Document codec: entities to and from their field-map form.
//!
//! Entities cross every storage and wire boundary as field-name/value
//! documents. The identifier travels under the conventional `_id` key
//! out there and under its declared field name in-process; the mapping
//! is bidirectional and lossless.

use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};
use serde_json::{Map, Value};

/// The field-name/value form of an entity.
pub type Document = Map<String, Value>;

/// Conventional key for the identifier on the wire and in storage.
pub const ID_KEY: &str = "_id";

/// Converts an entity into its document form.
///
/// Runs the entity's [`validate`](Entity::validate) hook first, then
/// serializes the declared fields and moves the identifier field under
/// [`ID_KEY`].
///
/// # Errors
///
/// Returns [`StoreError::Validation`] if the hook rejects the entity,
/// if the entity does not serialize to a plain field map, or if the
/// identifier field is missing or collides with a literal `_id` field.
pub fn to_document<T: Entity>(entity: &T) -> StoreResult<Document> {
    entity.validate()?;

    let value = serde_json::to_value(entity).map_err(|e| StoreError::validation(e.to_string()))?;
    let Value::Object(mut doc) = value else {
        return Err(StoreError::validation(format!(
            "entity in collection {} does not serialize to a field map",
            T::collection_name()
        )));
    };

    let id = doc.remove(T::id_field()).ok_or_else(|| {
        StoreError::validation(format!(
            "entity in collection {} is missing its identifier field {:?}",
            T::collection_name(),
            T::id_field()
        ))
    })?;
    if doc.contains_key(ID_KEY) {
        return Err(StoreError::validation(format!(
            "entity in collection {} declares a reserved {ID_KEY} field",
            T::collection_name()
        )));
    }
    doc.insert(ID_KEY.to_string(), id);

    Ok(doc)
}

/// Converts a stored document back into a typed entity.
///
/// Moves [`ID_KEY`] back under the declared identifier field name and
/// deserializes into `T`.
///
/// # Errors
///
/// Returns [`StoreError::Deserialization`] if the document has no
/// identifier or no longer matches the entity's declared shape.
pub fn from_document<T: Entity>(mut doc: Document) -> StoreResult<T> {
    let id = doc.remove(ID_KEY).ok_or_else(|| {
        StoreError::deserialization(T::collection_name(), format!("document has no {ID_KEY} key"))
    })?;
    doc.insert(T::id_field().to_string(), id);

    serde_json::from_value(Value::Object(doc))
        .map_err(|e| StoreError::deserialization(T::collection_name(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
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

    fn customer() -> Customer {
        Customer {
            id: EntityId::new(),
            name: "Eve".into(),
            city: "Berlin".into(),
        }
    }

    #[test]
    fn id_moves_to_wire_key() {
        let entity = customer();
        let doc = to_document(&entity).unwrap();

        assert_eq!(doc.get(ID_KEY), Some(&Value::from(entity.id.to_hex())));
        assert!(!doc.contains_key("id"));
        assert_eq!(doc.get("name"), Some(&Value::from("Eve")));
    }

    #[test]
    fn roundtrip_is_lossless() {
        let entity = customer();
        let doc = to_document(&entity).unwrap();
        let back: Customer = from_document(doc).unwrap();

        assert_eq!(back.id, entity.id);
        assert_eq!(back.name, entity.name);
        assert_eq!(back.city, entity.city);
    }

    #[test]
    fn validate_hook_runs_first() {
        let mut entity = customer();
        entity.name.clear();

        let err = to_document(&entity).unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn missing_id_key_fails_deserialization() {
        let mut doc = Document::new();
        doc.insert("name".into(), Value::from("Eve"));
        doc.insert("city".into(), Value::from("Berlin"));

        let err = from_document::<Customer>(doc).unwrap_err();
        assert!(matches!(err, StoreError::Deserialization { .. }));
    }

    #[test]
    fn shape_mismatch_fails_deserialization() {
        let entity = customer();
        let mut doc = to_document(&entity).unwrap();
        doc.insert("city".into(), Value::from(42));

        let err = from_document::<Customer>(doc).unwrap_err();
        assert!(matches!(err, StoreError::Deserialization { .. }));
    }
}
