//! Bridge between the core document form and BSON.
//!
//! Documents cross into MongoDB with the `_id` as a native `ObjectId`
//! (the 12-byte identifier layout coincides, so the mapping is
//! lossless) and every other value translated structurally. Values a
//! document cannot carry are rejected rather than silently coerced.

use bson::oid::ObjectId;
use bson::Bson;
use docstore_core::{Document, Filter, StoreError, StoreResult, ID_KEY};
use serde_json::Value;

/// Converts a core document into its BSON form for storage.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] if the document carries a value
/// BSON cannot represent (an integer beyond `i64`), or if the `_id` is
/// not a well-formed identifier string.
pub fn to_bson_document(doc: Document) -> StoreResult<bson::Document> {
    let mut out = bson::Document::new();
    for (key, value) in doc {
        if key == ID_KEY {
            let hex = value
                .as_str()
                .ok_or_else(|| StoreError::validation("document _id is not a string"))?;
            let oid = ObjectId::parse_str(hex)
                .map_err(|_| StoreError::invalid_identifier(hex.to_string()))?;
            out.insert(key, Bson::ObjectId(oid));
        } else {
            out.insert(key, json_to_bson(value)?);
        }
    }
    Ok(out)
}

/// Converts a stored BSON document back into the core document form.
///
/// # Errors
///
/// Returns [`StoreError::Deserialization`] if the document carries a
/// BSON type the entity model has no representation for.
pub fn from_bson_document(
    collection: &'static str,
    doc: bson::Document,
) -> StoreResult<Document> {
    let mut out = Document::new();
    for (key, value) in doc {
        if key == ID_KEY {
            let oid = match value {
                Bson::ObjectId(oid) => oid,
                other => {
                    return Err(StoreError::deserialization(
                        collection,
                        format!("_id is not an ObjectId: {other:?}"),
                    ))
                }
            };
            out.insert(key, Value::from(oid.to_hex()));
        } else {
            out.insert(key, bson_to_json(collection, value)?);
        }
    }
    Ok(out)
}

/// Translates a field filter into a BSON equality filter.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] if a filter value cannot be
/// represented in BSON.
pub fn filter_to_bson(filter: &Filter) -> StoreResult<bson::Document> {
    let mut out = bson::Document::new();
    for (field, expected) in filter.fields() {
        out.insert(field.clone(), json_to_bson(expected.clone())?);
    }
    Ok(out)
}

fn json_to_bson(value: Value) -> StoreResult<Bson> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else if let Some(f) = n.as_f64() {
                Bson::Double(f)
            } else {
                return Err(StoreError::validation(format!(
                    "number {n} is not representable in storage"
                )));
            }
        }
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(
            items
                .into_iter()
                .map(json_to_bson)
                .collect::<StoreResult<Vec<_>>>()?,
        ),
        Value::Object(fields) => {
            let mut doc = bson::Document::new();
            for (key, value) in fields {
                doc.insert(key, json_to_bson(value)?);
            }
            Bson::Document(doc)
        }
    })
}

fn bson_to_json(collection: &'static str, value: Bson) -> StoreResult<Value> {
    Ok(match value {
        Bson::Null => Value::Null,
        Bson::Boolean(b) => Value::from(b),
        Bson::Int32(i) => Value::from(i64::from(i)),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) => serde_json::Number::from_f64(f).map(Value::Number).ok_or_else(|| {
            StoreError::deserialization(collection, format!("non-finite number {f}"))
        })?,
        Bson::String(s) => Value::from(s),
        Bson::ObjectId(oid) => Value::from(oid.to_hex()),
        Bson::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| bson_to_json(collection, item))
                .collect::<StoreResult<Vec<_>>>()?,
        ),
        Bson::Document(doc) => {
            let mut out = serde_json::Map::new();
            for (key, value) in doc {
                out.insert(key, bson_to_json(collection, value)?);
            }
            Value::Object(out)
        }
        other => {
            return Err(StoreError::deserialization(
                collection,
                format!("unsupported stored type: {other:?}"),
            ))
        }
    })
}
