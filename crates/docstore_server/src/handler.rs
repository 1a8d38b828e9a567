//! Request handlers for the resource surface.

use crate::error::{ApiError, ApiResult};
use crate::registry::{Registry, Resource};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use docstore_core::{Document, EntityId, Filter, ID_KEY};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Shared handler state.
pub type SharedRegistry = Arc<Registry>;

fn lookup<'a>(registry: &'a Registry, collection: &str) -> Result<&'a Resource, ApiError> {
    registry
        .resource(collection)
        .ok_or_else(|| ApiError::unknown_collection(collection))
}

fn filter_from_params(params: Vec<(String, String)>) -> Filter {
    // Query parameters arrive as strings and are matched as strings.
    params
        .into_iter()
        .map(|(field, value)| (field, Value::String(value)))
        .collect()
}

fn keyed_by_id(docs: Vec<Document>) -> Value {
    let mut out = Map::new();
    for doc in docs {
        if let Some(Value::String(id)) = doc.get(ID_KEY).cloned() {
            out.insert(id, Value::Object(doc));
        }
    }
    Value::Object(out)
}

/// `GET /{collection}/{identifier}` — one entity as a document.
pub async fn get_item(
    State(registry): State<SharedRegistry>,
    Path((collection, identifier)): Path<(String, String)>,
) -> ApiResult<Json<Document>> {
    let resource = lookup(&registry, &collection)?;
    let id = EntityId::parse_str(&identifier)?;
    Ok(Json(resource.get(id).await?))
}

/// `POST /{collection}/` — create or overwrite an entity.
pub async fn update_item(
    State(registry): State<SharedRegistry>,
    Path(collection): Path<String>,
    Json(doc): Json<Document>,
) -> ApiResult<StatusCode> {
    let resource = lookup(&registry, &collection)?;
    resource.update(doc).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Query parameters for deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// Request removal of dependents as well.
    #[serde(default)]
    pub cascade: bool,
}

/// `DELETE /{collection}/{identifier}` — remove an entity.
pub async fn delete_item(
    State(registry): State<SharedRegistry>,
    Path((collection, identifier)): Path<(String, String)>,
    Query(params): Query<DeleteParams>,
) -> ApiResult<StatusCode> {
    let resource = lookup(&registry, &collection)?;
    let id = EntityId::parse_str(&identifier)?;
    resource.delete(id, params.cascade).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /{collection}/` — the whole collection keyed by identifier.
pub async fn list_items(
    State(registry): State<SharedRegistry>,
    Path(collection): Path<String>,
) -> ApiResult<Json<Value>> {
    let resource = lookup(&registry, &collection)?;
    Ok(Json(keyed_by_id(resource.get_all().await?)))
}

/// `GET /{collection}/find/` — entities matching the query parameters,
/// keyed by identifier. `null` if the filter was not evaluated.
pub async fn find_items(
    State(registry): State<SharedRegistry>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    let resource = lookup(&registry, &collection)?;
    match resource.find(filter_from_params(params)).await? {
        Some(docs) => Ok(Json(keyed_by_id(docs))),
        None => Ok(Json(Value::Null)),
    }
}

/// `GET /{collection}/find_one/` — the single match, or `null`.
pub async fn find_one_item(
    State(registry): State<SharedRegistry>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    let resource = lookup(&registry, &collection)?;
    match resource.find_one(filter_from_params(params)).await? {
        Some(doc) => Ok(Json(Value::Object(doc))),
        None => Ok(Json(Value::Null)),
    }
}
