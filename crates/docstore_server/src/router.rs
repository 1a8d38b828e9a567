//! Route table for the resource surface.

use crate::handler::{self, SharedRegistry};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the axum router over a registry.
///
/// One resource per registered entity type:
///
/// | Method and path | Operation |
/// |---|---|
/// | `GET /{collection}/{identifier}` | get |
/// | `POST /{collection}/` | update (upsert) |
/// | `DELETE /{collection}/{identifier}` | delete |
/// | `GET /{collection}/` | get_all |
/// | `GET /{collection}/find/` | find |
/// | `GET /{collection}/find_one/` | find_one |
pub fn build_router(registry: SharedRegistry) -> Router {
    Router::new()
        .route(
            "/:collection/",
            get(handler::list_items).post(handler::update_item),
        )
        .route("/:collection/find/", get(handler::find_items))
        .route("/:collection/find_one/", get(handler::find_one_item))
        .route(
            "/:collection/:identifier",
            get(handler::get_item).delete(handler::delete_item),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}
