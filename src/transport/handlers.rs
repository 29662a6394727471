use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

use super::protocol::{
    ENDPOINT_FIND, ENDPOINT_HELLO, ENDPOINT_PING, ENDPOINT_PUT, FindRequest, FindResponse,
    HelloRequest, HelloResponse, PutRequest, PutResponse,
};
use super::store::DocumentStore;

/// Routes every member serves so peers can collect from it.
pub fn router(store: Arc<DocumentStore>) -> Router {
    Router::new()
        .route(ENDPOINT_HELLO, post(handle_hello))
        .route(ENDPOINT_PING, get(handle_ping))
        .route(ENDPOINT_FIND, post(handle_find))
        .route(ENDPOINT_PUT, post(handle_put))
        .layer(Extension(store))
}

pub async fn handle_hello(Json(req): Json<HelloRequest>) -> (StatusCode, Json<HelloResponse>) {
    tracing::debug!("Handshake from application '{}'", req.application);
    (StatusCode::OK, Json(HelloResponse { ok: true }))
}

pub async fn handle_ping() -> StatusCode {
    StatusCode::OK
}

pub async fn handle_find(
    Extension(store): Extension<Arc<DocumentStore>>,
    Json(req): Json<FindRequest>,
) -> (StatusCode, Json<FindResponse>) {
    let batch = store.find(&req);

    tracing::debug!(
        "Find in '{}' for {}={} (field={}, position={}) matched {} record(s)",
        req.namespace,
        req.filter.field(),
        req.filter.id,
        req.projection.field,
        req.projection.position,
        batch.len()
    );

    (StatusCode::OK, Json(FindResponse { batch }))
}

pub async fn handle_put(
    Extension(store): Extension<Arc<DocumentStore>>,
    Json(req): Json<PutRequest>,
) -> (StatusCode, Json<PutResponse>) {
    match store.insert(&req.namespace, req.document) {
        Ok(oid) => {
            tracing::info!("Stored document {} in '{}'", oid, req.namespace);
            (
                StatusCode::OK,
                Json(PutResponse {
                    success: true,
                    id: Some(oid),
                }),
            )
        }
        Err(e) => {
            tracing::error!("Failed to store document: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(PutResponse {
                    success: false,
                    id: None,
                }),
            )
        }
    }
}
