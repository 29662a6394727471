use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use std::sync::Arc;

use super::collector::SplitCollector;
use super::types::SPLITS_FIELD;
use crate::config::CollectorConfig;
use crate::document::types::{Document, ObjectId, Value};
use crate::membership::types::MemberIndex;
use crate::membership::view::{MembershipView, StaticMembership};
use crate::transport::client::HttpTransport;
use crate::transport::protocol::CollectResponse;
use crate::transport::store::DocumentStore;

/// Shared state for the collect endpoint.
pub struct CollectContext {
    pub membership: Arc<StaticMembership>,
    pub transport: Arc<HttpTransport>,
    pub store: Arc<DocumentStore>,
    pub config: CollectorConfig,
}

/// Narrows a stored copy, which has one slot per member, to the shape the merge
/// expects: the splits field holding only this member's own split.
///
/// Returns `None` when the copy has no splits array.
pub fn own_split_view(stored: &Document, self_index: MemberIndex) -> Option<Document> {
    let own = stored
        .get(SPLITS_FIELD)?
        .as_array()?
        .get(self_index)
        .cloned()
        .into_iter()
        .collect();

    stored.with_field_replaced(SPLITS_FIELD, Value::Array(own))
}

/// Runs a collection for a locally stored document and returns the merged result.
///
/// The stored document is left as is; the caller owns the merged copy.
pub async fn handle_collect(
    Extension(ctx): Extension<Arc<CollectContext>>,
    Path((namespace, oid)): Path<(String, String)>,
) -> (StatusCode, Json<CollectResponse>) {
    let oid = ObjectId(oid);

    let Some(stored) = ctx.store.get(&namespace, &oid) else {
        tracing::warn!("Collect: no document {} in '{}'", oid, namespace);
        return (
            StatusCode::NOT_FOUND,
            Json(CollectResponse {
                error: Some(format!("document {} not found", oid)),
                ..Default::default()
            }),
        );
    };

    // A copy without a splits array falls through and is rejected by the merge.
    let document = own_split_view(&stored, ctx.membership.self_index()).unwrap_or(stored);

    let collector = match SplitCollector::new(
        ctx.membership.clone(),
        ctx.transport.clone(),
        namespace,
        document,
        ctx.config.clone(),
    ) {
        Ok(collector) => collector,
        Err(e) => {
            tracing::error!("Collect: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(CollectResponse {
                    error: Some(e.to_string()),
                    ..Default::default()
                }),
            );
        }
    };

    match collector.collect().await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(CollectResponse {
                document: Some(outcome.document),
                collected: outcome.report.collected,
                missing: outcome.report.missing,
                error: None,
            }),
        ),
        Err(e) => {
            if e.is_invariant_violation() {
                tracing::error!("Collect aborted, data is corrupted: {}", e);
            } else {
                tracing::error!("Collect failed: {}", e);
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CollectResponse {
                    error: Some(e.to_string()),
                    ..Default::default()
                }),
            )
        }
    }
}
