//! Peer Query Protocol
//!
//! API endpoints and Data Transfer Objects exchanged between members. All bodies
//! are JSON; documents use the typed encoding from `document::types`.

use crate::document::types::{Document, ID_FIELD, ObjectId, Value};
use crate::membership::types::MemberIndex;
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Full connection handshake.
pub const ENDPOINT_HELLO: &str = "/internal/hello";
/// Lightweight liveness check used between reconnect attempts.
pub const ENDPOINT_PING: &str = "/internal/ping";
/// Point lookup with projection.
pub const ENDPOINT_FIND: &str = "/internal/find";
/// Public endpoint storing a document in the local store.
pub const ENDPOINT_PUT: &str = "/put";
/// Public endpoint running a collection for a locally stored document.
pub const ENDPOINT_COLLECT: &str = "/collect";

// --- Data Transfer Objects ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloRequest {
    /// Name of the connecting application, for the server's logs.
    pub application: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloResponse {
    pub ok: bool,
}

/// Equality match on `_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdFilter {
    pub id: ObjectId,
}

impl IdFilter {
    pub fn field(&self) -> &'static str {
        ID_FIELD
    }
}

/// Projects one element of an array field.
///
/// The projected document contains only `field`, holding a one-element array
/// with the element at `position` (empty when out of range). A non-array value
/// is returned unchanged, and a missing field yields an empty document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Projection {
    pub field: String,
    pub position: MemberIndex,
}

impl Projection {
    pub fn apply(&self, doc: &Document) -> Document {
        let projected = match doc.get(&self.field) {
            Some(Value::Array(items)) => {
                Value::Array(items.get(self.position).cloned().into_iter().collect())
            }
            Some(other) => other.clone(),
            None => return Document::new(),
        };

        Document::new().with(self.field.clone(), projected)
    }
}

/// Cursor behavior requested from the peer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CursorOptions {
    /// Return immediately instead of waiting for new writes.
    pub tailable: bool,
    /// Serving from a non-primary replica is acceptable.
    pub secondary_ok: bool,
    /// Deliver results on the same connection without extra round trips.
    pub exhaust: bool,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            tailable: true,
            secondary_ok: true,
            exhaust: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FindRequest {
    /// Collection the record lives in.
    pub namespace: String,
    pub filter: IdFilter,
    pub projection: Projection,
    pub options: CursorOptions,
}

/// First (and only) batch of a find.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindResponse {
    pub batch: Vec<Document>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutRequest {
    pub namespace: String,
    pub document: Document,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutResponse {
    pub success: bool,
    /// The stored document's `_id`, generated when the request had none.
    pub id: Option<ObjectId>,
}

/// Result of a collection run triggered over HTTP.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CollectResponse {
    /// The merged document; `None` when the collection failed.
    pub document: Option<Document>,
    /// Origin indices in merge order.
    pub collected: Vec<MemberIndex>,
    /// Peers that contributed no share.
    pub missing: Vec<MemberIndex>,
    pub error: Option<String>,
}
