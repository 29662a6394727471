use super::types::SPLITS_FIELD;
use crate::document::types::ObjectId;
use crate::membership::types::MemberIndex;
use crate::transport::protocol::{CursorOptions, FindRequest, IdFilter, Projection};

/// Builds the per-peer point lookups for one record.
#[derive(Debug, Clone)]
pub struct PeerQuery {
    namespace: String,
    oid: ObjectId,
}

impl PeerQuery {
    pub fn new(namespace: impl Into<String>, oid: ObjectId) -> Self {
        Self {
            namespace: namespace.into(),
            oid,
        }
    }

    pub fn object_id(&self) -> &ObjectId {
        &self.oid
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Lookup on `_id` asking `peer` for the split at its own slot.
    pub fn for_peer(&self, peer: MemberIndex) -> FindRequest {
        FindRequest {
            namespace: self.namespace.clone(),
            filter: IdFilter {
                id: self.oid.clone(),
            },
            projection: Projection {
                field: SPLITS_FIELD.to_string(),
                position: peer,
            },
            options: CursorOptions::default(),
        }
    }
}
