//! Local Document Store
//!
//! In-memory storage for this member's copies of split-bearing documents,
//! organised as `namespace -> ObjectId -> Document`. It is the data source
//! for the peer-facing find endpoint.

use super::protocol::FindRequest;
use crate::document::types::{Document, ID_FIELD, ObjectId, Value};

use anyhow::Result;
use dashmap::DashMap;

#[derive(Default)]
pub struct DocumentStore {
    collections: DashMap<String, DashMap<ObjectId, Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
        }
    }

    /// Stores `doc` under its `_id`, replacing any previous version.
    ///
    /// A document without `_id` is given a fresh `ObjectId`; an `_id` of any
    /// other type is rejected.
    pub fn insert(&self, namespace: &str, mut doc: Document) -> Result<ObjectId> {
        if !doc.contains(ID_FIELD) {
            doc.insert(ID_FIELD, Value::ObjectId(ObjectId::new()));
        }
        let oid = doc
            .object_id()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Document `{}` is not an ObjectId", ID_FIELD))?;

        let collection = self
            .collections
            .entry(namespace.to_string())
            .or_default();
        collection.insert(oid.clone(), doc);

        Ok(oid)
    }

    pub fn get(&self, namespace: &str, oid: &ObjectId) -> Option<Document> {
        self.collections
            .get(namespace)
            .and_then(|collection| collection.get(oid).map(|doc| doc.value().clone()))
    }

    /// Answers a point query: the matching record, projected.
    pub fn find(&self, request: &FindRequest) -> Vec<Document> {
        let Some(collection) = self.collections.get(&request.namespace) else {
            return Vec::new();
        };

        collection
            .get(&request.filter.id)
            .map(|entry| request.projection.apply(entry.value()))
            .into_iter()
            .collect()
    }

    pub fn document_count(&self) -> usize {
        self.collections
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }
}
