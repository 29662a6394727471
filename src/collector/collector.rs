//! Split Collector
//!
//! Drives one collection: a connect -> query -> extract pipeline per peer,
//! then a single merge once every pipeline has settled.
//!
//! ## Responsibilities
//! - **Fan-out**: one pipeline per peer, concurrently on a `JoinSet` (or one after another
//!   when `concurrent` is off).
//! - **Bounding**: each pipeline races the per-peer deadline and the cancellation signal;
//!   losing either turns that peer into a missing share.
//! - **Merge**: the caller's document is rebuilt only after all pipelines are done.
//!
//! A collector is consumed by `collect`, so a document is merged at most once per
//! collector. Feeding an already merged document into a new collector is rejected
//! by the merge step.

use super::accumulator::ShareAccumulator;
use super::connector::connect_with_retry;
use super::error::CollectError;
use super::extract::extract_share;
use super::merge::merge_splits;
use super::query::PeerQuery;
use super::types::{CollectOutcome, CollectReport, Share};
use crate::config::CollectorConfig;
use crate::document::types::{Document, ObjectId};
use crate::membership::types::{Member, MemberIndex};
use crate::membership::view::MembershipView;
use crate::transport::client::Transport;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Stops a running collection; peers that have not answered yet count as missing.
#[derive(Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

pub struct SplitCollector<M, T> {
    membership: Arc<M>,
    transport: Arc<T>,
    config: Arc<CollectorConfig>,
    query: Arc<PeerQuery>,
    document: Document,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel_rx: watch::Receiver<bool>,
}

impl<M, T> SplitCollector<M, T>
where
    M: MembershipView,
    T: Transport,
{
    /// Prepares a collection for `document`, whose `_id` names the record to
    /// collect.
    pub fn new(
        membership: Arc<M>,
        transport: Arc<T>,
        namespace: impl Into<String>,
        document: Document,
        config: CollectorConfig,
    ) -> Result<Self, CollectError> {
        let oid = document
            .object_id()
            .cloned()
            .ok_or(CollectError::MissingObjectId)?;
        let query = PeerQuery::new(namespace, oid);

        tracing::info!(
            "SplitCollector for {} in '{}' (self={})",
            query.object_id(),
            query.namespace(),
            membership.self_index()
        );

        let (cancel_tx, cancel_rx) = watch::channel(false);

        Ok(Self {
            membership,
            transport,
            config: Arc::new(config),
            query: Arc::new(query),
            document,
            cancel_tx: Arc::new(cancel_tx),
            cancel_rx,
        })
    }

    pub fn object_id(&self) -> &ObjectId {
        self.query.object_id()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: self.cancel_tx.clone(),
        }
    }

    /// Collects every reachable peer's share and returns the merged document.
    pub async fn collect(self) -> Result<CollectOutcome, CollectError> {
        let self_index = self.membership.self_index();
        let peers = self.membership.peers();
        tracing::info!(
            "Collecting {} from {} peer(s) of {} member(s)",
            self.query.object_id(),
            peers.len(),
            self.membership.members().len()
        );

        let accumulator = Arc::new(ShareAccumulator::new());
        let mut missing = Vec::new();

        if self.config.concurrent {
            let mut tasks = JoinSet::new();
            for (slot, peer) in peers.iter().cloned().enumerate() {
                let pipeline = PeerPipeline {
                    transport: self.transport.clone(),
                    query: self.query.clone(),
                    config: self.config.clone(),
                    cancel: self.cancel_rx.clone(),
                    accumulator: accumulator.clone(),
                };
                tasks.spawn(async move {
                    let member = peer.index;
                    (member, pipeline.run(slot, peer).await)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                let (member, result) =
                    joined.map_err(|e| CollectError::PeerTask(e.to_string()))?;
                // Returning drops the JoinSet, which aborts the remaining pipelines.
                if !result? {
                    missing.push(member);
                }
            }
            missing.sort_unstable();
        } else {
            for (slot, peer) in peers.iter().cloned().enumerate() {
                let pipeline = PeerPipeline {
                    transport: self.transport.clone(),
                    query: self.query.clone(),
                    config: self.config.clone(),
                    cancel: self.cancel_rx.clone(),
                    accumulator: accumulator.clone(),
                };
                let member = peer.index;
                if !pipeline.run(slot, peer).await? {
                    missing.push(member);
                }
            }
        }

        let collected = accumulator.drain();
        let mut order: Vec<MemberIndex> = collected.iter().map(|share| share.origin).collect();
        order.push(self_index);

        let document = merge_splits(&self.document, collected, self_index)?;

        if missing.is_empty() {
            tracing::info!("Collected all {} split(s)", order.len());
        } else {
            tracing::warn!(
                "Collected {} split(s); missing members {:?}",
                order.len(),
                missing
            );
        }

        Ok(CollectOutcome {
            document,
            report: CollectReport {
                collected: order,
                missing,
            },
        })
    }
}

/// Everything one peer's pipeline needs, owned so it can run on its own task.
struct PeerPipeline<T> {
    transport: Arc<T>,
    query: Arc<PeerQuery>,
    config: Arc<CollectorConfig>,
    cancel: watch::Receiver<bool>,
    accumulator: Arc<ShareAccumulator>,
}

impl<T: Transport> PeerPipeline<T> {
    /// Returns whether the peer contributed a share.
    async fn run(mut self, slot: usize, peer: Member) -> Result<bool, CollectError> {
        if *self.cancel.borrow() {
            tracing::warn!("Collection cancelled before member {} was contacted", peer.index);
            return Ok(false);
        }

        let fetch = fetch_share(self.transport.as_ref(), &self.query, &self.config, &peer);
        let outcome = tokio::select! {
            biased;

            _ = cancelled(&mut self.cancel) => {
                tracing::warn!("Collection cancelled before member {} answered", peer.index);
                None
            }
            _ = deadline(self.config.peer_deadline) => {
                tracing::warn!("Member {} did not answer before the deadline", peer.index);
                None
            }
            result = fetch => result?,
        };

        match outcome {
            Some(share) => {
                self.accumulator.push(slot, share);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Connect, query and extract for a single peer.
///
/// A failed query is logged and counted as a missing share; it is not re-issued.
async fn fetch_share<T: Transport>(
    transport: &T,
    query: &PeerQuery,
    config: &CollectorConfig,
    peer: &Member,
) -> Result<Option<Share>, CollectError> {
    let Some(conn) = connect_with_retry(transport, peer.endpoint, config).await else {
        return Ok(None);
    };

    let request = query.for_peer(peer.index);
    tracing::debug!(
        "Querying member {} for {}[{}]",
        peer.index,
        request.projection.field,
        request.projection.position
    );

    match transport.find(&conn, &request).await {
        Ok(batch) => extract_share(batch, peer.index),
        Err(e) => {
            tracing::warn!("Query to member {} failed: {}", peer.index, e);
            Ok(None)
        }
    }
}

async fn deadline(limit: Option<Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let closed = cancel.wait_for(|cancelled| *cancelled).await.is_err();
    if closed {
        // Sender gone: nobody can cancel anymore.
        std::future::pending::<()>().await;
    }
}
