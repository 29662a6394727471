//! Split Collector Library
//!
//! Reassembles a value whose shares are spread across the members of a replica
//! set. Every member keeps, on its copy of a record, the split it produced at
//! the array slot matching its ordinal index; collecting fetches each peer's
//! split and merges them into the caller's copy.
//!
//! ## Architecture Modules
//! - **`collector`**: the collection pipeline (connect, query, extract, accumulate, merge)
//!   and `SplitCollector`, which runs it for every peer.
//! - **`config`**: tuning for the pipeline (timeouts, backoff, deadlines) and node startup options.
//! - **`document`**: the ordered, typed document model records are stored and shipped in.
//! - **`membership`**: the read-only member list and self index the collector works from.
//! - **`transport`**: the peer protocol, its HTTP client and the endpoints every member serves.

pub mod collector;
pub mod config;
pub mod document;
pub mod membership;
pub mod transport;
