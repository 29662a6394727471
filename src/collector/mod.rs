//! Split Collection Module
//!
//! Gathers, from every other member of the replica set, the split that member
//! produced for a given record, and merges them with the local split into one
//! document.
//!
//! ## Pipeline
//! 1. **Connect** (`connector`): reach the peer, retrying with backoff until it answers.
//! 2. **Query** (`query`): point lookup on `_id`, projecting the peer's own slot of the
//!    splits array.
//! 3. **Extract** (`extract`): validate the single returned record and pull out the share.
//! 4. **Accumulate** (`accumulator`): concurrent peers drop their shares into one sink.
//! 5. **Merge** (`merge`): rebuild the splits field as `[share, originIndex]` pairs,
//!    peers first and self last, leaving every other field untouched.
//!
//! ## Failure model
//! Unreachable or silent peers only cost their share. Malformed data (wrong types,
//! more than one record for a point lookup, a broken local document) fails the whole
//! collection with an invariant error.
//!
//! ## Submodules
//! - **`collector`**: `SplitCollector`, which drives the pipeline for all peers.
//! - **`handlers`**: HTTP entry point running a collection for a stored document.

pub mod accumulator;
pub mod collector;
pub mod connector;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod merge;
pub mod query;
pub mod types;
