//! Peer Query Transport
//!
//! Everything that moves data between members: the wire protocol, the client side
//! used by the collector, and the server side every member runs to answer its peers.
//!
//! ## Core Concepts
//! - **Handshake vs. check**: `connect` performs the full `/internal/hello` handshake;
//!   `check_connection` is the cheap `/internal/ping` used while waiting for a peer.
//! - **Point lookup + projection**: a `FindRequest` matches one `_id` and asks for a single
//!   array element, so a peer never ships its whole document.
//! - **First batch only**: a find returns one batch of records; there is no cursor continuation.

pub mod client;
pub mod handlers;
pub mod protocol;
pub mod store;
