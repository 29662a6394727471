//! Membership View
//!
//! Read-only view of the replica set a collection runs against: the ordered
//! member list and which ordinal is "self".
//!
//! ## Core Concepts
//! - **Ordinal index**: a member's fixed position `0..N-1`; it addresses the member on the
//!   network and keys the member's slot in every split array.
//! - **Self exclusion**: `peers()` is every member except self, in ascending index order.
//!
//! Discovery and health tracking live outside this crate; callers hand in a
//! ready-made member list.

pub mod types;
pub mod view;
