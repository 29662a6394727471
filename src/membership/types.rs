use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Ordinal position of a member in the membership list.
pub type MemberIndex = usize;

/// A single member of the replica set.
///
/// `index` doubles as the array slot the member writes its own split into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub index: MemberIndex,
    pub endpoint: SocketAddr,
}
