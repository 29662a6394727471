use crate::membership::types::MemberIndex;
use crate::document::types::Document;

/// Field holding one split slot per member, in index order.
pub const SPLITS_FIELD: &str = "splits";

/// One member's binary contribution, tagged with the member that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub data: Vec<u8>,
    pub origin: MemberIndex,
}

/// What a collection run gathered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectReport {
    /// Origin indices in merge order: contacted peers ascending, self last.
    pub collected: Vec<MemberIndex>,
    /// Peers that contributed nothing (missing field, unreachable, cancelled, query failed).
    pub missing: Vec<MemberIndex>,
}

impl CollectReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CollectOutcome {
    pub document: Document,
    pub report: CollectReport,
}
