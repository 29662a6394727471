//! Error types for split collection.

use crate::membership::types::MemberIndex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("document has no ObjectId in `_id`")]
    MissingObjectId,

    #[error("invariant violated: point lookup on member {member} returned {count} records")]
    MultipleRecords { member: MemberIndex, count: usize },

    #[error("invariant violated: `{field}` from member {member} is {found}, expected array")]
    NotAnArray {
        member: MemberIndex,
        field: String,
        found: &'static str,
    },

    #[error("invariant violated: `{field}` from member {member} is empty")]
    EmptySplits { member: MemberIndex, field: String },

    #[error("invariant violated: split from member {member} is {found}, expected binary")]
    NotBinary {
        member: MemberIndex,
        found: &'static str,
    },

    #[error("invariant violated: local document has no `{0}` field")]
    MissingLocalSplits(String),

    #[error("invariant violated: local document carries {0} splits, expected exactly one")]
    UnexpectedLocalSplits(usize),

    #[error("peer pipeline did not finish: {0}")]
    PeerTask(String),
}

impl CollectError {
    /// True for errors that indicate corrupted data rather than a bad call.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            CollectError::MultipleRecords { .. }
                | CollectError::NotAnArray { .. }
                | CollectError::EmptySplits { .. }
                | CollectError::NotBinary { .. }
                | CollectError::MissingLocalSplits(_)
                | CollectError::UnexpectedLocalSplits(_)
        )
    }
}
