use super::types::{Member, MemberIndex};

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MembershipError {
    #[error("membership list is empty")]
    Empty,

    #[error("self index {self_index} out of range for {members} members")]
    SelfOutOfRange {
        self_index: MemberIndex,
        members: usize,
    },

    #[error("member at position {position} has index {index}; indices must be contiguous from 0")]
    NonContiguous {
        position: usize,
        index: MemberIndex,
    },

    #[error("endpoint {0} listed more than once")]
    DuplicateEndpoint(SocketAddr),
}

/// What the collector needs to know about the cluster.
pub trait MembershipView: Send + Sync {
    /// All members, ordered by index.
    fn members(&self) -> Vec<Member>;

    fn self_index(&self) -> MemberIndex;

    /// Every member except self, ascending by index.
    fn peers(&self) -> Vec<Member> {
        let self_index = self.self_index();
        self.members()
            .into_iter()
            .filter(|member| member.index != self_index)
            .collect()
    }
}

/// A fixed, validated membership list.
#[derive(Debug, Clone)]
pub struct StaticMembership {
    members: Vec<Member>,
    self_index: MemberIndex,
}

impl StaticMembership {
    /// Builds a view where each endpoint's position is its index.
    pub fn new(
        endpoints: Vec<SocketAddr>,
        self_index: MemberIndex,
    ) -> Result<Self, MembershipError> {
        let members = endpoints
            .into_iter()
            .enumerate()
            .map(|(index, endpoint)| Member { index, endpoint })
            .collect();

        Self::from_members(members, self_index)
    }

    /// Builds a view from explicit member records, which must already be
    /// ordered with indices `0..N-1`.
    pub fn from_members(
        members: Vec<Member>,
        self_index: MemberIndex,
    ) -> Result<Self, MembershipError> {
        if members.is_empty() {
            return Err(MembershipError::Empty);
        }
        if self_index >= members.len() {
            return Err(MembershipError::SelfOutOfRange {
                self_index,
                members: members.len(),
            });
        }

        let mut seen = HashSet::new();
        for (position, member) in members.iter().enumerate() {
            if member.index != position {
                return Err(MembershipError::NonContiguous {
                    position,
                    index: member.index,
                });
            }
            if !seen.insert(member.endpoint) {
                return Err(MembershipError::DuplicateEndpoint(member.endpoint));
            }
        }

        Ok(Self {
            members,
            self_index,
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn local_member(&self) -> &Member {
        &self.members[self.self_index]
    }
}

impl MembershipView for StaticMembership {
    fn members(&self) -> Vec<Member> {
        self.members.clone()
    }

    fn self_index(&self) -> MemberIndex {
        self.self_index
    }
}
