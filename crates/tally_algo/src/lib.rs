// crates/tally_algo/src/lib.rs
#![forbid(unsafe_code)]

use thiserror::Error;

pub use tally_core::{determinism::VoteRanked, ids::ListId};

// ----------------------------- Canonical per-list votes -------------------------------

/// Aggregated votes of one list for one office. Lists with `votes == 0` do
/// not compete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListVotes {
    pub list_id: ListId,
    pub votes: u64,
}

impl ListVotes {
    pub fn new(list_id: ListId, votes: u64) -> Self {
        Self { list_id, votes }
    }
}

impl VoteRanked for ListVotes {
    fn votes(&self) -> u64 {
        self.votes
    }
    fn list_id(&self) -> ListId {
        self.list_id
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocError {
    /// Policy was Random but no RNG was supplied (and seats > 0).
    #[error("tie policy is random but no tie RNG was supplied")]
    MissingRngForRandomPolicy,
    /// The same list appeared twice among the contenders.
    #[error("list {0} appears more than once among contenders")]
    DuplicateList(ListId),
    /// Seat count above `MAX_DEPUTY_SEATS`.
    #[error("{seats} seats requested, at most {max} can be allocated")]
    TooManySeats { seats: u32, max: u32 },
}

// ----------------------------- Aggregation & ranking -----------------------------------

pub mod aggregate;
pub mod candidates;

pub use aggregate::{competing_lists, list_votes, TallyBreakdown};
pub use candidates::{elect_by_rank, Elected};

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    pub mod dhondt;
    pub mod fixed_split;

    pub use dhondt::{allocate_dhondt, DhondtOutcome, DhondtRound};
    pub use fixed_split::{allocate_fixed_split, FixedSplitOutcome, SENATE_SPLIT};
}
