//! Allocation parameters.
//!
//! Only two knobs exist: how ties are resolved and, for random resolution,
//! the seed. Seat counts and the senate split are data and constants
//! respectively, never parameters.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::rng::TieRng;

/// How an equal best quotient (D'Hont) or an equal vote count at a ranking
/// boundary (fixed split) is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// More total votes first, then the lowest list id.
    #[default]
    DeterministicOrder,
    /// Seeded draw from `AllocationParams::tie_seed`.
    Random,
}

impl fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TiePolicy::DeterministicOrder => "deterministic_order",
            TiePolicy::Random => "random",
        })
    }
}

impl FromStr for TiePolicy {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deterministic_order" | "deterministic" => Ok(TiePolicy::DeterministicOrder),
            "random" => Ok(TiePolicy::Random),
            other => Err(CoreError::InvalidTiePolicy(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationParams {
    pub tie_policy: TiePolicy,
    /// Only read when `tie_policy == Random`.
    pub tie_seed: u64,
}

impl AllocationParams {
    /// A fresh RNG for one allocation call, or `None` for deterministic order.
    ///
    /// Each call starts from the seed so repeated allocations replay exactly.
    pub fn tie_rng(&self) -> Option<TieRng> {
        match self.tie_policy {
            TiePolicy::Random => Some(TieRng::from_seed_u64(self.tie_seed)),
            TiePolicy::DeterministicOrder => None,
        }
    }
}
