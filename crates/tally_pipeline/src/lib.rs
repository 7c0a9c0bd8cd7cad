//! tally_pipeline — orchestration over an `ElectionSource`.
//!
//! - `allocate`: DistrictSeatAllocationService (validate → aggregate → allocate
//!   → rank candidates → order).
//! - `results`: ResultsAggregationService (national totals, ranking,
//!   participation, district statistics and summaries).
//!
//! Stays I/O-free: data arrives through the source trait and results are
//! plain serializable values.

#![forbid(unsafe_code)]

use thiserror::Error;

pub use tally_algo::AllocError;
use tally_core::{
    entities::Office,
    ids::DistrictId,
    source::SourceError,
};

pub mod allocate;
pub mod results;

pub use allocate::{
    DistrictAllocationOutcome, DistrictSeatAllocationService, ElectedCandidate, ListAllocation,
    AllocationMethod, SeatAllocationResult,
};
pub use results::{
    DistrictListTotal, DistrictStatistics, DistrictSummary, NationalRanking,
    NationalResultsSummary, Participation, RankingEntry, ResultsAggregationService, VoteSplit,
};

/// Single error surface for the services.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid office {0:?} (expected deputies or senators)")]
    InvalidOffice(String),

    #[error("district {0} not found")]
    DistrictNotFound(DistrictId),

    #[error("district {district} has no seat count defined for {office}")]
    SeatsUndefined { district: DistrictId, office: Office },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("allocation failed: {0}")]
    Allocate(#[from] AllocError),
}

impl PipelineError {
    /// Bad input or missing configuration, as opposed to an infrastructure
    /// or internal failure.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidOffice(_)
                | PipelineError::DistrictNotFound(_)
                | PipelineError::SeatsUndefined { .. }
        )
    }
}

/// Parse an office token at the boundary.
pub fn parse_office(raw: &str) -> Result<Office, PipelineError> {
    raw.parse::<Office>()
        .map_err(|_| PipelineError::InvalidOffice(raw.to_owned()))
}
