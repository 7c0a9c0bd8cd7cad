//! tally_core — Core types, domains, ordering helpers, and deterministic RNG.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`tally_io`, `tally_algo`, `tally_pipeline`, `tally_cli`).
//!
//! - Strongly typed ids: `DistrictId`, `ListId`, `CandidateId`, `StationId`, `TallyId`
//! - Entities read from the excluded administrative side (districts, lists, candidates, tallies)
//! - `Office`: closed two-member enum, parsed once at the boundary
//! - Integer-first percentages (`Percent`, hundredths)
//! - Seedable RNG (ChaCha20) for **ties only**
//! - `ElectionSource`: the read-only data-access seam the pipeline consumes

#![forbid(unsafe_code)]

pub mod determinism;
pub mod entities;
pub mod ids;
pub mod rng;
pub mod rounding;
pub mod source;
pub mod variables;

pub mod errors {
    use thiserror::Error;

    /// Minimal error set for core-domain parsing.
    #[derive(Clone, Debug, Eq, PartialEq, Error)]
    pub enum CoreError {
        #[error("invalid id: {0}")]
        InvalidId(String),
        #[error("invalid office: {0:?} (expected deputies or senators)")]
        InvalidOffice(String),
        #[error("invalid tie policy: {0:?}")]
        InvalidTiePolicy(String),
    }
}

pub use entities::{
    Candidate, District, Office, PartyList, PollingStation, PollingStationTally, FIXED_SENATE_SEATS,
};
pub use errors::CoreError;
pub use ids::{CandidateId, DistrictId, ListId, StationId, TallyId};
pub use rounding::Percent;
pub use source::{ElectionSource, SourceError};
pub use variables::{AllocationParams, TiePolicy};
