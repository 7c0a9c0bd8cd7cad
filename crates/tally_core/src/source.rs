//! Read-only data-access seam.
//!
//! The pipeline is generic over `ElectionSource`; persistence lives on the
//! other side of it. Implementations must return a consistent snapshot for
//! the duration of one call and must not require `&mut self`.

use thiserror::Error;

use crate::entities::{Candidate, District, Office, PartyList, PollingStation, PollingStationTally};
use crate::ids::{DistrictId, ListId};

/// Opaque infrastructure failure reported by a data source. The engine does
/// not interpret, retry or suppress it.
#[derive(Debug, Error)]
#[error("data source error: {message}")]
pub struct SourceError {
    pub message: String,
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), cause: None }
    }
}

pub trait ElectionSource {
    fn district(&self, id: DistrictId) -> Result<Option<District>, SourceError>;

    /// All districts, any order.
    fn districts(&self) -> Result<Vec<District>, SourceError>;

    /// Lists registered for `office` in `district`, any order.
    fn lists_for(&self, district: DistrictId, office: Office) -> Result<Vec<PartyList>, SourceError>;

    fn tallies_for_list(&self, list: ListId) -> Result<Vec<PollingStationTally>, SourceError>;

    /// Candidates of `list`, ascending by rank.
    fn candidates_for_list(&self, list: ListId) -> Result<Vec<Candidate>, SourceError>;

    fn stations_for(&self, district: DistrictId) -> Result<Vec<PollingStation>, SourceError>;
}

impl<S: ElectionSource + ?Sized> ElectionSource for &S {
    fn district(&self, id: DistrictId) -> Result<Option<District>, SourceError> {
        (**self).district(id)
    }
    fn districts(&self) -> Result<Vec<District>, SourceError> {
        (**self).districts()
    }
    fn lists_for(&self, district: DistrictId, office: Office) -> Result<Vec<PartyList>, SourceError> {
        (**self).lists_for(district, office)
    }
    fn tallies_for_list(&self, list: ListId) -> Result<Vec<PollingStationTally>, SourceError> {
        (**self).tallies_for_list(list)
    }
    fn candidates_for_list(&self, list: ListId) -> Result<Vec<Candidate>, SourceError> {
        (**self).candidates_for_list(list)
    }
    fn stations_for(&self, district: DistrictId) -> Result<Vec<PollingStation>, SourceError> {
        (**self).stations_for(district)
    }
}
