//! Tally aggregation: raw polling-station counts → per-list totals.
//!
//! Contract:
//! - A list's total for an office is the sum of that office's vote field over
//!   every tally of the list. Plain integer summation, no floats.
//! - Lists whose total is zero are "not competing" and are dropped before
//!   allocation.
//! - Output order is canonical (ascending list id) regardless of input order.

use std::collections::{BTreeMap, BTreeSet};

use tally_core::{
    entities::{Office, PollingStationTally},
    ids::{ListId, StationId},
};

use crate::ListVotes;

/// Total for one list. Tallies that belong to another list are ignored.
pub fn list_votes(list_id: ListId, tallies: &[PollingStationTally], office: Office) -> ListVotes {
    let votes = tallies
        .iter()
        .filter(|t| t.list_id == list_id)
        .fold(0u64, |acc, t| acc.saturating_add(t.votes_for(office)));
    ListVotes { list_id, votes }
}

/// Keep lists with a nonzero total, merged by id and in ascending id order.
pub fn competing_lists<I>(totals: I) -> Vec<ListVotes>
where
    I: IntoIterator<Item = ListVotes>,
{
    let mut merged: BTreeMap<ListId, u64> = BTreeMap::new();
    for lv in totals {
        let e = merged.entry(lv.list_id).or_insert(0);
        *e = e.saturating_add(lv.votes);
    }
    merged
        .into_iter()
        .filter(|&(_, v)| v > 0)
        .map(|(list_id, votes)| ListVotes { list_id, votes })
        .collect()
}

/// Valid/invalid split over a set of tallies for one office.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TallyBreakdown {
    pub valid: u64,
    pub blank: u64,
    pub null: u64,
    pub contested: u64,
    pub tallies: u64,
    pub stations: BTreeSet<StationId>,
}

impl TallyBreakdown {
    pub fn from_tallies<'a, I>(tallies: I, office: Office) -> Self
    where
        I: IntoIterator<Item = &'a PollingStationTally>,
    {
        let mut b = TallyBreakdown::default();
        for t in tallies {
            b.add(t, office);
        }
        b
    }

    pub fn add(&mut self, t: &PollingStationTally, office: Office) {
        self.valid = self.valid.saturating_add(t.votes_for(office));
        self.blank = self.blank.saturating_add(t.blank_votes);
        self.null = self.null.saturating_add(t.null_votes);
        self.contested = self.contested.saturating_add(t.contested_votes);
        self.tallies += 1;
        self.stations.insert(t.station_id);
    }

    pub fn merge(&mut self, other: &TallyBreakdown) {
        self.valid = self.valid.saturating_add(other.valid);
        self.blank = self.blank.saturating_add(other.blank);
        self.null = self.null.saturating_add(other.null);
        self.contested = self.contested.saturating_add(other.contested);
        self.tallies += other.tallies;
        self.stations.extend(other.stations.iter().copied());
    }

    /// Blank + null + contested.
    pub fn invalid(&self) -> u64 {
        self.blank.saturating_add(self.null).saturating_add(self.contested)
    }

    /// Valid + invalid.
    pub fn emitted(&self) -> u64 {
        self.valid.saturating_add(self.invalid())
    }
}
