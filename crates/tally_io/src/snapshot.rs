//! In-memory election snapshot and its integrity checks.
//!
//! A snapshot is the whole read side of one election at one point in time:
//! districts, polling stations, lists, candidates and tallies. It is the
//! file-backed `ElectionSource` used by the CLI and the tests.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tally_core::{
    entities::{
        Candidate, District, Office, PartyList, PollingStation, PollingStationTally,
        MAX_DEPUTY_SEATS,
    },
    ids::{DistrictId, ListId, StationId},
    source::{ElectionSource, SourceError},
};

use crate::{IoError, IoResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElectionSnapshot {
    pub districts: Vec<District>,
    #[serde(default)]
    pub stations: Vec<PollingStation>,
    #[serde(default)]
    pub lists: Vec<PartyList>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub tallies: Vec<PollingStationTally>,
}

fn violation(msg: String) -> IoError {
    IoError::Snapshot(msg)
}

/// Insert every id into a set; the first repeat is reported.
fn check_unique<T, K, F>(items: &[T], kind: &str, key: F) -> IoResult<BTreeSet<K>>
where
    K: Ord + Copy + std::fmt::Display,
    F: Fn(&T) -> K,
{
    let mut seen = BTreeSet::new();
    for it in items {
        let k = key(it);
        if !seen.insert(k) {
            return Err(violation(format!("duplicate {kind} id {k}")));
        }
    }
    Ok(seen)
}

impl ElectionSnapshot {
    /// Referential and uniqueness checks. Returns the first violation found.
    pub fn validate(&self) -> IoResult<()> {
        let districts = check_unique(&self.districts, "district", |d| d.id)?;
        check_unique(&self.candidates, "candidate", |c| c.id)?;
        check_unique(&self.tallies, "tally", |t| t.id)?;

        for d in &self.districts {
            match d.deputy_seats {
                Some(0) => {
                    return Err(violation(format!(
                        "district {} declares 0 deputy seats (omit the field instead)",
                        d.id
                    )))
                }
                Some(n) if n > MAX_DEPUTY_SEATS => {
                    return Err(violation(format!(
                        "district {} declares {n} deputy seats (max {MAX_DEPUTY_SEATS})",
                        d.id
                    )))
                }
                _ => {}
            }
        }

        let mut station_district: BTreeMap<StationId, DistrictId> = BTreeMap::new();
        for s in &self.stations {
            if station_district.insert(s.id, s.district_id).is_some() {
                return Err(violation(format!("duplicate station id {}", s.id)));
            }
            if !districts.contains(&s.district_id) {
                return Err(violation(format!(
                    "station {} references unknown district {}",
                    s.id, s.district_id
                )));
            }
        }

        let mut list_district: BTreeMap<ListId, DistrictId> = BTreeMap::new();
        let mut list_keys: BTreeSet<(&str, Office, DistrictId)> = BTreeSet::new();
        for l in &self.lists {
            if list_district.insert(l.id, l.district_id).is_some() {
                return Err(violation(format!("duplicate list id {}", l.id)));
            }
            if !districts.contains(&l.district_id) {
                return Err(violation(format!(
                    "list {} references unknown district {}",
                    l.id, l.district_id
                )));
            }
            if !list_keys.insert((l.name.as_str(), l.office, l.district_id)) {
                return Err(violation(format!(
                    "list {} duplicates name {:?} for {} in district {}",
                    l.id, l.name, l.office, l.district_id
                )));
            }
        }

        let mut ranks: BTreeSet<(ListId, u32)> = BTreeSet::new();
        for c in &self.candidates {
            if !list_district.contains_key(&c.list_id) {
                return Err(violation(format!(
                    "candidate {} references unknown list {}",
                    c.id, c.list_id
                )));
            }
            if c.rank == 0 {
                return Err(violation(format!("candidate {} has rank 0", c.id)));
            }
            if !ranks.insert((c.list_id, c.rank)) {
                return Err(violation(format!(
                    "candidate {} repeats rank {} on list {}",
                    c.id, c.rank, c.list_id
                )));
            }
        }

        let mut pairs: BTreeSet<(StationId, ListId)> = BTreeSet::new();
        for t in &self.tallies {
            let Some(sd) = station_district.get(&t.station_id) else {
                return Err(violation(format!(
                    "tally {} references unknown station {}",
                    t.id, t.station_id
                )));
            };
            let Some(ld) = list_district.get(&t.list_id) else {
                return Err(violation(format!(
                    "tally {} references unknown list {}",
                    t.id, t.list_id
                )));
            };
            if sd != ld {
                return Err(violation(format!(
                    "tally {}: station {} is in district {} but list {} is in district {}",
                    t.id, t.station_id, sd, t.list_id, ld
                )));
            }
            if !pairs.insert((t.station_id, t.list_id)) {
                return Err(violation(format!(
                    "tally {} duplicates station {} / list {}",
                    t.id, t.station_id, t.list_id
                )));
            }
        }

        Ok(())
    }

    /// Sort every collection by id so iteration and serialization are stable.
    pub fn normalize(&mut self) {
        self.districts.sort_by_key(|d| d.id);
        self.stations.sort_by_key(|s| s.id);
        self.lists.sort_by_key(|l| l.id);
        self.candidates.sort_by_key(|c| (c.list_id, c.rank, c.id));
        self.tallies.sort_by_key(|t| t.id);
    }
}

impl ElectionSource for ElectionSnapshot {
    fn district(&self, id: DistrictId) -> Result<Option<District>, SourceError> {
        Ok(self.districts.iter().find(|d| d.id == id).cloned())
    }

    fn districts(&self) -> Result<Vec<District>, SourceError> {
        Ok(self.districts.clone())
    }

    fn lists_for(&self, district: DistrictId, office: Office) -> Result<Vec<PartyList>, SourceError> {
        Ok(self
            .lists
            .iter()
            .filter(|l| l.district_id == district && l.office == office)
            .cloned()
            .collect())
    }

    fn tallies_for_list(&self, list: ListId) -> Result<Vec<PollingStationTally>, SourceError> {
        Ok(self.tallies.iter().filter(|t| t.list_id == list).cloned().collect())
    }

    fn candidates_for_list(&self, list: ListId) -> Result<Vec<Candidate>, SourceError> {
        let mut out: Vec<Candidate> =
            self.candidates.iter().filter(|c| c.list_id == list).cloned().collect();
        out.sort_by_key(|c| (c.rank, c.id));
        Ok(out)
    }

    fn stations_for(&self, district: DistrictId) -> Result<Vec<PollingStation>, SourceError> {
        Ok(self
            .stations
            .iter()
            .filter(|s| s.district_id == district)
            .cloned()
            .collect())
    }
}
