#![allow(dead_code)]

use tally_core::{
    entities::{Candidate, District, Office, PartyList, PollingStation, PollingStationTally},
    ids::{CandidateId, DistrictId, ListId, StationId, TallyId},
    source::{ElectionSource, SourceError},
};
use tally_io::snapshot::ElectionSnapshot;

/// Builder over `ElectionSnapshot` for scenario tests.
#[derive(Default)]
pub struct Scenario {
    pub snap: ElectionSnapshot,
    next_tally: u64,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn district(mut self, id: u64, name: &str, deputy_seats: Option<u32>) -> Self {
        self.snap.districts.push(District {
            id: DistrictId(id),
            name: name.into(),
            deputy_seats,
            senator_seats: 3,
        });
        self
    }

    pub fn station(mut self, id: u64, district: u64, electors: u64) -> Self {
        self.snap.stations.push(PollingStation {
            id: StationId(id),
            district_id: DistrictId(district),
            circuit: format!("C{id}"),
            establishment: format!("School {id}"),
            electors,
        });
        self
    }

    pub fn list(mut self, id: u64, district: u64, office: Office, name: &str) -> Self {
        self.snap.lists.push(PartyList {
            id: ListId(id),
            name: name.into(),
            alliance: None,
            office,
            district_id: DistrictId(district),
        });
        self
    }

    /// `count` candidates ranked 1..=count; ids are `list * 100 + rank`.
    pub fn candidates(mut self, list: u64, count: u32) -> Self {
        for rank in 1..=count {
            self.snap.candidates.push(Candidate {
                id: CandidateId(list * 100 + u64::from(rank)),
                name: format!("L{list} #{rank}"),
                rank,
                list_id: ListId(list),
            });
        }
        self
    }

    /// One tally; `votes` lands in the field for `office`.
    pub fn tally(mut self, station: u64, list: u64, office: Office, votes: u64) -> Self {
        self.tally_full(station, list, office, votes, [0, 0, 0]);
        self
    }

    /// `invalid` = [blank, null, contested].
    pub fn tally_full(
        &mut self,
        station: u64,
        list: u64,
        office: Office,
        votes: u64,
        invalid: [u64; 3],
    ) -> &mut Self {
        self.next_tally += 1;
        let (deputy_votes, senator_votes) = match office {
            Office::Deputies => (votes, 0),
            Office::Senators => (0, votes),
        };
        self.snap.tallies.push(PollingStationTally {
            id: TallyId(self.next_tally),
            station_id: StationId(station),
            list_id: ListId(list),
            deputy_votes,
            senator_votes,
            blank_votes: invalid[0],
            null_votes: invalid[1],
            contested_votes: invalid[2],
            submitted_by: None,
            submitted_at: None,
        });
        self
    }

    pub fn build(mut self) -> ElectionSnapshot {
        self.snap.validate().expect("scenario snapshot must be valid");
        self.snap.normalize();
        self.snap
    }
}

/// District 1 "Capital" with the textbook four lists, both offices, 10 deputy
/// seats, three candidates per list.
pub fn textbook() -> ElectionSnapshot {
    let mut s = Scenario::new()
        .district(1, "Capital", Some(10))
        .station(1, 1, 1000)
        .station(2, 1, 500);
    for (i, (name, votes)) in [("A", 390u64), ("B", 310), ("C", 255), ("D", 97)].into_iter().enumerate() {
        let dep = 10 + i as u64;
        let sen = 20 + i as u64;
        s = s
            .list(dep, 1, Office::Deputies, name)
            .list(sen, 1, Office::Senators, name)
            .candidates(dep, 5)
            .candidates(sen, 2)
            // Split across two stations so aggregation is exercised.
            .tally(1, dep, Office::Deputies, votes - votes / 3)
            .tally(2, dep, Office::Deputies, votes / 3)
            .tally(1, sen, Office::Senators, votes);
    }
    s.build()
}

/// Every call fails; the pipeline must surface it unchanged.
pub struct BrokenSource;

impl ElectionSource for BrokenSource {
    fn district(&self, _id: DistrictId) -> Result<Option<District>, SourceError> {
        Err(SourceError::new("storage unavailable"))
    }
    fn districts(&self) -> Result<Vec<District>, SourceError> {
        Err(SourceError::new("storage unavailable"))
    }
    fn lists_for(&self, _d: DistrictId, _o: Office) -> Result<Vec<PartyList>, SourceError> {
        Err(SourceError::new("storage unavailable"))
    }
    fn tallies_for_list(&self, _l: ListId) -> Result<Vec<PollingStationTally>, SourceError> {
        Err(SourceError::new("storage unavailable"))
    }
    fn candidates_for_list(&self, _l: ListId) -> Result<Vec<Candidate>, SourceError> {
        Err(SourceError::new("storage unavailable"))
    }
    fn stations_for(&self, _d: DistrictId) -> Result<Vec<PollingStation>, SourceError> {
        Err(SourceError::new("storage unavailable"))
    }
}
