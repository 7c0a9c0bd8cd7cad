//! ALLOCATE: seat allocation for one district and office.
//!
//! Steps, in order:
//! 1. office is already a closed enum (string input goes through `parse_office`)
//! 2. district lookup → `DistrictNotFound`
//! 3. seat count for the office → `SeatsUndefined` (senate is always 3)
//! 4. aggregate tallies per list; zero-vote lists drop out. None left →
//!    "no competing lists" result, not an error
//! 5. D'Hont (deputies) or fixed 2-1 split (senators)
//! 6. elected candidates per list, flagging short slates
//! 7. order by seats desc, votes desc, list id asc
//!
//! Totals are recomputed from raw tallies on every call; nothing is cached.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use tally_algo::{
    allocation::{allocate_dhondt, allocate_fixed_split},
    competing_lists, elect_by_rank, list_votes, ListVotes, VoteRanked,
};
use tally_core::{
    determinism::cmp_seats_then_votes_desc,
    entities::{Office, PartyList},
    ids::{CandidateId, DistrictId, ListId},
    rounding::Percent,
    source::ElectionSource,
    variables::AllocationParams,
};

use crate::{parse_office, PipelineError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    Dhondt,
    FixedSplit,
}

impl AllocationMethod {
    pub fn for_office(office: Office) -> Self {
        match office {
            Office::Deputies => AllocationMethod::Dhondt,
            Office::Senators => AllocationMethod::FixedSplit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ElectedCandidate {
    pub id: CandidateId,
    pub name: String,
    pub rank: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListAllocation {
    pub list_id: ListId,
    pub name: String,
    pub alliance: Option<String>,
    pub votes: u64,
    pub seats_won: u32,
    /// Ascending rank.
    pub elected: Vec<ElectedCandidate>,
    pub insufficient_candidates: bool,
    /// Share of the district's competing votes.
    pub vote_pct: Percent,
    /// Share of the seats available.
    pub seat_pct: Percent,
}

impl VoteRanked for ListAllocation {
    fn votes(&self) -> u64 {
        self.votes
    }
    fn list_id(&self) -> ListId {
        self.list_id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeatAllocationResult {
    pub district_id: DistrictId,
    pub district_name: String,
    pub office: Office,
    pub method: AllocationMethod,
    pub seats_available: u32,
    pub seats_awarded: u32,
    /// Sum of competing lists' votes.
    pub total_votes: u64,
    pub no_competing_lists: bool,
    /// Some seat (or senate rank boundary) was settled by the tie policy.
    pub tie_decided: bool,
    /// Competing lists only.
    pub lists: Vec<ListAllocation>,
}

/// One row of a batch run. Exactly one of `result` / `error` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistrictAllocationOutcome {
    pub district_id: DistrictId,
    pub district_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SeatAllocationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct DistrictSeatAllocationService<S> {
    source: S,
    params: AllocationParams,
}

impl<S: ElectionSource> DistrictSeatAllocationService<S> {
    pub fn new(source: S) -> Self {
        Self::with_params(source, AllocationParams::default())
    }

    pub fn with_params(source: S, params: AllocationParams) -> Self {
        Self { source, params }
    }

    /// `allocate` with the office given as a raw token.
    pub fn allocate_by_name(
        &self,
        district: DistrictId,
        office: &str,
    ) -> Result<SeatAllocationResult, PipelineError> {
        let office = parse_office(office)?;
        self.allocate(district, office)
    }

    pub fn allocate(
        &self,
        district_id: DistrictId,
        office: Office,
    ) -> Result<SeatAllocationResult, PipelineError> {
        let span = info_span!("allocate", district = %district_id, %office);
        let _guard = span.enter();

        let district = self
            .source
            .district(district_id)?
            .ok_or(PipelineError::DistrictNotFound(district_id))?;
        let seats = district
            .seats_for(office)
            .ok_or(PipelineError::SeatsUndefined { district: district_id, office })?;

        // Registered lists, canonical order, keyed for metadata lookup.
        let lists: BTreeMap<ListId, PartyList> = self
            .source
            .lists_for(district_id, office)?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        let mut totals: Vec<ListVotes> = Vec::with_capacity(lists.len());
        for id in lists.keys() {
            let tallies = self.source.tallies_for_list(*id)?;
            totals.push(list_votes(*id, &tallies, office));
        }
        let competing = competing_lists(totals);
        let total_votes = competing.iter().fold(0u64, |acc, lv| acc.saturating_add(lv.votes));

        let method = AllocationMethod::for_office(office);
        let mut result = SeatAllocationResult {
            district_id,
            district_name: district.name.clone(),
            office,
            method,
            seats_available: seats,
            seats_awarded: 0,
            total_votes,
            no_competing_lists: competing.is_empty(),
            tie_decided: false,
            lists: Vec::new(),
        };

        if competing.is_empty() {
            info!(seats, registered = lists.len(), "no competing lists");
            return Ok(result);
        }

        let (seats_by_list, tie_decided) = self.run_method(method, seats, &competing)?;
        result.tie_decided = tie_decided;

        let mut rows: Vec<(u32, ListAllocation)> = Vec::with_capacity(competing.len());
        for lv in &competing {
            let Some(meta) = lists.get(&lv.list_id) else {
                continue;
            };
            let seats_won = seats_by_list.get(&lv.list_id).copied().unwrap_or(0);
            let candidates = self.source.candidates_for_list(lv.list_id)?;
            let elected = elect_by_rank(&candidates, seats_won);
            if elected.insufficient {
                warn!(
                    list = %lv.list_id,
                    seats_won,
                    candidates = candidates.len(),
                    "list won more seats than it has candidates"
                );
            }
            rows.push((
                seats_won,
                ListAllocation {
                    list_id: lv.list_id,
                    name: meta.name.clone(),
                    alliance: meta.alliance.clone(),
                    votes: lv.votes,
                    seats_won,
                    elected: elected
                        .candidates
                        .into_iter()
                        .map(|c| ElectedCandidate { id: c.id, name: c.name, rank: c.rank })
                        .collect(),
                    insufficient_candidates: elected.insufficient,
                    vote_pct: Percent::of(lv.votes, total_votes),
                    seat_pct: Percent::of(u64::from(seats_won), u64::from(seats)),
                },
            ));
        }
        rows.sort_by(|(sa, a), (sb, b)| cmp_seats_then_votes_desc(*sa, a, *sb, b));

        result.seats_awarded = rows.iter().map(|(s, _)| *s).sum();
        result.lists = rows.into_iter().map(|(_, row)| row).collect();

        info!(
            seats,
            awarded = result.seats_awarded,
            competing = result.lists.len(),
            total_votes,
            tie_decided,
            "district allocated"
        );
        Ok(result)
    }

    fn run_method(
        &self,
        method: AllocationMethod,
        seats: u32,
        competing: &[ListVotes],
    ) -> Result<(BTreeMap<ListId, u32>, bool), PipelineError> {
        // Fresh stream per call so a repeated allocation replays exactly.
        let mut rng = self.params.tie_rng();
        let policy = self.params.tie_policy;

        match method {
            AllocationMethod::Dhondt => {
                let out = allocate_dhondt(seats, competing, policy, rng.as_mut())?;
                for r in &out.rounds {
                    debug!(seat = r.seat, winner = %r.winner, votes = r.votes, divisor = r.divisor, "dhondt round");
                    if r.tied.len() > 1 {
                        debug!(seat = r.seat, tied = ?r.tied, winner = %r.winner, %policy, "quotient tie resolved");
                    }
                }
                Ok((out.seats, out.tie_decided))
            }
            AllocationMethod::FixedSplit => {
                let out = allocate_fixed_split(competing, policy, rng.as_mut())?;
                if out.tie_decided {
                    debug!(ranking = ?out.ranking, %policy, "senate rank tie resolved");
                }
                Ok((out.seats, out.tie_decided))
            }
        }
    }

    /// `allocate` for every district, ascending id.
    ///
    /// Business-rule failures (e.g. no deputy seats configured) are recorded on
    /// the row and the batch continues; source and allocation failures abort.
    pub fn allocate_all(&self, office: Office) -> Result<Vec<DistrictAllocationOutcome>, PipelineError> {
        let mut districts = self.source.districts()?;
        districts.sort_by_key(|d| d.id);
        districts.dedup_by_key(|d| d.id);

        let mut out = Vec::with_capacity(districts.len());
        for d in districts {
            let row = match self.allocate(d.id, office) {
                Ok(r) => DistrictAllocationOutcome {
                    district_id: d.id,
                    district_name: d.name,
                    result: Some(r),
                    error: None,
                },
                Err(e) if e.is_business_rule() => {
                    info!(district = %d.id, %office, error = %e, "district skipped");
                    DistrictAllocationOutcome {
                        district_id: d.id,
                        district_name: d.name,
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
                Err(e) => return Err(e),
            };
            out.push(row);
        }
        Ok(out)
    }
}
