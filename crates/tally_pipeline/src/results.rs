//! AGGREGATE: cross-district rollups for one office.
//!
//! Office-scoped definitions, used everywhere below:
//! - valid   = the office's vote field over tallies of lists contesting it
//! - invalid = blank + null + contested over the same tallies
//! - emitted = valid + invalid
//! - participation = emitted / registered electors
//!
//! No allocation happens here; seats are a per-district concept.

use serde::Serialize;
use tracing::info;

use tally_algo::TallyBreakdown;
use tally_core::{
    entities::{District, Office, PartyList},
    ids::{DistrictId, ListId},
    rounding::Percent,
    source::ElectionSource,
};

use crate::PipelineError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Participation {
    pub electors: u64,
    pub votes_emitted: u64,
    pub participation_pct: Percent,
    pub stations: u64,
}

/// Valid/invalid split; percentages are shares of votes emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VoteSplit {
    pub valid: u64,
    pub invalid: u64,
    pub blank: u64,
    pub null: u64,
    pub contested: u64,
    pub valid_pct: Percent,
    pub invalid_pct: Percent,
    pub blank_pct: Percent,
    pub null_pct: Percent,
    pub contested_pct: Percent,
}

impl VoteSplit {
    fn from_breakdown(b: &TallyBreakdown) -> Self {
        let emitted = b.emitted();
        VoteSplit {
            valid: b.valid,
            invalid: b.invalid(),
            blank: b.blank,
            null: b.null,
            contested: b.contested,
            valid_pct: Percent::of(b.valid, emitted),
            invalid_pct: Percent::of(b.invalid(), emitted),
            blank_pct: Percent::of(b.blank, emitted),
            null_pct: Percent::of(b.null, emitted),
            contested_pct: Percent::of(b.contested, emitted),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    /// 1-based.
    pub position: u32,
    pub list_id: ListId,
    pub name: String,
    pub alliance: Option<String>,
    pub district_id: DistrictId,
    pub votes: u64,
    /// Share of the office's national valid votes.
    pub pct: Percent,
    /// Distinct stations with a tally for the list.
    pub stations_with_votes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NationalRanking {
    pub office: Office,
    pub total_votes: u64,
    pub ranking: Vec<RankingEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistrictListTotal {
    pub list_id: ListId,
    pub name: String,
    pub alliance: Option<String>,
    pub votes: u64,
    pub tallies: u64,
    /// Share of the district's valid votes for the office.
    pub pct: Percent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistrictStatistics {
    pub district_id: DistrictId,
    pub district_name: String,
    pub office: Office,
    pub participation: Participation,
    pub tallies: u64,
    pub split: VoteSplit,
    /// Every registered list for the office, votes desc then id asc.
    pub lists: Vec<DistrictListTotal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistrictSummary {
    pub district_id: DistrictId,
    pub name: String,
    pub deputy_seats: Option<u32>,
    pub senator_seats: u32,
    pub stations: u64,
    pub electors: u64,
    pub tallies: u64,
    pub votes_emitted: u64,
    pub participation_pct: Percent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NationalResultsSummary {
    pub office: Office,
    pub participation: Participation,
    pub split: VoteSplit,
    pub total_votes: u64,
    pub ranking: Vec<RankingEntry>,
    /// Name ascending.
    pub districts: Vec<DistrictSummary>,
}

/// Everything read for one district and office.
struct DistrictRollup {
    district: District,
    stations: u64,
    electors: u64,
    lists: Vec<(PartyList, TallyBreakdown)>,
    total: TallyBreakdown,
}

impl DistrictRollup {
    fn participation(&self) -> Participation {
        let emitted = self.total.emitted();
        Participation {
            electors: self.electors,
            votes_emitted: emitted,
            participation_pct: Percent::of(emitted, self.electors),
            stations: self.stations,
        }
    }

    fn summary(&self) -> DistrictSummary {
        let p = self.participation();
        DistrictSummary {
            district_id: self.district.id,
            name: self.district.name.clone(),
            deputy_seats: self.district.deputy_seats,
            senator_seats: self.district.senator_seats,
            stations: p.stations,
            electors: p.electors,
            tallies: self.total.tallies,
            votes_emitted: p.votes_emitted,
            participation_pct: p.participation_pct,
        }
    }
}

pub struct ResultsAggregationService<S> {
    source: S,
}

impl<S: ElectionSource> ResultsAggregationService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    fn rollup(&self, district: District, office: Office) -> Result<DistrictRollup, PipelineError> {
        let stations = self.source.stations_for(district.id)?;
        let electors = stations.iter().fold(0u64, |acc, s| acc.saturating_add(s.electors));

        let mut registered = self.source.lists_for(district.id, office)?;
        registered.sort_by_key(|l| l.id);
        registered.dedup_by_key(|l| l.id);

        let mut total = TallyBreakdown::default();
        let mut lists = Vec::with_capacity(registered.len());
        for l in registered {
            let tallies = self.source.tallies_for_list(l.id)?;
            let b = TallyBreakdown::from_tallies(&tallies, office);
            total.merge(&b);
            lists.push((l, b));
        }

        Ok(DistrictRollup {
            district,
            stations: stations.len() as u64,
            electors,
            lists,
            total,
        })
    }

    fn rollups(&self, office: Office) -> Result<Vec<DistrictRollup>, PipelineError> {
        let mut districts = self.source.districts()?;
        districts.sort_by_key(|d| d.id);
        districts.dedup_by_key(|d| d.id);
        districts.into_iter().map(|d| self.rollup(d, office)).collect()
    }

    fn ranking_from(rollups: &[DistrictRollup], total_votes: u64) -> Vec<RankingEntry> {
        let mut rows: Vec<(&PartyList, &TallyBreakdown)> = rollups
            .iter()
            .flat_map(|r| r.lists.iter().map(|(l, b)| (l, b)))
            .filter(|(_, b)| b.valid > 0)
            .collect();
        rows.sort_by(|a, b| b.1.valid.cmp(&a.1.valid).then_with(|| a.0.id.cmp(&b.0.id)));

        rows.into_iter()
            .zip(1u32..)
            .map(|((l, b), position)| RankingEntry {
                position,
                list_id: l.id,
                name: l.name.clone(),
                alliance: l.alliance.clone(),
                district_id: l.district_id,
                votes: b.valid,
                pct: Percent::of(b.valid, total_votes),
                stations_with_votes: b.stations.len() as u64,
            })
            .collect()
    }

    /// Competing lists across all districts, most voted first.
    pub fn national_ranking(&self, office: Office) -> Result<NationalRanking, PipelineError> {
        let rollups = self.rollups(office)?;
        let total_votes = rollups
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.total.valid));
        Ok(NationalRanking {
            office,
            total_votes,
            ranking: Self::ranking_from(&rollups, total_votes),
        })
    }

    pub fn national_results(&self, office: Office) -> Result<NationalResultsSummary, PipelineError> {
        let rollups = self.rollups(office)?;

        let mut total = TallyBreakdown::default();
        let mut electors = 0u64;
        let mut stations = 0u64;
        for r in &rollups {
            total.merge(&r.total);
            electors = electors.saturating_add(r.electors);
            stations += r.stations;
        }
        let emitted = total.emitted();

        let mut districts: Vec<DistrictSummary> = rollups.iter().map(DistrictRollup::summary).collect();
        sort_by_name(&mut districts);

        let summary = NationalResultsSummary {
            office,
            participation: Participation {
                electors,
                votes_emitted: emitted,
                participation_pct: Percent::of(emitted, electors),
                stations,
            },
            split: VoteSplit::from_breakdown(&total),
            total_votes: total.valid,
            ranking: Self::ranking_from(&rollups, total.valid),
            districts,
        };
        info!(
            %office,
            districts = summary.districts.len(),
            total_votes = summary.total_votes,
            participation = %summary.participation.participation_pct,
            "national results aggregated"
        );
        Ok(summary)
    }

    pub fn district_statistics(
        &self,
        district_id: DistrictId,
        office: Office,
    ) -> Result<DistrictStatistics, PipelineError> {
        let district = self
            .source
            .district(district_id)?
            .ok_or(PipelineError::DistrictNotFound(district_id))?;
        let r = self.rollup(district, office)?;

        let mut lists: Vec<DistrictListTotal> = r
            .lists
            .iter()
            .map(|(l, b)| DistrictListTotal {
                list_id: l.id,
                name: l.name.clone(),
                alliance: l.alliance.clone(),
                votes: b.valid,
                tallies: b.tallies,
                pct: Percent::of(b.valid, r.total.valid),
            })
            .collect();
        lists.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.list_id.cmp(&b.list_id)));

        Ok(DistrictStatistics {
            district_id,
            district_name: r.district.name.clone(),
            office,
            participation: r.participation(),
            tallies: r.total.tallies,
            split: VoteSplit::from_breakdown(&r.total),
            lists,
        })
    }

    /// One row per district, name ascending.
    pub fn district_summaries(&self, office: Office) -> Result<Vec<DistrictSummary>, PipelineError> {
        let mut rows: Vec<DistrictSummary> =
            self.rollups(office)?.iter().map(DistrictRollup::summary).collect();
        sort_by_name(&mut rows);
        Ok(rows)
    }
}

fn sort_by_name(rows: &mut [DistrictSummary]) {
    rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.district_id.cmp(&b.district_id)));
}
