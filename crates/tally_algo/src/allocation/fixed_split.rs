//! Fixed 2-1 split for the senate.
//!
//! Contract:
//! - Always distributes `FIXED_SENATE_SEATS`; the district's own seat
//!   configuration is never consulted.
//! - Competing lists (votes > 0) are ranked by votes; first gets 2, second
//!   gets 1, everyone else 0.
//! - One competing list: it gets 2 and the third seat stays unassigned.
//!   No competing list: nothing is assigned.
//! - Equal votes across a seat boundary are resolved by the tie policy.

use std::collections::{BTreeMap, BTreeSet};

use tally_core::{
    determinism::sort_by_votes_desc,
    entities::FIXED_SENATE_SEATS,
    ids::ListId,
    rng::TieRng,
    variables::TiePolicy,
};

use crate::{AllocError, ListVotes};

/// Seats by rank: index 0 is the most voted list.
pub const SENATE_SPLIT: [u32; 2] = [2, 1];

const _: () = assert!(SENATE_SPLIT[0] + SENATE_SPLIT[1] == FIXED_SENATE_SEATS);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedSplitOutcome {
    pub seats: BTreeMap<ListId, u32>,
    /// Competing lists, best first.
    pub ranking: Vec<ListId>,
    /// True iff equal votes straddled a seat boundary.
    pub tie_decided: bool,
}

impl FixedSplitOutcome {
    pub fn seats_awarded(&self) -> u32 {
        self.seats.values().sum()
    }

    pub fn seats_of(&self, list: ListId) -> u32 {
        self.seats.get(&list).copied().unwrap_or(0)
    }
}

pub fn allocate_fixed_split(
    contenders: &[ListVotes],
    tie_policy: TiePolicy,
    rng: Option<&mut TieRng>,
) -> Result<FixedSplitOutcome, AllocError> {
    let mut ranked: Vec<ListVotes> = Vec::with_capacity(contenders.len());
    let mut seen: BTreeSet<ListId> = BTreeSet::new();
    for lv in contenders {
        if !seen.insert(lv.list_id) {
            return Err(AllocError::DuplicateList(lv.list_id));
        }
        if lv.votes > 0 {
            ranked.push(*lv);
        }
    }
    sort_by_votes_desc(&mut ranked);

    if matches!(tie_policy, TiePolicy::Random) {
        let rng = rng.ok_or(AllocError::MissingRngForRandomPolicy)?;
        shuffle_equal_runs(&mut ranked, rng);
    }

    let tie_decided = (0..SENATE_SPLIT.len())
        .filter_map(|i| Some((ranked.get(i)?, ranked.get(i + 1)?)))
        .any(|(a, b)| a.votes == b.votes);

    let seats: BTreeMap<ListId, u32> = ranked
        .iter()
        .enumerate()
        .map(|(i, lv)| (lv.list_id, SENATE_SPLIT.get(i).copied().unwrap_or(0)))
        .collect();

    Ok(FixedSplitOutcome {
        seats,
        ranking: ranked.iter().map(|lv| lv.list_id).collect(),
        tie_decided,
    })
}

/// Shuffle each run of equal vote counts; runs stay in place.
fn shuffle_equal_runs(ranked: &mut [ListVotes], rng: &mut TieRng) {
    let mut start = 0;
    while start < ranked.len() {
        let votes = ranked[start].votes;
        let end = ranked[start..]
            .iter()
            .position(|lv| lv.votes != votes)
            .map_or(ranked.len(), |off| start + off);
        if end - start > 1 {
            rng.shuffle_in_place(&mut ranked[start..end]);
        }
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lv(id: u64, votes: u64) -> ListVotes {
        ListVotes::new(ListId(id), votes)
    }

    #[test]
    fn two_plus_one() {
        let c = [lv(1, 390), lv(2, 310), lv(3, 255), lv(4, 97)];
        let out = allocate_fixed_split(&c, TiePolicy::DeterministicOrder, None).unwrap();
        assert_eq!(out.seats_of(ListId(1)), 2);
        assert_eq!(out.seats_of(ListId(2)), 1);
        assert_eq!(out.seats_of(ListId(3)), 0);
        assert_eq!(out.seats_of(ListId(4)), 0);
        assert_eq!(out.seats_awarded(), FIXED_SENATE_SEATS);
        assert_eq!(out.ranking, vec![ListId(1), ListId(2), ListId(3), ListId(4)]);
        assert!(!out.tie_decided);
    }

    #[test]
    fn single_list_gets_two() {
        let out = allocate_fixed_split(&[lv(5, 12), lv(6, 0)], TiePolicy::DeterministicOrder, None)
            .unwrap();
        assert_eq!(out.seats_of(ListId(5)), 2);
        assert_eq!(out.seats_awarded(), 2);
        assert!(!out.seats.contains_key(&ListId(6)));
    }

    #[test]
    fn nobody_competes() {
        let out = allocate_fixed_split(&[lv(5, 0)], TiePolicy::DeterministicOrder, None).unwrap();
        assert_eq!(out.seats_awarded(), 0);
        assert!(out.ranking.is_empty());
    }

    #[test]
    fn tie_for_second_place() {
        let c = [lv(7, 50), lv(3, 50), lv(1, 90)];
        let out = allocate_fixed_split(&c, TiePolicy::DeterministicOrder, None).unwrap();
        assert_eq!(out.seats_of(ListId(1)), 2);
        assert_eq!(out.seats_of(ListId(3)), 1);
        assert_eq!(out.seats_of(ListId(7)), 0);
        assert!(out.tie_decided);
    }

    #[test]
    fn tie_below_the_boundary_is_not_reported() {
        let c = [lv(1, 90), lv(2, 80), lv(3, 10), lv(4, 10)];
        let out = allocate_fixed_split(&c, TiePolicy::DeterministicOrder, None).unwrap();
        assert!(!out.tie_decided);
    }

    #[test]
    fn random_policy() {
        let c = [lv(1, 50), lv(2, 50), lv(3, 50)];
        assert_eq!(
            allocate_fixed_split(&c, TiePolicy::Random, None).unwrap_err(),
            AllocError::MissingRngForRandomPolicy
        );
        let mut r1 = TieRng::from_seed_u64(3);
        let mut r2 = TieRng::from_seed_u64(3);
        let a = allocate_fixed_split(&c, TiePolicy::Random, Some(&mut r1)).unwrap();
        let b = allocate_fixed_split(&c, TiePolicy::Random, Some(&mut r2)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seats_awarded(), 3);
        assert!(a.tie_decided);
    }
}
