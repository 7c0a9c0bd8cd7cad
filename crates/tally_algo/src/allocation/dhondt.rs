//! D'Hont (highest averages) allocation for one district and office.
//!
//! Contract:
//! - Only lists with `votes > 0` compete; every competing list appears in the
//!   output, with 0 seats if it wins none.
//! - Allocate `seats` sequentially by picking the max of v/(s+1);
//!   `seats` may not exceed `MAX_DEPUTY_SEATS`.
//! - Ties on the best quotient resolved by policy: DeterministicOrder → more
//!   votes, then lowest list id; Random → seeded `TieRng`.
//! - Pure integers; no division in comparisons (cross-multiply in u128).
//!
//! Determinism:
//! - Scans run in ascending list id order, independent of input order.
//! - Random ties depend *only* on the provided `TieRng` stream.

use std::collections::BTreeMap;

use tally_core::{
    determinism::cmp_votes_desc,
    entities::MAX_DEPUTY_SEATS,
    ids::ListId,
    rng::TieRng,
    variables::TiePolicy,
};

use crate::{AllocError, ListVotes};

/// One awarded seat, for audit and logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DhondtRound {
    /// 1-based seat number.
    pub seat: u32,
    pub winner: ListId,
    /// Winning quotient is `votes / divisor`.
    pub votes: u64,
    pub divisor: u32,
    /// Every list sharing the best quotient this round (winner included),
    /// ascending id. Length 1 when no tie occurred.
    pub tied: Vec<ListId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DhondtOutcome {
    pub seats: BTreeMap<ListId, u32>,
    pub rounds: Vec<DhondtRound>,
    /// True iff at least one seat went through the tie policy.
    pub tie_decided: bool,
}

impl DhondtOutcome {
    pub fn seats_awarded(&self) -> u32 {
        self.seats.values().sum()
    }

    pub fn seats_of(&self, list: ListId) -> u32 {
        self.seats.get(&list).copied().unwrap_or(0)
    }
}

/// Allocate `seats` among `contenders` using D'Hont.
///
/// *Notes*:
/// - If no list has votes, returns an empty outcome (no seats awarded); the
///   caller reports that as "no competing lists".
/// - With at least one competing list, exactly `seats` seats are awarded.
pub fn allocate_dhondt(
    seats: u32,
    contenders: &[ListVotes],
    tie_policy: TiePolicy,
    mut rng: Option<&mut TieRng>,
) -> Result<DhondtOutcome, AllocError> {
    if seats > MAX_DEPUTY_SEATS {
        return Err(AllocError::TooManySeats { seats, max: MAX_DEPUTY_SEATS });
    }
    if seats > 0 && matches!(tie_policy, TiePolicy::Random) && rng.is_none() {
        return Err(AllocError::MissingRngForRandomPolicy);
    }

    // 1) Canonical eligible set (ascending id, votes > 0).
    let eligible = canonical_eligible(contenders)?;

    // 2) Seat vector for every eligible list.
    let mut alloc: BTreeMap<ListId, u32> = eligible.iter().map(|lv| (lv.list_id, 0)).collect();
    let mut rounds: Vec<DhondtRound> = Vec::new();
    let mut tie_decided = false;

    if eligible.is_empty() {
        return Ok(DhondtOutcome { seats: alloc, rounds, tie_decided });
    }

    // 3) Sequentially award seats.
    for seat in 1..=seats {
        let best = best_quotient(&alloc, &eligible);
        let winner = if best.len() == 1 {
            best[0]
        } else {
            tie_decided = true;
            break_tie(&best, tie_policy, rng.as_deref_mut())
        };
        let held = alloc.entry(winner.list_id).or_insert(0);
        rounds.push(DhondtRound {
            seat,
            winner: winner.list_id,
            votes: winner.votes,
            divisor: *held + 1,
            tied: best.iter().map(|lv| lv.list_id).collect(),
        });
        *held += 1;
    }

    Ok(DhondtOutcome { seats: alloc, rounds, tie_decided })
}

/// Eligible contenders in ascending id order; rejects duplicate ids.
fn canonical_eligible(contenders: &[ListVotes]) -> Result<Vec<ListVotes>, AllocError> {
    let mut by_id: BTreeMap<ListId, u64> = BTreeMap::new();
    for lv in contenders {
        if by_id.insert(lv.list_id, lv.votes).is_some() {
            return Err(AllocError::DuplicateList(lv.list_id));
        }
    }
    Ok(by_id
        .into_iter()
        .filter(|&(_, v)| v > 0)
        .map(|(list_id, votes)| ListVotes { list_id, votes })
        .collect())
}

/// All lists sharing the maximal v/(s+1), in ascending id order.
fn best_quotient(alloc: &BTreeMap<ListId, u32>, eligible: &[ListVotes]) -> Vec<ListVotes> {
    let mut best: Vec<ListVotes> = Vec::new();
    let mut best_v: u64 = 0;
    let mut best_s: u32 = 0;

    for lv in eligible {
        let s = alloc.get(&lv.list_id).copied().unwrap_or(0);
        if best.is_empty() {
            best_v = lv.votes;
            best_s = s;
            best.push(*lv);
            continue;
        }
        match cmp_quotients(lv.votes, s, best_v, best_s) {
            core::cmp::Ordering::Greater => {
                best_v = lv.votes;
                best_s = s;
                best.clear();
                best.push(*lv);
            }
            core::cmp::Ordering::Equal => best.push(*lv),
            core::cmp::Ordering::Less => {}
        }
    }
    best
}

/// `tied` has at least two entries.
fn break_tie(tied: &[ListVotes], tie_policy: TiePolicy, rng: Option<&mut TieRng>) -> ListVotes {
    let deterministic = || {
        tied.iter()
            .copied()
            .min_by(cmp_votes_desc)
            .unwrap_or(tied[0])
    };
    match (tie_policy, rng) {
        (TiePolicy::Random, Some(rng)) => rng
            .choose_one_index(tied)
            .map(|ix| tied[ix])
            .unwrap_or_else(deterministic),
        _ => deterministic(),
    }
}

/// Compare D'Hont quotients v_a/(s_a+1) vs v_b/(s_b+1) without floats.
/// Returns Ordering::Greater if a's quotient is larger.
fn cmp_quotients(v_a: u64, s_a: u32, v_b: u64, s_b: u32) -> core::cmp::Ordering {
    let da = u128::from(s_a) + 1;
    let db = u128::from(s_b) + 1;
    let lhs = u128::from(v_a) * db;
    let rhs = u128::from(v_b) * da;
    lhs.cmp(&rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lv(id: u64, votes: u64) -> ListVotes {
        ListVotes::new(ListId(id), votes)
    }

    #[test]
    fn textbook_ten_seats() {
        let contenders = [lv(1, 390), lv(2, 310), lv(3, 255), lv(4, 97)];
        let out = allocate_dhondt(10, &contenders, TiePolicy::DeterministicOrder, None).unwrap();
        assert_eq!(out.seats_of(ListId(1)), 4);
        assert_eq!(out.seats_of(ListId(2)), 3);
        assert_eq!(out.seats_of(ListId(3)), 2);
        assert_eq!(out.seats_of(ListId(4)), 1);
        assert_eq!(out.seats_awarded(), 10);
        assert!(!out.tie_decided);
        // Last seat goes to list 4 with 97/1 against list 1's 390/4 = 97.5 already taken.
        let last = out.rounds.last().unwrap();
        assert_eq!((last.winner, last.votes, last.divisor), (ListId(4), 97, 1));
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = [lv(1, 390), lv(2, 310), lv(3, 255), lv(4, 97)];
        let b = [lv(4, 97), lv(3, 255), lv(1, 390), lv(2, 310)];
        let oa = allocate_dhondt(7, &a, TiePolicy::DeterministicOrder, None).unwrap();
        let ob = allocate_dhondt(7, &b, TiePolicy::DeterministicOrder, None).unwrap();
        assert_eq!(oa, ob);
    }

    #[test]
    fn zero_seats_or_no_contenders() {
        let out = allocate_dhondt(0, &[lv(1, 10)], TiePolicy::DeterministicOrder, None).unwrap();
        assert_eq!(out.seats_awarded(), 0);
        assert_eq!(out.seats.get(&ListId(1)), Some(&0));

        let out = allocate_dhondt(5, &[], TiePolicy::DeterministicOrder, None).unwrap();
        assert!(out.seats.is_empty());
        assert!(out.rounds.is_empty());

        // Zero-vote lists never compete.
        let out = allocate_dhondt(5, &[lv(1, 0), lv(2, 0)], TiePolicy::DeterministicOrder, None)
            .unwrap();
        assert_eq!(out.seats_awarded(), 0);
        assert!(out.seats.is_empty());
    }

    #[test]
    fn seat_count_is_bounded() {
        let contenders = [lv(1, 10), lv(2, 5)];
        assert_eq!(
            allocate_dhondt(u32::MAX, &contenders, TiePolicy::DeterministicOrder, None),
            Err(AllocError::TooManySeats { seats: u32::MAX, max: MAX_DEPUTY_SEATS })
        );
        let out =
            allocate_dhondt(MAX_DEPUTY_SEATS, &contenders, TiePolicy::DeterministicOrder, None)
                .unwrap();
        assert_eq!(out.seats_awarded(), MAX_DEPUTY_SEATS);
        assert_eq!(out.rounds.len(), MAX_DEPUTY_SEATS as usize);
    }

    #[test]
    fn exact_tie_goes_to_lowest_id_when_votes_equal() {
        let out = allocate_dhondt(1, &[lv(9, 100), lv(3, 100)], TiePolicy::DeterministicOrder, None)
            .unwrap();
        assert_eq!(out.seats_of(ListId(3)), 1);
        assert!(out.tie_decided);
        assert_eq!(out.rounds[0].tied, vec![ListId(3), ListId(9)]);
    }

    #[test]
    fn quotient_tie_prefers_more_votes() {
        // Round 1: A=200 wins. Round 2: A 200/2 = 100 ties B 100/1; A has more votes.
        let out = allocate_dhondt(2, &[lv(2, 100), lv(1, 200)], TiePolicy::DeterministicOrder, None)
            .unwrap();
        assert_eq!(out.seats_of(ListId(1)), 2);
        assert_eq!(out.seats_of(ListId(2)), 0);
        assert!(out.tie_decided);
    }

    #[test]
    fn random_policy_requires_rng() {
        let err = allocate_dhondt(1, &[lv(1, 5)], TiePolicy::Random, None).unwrap_err();
        assert_eq!(err, AllocError::MissingRngForRandomPolicy);
    }

    #[test]
    fn random_policy_replays_from_seed() {
        let contenders = [lv(1, 100), lv(2, 100), lv(3, 100)];
        let mut r1 = TieRng::from_seed_u64(11);
        let mut r2 = TieRng::from_seed_u64(11);
        let a = allocate_dhondt(2, &contenders, TiePolicy::Random, Some(&mut r1)).unwrap();
        let b = allocate_dhondt(2, &contenders, TiePolicy::Random, Some(&mut r2)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seats_awarded(), 2);
        assert!(a.seats.values().all(|&s| s <= 1));
    }

    #[test]
    fn duplicate_contender_is_rejected() {
        let err = allocate_dhondt(1, &[lv(1, 5), lv(1, 6)], TiePolicy::DeterministicOrder, None)
            .unwrap_err();
        assert_eq!(err, AllocError::DuplicateList(ListId(1)));
    }
}
