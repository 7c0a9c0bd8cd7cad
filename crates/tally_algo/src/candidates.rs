//! Candidate ranking: seats won → elected candidates by list position.

use tally_core::entities::Candidate;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Elected {
    /// Ascending by rank.
    pub candidates: Vec<Candidate>,
    /// The list won more seats than it has candidates. Reported, not an error.
    pub insufficient: bool,
}

/// The `seats_won` lowest-ranked candidates, rank 1 first.
///
/// Input order is not trusted; candidates are sorted by (rank, id). A partial
/// slate returns everyone and sets `insufficient`.
pub fn elect_by_rank(candidates: &[Candidate], seats_won: u32) -> Elected {
    if seats_won == 0 {
        return Elected::default();
    }
    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));

    let n = seats_won as usize;
    Elected {
        candidates: sorted.into_iter().take(n).cloned().collect(),
        insufficient: candidates.len() < n,
    }
}
