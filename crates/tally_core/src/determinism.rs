//! Determinism utilities: stable orderings shared by allocation and reporting.
//!
//! Every ordering here is **total**: the list id is always the last key, so
//! results never depend on the order a data source happened to return rows.

use core::cmp::Ordering;

use crate::ids::ListId;

/// Anything ranked by a vote count with a list id fallback.
pub trait VoteRanked {
    fn votes(&self) -> u64;
    fn list_id(&self) -> ListId;
}

/// Votes descending, then list id ascending.
#[inline]
pub fn cmp_votes_desc<T: VoteRanked + ?Sized>(a: &T, b: &T) -> Ordering {
    b.votes()
        .cmp(&a.votes())
        .then_with(|| a.list_id().cmp(&b.list_id()))
}

/// Seats descending, then votes descending, then list id ascending.
#[inline]
pub fn cmp_seats_then_votes_desc<T: VoteRanked + ?Sized>(
    a_seats: u32,
    a: &T,
    b_seats: u32,
    b: &T,
) -> Ordering {
    b_seats.cmp(&a_seats).then_with(|| cmp_votes_desc(a, b))
}

/// Sort **in place** by votes descending, then list id ascending.
#[inline]
pub fn sort_by_votes_desc<T: VoteRanked>(xs: &mut [T]) {
    xs.sort_by(cmp_votes_desc);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Row(u64, u64);

    impl VoteRanked for Row {
        fn votes(&self) -> u64 {
            self.1
        }
        fn list_id(&self) -> ListId {
            ListId(self.0)
        }
    }

    #[test]
    fn votes_then_id() {
        let mut xs = vec![Row(3, 10), Row(1, 10), Row(2, 50), Row(4, 0)];
        sort_by_votes_desc(&mut xs);
        assert_eq!(xs, vec![Row(2, 50), Row(1, 10), Row(3, 10), Row(4, 0)]);
    }

    #[test]
    fn seats_first() {
        let a = Row(1, 100);
        let b = Row(2, 10);
        assert_eq!(cmp_seats_then_votes_desc(1, &a, 2, &b), Ordering::Greater);
        assert_eq!(cmp_seats_then_votes_desc(2, &a, 2, &b), Ordering::Less);
    }
}
