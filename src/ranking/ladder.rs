use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Serialize;

use crate::errors::RankViolation;

use super::store::RankStore;
use super::types::{MemberId, Rank};

/// The ordered set of all member ranks.
///
/// Every rank change goes through here, so the dense `1..N` permutation is
/// maintained in one place. Callers must hold the ladder exclusively (one
/// writer per ladder) for the whole read-compute-write of a rank change.
pub struct Ladder<S> {
    store: S,
}

impl<S: RankStore> Ladder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rank_of(&self, id: MemberId) -> Result<Rank> {
        self.store
            .rank_of(id)?
            .with_context(|| format!("Member {} is not on the ladder", id))
    }

    pub fn size(&self) -> Result<Rank> {
        Ok(self.store.max_rank()?.unwrap_or(0))
    }

    /// Rank a newly joined member takes: bottom of the ladder
    pub fn next_rank(&self) -> Result<Rank> {
        Ok(self.size()? + 1)
    }

    pub fn shift_up(&mut self, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize> {
        let shifted = self.store.shift_up(lo, hi, except)?;
        debug!("Shifted {} members in [{}, {}) one place down", shifted, lo, hi);
        Ok(shifted)
    }

    pub fn shift_down(&mut self, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize> {
        let shifted = self.store.shift_down(lo, hi, except)?;
        debug!("Shifted {} members in ({}, {}] one place up", shifted, lo, hi);
        Ok(shifted)
    }

    /// Moves one member to `to`, shifting everyone in between by one place.
    /// Returns the rank the member held before the move.
    pub fn move_member(&mut self, id: MemberId, to: Rank) -> Result<Rank> {
        let from = self.rank_of(id)?;
        let size = self.size()?;
        if to < 1 || to > size {
            bail!(RankViolation::OutOfRange { rank: to, size });
        }

        if to < from {
            self.shift_up(to, from, Some(id))?;
        } else if to > from {
            self.shift_down(from, to, Some(id))?;
        } else {
            return Ok(from);
        }

        self.store.set_rank(id, to)?;
        debug!("Member {} moved from rank {} to {}", id, from, to);
        Ok(from)
    }

    /// Closes the hole left by a member that no longer holds `vacated`
    pub fn close_gap(&mut self, vacated: Rank) -> Result<usize> {
        self.shift_down(vacated, Rank::MAX, None)
    }
}

/// Result of checking that a set of ranks is exactly `1..=N`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderReport {
    pub members: usize,
    pub missing: Vec<Rank>,
    pub duplicated: Vec<Rank>,
}

impl LadderReport {
    pub fn is_dense(&self) -> bool {
        self.missing.is_empty() && self.duplicated.is_empty()
    }
}

pub fn check_permutation(ranks: &[Rank]) -> LadderReport {
    let mut counts: BTreeMap<Rank, usize> = BTreeMap::new();
    for rank in ranks {
        *counts.entry(*rank).or_default() += 1;
    }

    let missing = (1..=ranks.len() as Rank)
        .filter(|rank| !counts.contains_key(rank))
        .collect();
    let duplicated = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(rank, _)| rank)
        .collect();

    LadderReport {
        members: ranks.len(),
        missing,
        duplicated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::memory::MemoryRankStore;
    use crate::ranking::types::Standing;

    fn ladder(size: usize) -> Ladder<MemoryRankStore> {
        Ladder::new(MemoryRankStore::sequential(size))
    }

    #[test]
    fn test_move_up_pushes_band_down() {
        let mut ladder = ladder(8);

        let from = ladder.move_member(8, 6).unwrap();

        assert_eq!(from, 8);
        assert_eq!(ladder.store().ordered_ids(), vec![1, 2, 3, 4, 5, 8, 6, 7]);
    }

    #[test]
    fn test_move_down_pulls_band_up() {
        let mut ladder = ladder(5);

        ladder.move_member(2, 4).unwrap();

        assert_eq!(ladder.store().ordered_ids(), vec![1, 3, 4, 2, 5]);
        assert!(check_permutation(&ladder.store().ranks()).is_dense());
    }

    #[test]
    fn test_move_to_same_rank_is_noop() {
        let mut ladder = ladder(3);
        assert_eq!(ladder.move_member(2, 2).unwrap(), 2);
        assert_eq!(ladder.store().ordered_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_move_outside_ladder_is_rejected() {
        let mut ladder = ladder(3);
        let err = ladder.move_member(1, 4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RankViolation>(),
            Some(&RankViolation::OutOfRange { rank: 4, size: 3 })
        );
        assert!(ladder.move_member(1, 0).is_err());
        assert!(ladder.move_member(42, 1).is_err());
        assert_eq!(ladder.store().ordered_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_next_rank_on_empty_and_filled_ladder() {
        assert_eq!(ladder(0).next_rank().unwrap(), 1);
        assert_eq!(ladder(4).next_rank().unwrap(), 5);
    }

    #[test]
    fn test_close_gap_compacts_everyone_below() {
        // member 2 has left the club
        let store = MemoryRankStore::from_standings(
            [1, 3, 4, 5].map(|id| Standing::new(id, id as Rank)),
        );
        let mut ladder = Ladder::new(store);

        let shifted = ladder.close_gap(2).unwrap();

        assert_eq!(shifted, 3);
        assert_eq!(ladder.store().ordered_ids(), vec![1, 3, 4, 5]);
        assert!(check_permutation(&ladder.store().ranks()).is_dense());
    }

    #[test]
    fn test_check_permutation_reports_gaps_and_duplicates() {
        assert!(check_permutation(&[]).is_dense());
        assert!(check_permutation(&[3, 1, 2]).is_dense());

        let report = check_permutation(&[1, 2, 2, 5]);
        assert_eq!(report.members, 4);
        assert_eq!(report.missing, vec![3, 4]);
        assert_eq!(report.duplicated, vec![2]);
        assert!(!report.is_dense());
    }
}
