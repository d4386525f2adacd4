use std::collections::BTreeMap;

use anyhow::{Result, bail};

use super::store::RankStore;
use super::types::{MemberId, Rank, Standing};

/// Rank store kept entirely in memory.
///
/// Used for match previews (a snapshot of the real ladder that is thrown away
/// afterwards) and for exercising the engine without a database.
#[derive(Debug, Clone, Default)]
pub struct MemoryRankStore {
    ranks: BTreeMap<MemberId, Rank>,
}

impl MemoryRankStore {
    pub fn from_standings<I>(standings: I) -> Self
    where
        I: IntoIterator<Item = Standing>,
    {
        let ranks = standings
            .into_iter()
            .map(|s| (s.member_id, s.rank))
            .collect();
        Self { ranks }
    }

    /// Ladder of `size` members where member `n` holds rank `n`
    pub fn sequential(size: usize) -> Self {
        let ranks = (1..=size as Rank)
            .map(|rank| (rank as MemberId, rank))
            .collect();
        Self { ranks }
    }

    pub fn ranks(&self) -> Vec<Rank> {
        self.ranks.values().copied().collect()
    }

    /// Member ids ordered from the top of the ladder down
    pub fn ordered_ids(&self) -> Vec<MemberId> {
        let mut entries: Vec<_> = self.ranks.iter().map(|(id, rank)| (*rank, *id)).collect();
        entries.sort();
        entries.into_iter().map(|(_, id)| id).collect()
    }
}

impl RankStore for MemoryRankStore {
    fn rank_of(&self, id: MemberId) -> Result<Option<Rank>> {
        Ok(self.ranks.get(&id).copied())
    }

    fn max_rank(&self) -> Result<Option<Rank>> {
        Ok(self.ranks.values().max().copied())
    }

    fn shift_up(&mut self, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize> {
        let mut shifted = 0;
        for (id, rank) in self.ranks.iter_mut() {
            if Some(*id) != except && *rank >= lo && *rank < hi {
                *rank += 1;
                shifted += 1;
            }
        }
        Ok(shifted)
    }

    fn shift_down(&mut self, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize> {
        let mut shifted = 0;
        for (id, rank) in self.ranks.iter_mut() {
            if Some(*id) != except && *rank > lo && *rank <= hi {
                *rank -= 1;
                shifted += 1;
            }
        }
        Ok(shifted)
    }

    fn set_rank(&mut self, id: MemberId, rank: Rank) -> Result<()> {
        match self.ranks.get_mut(&id) {
            Some(current) => {
                *current = rank;
                Ok(())
            }
            None => bail!("Member {} is not on the ladder", id),
        }
    }
}
