use anyhow::Result;

use super::types::{MemberId, Rank};

/// Storage contract the ladder needs from whatever holds member ranks.
///
/// Both shifts are set-based: one call adjusts every matching member at once.
/// `except` names the member currently being moved; its rank is written
/// separately through [`RankStore::set_rank`] and must not be touched by the shift.
pub trait RankStore {
    fn rank_of(&self, id: MemberId) -> Result<Option<Rank>>;

    /// `None` when the ladder is empty
    fn max_rank(&self) -> Result<Option<Rank>>;

    /// Every member with rank in `[lo, hi)` moves one place down the ladder (rank + 1).
    fn shift_up(&mut self, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize>;

    /// Every member with rank in `(lo, hi]` moves one place up the ladder (rank - 1).
    fn shift_down(&mut self, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize>;

    fn set_rank(&mut self, id: MemberId, rank: Rank) -> Result<()>;
}
