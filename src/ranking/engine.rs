use anyhow::{Result, bail};
use log::{debug, info};

use crate::config::settings::LadderSettings;
use crate::errors::RankViolation;

use super::ladder::Ladder;
use super::store::RankStore;
use super::types::{MatchResult, MemberId, Rank, RankAdjustment, RankChange, Ranked};

/// Places the winner of an upset climbs: half the gap, at least one.
pub fn promotion_distance(diff: Rank) -> Rank {
    (diff / 2).max(1)
}

/// Upset-sensitive promotion/demotion rule.
///
/// * higher-ranked win: nothing moves
/// * draw: the lower-ranked member climbs one place unless the two are adjacent
/// * upset: the higher-ranked member drops one place, then the lower-ranked
///   member climbs [`promotion_distance`] places
///
/// Upsets across a gap smaller than `minimum_upset_gap` are ignored.
#[derive(Debug, Clone)]
pub struct RankingEngine {
    minimum_upset_gap: Rank,
}

impl RankingEngine {
    pub fn new(settings: &LadderSettings) -> Self {
        Self {
            minimum_upset_gap: settings.minimum_upset_gap.max(1),
        }
    }

    /// Applies one match result to the ladder and writes the resulting ranks
    /// back into both participants.
    pub fn apply<S, P>(
        &self,
        ladder: &mut Ladder<S>,
        result: MatchResult,
        higher: &mut P,
        lower: &mut P,
    ) -> Result<RankAdjustment>
    where
        S: RankStore,
        P: Ranked,
    {
        // Both targets are derived from the ranks held before any mutation
        let h = current_rank(ladder, higher)?;
        let l = current_rank(ladder, lower)?;
        if h >= l {
            bail!(RankViolation::Misordered {
                higher: higher.member_id(),
                higher_rank: h,
                lower: lower.member_id(),
                lower_rank: l,
            });
        }

        match result {
            MatchResult::HigherRankedWins => {
                debug!("Higher ranked member won - no ranking change");
            }
            MatchResult::Draw => self.handle_draw(ladder, lower.member_id(), h, l)?,
            MatchResult::LowerRankedWins => {
                self.handle_upset(ladder, higher.member_id(), lower.member_id(), h, l)?
            }
        }

        let higher_after = ladder.rank_of(higher.member_id())?;
        let lower_after = ladder.rank_of(lower.member_id())?;
        higher.set_rank(higher_after);
        lower.set_rank(lower_after);

        Ok(RankAdjustment {
            result,
            higher: RankChange {
                member_id: higher.member_id(),
                before: h,
                after: higher_after,
            },
            lower: RankChange {
                member_id: lower.member_id(),
                before: l,
                after: lower_after,
            },
        })
    }

    fn handle_draw<S: RankStore>(
        &self,
        ladder: &mut Ladder<S>,
        lower_id: MemberId,
        h: Rank,
        l: Rank,
    ) -> Result<()> {
        if l - h > 1 {
            info!("Draw: member {} moves up from rank {} to {}", lower_id, l, l - 1);
            ladder.move_member(lower_id, l - 1)?;
        } else {
            debug!("Draw between adjacent ranks {} and {} - no change", h, l);
        }
        Ok(())
    }

    fn handle_upset<S: RankStore>(
        &self,
        ladder: &mut Ladder<S>,
        higher_id: MemberId,
        lower_id: MemberId,
        h: Rank,
        l: Rank,
    ) -> Result<()> {
        let diff = l - h;
        if diff < self.minimum_upset_gap {
            debug!(
                "Upset across {} place(s) is below the minimum gap of {} - no change",
                diff, self.minimum_upset_gap
            );
            return Ok(());
        }

        let move_up = promotion_distance(diff);

        info!("Upset: member {} moves down from rank {} to {}", higher_id, h, h + 1);
        ladder.move_member(higher_id, h + 1)?;

        // Adjacent upset: the demotion already pulled the winner into `h`,
        // so the promotion below is a no-op. With a gap of two, `h + 1` lies
        // in the promotion band and the loser is pushed one further place.
        info!("Upset: member {} moves up from rank {} to {}", lower_id, l, l - move_up);
        ladder.move_member(lower_id, l - move_up)?;

        Ok(())
    }
}

fn current_rank<S: RankStore, P: Ranked>(ladder: &Ladder<S>, member: &P) -> Result<Rank> {
    let stored = ladder.rank_of(member.member_id())?;
    if stored != member.rank() {
        bail!(RankViolation::StaleRank {
            member_id: member.member_id(),
            expected: member.rank(),
            stored,
        });
    }
    Ok(stored)
}
