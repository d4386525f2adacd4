use serde::{Deserialize, Serialize};

pub type MemberId = i64;
pub type Rank = i32;

/// Anything that sits on the ladder and carries an in-memory copy of its rank.
pub trait Ranked {
    fn member_id(&self) -> MemberId;
    fn rank(&self) -> Rank;
    fn set_rank(&mut self, rank: Rank);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    HigherRankedWins,
    LowerRankedWins,
    Draw,
}

impl MatchResult {
    pub fn as_str(&self) -> &str {
        match self {
            MatchResult::HigherRankedWins => "higher-ranked win",
            MatchResult::LowerRankedWins => "upset",
            MatchResult::Draw => "draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    First,
    Second,
}

/// Minimal ladder entry, used where a full member row is not needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub member_id: MemberId,
    pub rank: Rank,
}

impl Standing {
    pub fn new(member_id: MemberId, rank: Rank) -> Self {
        Self { member_id, rank }
    }
}

impl Ranked for Standing {
    fn member_id(&self) -> MemberId {
        self.member_id
    }

    fn rank(&self) -> Rank {
        self.rank
    }

    fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankChange {
    pub member_id: MemberId,
    pub before: Rank,
    pub after: Rank,
}

impl RankChange {
    pub fn delta(&self) -> Rank {
        self.before - self.after
    }
}

/// What the engine did to the two participants of one match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAdjustment {
    pub result: MatchResult,
    pub higher: RankChange,
    pub lower: RankChange,
}

impl RankAdjustment {
    pub fn is_unchanged(&self) -> bool {
        self.higher.delta() == 0 && self.lower.delta() == 0
    }
}
