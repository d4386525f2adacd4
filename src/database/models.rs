use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::ranking::{MemberId, Rank, Ranked};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub rank: Rank,
    pub games_played: i32,
    pub created_at: Option<NaiveDateTime>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

impl Ranked for Member {
    fn member_id(&self) -> MemberId {
        self.id
    }

    fn rank(&self) -> Rank {
        self.rank
    }

    fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
    }
}

/// One recorded match. Rows are append-only: never updated, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub id: i64,
    pub player1_id: MemberId,
    pub player2_id: MemberId,
    pub player1_score: i32,
    pub player2_score: i32,
    pub played_at: NaiveDateTime,
    pub player1_rank_before: Rank,
    pub player2_rank_before: Rank,
    pub player1_rank_after: Rank,
    pub player2_rank_after: Rank,
}

impl Match {
    pub fn is_draw(&self) -> bool {
        self.player1_score == self.player2_score
    }

    pub fn winner_id(&self) -> Option<MemberId> {
        if self.player1_score > self.player2_score {
            Some(self.player1_id)
        } else if self.player2_score > self.player1_score {
            Some(self.player2_id)
        } else {
            None
        }
    }

    pub fn loser_id(&self) -> Option<MemberId> {
        if self.player1_score < self.player2_score {
            Some(self.player1_id)
        } else if self.player2_score < self.player1_score {
            Some(self.player2_id)
        } else {
            None
        }
    }

    pub fn involves(&self, member_id: MemberId) -> bool {
        self.player1_id == member_id || self.player2_id == member_id
    }
}

// Insert payload, the id is assigned by the database
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub player1_id: MemberId,
    pub player2_id: MemberId,
    pub player1_score: i32,
    pub player2_score: i32,
    pub played_at: NaiveDateTime,
    pub player1_rank_before: Rank,
    pub player2_rank_before: Rank,
    pub player1_rank_after: Rank,
    pub player2_rank_after: Rank,
}
