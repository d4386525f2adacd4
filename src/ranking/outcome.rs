use std::cmp::Ordering;

use crate::errors::LadderError;

use super::types::{MatchResult, Ranked, Seat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub result: MatchResult,
    pub higher: Seat,
    pub lower: Seat,
}

impl Classification {
    /// Hands out the two participants as `(higher, lower)`
    pub fn split<'a, P>(&self, first: &'a mut P, second: &'a mut P) -> (&'a mut P, &'a mut P) {
        match self.higher {
            Seat::First => (first, second),
            Seat::Second => (second, first),
        }
    }
}

/// Decides who won relative to ladder standing.
///
/// "Higher ranked" is the numerically smaller rank.
pub fn classify<P: Ranked>(
    first: &P,
    second: &P,
    first_score: i32,
    second_score: i32,
) -> Result<Classification, LadderError> {
    if first.member_id() == second.member_id() {
        return Err(LadderError::InvalidMatch(format!(
            "member {} cannot play against themselves",
            first.member_id()
        )));
    }
    if first_score < 0 || second_score < 0 {
        return Err(LadderError::InvalidMatch(format!(
            "scores must not be negative (got {}:{})",
            first_score, second_score
        )));
    }

    let (higher, lower) = match first.rank().cmp(&second.rank()) {
        Ordering::Less => (Seat::First, Seat::Second),
        Ordering::Greater => (Seat::Second, Seat::First),
        Ordering::Equal => {
            return Err(LadderError::InvalidMatch(format!(
                "members {} and {} share rank {}",
                first.member_id(),
                second.member_id(),
                first.rank()
            )));
        }
    };

    let result = match (first_score.cmp(&second_score), higher) {
        (Ordering::Equal, _) => MatchResult::Draw,
        (Ordering::Greater, Seat::First) | (Ordering::Less, Seat::Second) => {
            MatchResult::HigherRankedWins
        }
        _ => MatchResult::LowerRankedWins,
    };

    Ok(Classification {
        result,
        higher,
        lower,
    })
}
