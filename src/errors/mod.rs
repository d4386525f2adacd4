use crate::ranking::{MemberId, Rank};

/// Errors surfaced by ladder operations.
///
/// Nothing here is retried locally: a caller that wants to retry must do so
/// with fresh data, since ranks may have moved in between.
#[derive(Debug, thiserror::Error)]
pub enum LadderError {
    #[error("Player not found: {0}")]
    PlayerNotFound(MemberId),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Invalid match: {0}")]
    InvalidMatch(String),

    #[error("Invalid member: {0}")]
    InvalidMember(String),

    #[error("Email is already registered: {0}")]
    DuplicateEmail(String),

    #[error("Ladder invariant violated: {0}")]
    RankViolation(RankViolation),

    #[error("Persistence failure: {0:#}")]
    PersistenceFailure(anyhow::Error),
}

/// A rank change that would break the ladder, raised by the ranking engine
/// and the ladder itself rather than by the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankViolation {
    #[error("stale rank for member {member_id}: expected {expected}, ladder has {stored}")]
    StaleRank {
        member_id: MemberId,
        expected: Rank,
        stored: Rank,
    },

    #[error("member {higher} (rank {higher_rank}) is not ranked above member {lower} (rank {lower_rank})")]
    Misordered {
        higher: MemberId,
        higher_rank: Rank,
        lower: MemberId,
        lower_rank: Rank,
    },

    #[error("rank {rank} is outside the ladder (1..={size})")]
    OutOfRange { rank: Rank, size: Rank },
}

impl From<anyhow::Error> for LadderError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<RankViolation>() {
            Ok(violation) => LadderError::RankViolation(violation),
            Err(error) => LadderError::PersistenceFailure(error),
        }
    }
}

pub type LadderResult<T> = Result<T, LadderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_rank_violation_keeps_its_own_variant() {
        let violation = RankViolation::OutOfRange { rank: 7, size: 5 };
        let error = anyhow::Error::new(violation.clone()).context("Failed to move member");

        let converted = LadderError::from(error);

        assert!(matches!(converted, LadderError::RankViolation(ref v) if *v == violation));
        assert_eq!(
            converted.to_string(),
            "Ladder invariant violated: rank 7 is outside the ladder (1..=5)"
        );
    }

    #[test]
    fn test_store_errors_are_persistence_failures() {
        let error = anyhow!("disk I/O error").context("Failed to shift ranks");

        let converted = LadderError::from(error);

        assert!(matches!(converted, LadderError::PersistenceFailure(_)));
        assert_eq!(
            converted.to_string(),
            "Persistence failure: Failed to shift ranks: disk I/O error"
        );
    }
}
