use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use chrono::Utc;
use log::{debug, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::config::settings::{AppConfig, LadderSettings};
use crate::database::{
    self, DbConn, DbPool, Match, Member, NewMatch, SqliteRankStore, matches, members, setup,
};
use crate::domain::MemberDetails;
use crate::errors::{LadderError, LadderResult};
use crate::ranking::{
    Ladder, LadderReport, MemberId, MemoryRankStore, RankAdjustment, RankingEngine, Standing,
    check_permutation, classify,
};

/// Entry point for every ladder operation.
///
/// Rank-mutating operations take the in-process ladder lock and run inside a
/// single `BEGIN IMMEDIATE` transaction, so concurrent writers (threads here,
/// or other processes on the same database file) are serialized and a failed
/// operation leaves no partial rank change behind.
pub struct LadderService {
    pool: DbPool,
    engine: RankingEngine,
    ladder_lock: Mutex<()>,
}

impl LadderService {
    pub fn new(pool: DbPool, settings: &LadderSettings) -> Self {
        Self {
            pool,
            engine: RankingEngine::new(settings),
            ladder_lock: Mutex::new(()),
        }
    }

    /// Connects to the configured database and makes sure the schema exists
    pub fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = database::create_pool(&config.database)?;
        {
            let conn = database::get_connection(&pool)?;
            setup::initialize_schema(&conn)?;
        }
        info!(
            "Opened ladder at {} (minimum upset gap {})",
            config.database.path, config.ladder.minimum_upset_gap
        );
        Ok(Self::new(pool, &config.ladder))
    }

    pub fn record_match(
        &self,
        player1_id: MemberId,
        player2_id: MemberId,
        player1_score: i32,
        player2_score: i32,
    ) -> LadderResult<Match> {
        let _guard = self.lock_ladder();
        let mut conn = self.connection()?;
        let tx = begin(&mut conn)?;

        let mut player1 = members::find_by_id(&tx, player1_id)?
            .ok_or(LadderError::PlayerNotFound(player1_id))?;
        let mut player2 = members::find_by_id(&tx, player2_id)?
            .ok_or(LadderError::PlayerNotFound(player2_id))?;

        if player1.id == player2.id {
            return Err(LadderError::InvalidMatch(format!(
                "{} cannot play against themselves",
                player1.full_name()
            )));
        }

        let played_at = Utc::now().naive_utc();
        let player1_rank_before = player1.rank;
        let player2_rank_before = player2.rank;

        info!(
            "Recording match: {} (rank {}) {}:{} {} (rank {})",
            player1.full_name(),
            player1.rank,
            player1_score,
            player2_score,
            player2.full_name(),
            player2.rank
        );

        let classification = classify(&player1, &player2, player1_score, player2_score)?;
        {
            let mut ladder = Ladder::new(SqliteRankStore::new(&tx));
            let (higher, lower) = classification.split(&mut player1, &mut player2);
            let adjustment = self
                .engine
                .apply(&mut ladder, classification.result, higher, lower)?;
            debug!("Ranking outcome: {:?}", adjustment);
        }

        player1.games_played += 1;
        player2.games_played += 1;
        members::update_standing(&tx, &player1)?;
        members::update_standing(&tx, &player2)?;

        let recorded = matches::insert_match(
            &tx,
            &NewMatch {
                player1_id: player1.id,
                player2_id: player2.id,
                player1_score,
                player2_score,
                played_at,
                player1_rank_before,
                player2_rank_before,
                player1_rank_after: player1.rank,
                player2_rank_after: player2.rank,
            },
        )?;

        tx.commit().context("Failed to commit match")?;
        info!(
            "Match {} recorded ({}): {} now rank {}, {} now rank {}",
            recorded.id,
            classification.result.as_str(),
            player1.full_name(),
            player1.rank,
            player2.full_name(),
            player2.rank
        );
        Ok(recorded)
    }

    /// Runs the ranking rule against a snapshot of the ladder without writing anything
    pub fn preview_match(
        &self,
        player1_id: MemberId,
        player2_id: MemberId,
        player1_score: i32,
        player2_score: i32,
    ) -> LadderResult<RankAdjustment> {
        let conn = self.connection()?;
        let roster = members::list_by_rank(&conn)?;

        let mut player1 = standing_of(&roster, player1_id)?;
        let mut player2 = standing_of(&roster, player2_id)?;
        if player1_id == player2_id {
            return Err(LadderError::InvalidMatch(format!(
                "member {} cannot play against themselves",
                player1_id
            )));
        }

        let classification = classify(&player1, &player2, player1_score, player2_score)?;
        let snapshot =
            MemoryRankStore::from_standings(roster.iter().map(|m| Standing::new(m.id, m.rank)));
        let mut ladder = Ladder::new(snapshot);
        let (higher, lower) = classification.split(&mut player1, &mut player2);

        Ok(self
            .engine
            .apply(&mut ladder, classification.result, higher, lower)?)
    }

    /// New members join at the bottom of the ladder
    pub fn create_member(&self, details: &MemberDetails) -> LadderResult<Member> {
        let details = details.normalized();
        details.validate()?;

        let _guard = self.lock_ladder();
        let mut conn = self.connection()?;
        let tx = begin(&mut conn)?;

        if members::email_taken(&tx, &details.email, None)? {
            return Err(LadderError::DuplicateEmail(details.email));
        }

        let rank = Ladder::new(SqliteRankStore::new(&tx)).next_rank()?;
        let member = members::insert_member(&tx, &details, rank)?;

        tx.commit().context("Failed to commit new member")?;
        info!("Created member {} ({}) at rank {}", member.id, member.full_name(), member.rank);
        Ok(member)
    }

    /// Changes personal details only; rank and games played stay as they are
    pub fn update_member(&self, id: MemberId, details: &MemberDetails) -> LadderResult<Member> {
        let details = details.normalized();
        details.validate()?;

        let mut conn = self.connection()?;
        let tx = begin(&mut conn)?;

        if members::find_by_id(&tx, id)?.is_none() {
            return Err(LadderError::MemberNotFound(id));
        }
        if members::email_taken(&tx, &details.email, Some(id))? {
            return Err(LadderError::DuplicateEmail(details.email));
        }

        let member = members::update_details(&tx, id, &details)?;

        tx.commit().context("Failed to commit member update")?;
        info!("Updated member {} ({})", member.id, member.full_name());
        Ok(member)
    }

    /// Removes a member and moves everyone below them up one place.
    /// Their recorded matches stay in the history.
    pub fn delete_member(&self, id: MemberId) -> LadderResult<Member> {
        let _guard = self.lock_ladder();
        let mut conn = self.connection()?;
        let tx = begin(&mut conn)?;

        let member = members::find_by_id(&tx, id)?.ok_or(LadderError::MemberNotFound(id))?;
        members::delete_member(&tx, id)?;
        let shifted = Ladder::new(SqliteRankStore::new(&tx)).close_gap(member.rank)?;

        tx.commit().context("Failed to commit member removal")?;
        info!(
            "Deleted member {} ({}) from rank {}, {} members moved up",
            member.id,
            member.full_name(),
            member.rank,
            shifted
        );
        Ok(member)
    }

    pub fn get_member(&self, id: MemberId) -> LadderResult<Member> {
        let conn = self.connection()?;
        members::find_by_id(&conn, id)?.ok_or(LadderError::MemberNotFound(id))
    }

    /// Standings, best rank first
    pub fn list_members(&self) -> LadderResult<Vec<Member>> {
        let conn = self.connection()?;
        Ok(members::list_by_rank(&conn)?)
    }

    pub fn list_matches(&self) -> LadderResult<Vec<Match>> {
        let conn = self.connection()?;
        Ok(matches::list_all(&conn)?)
    }

    pub fn member_history(&self, member_id: MemberId) -> LadderResult<Vec<Match>> {
        let conn = self.connection()?;
        Ok(matches::list_by_member(&conn, member_id)?)
    }

    pub fn verify_ladder(&self) -> LadderResult<LadderReport> {
        let conn = self.connection()?;
        let ranks = members::list_ranks(&conn)?;
        Ok(check_permutation(&ranks))
    }

    fn lock_ladder(&self) -> MutexGuard<'_, ()> {
        // poisoning means nothing for a `()` guard
        self.ladder_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn connection(&self) -> LadderResult<DbConn> {
        Ok(database::get_connection(&self.pool)?)
    }
}

fn begin(conn: &mut Connection) -> LadderResult<Transaction<'_>> {
    Ok(conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("Failed to begin transaction")?)
}

fn standing_of(roster: &[Member], id: MemberId) -> LadderResult<Standing> {
    roster
        .iter()
        .find(|m| m.id == id)
        .map(|m| Standing::new(m.id, m.rank))
        .ok_or(LadderError::PlayerNotFound(id))
}
