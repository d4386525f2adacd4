use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::models::{Match, NewMatch};
use crate::ranking::MemberId;

pub fn insert_match(conn: &Connection, new_match: &NewMatch) -> Result<Match> {
    let sql = "INSERT INTO matches (player1_id, player2_id, player1_score, player2_score, played_at, player1_rank_before, player2_rank_before, player1_rank_after, player2_rank_after) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) RETURNING id, player1_id, player2_id, player1_score, player2_score, played_at, player1_rank_before, player2_rank_before, player1_rank_after, player2_rank_after";

    conn.query_row(
        sql,
        params![
            new_match.player1_id,
            new_match.player2_id,
            new_match.player1_score,
            new_match.player2_score,
            new_match.played_at,
            new_match.player1_rank_before,
            new_match.player2_rank_before,
            new_match.player1_rank_after,
            new_match.player2_rank_after
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        player1_id: row.get(1)?,
        player2_id: row.get(2)?,
        player1_score: row.get(3)?,
        player2_score: row.get(4)?,
        played_at: row.get(5)?,
        player1_rank_before: row.get(6)?,
        player2_rank_before: row.get(7)?,
        player1_rank_after: row.get(8)?,
        player2_rank_after: row.get(9)?,
    })
}

/// Newest first
pub fn list_all(conn: &Connection) -> Result<Vec<Match>> {
    let sql = "SELECT id, player1_id, player2_id, player1_score, player2_score, played_at, player1_rank_before, player2_rank_before, player1_rank_after, player2_rank_after FROM matches ORDER BY played_at DESC, id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Every match the member played in either seat, newest first
pub fn list_by_member(conn: &Connection, member_id: MemberId) -> Result<Vec<Match>> {
    let sql = "SELECT id, player1_id, player2_id, player1_score, player2_score, played_at, player1_rank_before, player2_rank_before, player1_rank_after, player2_rank_after FROM matches WHERE player1_id = ?1 OR player2_id = ?1 ORDER BY played_at DESC, id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![member_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_all(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))
        .context("Failed to count matches")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup::initialize_schema;
    use chrono::NaiveDate;

    fn new_match(player1_id: MemberId, player2_id: MemberId, day: u32) -> NewMatch {
        NewMatch {
            player1_id,
            player2_id,
            player1_score: 1,
            player2_score: 0,
            played_at: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            player1_rank_before: 1,
            player2_rank_before: 2,
            player1_rank_after: 1,
            player2_rank_after: 2,
        }
    }

    #[test]
    fn test_insert_and_list_by_member() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        insert_match(&conn, &new_match(1, 2, 1)).unwrap();
        insert_match(&conn, &new_match(3, 1, 2)).unwrap();
        insert_match(&conn, &new_match(2, 3, 3)).unwrap();

        let history = list_by_member(&conn, 1).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].player1_id, 3); // newest first
        assert!(history.iter().all(|m| m.involves(1)));

        assert_eq!(list_all(&conn).unwrap().len(), 3);
        assert_eq!(count_all(&conn).unwrap(), 3);
    }

    #[test]
    fn test_self_play_rejected_by_schema() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        assert!(insert_match(&conn, &new_match(4, 4, 1)).is_err());
        assert_eq!(count_all(&conn).unwrap(), 0);
    }
}
