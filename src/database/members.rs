use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::Member;
use crate::domain::MemberDetails;
use crate::ranking::{MemberId, Rank, RankStore};

pub fn insert_member(conn: &Connection, details: &MemberDetails, rank: Rank) -> Result<Member> {
    let sql = "INSERT INTO members (name, surname, email, birthday, rank) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id, name, surname, email, birthday, rank, games_played, created_at";

    conn.query_row(
        sql,
        params![details.name, details.surname, details.email, details.birthday, rank],
        parse_member_row,
    )
    .context("Failed to insert new member")
}

fn parse_member_row(row: &rusqlite::Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        surname: row.get(2)?,
        email: row.get(3)?,
        birthday: row.get(4)?,
        rank: row.get(5)?,
        games_played: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn find_by_id(conn: &Connection, id: MemberId) -> Result<Option<Member>> {
    let sql = "SELECT id, name, surname, email, birthday, rank, games_played, created_at FROM members WHERE id = ?1";

    conn.query_row(sql, params![id], parse_member_row)
        .optional()
        .context("Failed to query member by id")
}

pub fn list_by_rank(conn: &Connection) -> Result<Vec<Member>> {
    let sql = "SELECT id, name, surname, email, birthday, rank, games_played, created_at FROM members ORDER BY rank ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_member_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_ranks(conn: &Connection) -> Result<Vec<Rank>> {
    let mut stmt = conn.prepare("SELECT rank FROM members ORDER BY rank ASC")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Whether another member already uses `email`; `excluding` skips the member being edited
pub fn email_taken(conn: &Connection, email: &str, excluding: Option<MemberId>) -> Result<bool> {
    let sql = "SELECT EXISTS (SELECT 1 FROM members WHERE email = ?1 AND id IS NOT ?2)";

    conn.query_row(sql, params![email, excluding], |row| row.get(0))
        .context("Failed to check email uniqueness")
}

pub fn update_details(conn: &Connection, id: MemberId, details: &MemberDetails) -> Result<Member> {
    let sql = "UPDATE members SET name = ?1, surname = ?2, email = ?3, birthday = ?4 WHERE id = ?5 RETURNING id, name, surname, email, birthday, rank, games_played, created_at";

    conn.query_row(
        sql,
        params![details.name, details.surname, details.email, details.birthday, id],
        parse_member_row,
    )
    .context("Failed to update member details")
}

/// Persists the ladder-owned fields of a member
pub fn update_standing(conn: &Connection, member: &Member) -> Result<()> {
    let sql = "UPDATE members SET rank = ?1, games_played = ?2 WHERE id = ?3";

    conn.execute(sql, params![member.rank, member.games_played, member.id])
        .with_context(|| format!("Failed to update standing of member {}", member.id))
        .map(|_| ())
}

pub fn delete_member(conn: &Connection, id: MemberId) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM members WHERE id = ?1", params![id])
        .context("Failed to delete member")?;
    Ok(deleted > 0)
}

pub fn max_rank(conn: &Connection) -> Result<Option<Rank>> {
    conn.query_row("SELECT MAX(rank) FROM members", [], |row| row.get(0))
        .context("Failed to query max rank")
}

fn find_rank(conn: &Connection, id: MemberId) -> Result<Option<Rank>> {
    conn.query_row("SELECT rank FROM members WHERE id = ?1", params![id], |row| row.get(0))
        .optional()
        .context("Failed to query member rank")
}

pub fn shift_up(conn: &Connection, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize> {
    let sql = "UPDATE members SET rank = rank + 1 WHERE rank >= ?1 AND rank < ?2 AND id IS NOT ?3";

    conn.execute(sql, params![lo, hi, except])
        .with_context(|| format!("Failed to shift ranks [{}, {}) down the ladder", lo, hi))
}

pub fn shift_down(
    conn: &Connection,
    lo: Rank,
    hi: Rank,
    except: Option<MemberId>,
) -> Result<usize> {
    let sql = "UPDATE members SET rank = rank - 1 WHERE rank > ?1 AND rank <= ?2 AND id IS NOT ?3";

    conn.execute(sql, params![lo, hi, except])
        .with_context(|| format!("Failed to shift ranks ({}, {}] up the ladder", lo, hi))
}

fn set_rank(conn: &Connection, id: MemberId, rank: Rank) -> Result<()> {
    let updated = conn
        .execute("UPDATE members SET rank = ?1 WHERE id = ?2", params![rank, id])
        .context("Failed to set member rank")?;
    if updated == 0 {
        anyhow::bail!("Member {} is not on the ladder", id);
    }
    Ok(())
}

/// Rank store backed by the `members` table.
///
/// Meant to wrap the connection of an open transaction so every shift of one
/// ladder operation commits or rolls back together.
pub struct SqliteRankStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteRankStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl RankStore for SqliteRankStore<'_> {
    fn rank_of(&self, id: MemberId) -> Result<Option<Rank>> {
        find_rank(self.conn, id)
    }

    fn max_rank(&self) -> Result<Option<Rank>> {
        max_rank(self.conn)
    }

    fn shift_up(&mut self, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize> {
        shift_up(self.conn, lo, hi, except)
    }

    fn shift_down(&mut self, lo: Rank, hi: Rank, except: Option<MemberId>) -> Result<usize> {
        shift_down(self.conn, lo, hi, except)
    }

    fn set_rank(&mut self, id: MemberId, rank: Rank) -> Result<()> {
        set_rank(self.conn, id, rank)
    }
}
