use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::models::{Tournament, TournamentInput};

const TOURNAMENT_COLUMNS: &str = "id, title, description, start_date, end_date, registration_deadline, prize_pool, entry_fee, max_teams, team_size, mode, status, image_url, rules, creator_id, created_at, updated_at";

pub fn insert_tournament(
    conn: &Connection,
    input: &TournamentInput,
    status: &str,
    creator_id: &str,
) -> Result<Tournament> {
    let sql = format!(
        "INSERT INTO tournaments (id, title, description, start_date, end_date, registration_deadline, prize_pool, entry_fee, max_teams, team_size, mode, status, image_url, rules, creator_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?16)
         RETURNING {TOURNAMENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            input.title,
            input.description,
            input.start_date,
            input.end_date,
            input.registration_deadline,
            input.prize_pool,
            input.entry_fee,
            input.max_teams,
            input.team_size,
            input.mode,
            status,
            input.image_url,
            input.rules,
            creator_id,
            Utc::now()
        ],
        parse_tournament_row,
    )
    .context("Failed to insert tournament")
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        registration_deadline: row.get(5)?,
        prize_pool: row.get(6)?,
        entry_fee: row.get(7)?,
        max_teams: row.get(8)?,
        team_size: row.get(9)?,
        mode: row.get(10)?,
        status: row.get(11)?,
        image_url: row.get(12)?,
        rules: row.get(13)?,
        creator_id: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

/// Newest first, optionally restricted to one status.
pub fn list(conn: &Connection, status: Option<&str>) -> Result<Vec<Tournament>> {
    let sql = format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC, rowid DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![status], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list tournaments")?;

    Ok(rows)
}

/// `(id, title)` pairs for pickers, newest first.
pub fn list_titles(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT id, title FROM tournaments ORDER BY created_at DESC, rowid DESC")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list tournament titles")?;

    Ok(rows)
}

pub fn update_tournament(
    conn: &Connection,
    id: &str,
    input: &TournamentInput,
    status: &str,
) -> Result<Option<Tournament>> {
    let sql = format!(
        "UPDATE tournaments SET
            title = ?2, description = ?3, start_date = ?4, end_date = ?5, registration_deadline = ?6,
            prize_pool = ?7, entry_fee = ?8, max_teams = ?9, team_size = ?10, mode = ?11, status = ?12,
            image_url = ?13, rules = ?14, updated_at = ?15
         WHERE id = ?1 RETURNING {TOURNAMENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            input.title,
            input.description,
            input.start_date,
            input.end_date,
            input.registration_deadline,
            input.prize_pool,
            input.entry_fee,
            input.max_teams,
            input.team_size,
            input.mode,
            status,
            input.image_url,
            input.rules,
            Utc::now()
        ],
        parse_tournament_row,
    )
    .optional()
    .context("Failed to update tournament")
}

pub fn delete_tournament(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM tournaments WHERE id = ?1", params![id])
        .context("Failed to delete tournament")?;
    Ok(deleted > 0)
}
