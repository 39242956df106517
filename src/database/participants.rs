use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::models::{MatchParticipant, ParticipantInput};

pub fn insert_participant(
    conn: &Connection,
    match_id: &str,
    input: &ParticipantInput,
) -> Result<MatchParticipant> {
    let sql = "INSERT INTO match_participants (id, match_id, team_id, profile_id, placement, kills, points) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id, match_id, team_id, profile_id, placement, kills, points";

    conn.query_row(
        sql,
        params![
            Uuid::new_v4().to_string(),
            match_id,
            input.team_id,
            input.profile_id,
            input.placement,
            input.kills,
            input.points
        ],
        parse_participant_row,
    )
    .context("Failed to insert match participant")
}

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<MatchParticipant> {
    Ok(MatchParticipant {
        id: row.get(0)?,
        match_id: row.get(1)?,
        team_id: row.get(2)?,
        profile_id: row.get(3)?,
        placement: row.get(4)?,
        kills: row.get(5)?,
        points: row.get(6)?,
    })
}

/// Participants ordered by placement, unplaced entries last.
pub fn list_for_match(conn: &Connection, match_id: &str) -> Result<Vec<MatchParticipant>> {
    let sql = "SELECT id, match_id, team_id, profile_id, placement, kills, points FROM match_participants WHERE match_id = ?1 ORDER BY placement IS NULL, placement ASC, rowid ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![match_id], parse_participant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list match participants")?;

    Ok(rows)
}
