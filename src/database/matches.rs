use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::models::{Match, MatchInput, MatchWithTournament};

const MATCH_COLUMNS: &str = "id, tournament_id, round_number, match_number, start_time, end_time, map, status, stream_url, created_at, updated_at";

const UNKNOWN_TOURNAMENT: &str = "Unknown Tournament";

pub fn insert_match(conn: &Connection, input: &MatchInput, status: &str) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (id, tournament_id, round_number, match_number, start_time, end_time, map, status, stream_url, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
         RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            input.tournament_id,
            input.round_number,
            input.match_number,
            input.start_time,
            input.end_time,
            input.map,
            status,
            input.stream_url,
            Utc::now()
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        round_number: row.get(2)?,
        match_number: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        map: row.get(6)?,
        status: row.get(7)?,
        stream_url: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn parse_match_with_title(row: &rusqlite::Row) -> rusqlite::Result<MatchWithTournament> {
    let title: Option<String> = row.get(11)?;
    Ok(MatchWithTournament {
        details: parse_match_row(row)?,
        tournament_title: title.unwrap_or_else(|| UNKNOWN_TOURNAMENT.to_string()),
    })
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<MatchWithTournament>> {
    let sql = "
        SELECT m.id, m.tournament_id, m.round_number, m.match_number, m.start_time, m.end_time, m.map, m.status, m.stream_url, m.created_at, m.updated_at, t.title
        FROM matches m
        LEFT JOIN tournaments t ON t.id = m.tournament_id
        WHERE m.id = ?1
    ";

    conn.query_row(sql, params![id], parse_match_with_title)
        .optional()
        .context("Failed to query match by id")
}

/// All matches by ascending start time, each with its tournament's title.
pub fn list_with_tournament_titles(conn: &Connection) -> Result<Vec<MatchWithTournament>> {
    let sql = "
        SELECT m.id, m.tournament_id, m.round_number, m.match_number, m.start_time, m.end_time, m.map, m.status, m.stream_url, m.created_at, m.updated_at, t.title
        FROM matches m
        LEFT JOIN tournaments t ON t.id = m.tournament_id
        ORDER BY m.start_time ASC, m.round_number ASC, m.match_number ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_match_with_title)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list matches")?;

    Ok(rows)
}

pub fn update_match(conn: &Connection, id: &str, input: &MatchInput, status: &str) -> Result<Option<Match>> {
    let sql = format!(
        "UPDATE matches SET
            tournament_id = ?2, round_number = ?3, match_number = ?4, start_time = ?5, end_time = ?6,
            map = ?7, status = ?8, stream_url = ?9, updated_at = ?10
         WHERE id = ?1 RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            input.tournament_id,
            input.round_number,
            input.match_number,
            input.start_time,
            input.end_time,
            input.map,
            status,
            input.stream_url,
            Utc::now()
        ],
        parse_match_row,
    )
    .optional()
    .context("Failed to update match")
}

pub fn delete_match(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM matches WHERE id = ?1", params![id])
        .context("Failed to delete match")?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{match_input, memory_conn, tournament};
    use chrono::Duration;

    #[test]
    fn test_list_orders_by_start_time_with_titles() {
        let (_pool, conn) = memory_conn();
        let cup = tournament(&conn, "Cup", 8);
        let now = Utc::now();

        let late = insert_match(&conn, &match_input(&cup.id, now + Duration::hours(5)), "Scheduled").unwrap();
        let early = insert_match(&conn, &match_input(&cup.id, now + Duration::hours(1)), "Scheduled").unwrap();

        let matches = list_with_tournament_titles(&conn).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].details.id, early.id);
        assert_eq!(matches[1].details.id, late.id);
        assert!(matches.iter().all(|m| m.tournament_title == "Cup"));
    }

    #[test]
    fn test_update_delete_and_cascade() {
        let (_pool, conn) = memory_conn();
        let cup = tournament(&conn, "Cup", 8);
        let created = insert_match(&conn, &match_input(&cup.id, Utc::now()), "Scheduled").unwrap();

        let mut input = match_input(&cup.id, Utc::now());
        input.map = Some("Bermuda".to_string());
        let updated = update_match(&conn, &created.id, &input, "Live").unwrap().unwrap();
        assert_eq!(updated.map.as_deref(), Some("Bermuda"));
        assert_eq!(updated.status, "Live");

        crate::database::tournaments::delete_tournament(&conn, &cup.id).unwrap();
        assert!(find_by_id(&conn, &created.id).unwrap().is_none());
        assert!(!delete_match(&conn, &created.id).unwrap());
    }

    #[test]
    fn test_insert_for_unknown_tournament_fails() {
        let (_pool, conn) = memory_conn();
        assert!(insert_match(&conn, &match_input("missing", Utc::now()), "Scheduled").is_err());
    }
}
