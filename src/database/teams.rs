use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::models::{Team, TeamInput, TeamWithCaptain};

const TEAM_COLUMNS: &str =
    "id, name, bio, region, logo_url, captain_id, team_code, created_at, updated_at";

pub fn insert_team(
    conn: &Connection,
    input: &TeamInput,
    captain_id: &str,
    team_code: &str,
) -> Result<Team> {
    let sql = format!(
        "INSERT INTO teams (id, name, bio, region, logo_url, captain_id, team_code, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8) RETURNING {TEAM_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            input.name,
            input.bio,
            input.region,
            input.logo_url,
            captain_id,
            team_code,
            Utc::now()
        ],
        parse_team_row,
    )
    .context("Failed to insert team")
}

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        bio: row.get(2)?,
        region: row.get(3)?,
        logo_url: row.get(4)?,
        captain_id: row.get(5)?,
        team_code: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Team>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_team_row)
        .optional()
        .context("Failed to query team by id")
}

pub fn find_by_code(conn: &Connection, team_code: &str) -> Result<Option<Team>> {
    let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE team_code = ?1");

    conn.query_row(&sql, params![team_code], parse_team_row)
        .optional()
        .context("Failed to query team by code")
}

pub fn code_exists(conn: &Connection, team_code: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM teams WHERE team_code = ?1)",
        params![team_code],
        |row| row.get(0),
    )
    .context("Failed to check team code")
}

/// Teams with their captain's names and member count, alphabetical.
/// A team always counts at least one member, its captain.
pub fn list_with_captains(conn: &Connection) -> Result<Vec<TeamWithCaptain>> {
    let sql = "
        SELECT
            t.id, t.name, t.bio, t.region, t.logo_url, t.captain_id, t.team_code, t.created_at, t.updated_at,
            p.username,
            p.full_name,
            (SELECT COUNT(*) FROM team_members m WHERE m.team_id = t.id) AS member_count
        FROM teams t
        LEFT JOIN profiles p ON p.id = t.captain_id
        ORDER BY t.name COLLATE NOCASE ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            let member_count: i64 = row.get(11)?;
            Ok(TeamWithCaptain {
                team: parse_team_row(row)?,
                captain_username: row.get(9)?,
                captain_full_name: row.get(10)?,
                member_count: member_count.max(1),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list teams")?;

    Ok(rows)
}

/// Updates the editable fields. The captain never changes here.
pub fn update_team(conn: &Connection, id: &str, input: &TeamInput) -> Result<Option<Team>> {
    let sql = format!(
        "UPDATE teams SET name = ?2, bio = ?3, region = ?4, logo_url = ?5, updated_at = ?6 WHERE id = ?1 RETURNING {TEAM_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![id, input.name, input.bio, input.region, input.logo_url, Utc::now()],
        parse_team_row,
    )
    .optional()
    .context("Failed to update team")
}

pub fn delete_team(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM teams WHERE id = ?1", params![id])
        .context("Failed to delete team")?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::team_members;
    use crate::database::testing::{memory_conn, profile, team_input};

    #[test]
    fn test_insert_and_find_by_code() {
        let (_pool, conn) = memory_conn();
        let captain = profile(&conn, "cap");
        let team = insert_team(&conn, &team_input("Neon Strikers"), &captain.id, "AB12CD").unwrap();

        assert_eq!(find_by_code(&conn, "AB12CD").unwrap().unwrap().id, team.id);
        assert!(code_exists(&conn, "AB12CD").unwrap());
        assert!(!code_exists(&conn, "ZZZZZZ").unwrap());
        assert!(find_by_id(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_list_counts_captain_at_least() {
        let (_pool, conn) = memory_conn();
        let captain = profile(&conn, "cap");
        let member = profile(&conn, "mate");
        let lonely = insert_team(&conn, &team_input("Zeta"), &captain.id, "ZZZ111").unwrap();
        let full = insert_team(&conn, &team_input("alpha"), &captain.id, "AAA111").unwrap();
        team_members::insert_member(&conn, &full.id, &captain.id, Some("captain")).unwrap();
        team_members::insert_member(&conn, &full.id, &member.id, Some("member")).unwrap();

        let teams = list_with_captains(&conn).unwrap();

        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].team.id, full.id);
        assert_eq!(teams[0].member_count, 2);
        assert_eq!(teams[1].team.id, lonely.id);
        assert_eq!(teams[1].member_count, 1);
        assert_eq!(teams[1].captain_username.as_deref(), Some("cap"));
    }

    #[test]
    fn test_update_keeps_captain_and_delete_cascades() {
        let (_pool, conn) = memory_conn();
        let captain = profile(&conn, "cap");
        let team = insert_team(&conn, &team_input("Old"), &captain.id, "OLD111").unwrap();
        team_members::insert_member(&conn, &team.id, &captain.id, Some("captain")).unwrap();

        let updated = update_team(&conn, &team.id, &team_input("New")).unwrap().unwrap();
        assert_eq!(updated.name, "New");
        assert_eq!(updated.captain_id, captain.id);
        assert_eq!(updated.team_code, "OLD111");

        assert!(delete_team(&conn, &team.id).unwrap());
        assert!(!delete_team(&conn, &team.id).unwrap());
        assert!(team_members::find_membership_of(&conn, &captain.id).unwrap().is_none());
    }
}
