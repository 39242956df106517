use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::models::{MemberWithProfile, TeamMember};

pub fn insert_member(
    conn: &Connection,
    team_id: &str,
    profile_id: &str,
    role: Option<&str>,
) -> Result<TeamMember> {
    let sql = "INSERT INTO team_members (id, team_id, profile_id, role, joined_at) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id, team_id, profile_id, role, joined_at";

    conn.query_row(
        sql,
        params![Uuid::new_v4().to_string(), team_id, profile_id, role, Utc::now()],
        parse_member_row,
    )
    .context("Failed to insert team member")
}

fn parse_member_row(row: &rusqlite::Row) -> rusqlite::Result<TeamMember> {
    Ok(TeamMember {
        id: row.get(0)?,
        team_id: row.get(1)?,
        profile_id: row.get(2)?,
        role: row.get(3)?,
        joined_at: row.get(4)?,
    })
}

/// Members of a team in join order, with the profile's display fields.
pub fn list_for_team(conn: &Connection, team_id: &str) -> Result<Vec<MemberWithProfile>> {
    let sql = "
        SELECT m.id, m.profile_id, p.username, p.avatar_url, m.role, m.joined_at
        FROM team_members m
        LEFT JOIN profiles p ON p.id = m.profile_id
        WHERE m.team_id = ?1
        ORDER BY m.joined_at ASC, m.rowid ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![team_id], |row| {
            let username: Option<String> = row.get(2)?;
            Ok(MemberWithProfile {
                id: row.get(0)?,
                profile_id: row.get(1)?,
                username: username.unwrap_or_else(|| "Unknown User".to_string()),
                avatar_url: row.get(3)?,
                role: row.get(4)?,
                joined_at: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list team members")?;

    Ok(rows)
}

/// The first membership of a profile in any team.
pub fn find_membership_of(conn: &Connection, profile_id: &str) -> Result<Option<TeamMember>> {
    let sql = "SELECT id, team_id, profile_id, role, joined_at FROM team_members WHERE profile_id = ?1 ORDER BY joined_at ASC LIMIT 1";

    conn.query_row(sql, params![profile_id], parse_member_row)
        .optional()
        .context("Failed to query team membership")
}

pub fn is_member(conn: &Connection, team_id: &str, profile_id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM team_members WHERE team_id = ?1 AND profile_id = ?2)",
        params![team_id, profile_id],
        |row| row.get(0),
    )
    .context("Failed to check team membership")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::teams;
    use crate::database::testing::{memory_conn, profile, team_input};

    #[test]
    fn test_members_listed_with_profiles() {
        let (_pool, conn) = memory_conn();
        let captain = profile(&conn, "cap");
        let mate = profile(&conn, "mate");
        let team = teams::insert_team(&conn, &team_input("Squad"), &captain.id, "SQD111").unwrap();
        insert_member(&conn, &team.id, &captain.id, Some("captain")).unwrap();
        insert_member(&conn, &team.id, &mate.id, Some("member")).unwrap();

        let members = list_for_team(&conn, &team.id).unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].username, "cap");
        assert_eq!(members[0].role.as_deref(), Some("captain"));
        assert_eq!(members[1].username, "mate");
        assert!(is_member(&conn, &team.id, &mate.id).unwrap());
        assert_eq!(find_membership_of(&conn, &mate.id).unwrap().unwrap().team_id, team.id);
    }

    #[test]
    fn test_same_member_twice_is_rejected() {
        let (_pool, conn) = memory_conn();
        let captain = profile(&conn, "cap");
        let team = teams::insert_team(&conn, &team_input("Squad"), &captain.id, "SQD111").unwrap();
        insert_member(&conn, &team.id, &captain.id, None).unwrap();

        assert!(insert_member(&conn, &team.id, &captain.id, None).is_err());
    }
}
