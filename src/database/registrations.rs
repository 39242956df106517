use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::models::Registration;

pub fn insert_registration(
    conn: &Connection,
    tournament_id: &str,
    profile_id: Option<&str>,
    team_id: Option<&str>,
    payment_status: &str,
) -> Result<Registration> {
    let sql = "INSERT INTO tournament_registrations (id, tournament_id, profile_id, team_id, payment_status, registration_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id, tournament_id, profile_id, team_id, payment_status, registration_date";

    conn.query_row(
        sql,
        params![
            Uuid::new_v4().to_string(),
            tournament_id,
            profile_id,
            team_id,
            payment_status,
            Utc::now()
        ],
        |row| {
            Ok(Registration {
                id: row.get(0)?,
                tournament_id: row.get(1)?,
                profile_id: row.get(2)?,
                team_id: row.get(3)?,
                payment_status: row.get(4)?,
                registration_date: row.get(5)?,
            })
        },
    )
    .context("Failed to insert tournament registration")
}

pub fn count_for_tournament(conn: &Connection, tournament_id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM tournament_registrations WHERE tournament_id = ?1",
        params![tournament_id],
        |row| row.get(0),
    )
    .context("Failed to count tournament registrations")
}

pub fn is_registered(conn: &Connection, tournament_id: &str, profile_id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM tournament_registrations WHERE tournament_id = ?1 AND profile_id = ?2)",
        params![tournament_id, profile_id],
        |row| row.get(0),
    )
    .context("Failed to check tournament registration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{memory_conn, profile, tournament};

    #[test]
    fn test_count_and_lookup() {
        let (_pool, conn) = memory_conn();
        let player = profile(&conn, "player");
        let other = profile(&conn, "other");
        let cup = tournament(&conn, "Cup", 4);

        insert_registration(&conn, &cup.id, Some(&player.id), None, "Free").unwrap();

        assert_eq!(count_for_tournament(&conn, &cup.id).unwrap(), 1);
        assert!(is_registered(&conn, &cup.id, &player.id).unwrap());
        assert!(!is_registered(&conn, &cup.id, &other.id).unwrap());
    }

    #[test]
    fn test_unknown_tournament_rejected_by_foreign_key() {
        let (_pool, conn) = memory_conn();
        let player = profile(&conn, "player");
        assert!(insert_registration(&conn, "missing", Some(&player.id), None, "Free").is_err());
    }
}
