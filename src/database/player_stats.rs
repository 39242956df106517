use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::models::{PlayerStats, StatsInput, StatsWithProfile};

const STATS_COLUMNS: &str = "id, profile_id, total_matches, wins, kills, deaths, assists, kd_ratio, created_at, updated_at";

/// Zeroed stats row for a profile.
pub fn insert_stats(conn: &Connection, profile_id: &str) -> Result<PlayerStats> {
    let sql = format!(
        "INSERT INTO player_stats (id, profile_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) RETURNING {STATS_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![Uuid::new_v4().to_string(), profile_id, Utc::now()],
        parse_stats_row,
    )
    .context("Failed to insert player stats")
}

fn parse_stats_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerStats> {
    Ok(PlayerStats {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        total_matches: row.get(2)?,
        wins: row.get(3)?,
        kills: row.get(4)?,
        deaths: row.get(5)?,
        assists: row.get(6)?,
        kd_ratio: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<PlayerStats>> {
    let sql = format!("SELECT {STATS_COLUMNS} FROM player_stats WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_stats_row)
        .optional()
        .context("Failed to query player stats by id")
}

pub fn exists_for_profile(conn: &Connection, profile_id: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM player_stats WHERE profile_id = ?1)",
        params![profile_id],
        |row| row.get(0),
    )
    .context("Failed to check player stats")
}

pub fn update_stats(
    conn: &Connection,
    id: &str,
    input: &StatsInput,
    kd_ratio: f64,
) -> Result<Option<PlayerStats>> {
    let sql = format!(
        "UPDATE player_stats SET total_matches = ?2, wins = ?3, kills = ?4, deaths = ?5, assists = ?6, kd_ratio = ?7, updated_at = ?8
         WHERE id = ?1 RETURNING {STATS_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            input.total_matches,
            input.wins,
            input.kills,
            input.deaths,
            input.assists,
            kd_ratio,
            Utc::now()
        ],
        parse_stats_row,
    )
    .optional()
    .context("Failed to update player stats")
}

/// Stats joined with the owning profile's names, most kills first.
pub fn list_with_profiles(conn: &Connection) -> Result<Vec<StatsWithProfile>> {
    let sql = "
        SELECT s.id, s.profile_id, s.total_matches, s.wins, s.kills, s.deaths, s.assists, s.kd_ratio, s.created_at, s.updated_at,
               p.username, p.full_name
        FROM player_stats s
        LEFT JOIN profiles p ON p.id = s.profile_id
        ORDER BY s.kills DESC, s.kd_ratio DESC, s.rowid ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StatsWithProfile {
                stats: parse_stats_row(row)?,
                username: row.get(10)?,
                full_name: row.get(11)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list player stats")?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{memory_conn, profile};

    fn line(kills: i64, deaths: i64) -> StatsInput {
        StatsInput {
            total_matches: 10,
            wins: 2,
            kills,
            deaths,
            assists: 4,
        }
    }

    #[test]
    fn test_list_orders_by_kills() {
        let (_pool, conn) = memory_conn();
        let low = profile(&conn, "low");
        let high = profile(&conn, "high");
        let low_stats = insert_stats(&conn, &low.id).unwrap();
        let high_stats = insert_stats(&conn, &high.id).unwrap();
        update_stats(&conn, &low_stats.id, &line(5, 5), 1.0).unwrap();
        update_stats(&conn, &high_stats.id, &line(50, 10), 5.0).unwrap();

        let rows = list_with_profiles(&conn).unwrap();

        assert_eq!(rows[0].username.as_deref(), Some("high"));
        assert_eq!(rows[0].stats.kd_ratio, 5.0);
        assert_eq!(rows[1].stats.kills, 5);
    }

    #[test]
    fn test_one_row_per_profile() {
        let (_pool, conn) = memory_conn();
        let player = profile(&conn, "player");
        let stats = insert_stats(&conn, &player.id).unwrap();

        assert_eq!(stats.kills, 0);
        assert!(exists_for_profile(&conn, &player.id).unwrap());
        assert!(insert_stats(&conn, &player.id).is_err());
        assert!(update_stats(&conn, "missing", &line(1, 1), 1.0).unwrap().is_none());
    }
}
