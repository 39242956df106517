use anyhow::{Context, Result};
use rusqlite::Connection;

use super::models::TableCounts;

pub fn counts(conn: &Connection) -> Result<TableCounts> {
    let sql = "
        SELECT
            (SELECT COUNT(*) FROM profiles),
            (SELECT COUNT(*) FROM teams),
            (SELECT COUNT(*) FROM tournaments),
            (SELECT COUNT(*) FROM tournament_registrations),
            (SELECT COUNT(*) FROM matches),
            (SELECT COUNT(*) FROM news),
            (SELECT COUNT(*) FROM streams),
            (SELECT COUNT(*) FROM player_stats)
    ";

    conn.query_row(sql, [], |row| {
        Ok(TableCounts {
            profiles: row.get(0)?,
            teams: row.get(1)?,
            tournaments: row.get(2)?,
            registrations: row.get(3)?,
            matches: row.get(4)?,
            news: row.get(5)?,
            streams: row.get(6)?,
            player_stats: row.get(7)?,
        })
    })
    .context("Failed to count table rows")
}
