use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::models::{Stream, StreamInput};

const STREAM_COLUMNS: &str = "id, title, description, thumbnail_url, stream_url, is_live, viewers, streamer, scheduled_for, created_at, updated_at";

pub fn insert_stream(conn: &Connection, input: &StreamInput) -> Result<Stream> {
    let sql = format!(
        "INSERT INTO streams (id, title, description, thumbnail_url, stream_url, is_live, viewers, streamer, scheduled_for, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
         RETURNING {STREAM_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            input.title,
            input.description,
            input.thumbnail_url,
            input.stream_url,
            input.is_live,
            input.viewers,
            input.streamer,
            input.scheduled_for,
            Utc::now()
        ],
        parse_stream_row,
    )
    .context("Failed to insert stream")
}

fn parse_stream_row(row: &rusqlite::Row) -> rusqlite::Result<Stream> {
    Ok(Stream {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        thumbnail_url: row.get(3)?,
        stream_url: row.get(4)?,
        is_live: row.get(5)?,
        viewers: row.get(6)?,
        streamer: row.get(7)?,
        scheduled_for: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Live streams first, then by audience.
pub fn list(conn: &Connection, live: Option<bool>) -> Result<Vec<Stream>> {
    let sql = format!(
        "SELECT {STREAM_COLUMNS} FROM streams WHERE (?1 IS NULL OR is_live = ?1) ORDER BY is_live DESC, viewers DESC, created_at DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![live], parse_stream_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list streams")?;

    Ok(rows)
}

pub fn update_stream(conn: &Connection, id: &str, input: &StreamInput) -> Result<Option<Stream>> {
    let sql = format!(
        "UPDATE streams SET
            title = ?2, description = ?3, thumbnail_url = ?4, stream_url = ?5, is_live = ?6,
            viewers = ?7, streamer = ?8, scheduled_for = ?9, updated_at = ?10
         WHERE id = ?1 RETURNING {STREAM_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            input.title,
            input.description,
            input.thumbnail_url,
            input.stream_url,
            input.is_live,
            input.viewers,
            input.streamer,
            input.scheduled_for,
            Utc::now()
        ],
        parse_stream_row,
    )
    .optional()
    .context("Failed to update stream")
}

pub fn delete_stream(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM streams WHERE id = ?1", params![id])
        .context("Failed to delete stream")?;
    Ok(deleted > 0)
}
