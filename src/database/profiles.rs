use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::models::{Profile, ProfileUpdate};

const PROFILE_COLUMNS: &str =
    "id, username, full_name, avatar_url, bio, is_admin, api_key, created_at, updated_at";

pub fn insert_profile(conn: &Connection, username: &str, full_name: Option<&str>) -> Result<Profile> {
    let now = Utc::now();
    let sql = format!(
        "INSERT INTO profiles (id, username, full_name, api_key, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING {PROFILE_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            username,
            full_name,
            Uuid::new_v4().simple().to_string(),
            now
        ],
        parse_profile_row,
    )
    .context("Failed to insert profile")
}

fn parse_profile_row(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        username: row.get(1)?,
        full_name: row.get(2)?,
        avatar_url: row.get(3)?,
        bio: row.get(4)?,
        is_admin: row.get(5)?,
        api_key: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_profile_row)
        .optional()
        .context("Failed to query profile by id")
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE username = ?1");

    conn.query_row(&sql, params![username], parse_profile_row)
        .optional()
        .context("Failed to query profile by username")
}

pub fn find_by_api_key(conn: &Connection, api_key: &str) -> Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE api_key = ?1");

    conn.query_row(&sql, params![api_key], parse_profile_row)
        .optional()
        .context("Failed to query profile by api key")
}

/// Applies the provided fields and leaves absent ones untouched.
pub fn update_profile(conn: &Connection, id: &str, update: &ProfileUpdate) -> Result<Option<Profile>> {
    let sql = format!(
        "UPDATE profiles SET
            username = COALESCE(?2, username),
            full_name = COALESCE(?3, full_name),
            bio = COALESCE(?4, bio),
            avatar_url = COALESCE(?5, avatar_url),
            updated_at = ?6
         WHERE id = ?1 RETURNING {PROFILE_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            update.username,
            update.full_name,
            update.bio,
            update.avatar_url,
            Utc::now()
        ],
        parse_profile_row,
    )
    .optional()
    .context("Failed to update profile")
}

pub fn set_admin(conn: &Connection, username: &str, is_admin: bool) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE profiles SET is_admin = ?2, updated_at = ?3 WHERE username = ?1",
            params![username, is_admin, Utc::now()],
        )
        .context("Failed to update admin flag")?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::memory_conn;

    #[test]
    fn test_insert_and_lookup() {
        let (_pool, conn) = memory_conn();
        let profile = insert_profile(&conn, "blaze", Some("Blaze Runner")).unwrap();

        assert!(!profile.is_admin);
        assert_eq!(profile.api_key.len(), 32);
        assert_eq!(find_by_id(&conn, &profile.id).unwrap(), Some(profile.clone()));
        assert_eq!(find_by_username(&conn, "blaze").unwrap().unwrap().id, profile.id);
        assert_eq!(find_by_api_key(&conn, &profile.api_key).unwrap().unwrap().id, profile.id);
        assert!(find_by_api_key(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_fails() {
        let (_pool, conn) = memory_conn();
        insert_profile(&conn, "blaze", None).unwrap();
        assert!(insert_profile(&conn, "blaze", None).is_err());
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let (_pool, conn) = memory_conn();
        let profile = insert_profile(&conn, "blaze", Some("Blaze Runner")).unwrap();

        let update = ProfileUpdate {
            bio: Some("Rusher".to_string()),
            ..Default::default()
        };
        let updated = update_profile(&conn, &profile.id, &update).unwrap().unwrap();

        assert_eq!(updated.bio.as_deref(), Some("Rusher"));
        assert_eq!(updated.full_name.as_deref(), Some("Blaze Runner"));
        assert_eq!(updated.username, "blaze");
        assert!(update_profile(&conn, "missing", &update).unwrap().is_none());
    }

    #[test]
    fn test_set_admin() {
        let (_pool, conn) = memory_conn();
        insert_profile(&conn, "root", None).unwrap();

        assert!(set_admin(&conn, "root", true).unwrap());
        assert!(!set_admin(&conn, "ghost", true).unwrap());
        assert!(find_by_username(&conn, "root").unwrap().unwrap().is_admin);
    }
}
