use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::models::{NewsInput, NewsItem};

const NEWS_COLUMNS: &str = "id, title, content, category, image_url, is_featured, author_id, published_at";

pub fn insert_news(
    conn: &Connection,
    input: &NewsInput,
    category: &str,
    author_id: &str,
    published_at: DateTime<Utc>,
) -> Result<NewsItem> {
    let sql = format!(
        "INSERT INTO news (id, title, content, category, image_url, is_featured, author_id, published_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {NEWS_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            input.title,
            input.content,
            category,
            input.image_url,
            input.is_featured,
            author_id,
            published_at
        ],
        parse_news_row,
    )
    .context("Failed to insert news")
}

fn parse_news_row(row: &rusqlite::Row) -> rusqlite::Result<NewsItem> {
    Ok(NewsItem {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        image_url: row.get(4)?,
        is_featured: row.get(5)?,
        author_id: row.get(6)?,
        published_at: row.get(7)?,
    })
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<NewsItem>> {
    let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_news_row)
        .optional()
        .context("Failed to query news by id")
}

/// Latest first. `category` matches case-insensitively.
pub fn list(conn: &Connection, category: Option<&str>, featured_only: bool) -> Result<Vec<NewsItem>> {
    let sql = format!(
        "SELECT {NEWS_COLUMNS} FROM news
         WHERE (?1 IS NULL OR category = ?1 COLLATE NOCASE) AND (?2 = 0 OR is_featured = 1)
         ORDER BY published_at DESC, rowid DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![category, featured_only], parse_news_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list news")?;

    Ok(rows)
}

/// Rewrites the article; the saving admin becomes its author.
pub fn update_news(
    conn: &Connection,
    id: &str,
    input: &NewsInput,
    category: &str,
    author_id: &str,
    published_at: DateTime<Utc>,
) -> Result<Option<NewsItem>> {
    let sql = format!(
        "UPDATE news SET title = ?2, content = ?3, category = ?4, image_url = ?5, is_featured = ?6, author_id = ?7, published_at = ?8
         WHERE id = ?1 RETURNING {NEWS_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            id,
            input.title,
            input.content,
            category,
            input.image_url,
            input.is_featured,
            author_id,
            published_at
        ],
        parse_news_row,
    )
    .optional()
    .context("Failed to update news")
}

pub fn delete_news(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM news WHERE id = ?1", params![id])
        .context("Failed to delete news")?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{memory_conn, profile};
    use chrono::Duration;

    fn article(title: &str, featured: bool) -> NewsInput {
        NewsInput {
            title: title.to_string(),
            content: "Body".to_string(),
            category: None,
            image_url: None,
            is_featured: featured,
        }
    }

    #[test]
    fn test_list_latest_first_with_filters() {
        let (_pool, conn) = memory_conn();
        let author = profile(&conn, "editor");
        let now = Utc::now();

        insert_news(&conn, &article("Old", false), "Tournament", &author.id, now - Duration::days(2)).unwrap();
        insert_news(&conn, &article("New", true), "Update", &author.id, now).unwrap();

        let titles: Vec<_> = list(&conn, None, false).unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["New", "Old"]);

        let tournament_news = list(&conn, Some("tournament"), false).unwrap();
        assert_eq!(tournament_news.len(), 1);
        assert_eq!(tournament_news[0].title, "Old");

        let featured = list(&conn, None, true).unwrap();
        assert_eq!(featured.len(), 1);
        assert!(featured[0].is_featured);
    }

    #[test]
    fn test_update_moves_publication_time() {
        let (_pool, conn) = memory_conn();
        let author = profile(&conn, "editor");
        let earlier = Utc::now() - Duration::days(1);
        let created = insert_news(&conn, &article("Draft", false), "General", &author.id, earlier).unwrap();

        let later = Utc::now();
        let updated = update_news(&conn, &created.id, &article("Final", true), "General", &author.id, later)
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Final");
        assert!(updated.published_at > created.published_at);
        assert!(delete_news(&conn, &created.id).unwrap());
        assert!(find_by_id(&conn, &created.id).unwrap().is_none());
    }
}
