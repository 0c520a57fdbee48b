//! Post storage operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use postmill_core::{Post, PostRecord};
use rusqlite::params;
use tracing::debug;

const POST_COLUMNS: &str =
    "id, title, content, summary, author, tags, category, is_published, created_at, updated_at";

impl Database {
    /// Persist an ingested record as a new published post.
    ///
    /// Records that break the storage invariants (NUL characters, oversized
    /// title/tags/category) are rejected before touching the database.
    pub fn create_post(&self, record: &PostRecord) -> DbResult<Post> {
        record.validate()?;

        let post = Post::from_record(record.clone());
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO posts (id, title, content, summary, author, tags, category, is_published, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                post.id,
                post.title,
                post.content,
                post.summary,
                post.author,
                post.tags,
                post.category,
                post.is_published,
                post.created_at.to_rfc3339(),
                post.updated_at.to_rfc3339(),
            ],
        )?;

        debug!("Stored post {} ({})", post.id, post.title);
        Ok(post)
    }

    /// Get a post by ID.
    pub fn get_post(&self, id: &str) -> DbResult<Post> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS),
            params![id],
            row_to_post,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Post not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Count stored posts.
    pub fn count_posts(&self) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<Post> {
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        summary: row.get(3)?,
        author: row.get(4)?,
        tags: row.get(5)?,
        category: row.get(6)?,
        is_published: row.get(7)?,
        created_at: parse_timestamp(&created_at_str),
        updated_at: parse_timestamp(&updated_at_str),
    })
}
