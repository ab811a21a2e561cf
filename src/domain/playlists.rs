//! Playlist domain - DB queries for playlists
//!
//! All functions use the generic Executor pattern, allowing them to work with
//! both `&PgPool` (for standalone queries) and `&mut *tx` (for transactions).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Executor, Postgres};

use crate::youtube::PlaylistRecord;

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct PlaylistRow {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub item_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}

pub async fn upsert_playlist<'e, E>(
    executor: E,
    record: &PlaylistRecord,
    synced_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO playlists (id, channel_id, title, description, item_count,
                               published_at, thumbnail_url, last_synced_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            channel_id = $2,
            title = $3,
            description = $4,
            item_count = $5,
            published_at = $6,
            thumbnail_url = $7,
            last_synced_at = $8
        "#,
    )
    .bind(&record.id)
    .bind(&record.channel_id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.item_count)
    .bind(record.published_at)
    .bind(&record.thumbnail_url)
    .bind(synced_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn list_playlists_by_channel<'e, E>(
    executor: E,
    channel_id: &str,
) -> Result<Vec<PlaylistRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, channel_id, title, description, item_count, published_at,
               thumbnail_url, last_synced_at
        FROM playlists
        WHERE channel_id = $1
        ORDER BY title
        "#,
    )
    .bind(channel_id)
    .fetch_all(executor)
    .await
}
