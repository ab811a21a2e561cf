//! Channel domain - DB queries for channels, their current statistics, and
//! daily statistics snapshots
//!
//! All functions use the generic Executor pattern, allowing them to work with
//! both `&PgPool` (for standalone queries) and `&mut *tx` (for transactions).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{Executor, Postgres};

use crate::youtube::ChannelRecord;

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct ChannelRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub custom_url: Option<String>,
    pub country: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub uploads_playlist_id: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct ChannelStatisticsRow {
    pub channel_id: String,
    pub subscriber_count: i64,
    pub video_count: i64,
    pub view_count: i64,
    pub hidden_subscriber_count: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct ChannelDailyRow {
    pub channel_id: String,
    pub date: NaiveDate,
    pub subscriber_count: i64,
    pub video_count: i64,
    pub view_count: i64,
}

/// Upsert the channel's current-state row from a freshly fetched record
pub async fn upsert_channel<'e, E>(
    executor: E,
    record: &ChannelRecord,
    synced_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO channels (id, title, description, custom_url, country,
                              published_at, thumbnail_url, uploads_playlist_id,
                              last_synced_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            title = $2,
            description = $3,
            custom_url = $4,
            country = $5,
            published_at = $6,
            thumbnail_url = $7,
            uploads_playlist_id = $8,
            last_synced_at = $9
        "#,
    )
    .bind(&record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.custom_url)
    .bind(&record.country)
    .bind(record.published_at)
    .bind(&record.thumbnail_url)
    .bind(&record.uploads_playlist_id)
    .bind(synced_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Overwrite the channel's current statistics counters
pub async fn upsert_channel_statistics<'e, E>(
    executor: E,
    record: &ChannelRecord,
    updated_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO channel_statistics (channel_id, subscriber_count, video_count,
                                        view_count, hidden_subscriber_count, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (channel_id) DO UPDATE SET
            subscriber_count = $2,
            video_count = $3,
            view_count = $4,
            hidden_subscriber_count = $5,
            updated_at = $6
        "#,
    )
    .bind(&record.id)
    .bind(record.subscriber_count)
    .bind(record.video_count)
    .bind(record.view_count)
    .bind(record.hidden_subscriber_count)
    .bind(updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Upsert the channel's daily snapshot. At most one row per (channel, date):
/// a second capture the same UTC day overwrites that day's row.
pub async fn upsert_channel_daily_snapshot<'e, E>(
    executor: E,
    record: &ChannelRecord,
    date: NaiveDate,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO channel_statistics_daily (channel_id, date, subscriber_count,
                                              video_count, view_count)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (channel_id, date) DO UPDATE SET
            subscriber_count = $3,
            video_count = $4,
            view_count = $5
        "#,
    )
    .bind(&record.id)
    .bind(date)
    .bind(record.subscriber_count)
    .bind(record.video_count)
    .bind(record.view_count)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_channel<'e, E>(
    executor: E,
    channel_id: &str,
) -> Result<Option<ChannelRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, title, description, custom_url, country, published_at,
               thumbnail_url, uploads_playlist_id, last_synced_at
        FROM channels WHERE id = $1
        "#,
    )
    .bind(channel_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_channels<'e, E>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Result<Vec<ChannelRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, title, description, custom_url, country, published_at,
               thumbnail_url, uploads_playlist_id, last_synced_at
        FROM channels
        ORDER BY title
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn get_channel_statistics<'e, E>(
    executor: E,
    channel_id: &str,
) -> Result<Option<ChannelStatisticsRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT channel_id, subscriber_count, video_count, view_count,
               hidden_subscriber_count, updated_at
        FROM channel_statistics WHERE channel_id = $1
        "#,
    )
    .bind(channel_id)
    .fetch_optional(executor)
    .await
}

/// Daily snapshot rows for a channel within an inclusive date range
pub async fn get_channel_daily_range<'e, E>(
    executor: E,
    channel_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ChannelDailyRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT channel_id, date, subscriber_count, video_count, view_count
        FROM channel_statistics_daily
        WHERE channel_id = $1 AND date >= $2 AND date <= $3
        ORDER BY date
        "#,
    )
    .bind(channel_id)
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await
}
