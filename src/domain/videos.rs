//! Video domain - DB queries for videos, statistics, daily snapshots, and
//! the per-video top comment
//!
//! All functions use the generic Executor pattern, allowing them to work with
//! both `&PgPool` (for standalone queries) and `&mut *tx` (for transactions).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{Executor, Postgres};

use crate::duration::DerivedDuration;
use crate::youtube::{TopCommentRecord, VideoRecord};

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct VideoRow {
    pub id: String,
    pub channel_id: String,
    pub playlist_id: Option<String>,
    pub title: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub duration_seconds: Option<i64>,
    pub is_short: bool,
    pub shorts_rule_version: i32,
    pub caption: bool,
    pub definition: Option<String>,
    pub licensed_content: bool,
    pub tags: Vec<String>,
    pub default_language: Option<String>,
    pub default_audio_language: Option<String>,
    pub privacy_status: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct VideoStatisticsRow {
    pub video_id: String,
    pub view_count: i64,
    pub like_count: i64,
    pub favorite_count: i64,
    pub comment_count: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct VideoDailyRow {
    pub video_id: String,
    pub channel_id: String,
    pub date: NaiveDate,
    pub view_count: i64,
    pub like_count: i64,
    pub favorite_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct TopCommentRow {
    pub video_id: String,
    pub comment_id: String,
    pub author_display_name: String,
    pub author_channel_id: Option<String>,
    pub text: String,
    pub like_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert the video's current-state row.
///
/// `playlist_id` records the first playlist observed to contain the video;
/// on conflict the stored value wins so later syncs never reassign it.
pub async fn upsert_video<'e, E>(
    executor: E,
    record: &VideoRecord,
    playlist_id: Option<&str>,
    derived: DerivedDuration,
    synced_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO videos (id, channel_id, playlist_id, title, description,
                            published_at, thumbnail_url, duration, duration_seconds,
                            is_short, shorts_rule_version, caption, definition,
                            licensed_content, tags, default_language,
                            default_audio_language, privacy_status, last_synced_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19)
        ON CONFLICT (id) DO UPDATE SET
            channel_id = $2,
            playlist_id = COALESCE(videos.playlist_id, $3),
            title = $4,
            description = $5,
            published_at = $6,
            thumbnail_url = $7,
            duration = $8,
            duration_seconds = $9,
            is_short = $10,
            shorts_rule_version = $11,
            caption = $12,
            definition = $13,
            licensed_content = $14,
            tags = $15,
            default_language = $16,
            default_audio_language = $17,
            privacy_status = $18,
            last_synced_at = $19
        "#,
    )
    .bind(&record.id)
    .bind(&record.channel_id)
    .bind(playlist_id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.published_at)
    .bind(&record.thumbnail_url)
    .bind(&record.duration)
    .bind(derived.seconds)
    .bind(derived.is_short)
    .bind(derived.rule_version)
    .bind(record.caption)
    .bind(&record.definition)
    .bind(record.licensed_content)
    .bind(&record.tags)
    .bind(&record.default_language)
    .bind(&record.default_audio_language)
    .bind(&record.privacy_status)
    .bind(synced_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Targeted update of the derived duration columns for a video whose stored
/// classification predates the current rule version. No-op when the row is
/// already current (or absent).
pub async fn reconcile_derived_duration<'e, E>(
    executor: E,
    video_id: &str,
    derived: DerivedDuration,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE videos SET
            duration_seconds = $2,
            is_short = $3,
            shorts_rule_version = $4
        WHERE id = $1 AND shorts_rule_version < $4
        "#,
    )
    .bind(video_id)
    .bind(derived.seconds)
    .bind(derived.is_short)
    .bind(derived.rule_version)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Overwrite the video's current statistics counters
pub async fn upsert_video_statistics<'e, E>(
    executor: E,
    record: &VideoRecord,
    updated_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO video_statistics (video_id, view_count, like_count,
                                      favorite_count, comment_count, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (video_id) DO UPDATE SET
            view_count = $2,
            like_count = $3,
            favorite_count = $4,
            comment_count = $5,
            updated_at = $6
        "#,
    )
    .bind(&record.id)
    .bind(record.view_count)
    .bind(record.like_count)
    .bind(record.favorite_count)
    .bind(record.comment_count)
    .bind(updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Upsert the video's daily snapshot. At most one row per (video, date):
/// a second capture the same UTC day overwrites that day's row.
pub async fn upsert_video_daily_snapshot<'e, E>(
    executor: E,
    record: &VideoRecord,
    date: NaiveDate,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO video_statistics_daily (video_id, channel_id, date, view_count,
                                            like_count, favorite_count, comment_count)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (video_id, date) DO UPDATE SET
            view_count = $4,
            like_count = $5,
            favorite_count = $6,
            comment_count = $7
        "#,
    )
    .bind(&record.id)
    .bind(&record.channel_id)
    .bind(date)
    .bind(record.view_count)
    .bind(record.like_count)
    .bind(record.favorite_count)
    .bind(record.comment_count)
    .execute(executor)
    .await?;
    Ok(())
}

/// Overwrite the video's single most-relevant eligible comment
pub async fn upsert_top_comment<'e, E>(
    executor: E,
    video_id: &str,
    comment: &TopCommentRecord,
    updated_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO video_top_comment (video_id, comment_id, author_display_name,
                                       author_channel_id, text, like_count,
                                       published_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (video_id) DO UPDATE SET
            comment_id = $2,
            author_display_name = $3,
            author_channel_id = $4,
            text = $5,
            like_count = $6,
            published_at = $7,
            updated_at = $8
        "#,
    )
    .bind(video_id)
    .bind(&comment.comment_id)
    .bind(&comment.author_display_name)
    .bind(&comment.author_channel_id)
    .bind(&comment.text)
    .bind(comment.like_count)
    .bind(comment.published_at)
    .bind(updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_video<'e, E>(
    executor: E,
    video_id: &str,
) -> Result<Option<VideoRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, channel_id, playlist_id, title, description, published_at,
               thumbnail_url, duration, duration_seconds, is_short,
               shorts_rule_version, caption, definition, licensed_content, tags,
               default_language, default_audio_language, privacy_status,
               last_synced_at
        FROM videos WHERE id = $1
        "#,
    )
    .bind(video_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_videos_by_channel<'e, E>(
    executor: E,
    channel_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<VideoRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, channel_id, playlist_id, title, description, published_at,
               thumbnail_url, duration, duration_seconds, is_short,
               shorts_rule_version, caption, definition, licensed_content, tags,
               default_language, default_audio_language, privacy_status,
               last_synced_at
        FROM videos
        WHERE channel_id = $1
        ORDER BY published_at DESC NULLS LAST
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(channel_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn get_video_statistics<'e, E>(
    executor: E,
    video_id: &str,
) -> Result<Option<VideoStatisticsRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT video_id, view_count, like_count, favorite_count, comment_count,
               updated_at
        FROM video_statistics WHERE video_id = $1
        "#,
    )
    .bind(video_id)
    .fetch_optional(executor)
    .await
}

pub async fn get_top_comment<'e, E>(
    executor: E,
    video_id: &str,
) -> Result<Option<TopCommentRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT video_id, comment_id, author_display_name, author_channel_id,
               text, like_count, published_at, updated_at
        FROM video_top_comment WHERE video_id = $1
        "#,
    )
    .bind(video_id)
    .fetch_optional(executor)
    .await
}

/// Daily snapshot rows for a video within an inclusive date range
pub async fn get_video_daily_range<'e, E>(
    executor: E,
    video_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<VideoDailyRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT video_id, channel_id, date, view_count, like_count,
               favorite_count, comment_count
        FROM video_statistics_daily
        WHERE video_id = $1 AND date >= $2 AND date <= $3
        ORDER BY date
        "#,
    )
    .bind(video_id)
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await
}
