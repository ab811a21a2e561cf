//! Change-detection cache keyed on (resource_type, resource_id)
//!
//! Stores the last-seen etag per remote resource so the orchestrator can
//! skip writes for resources the platform reports as unchanged. This is a
//! pure optimization: losing the table (or it answering "changed" for
//! everything) only costs extra upstream fetches and writes, never
//! correctness.
//!
//! All functions use the generic Executor pattern so they run inside the
//! orchestrator's transaction.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};

/// Resource kinds tracked in the cache. Serialized as the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Channel,
    Playlist,
    Video,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Channel => "channel",
            ResourceType::Playlist => "playlist",
            ResourceType::Video => "video",
        }
    }
}

/// Decide whether `latest_etag` differs from the stored one.
///
/// A missing remote etag or a missing cache row always counts as changed,
/// forcing a write. Any string mismatch counts as changed; no normalization
/// is attempted.
pub async fn has_changed<'e, E>(
    executor: E,
    resource_type: ResourceType,
    resource_id: &str,
    latest_etag: Option<&str>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let Some(latest) = latest_etag else {
        return Ok(true);
    };

    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT etag FROM etag_cache
        WHERE resource_type = $1 AND resource_id = $2
        "#,
    )
    .bind(resource_type.as_str())
    .bind(resource_id)
    .fetch_optional(executor)
    .await?;

    Ok(match row {
        Some((stored,)) => stored != latest,
        None => true,
    })
}

/// Record the latest etag for a resource (upsert on the composite key)
pub async fn save<'e, E>(
    executor: E,
    resource_type: ResourceType,
    resource_id: &str,
    etag: &str,
    checked_at: DateTime<Utc>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO etag_cache (resource_type, resource_id, etag, checked_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (resource_type, resource_id) DO UPDATE SET
            etag = $3,
            checked_at = $4
        "#,
    )
    .bind(resource_type.as_str())
    .bind(resource_id)
    .bind(etag)
    .bind(checked_at)
    .execute(executor)
    .await?;
    Ok(())
}
