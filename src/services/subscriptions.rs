//! Subscription membership collaborator
//!
//! The sync core does not own the subscriptions table's lifecycle; it only
//! needs to upsert and query (user, channel) membership, callable inside an
//! open transaction via the generic Executor pattern.

use sqlx::{Executor, Postgres};

/// Upsert a membership row. Returns true when the row was newly created,
/// false when the user was already subscribed.
pub async fn subscribe_user_to_channel<'e, E>(
    executor: E,
    user_id: i64,
    channel_id: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO subscriptions (user_id, channel_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, channel_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(channel_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a membership row. Returns true when a row was deleted.
pub async fn unsubscribe_user_from_channel<'e, E>(
    executor: E,
    user_id: i64,
    channel_id: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM subscriptions
        WHERE user_id = $1 AND channel_id = $2
        "#,
    )
    .bind(user_id)
    .bind(channel_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Ids of every channel with at least one subscriber, for the scheduled
/// full re-sync
pub async fn subscribed_channel_ids<'e, E>(executor: E) -> Result<Vec<String>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT channel_id FROM subscriptions ORDER BY channel_id")
            .fetch_all(executor)
            .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}
