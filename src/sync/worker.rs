//! Background sync workers using apalis
//!
//! Two workers share the Postgres-backed job store: the refresh worker
//! drains queued [`RefreshJob`]s (deferred post-subscribe syncs and manual
//! re-enqueues), and a cron worker periodically enqueues a refresh for every
//! channel that still has at least one subscriber. Queued jobs carry apalis
//! attempt accounting, so a failed refresh is retried by the queue rather
//! than by anything in-process.

use apalis::prelude::*;
use apalis_cron::{CronStream, Schedule};
use apalis_sql::postgres::PostgresStorage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::env;
use std::str::FromStr;

use crate::services::subscriptions;
use crate::sync::{self, SyncError};
use crate::youtube::YouTubeClient;

/// Daily at 03:00 UTC
const DEFAULT_RESYNC_CRON: &str = "0 0 3 * * *";

/// A queued full-refresh request for one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshJob {
    pub channel_id: String,
}

/// Cron tick that fans out refresh jobs for all subscribed channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResyncJob {
    pub scheduled_at: DateTime<Utc>,
}

impl From<DateTime<Utc>> for ResyncJob {
    fn from(dt: DateTime<Utc>) -> Self {
        ResyncJob { scheduled_at: dt }
    }
}

/// Producer handle for the refresh queue, cheap to clone into request
/// handlers
#[derive(Clone)]
pub struct RefreshQueue {
    storage: PostgresStorage<RefreshJob>,
}

impl RefreshQueue {
    /// Run the apalis storage migrations and open the queue
    pub async fn connect(pool: PgPool) -> Result<Self, sqlx::Error> {
        PostgresStorage::setup(&pool).await?;
        Ok(Self {
            storage: PostgresStorage::new(pool),
        })
    }

    pub async fn enqueue(&self, channel_id: &str) -> Result<(), sqlx::Error> {
        let mut storage = self.storage.clone();
        storage
            .push(RefreshJob {
                channel_id: channel_id.to_string(),
            })
            .await?;
        Ok(())
    }

    /// Fire-and-forget enqueue for the post-subscribe path: the caller's
    /// response has already been decided, so failures are only logged
    pub async fn enqueue_logged(&self, channel_id: &str) {
        match self.enqueue(channel_id).await {
            Ok(()) => println!("[sync] Enqueued refresh for channel {}", channel_id),
            Err(e) => eprintln!(
                "[sync] Failed to enqueue refresh for channel {}: {}",
                channel_id, e
            ),
        }
    }
}

/// Shared context handed to both workers
#[derive(Clone)]
pub struct SyncContext {
    pub pool: PgPool,
    pub youtube: YouTubeClient,
    pub queue: RefreshQueue,
}

/// Drain one queued refresh. A channel missing upstream is terminal, so the
/// job is aborted instead of retried; everything else is handed back to
/// apalis for another attempt.
async fn handle_refresh_job(job: RefreshJob, ctx: Data<SyncContext>) -> Result<(), Error> {
    match sync::refresh(&ctx.pool, &ctx.youtube, &job.channel_id).await {
        Ok(outcome) => {
            println!(
                "[worker] Refresh done for channel {}: {} playlists, {} videos",
                outcome.channel_id, outcome.playlists_processed, outcome.videos_processed
            );
            Ok(())
        }
        Err(e @ SyncError::ChannelNotFound(_)) => {
            eprintln!("[worker] Refresh aborted: {}", e);
            let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
            Err(Error::Abort(std::sync::Arc::new(boxed)))
        }
        Err(e) => {
            eprintln!("[worker] Refresh failed (will retry): {}", e);
            let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
            Err(Error::Failed(std::sync::Arc::new(boxed)))
        }
    }
}

/// Cron handler - enqueues a refresh for every subscribed channel.
/// Always returns Ok: a failed fan-out is picked up by the next tick.
async fn handle_resync_job(job: ResyncJob, ctx: Data<SyncContext>) -> Result<(), Error> {
    let channel_ids = match subscriptions::subscribed_channel_ids(&ctx.pool).await {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("[worker] Resync tick failed to list channels: {}", e);
            return Ok(());
        }
    };

    let total = channel_ids.len();
    for channel_id in channel_ids {
        ctx.queue.enqueue_logged(&channel_id).await;
    }

    println!(
        "[worker] Resync tick at {} enqueued {} channels",
        job.scheduled_at, total
    );
    Ok(())
}

fn resync_cron() -> String {
    env::var("SYNC_CRON").unwrap_or_else(|_| DEFAULT_RESYNC_CRON.to_string())
}

/// Start both sync workers; runs until the monitor shuts down
pub async fn run_sync_workers(pool: PgPool, youtube: YouTubeClient, queue: RefreshQueue) {
    let ctx = SyncContext {
        pool: pool.clone(),
        youtube,
        queue,
    };

    let refresh_storage: PostgresStorage<RefreshJob> = PostgresStorage::new(pool.clone());

    let schedule_expr = resync_cron();
    let schedule = Schedule::from_str(&schedule_expr).expect("Invalid SYNC_CRON schedule");
    let resync_storage: PostgresStorage<ResyncJob> = PostgresStorage::new(pool);
    let resync_backend = CronStream::new(schedule).pipe_to_storage(resync_storage);

    println!("[worker] Sync workers starting (resync cron: {})", schedule_expr);

    let refresh_worker = WorkerBuilder::new("channel-refresh-worker")
        .data(ctx.clone())
        .backend(refresh_storage)
        .build_fn(handle_refresh_job);

    let resync_worker = WorkerBuilder::new("channel-resync-worker")
        .data(ctx)
        .backend(resync_backend)
        .build_fn(handle_resync_job);

    Monitor::new()
        .register(refresh_worker)
        .register(resync_worker)
        .run()
        .await
        .expect("Sync worker monitor failed");
}
