//! Metadata synchronization orchestrator
//!
//! Two entry points: [`subscribe`] runs the cheap synchronous seed inside a
//! single transaction and defers the expensive crawl to the refresh queue;
//! [`refresh`] runs the full fetch-diff-write pass for one channel. A refresh
//! is one transaction end to end, so a failure anywhere rolls back every
//! write of that run and the next scheduled run retries from scratch.

pub mod worker;

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::domain::{channels, playlists, videos};
use crate::duration;
use crate::services::etag_cache::{self, ResourceType};
use crate::services::subscriptions;
use crate::sync::worker::RefreshQueue;
use crate::youtube::{Fetch, YouTubeClient, YouTubeError};

#[derive(Debug)]
pub enum SyncError {
    /// The channel does not exist upstream. Terminal, not retried.
    ChannelNotFound(String),
    /// The platform call failed; the next scheduled run retries.
    Upstream(YouTubeError),
    /// A database statement failed; the enclosing transaction is rolled back.
    Database(sqlx::Error),
}

impl From<YouTubeError> for SyncError {
    fn from(e: YouTubeError) -> Self {
        SyncError::Upstream(e)
    }
}

impl From<sqlx::Error> for SyncError {
    fn from(e: sqlx::Error) -> Self {
        SyncError::Database(e)
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::ChannelNotFound(id) => write!(f, "channel {} not found upstream", id),
            SyncError::Upstream(e) => write!(f, "upstream error: {}", e),
            SyncError::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeOutcome {
    pub channel_id: String,
    pub subscribed: bool,
    pub sync_scheduled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub channel_id: String,
    pub playlists_processed: usize,
    pub videos_processed: usize,
}

/// Subscribe a user to a channel.
///
/// Runs in a single transaction: if the channel is unseen, its channel and
/// statistics rows are seeded from a remote lookup (playlists and videos are
/// not touched), then the membership row is upserted. After commit, a seeded
/// channel gets a full refresh enqueued on the job queue; enqueue failures
/// are logged, never surfaced, since the subscribe response stands on the
/// committed seed.
pub async fn subscribe(
    pool: &PgPool,
    youtube: &YouTubeClient,
    queue: &RefreshQueue,
    user_id: i64,
    channel_id: &str,
) -> Result<SubscribeOutcome, SyncError> {
    let mut tx = pool.begin().await?;

    let mut sync_scheduled = false;
    if channels::get_channel(&mut *tx, channel_id).await?.is_none() {
        let record = match youtube.fetch_channel_by_id(channel_id).await? {
            Fetch::Found(record) => record,
            Fetch::NotFound => return Err(SyncError::ChannelNotFound(channel_id.to_string())),
        };

        let now = Utc::now();
        channels::upsert_channel(&mut *tx, &record, now).await?;
        channels::upsert_channel_statistics(&mut *tx, &record, now).await?;
        if let Some(etag) = &record.etag {
            etag_cache::save(&mut *tx, ResourceType::Channel, &record.id, etag, now).await?;
        }
        sync_scheduled = true;
    }

    subscriptions::subscribe_user_to_channel(&mut *tx, user_id, channel_id).await?;

    tx.commit().await?;

    if sync_scheduled {
        queue.enqueue_logged(channel_id).await;
    }

    Ok(SubscribeOutcome {
        channel_id: channel_id.to_string(),
        subscribed: true,
        sync_scheduled,
    })
}

/// Remove a user's subscription. Channel rows are soft-retained.
pub async fn unsubscribe(
    pool: &PgPool,
    user_id: i64,
    channel_id: &str,
) -> Result<bool, SyncError> {
    let removed = subscriptions::unsubscribe_user_from_channel(pool, user_id, channel_id).await?;
    Ok(removed)
}

/// Full synchronization pass for one channel: fetch remote state, diff it
/// against the etag cache, write what changed, and capture today's daily
/// snapshots regardless of change state.
///
/// All writes plus their etag-cache entries happen in one transaction, so
/// "cache says unchanged" always implies the corresponding mirror row was
/// committed by an earlier run.
pub async fn refresh(
    pool: &PgPool,
    youtube: &YouTubeClient,
    channel_id: &str,
) -> Result<RefreshOutcome, SyncError> {
    let channel = match youtube.fetch_channel_by_id(channel_id).await? {
        Fetch::Found(record) => record,
        Fetch::NotFound => return Err(SyncError::ChannelNotFound(channel_id.to_string())),
    };

    let mut tx = pool.begin().await?;
    let now = Utc::now();
    let today = now.date_naive();

    let channel_changed = etag_cache::has_changed(
        &mut *tx,
        ResourceType::Channel,
        &channel.id,
        channel.etag.as_deref(),
    )
    .await?;
    if channel_changed {
        channels::upsert_channel(&mut *tx, &channel, now).await?;
        channels::upsert_channel_statistics(&mut *tx, &channel, now).await?;
        if let Some(etag) = &channel.etag {
            etag_cache::save(&mut *tx, ResourceType::Channel, &channel.id, etag, now).await?;
        }
    }
    // Snapshots are time-based, not change-based: a day's datapoint exists
    // even when nothing changed
    channels::upsert_channel_daily_snapshot(&mut *tx, &channel, today).await?;

    // Playlists: skip unchanged ones entirely; changed ones get written and
    // their membership enumerated for playlist attribution
    let channel_playlists = youtube.fetch_playlists_by_channel(channel_id).await?;
    let playlists_processed = channel_playlists.len();
    let mut membership = VideoPlaylistMap::new();

    for playlist in &channel_playlists {
        let changed = etag_cache::has_changed(
            &mut *tx,
            ResourceType::Playlist,
            &playlist.id,
            playlist.etag.as_deref(),
        )
        .await?;
        if !changed {
            continue;
        }

        playlists::upsert_playlist(&mut *tx, playlist, now).await?;
        if let Some(etag) = &playlist.etag {
            etag_cache::save(&mut *tx, ResourceType::Playlist, &playlist.id, etag, now).await?;
        }

        let video_ids = youtube.fetch_playlist_video_ids(&playlist.id).await?;
        for video_id in video_ids {
            membership.insert_if_absent(video_id, &playlist.id);
        }
    }

    // The uploads collection is the authoritative superset: a video can live
    // there without appearing in any other playlist
    if let Some(uploads_id) = &channel.uploads_playlist_id {
        let video_ids = youtube.fetch_playlist_video_ids(uploads_id).await?;
        for video_id in video_ids {
            membership.insert_if_absent(video_id, uploads_id);
        }
    }

    let fetched = youtube.fetch_videos_by_ids(membership.video_ids()).await?;
    let mut videos_processed = 0;

    for video in &fetched {
        let changed = etag_cache::has_changed(
            &mut *tx,
            ResourceType::Video,
            &video.id,
            video.etag.as_deref(),
        )
        .await?;
        let derived = duration::classify(video.duration.as_deref());

        if changed {
            videos::upsert_video(
                &mut *tx,
                video,
                membership.playlist_for(&video.id),
                derived,
                now,
            )
            .await?;
            videos::upsert_video_statistics(&mut *tx, video, now).await?;

            // Best-effort enrichment: a failed comment fetch never fails the
            // video's own write
            match youtube.fetch_top_comment(&video.id, &video.channel_id).await {
                Ok(Some(comment)) => {
                    videos::upsert_top_comment(&mut *tx, &video.id, &comment, now).await?;
                }
                Ok(None) => {}
                Err(e) => {
                    eprintln!("[sync] Top comment fetch failed for video {}: {}", video.id, e);
                }
            }

            if let Some(etag) = &video.etag {
                etag_cache::save(&mut *tx, ResourceType::Video, &video.id, etag, now).await?;
            }
        } else {
            // The classification rule may have advanced since this video was
            // last written; reconcile the derived columns without a full upsert
            videos::reconcile_derived_duration(&mut *tx, &video.id, derived).await?;
        }

        videos::upsert_video_daily_snapshot(&mut *tx, video, today).await?;
        videos_processed += 1;
    }

    tx.commit().await?;

    println!(
        "[sync] Refreshed channel {}: {} playlists, {} videos",
        channel_id, playlists_processed, videos_processed
    );

    Ok(RefreshOutcome {
        channel_id: channel_id.to_string(),
        playlists_processed,
        videos_processed,
    })
}

/// Ordered video-id set with first-writer-wins playlist attribution.
///
/// Insertion order is preserved for the batch fetch; the first playlist
/// observed to contain a video keeps the attribution, later playlists
/// containing the same video never overwrite it.
#[derive(Debug, Default)]
pub struct VideoPlaylistMap {
    order: Vec<String>,
    playlist_by_video: HashMap<String, String>,
}

impl VideoPlaylistMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_if_absent(&mut self, video_id: String, playlist_id: &str) {
        if self.playlist_by_video.contains_key(&video_id) {
            return;
        }
        self.playlist_by_video
            .insert(video_id.clone(), playlist_id.to_string());
        self.order.push(video_id);
    }

    /// Deduplicated video ids in first-seen order
    pub fn video_ids(&self) -> &[String] {
        &self.order
    }

    pub fn playlist_for(&self, video_id: &str) -> Option<&str> {
        self.playlist_by_video.get(video_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_dedups_and_preserves_order() {
        let mut map = VideoPlaylistMap::new();
        // Secondary playlist enumerated first with {B, D}
        map.insert_if_absent("B".into(), "PL-secondary");
        map.insert_if_absent("D".into(), "PL-secondary");
        // Uploads collection contains {A, B, C}
        for id in ["A", "B", "C"] {
            map.insert_if_absent(id.into(), "UU-uploads");
        }

        assert_eq!(map.video_ids(), &["B", "D", "A", "C"]);
    }

    #[test]
    fn test_first_playlist_wins_attribution() {
        let mut map = VideoPlaylistMap::new();
        map.insert_if_absent("B".into(), "PL-secondary");
        map.insert_if_absent("B".into(), "UU-uploads");
        assert_eq!(map.playlist_for("B"), Some("PL-secondary"));

        // And the other way round when uploads is enumerated first
        let mut map = VideoPlaylistMap::new();
        map.insert_if_absent("B".into(), "UU-uploads");
        map.insert_if_absent("B".into(), "PL-secondary");
        assert_eq!(map.playlist_for("B"), Some("UU-uploads"));
    }

    #[test]
    fn test_unknown_video_has_no_attribution() {
        let map = VideoPlaylistMap::new();
        assert_eq!(map.playlist_for("missing"), None);
        assert!(map.video_ids().is_empty());
    }

    // ------------------------------------------------------------------
    // End-to-end subscribe/refresh tests against a stub platform server.
    // They need a reachable Postgres; without DATABASE_URL they no-op.
    // ------------------------------------------------------------------

    use axum::{
        Json, Router,
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
    };
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::{Arc, Mutex};

    struct StubPlatform {
        channels: Vec<Value>,
        playlists: Vec<Value>,
        playlist_items: HashMap<String, Vec<String>>,
        videos: Vec<Value>,
        comments: CommentsMode,
    }

    enum CommentsMode {
        Threads(Vec<Value>),
        Fail(u16, &'static str),
    }

    type Stub = Arc<Mutex<StubPlatform>>;

    async fn serve_stub(platform: StubPlatform) -> (Stub, String) {
        let stub: Stub = Arc::new(Mutex::new(platform));
        let app = Router::new()
            .route("/channels", get(stub_channels))
            .route("/playlists", get(stub_playlists))
            .route("/playlistItems", get(stub_playlist_items))
            .route("/videos", get(stub_videos))
            .route("/commentThreads", get(stub_comment_threads))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (stub, format!("http://{}", addr))
    }

    async fn stub_channels(
        State(stub): State<Stub>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let wanted = params.get("id").map(String::as_str);
        let items: Vec<Value> = stub
            .lock()
            .unwrap()
            .channels
            .iter()
            .filter(|c| c["id"].as_str() == wanted)
            .cloned()
            .collect();
        Json(json!({ "items": items }))
    }

    async fn stub_playlists(
        State(stub): State<Stub>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let wanted = params.get("channelId").map(String::as_str);
        let items: Vec<Value> = stub
            .lock()
            .unwrap()
            .playlists
            .iter()
            .filter(|p| p["snippet"]["channelId"].as_str() == wanted)
            .cloned()
            .collect();
        Json(json!({ "items": items }))
    }

    async fn stub_playlist_items(
        State(stub): State<Stub>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let playlist_id = params.get("playlistId").map(String::as_str).unwrap_or("");
        let ids = stub
            .lock()
            .unwrap()
            .playlist_items
            .get(playlist_id)
            .cloned()
            .unwrap_or_default();
        let items: Vec<Value> = ids
            .iter()
            .map(|id| json!({"contentDetails": {"videoId": id}}))
            .collect();
        Json(json!({ "items": items }))
    }

    async fn stub_videos(
        State(stub): State<Stub>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let wanted: Vec<&str> = params
            .get("id")
            .map(|ids| ids.split(',').collect())
            .unwrap_or_default();
        let items: Vec<Value> = stub
            .lock()
            .unwrap()
            .videos
            .iter()
            .filter(|v| wanted.contains(&v["id"].as_str().unwrap_or("")))
            .cloned()
            .collect();
        Json(json!({ "items": items }))
    }

    async fn stub_comment_threads(State(stub): State<Stub>) -> axum::response::Response {
        match &stub.lock().unwrap().comments {
            CommentsMode::Threads(items) => Json(json!({ "items": items })).into_response(),
            CommentsMode::Fail(status, body) => (
                StatusCode::from_u16(*status).unwrap(),
                body.to_string(),
            )
                .into_response(),
        }
    }

    fn channel_json(id: &str, etag: &str, uploads: &str, subscriber_count: i64) -> Value {
        json!({
            "id": id,
            "etag": etag,
            "snippet": {"title": format!("Channel {}", id), "description": "stub"},
            "statistics": {
                "subscriberCount": subscriber_count.to_string(),
                "videoCount": "1",
                "viewCount": "100",
                "hiddenSubscriberCount": false
            },
            "contentDetails": {"relatedPlaylists": {"uploads": uploads}}
        })
    }

    fn playlist_json(id: &str, etag: &str, channel_id: &str) -> Value {
        json!({
            "id": id,
            "etag": etag,
            "snippet": {"channelId": channel_id, "title": format!("Playlist {}", id)},
            "contentDetails": {"itemCount": 2}
        })
    }

    fn video_json(id: &str, etag: &str, channel_id: &str, view_count: i64, duration: &str) -> Value {
        json!({
            "id": id,
            "etag": etag,
            "snippet": {"channelId": channel_id, "title": format!("Video {}", id)},
            "contentDetails": {"duration": duration},
            "statistics": {
                "viewCount": view_count.to_string(),
                "likeCount": "1",
                "favoriteCount": "0",
                "commentCount": "0"
            },
            "status": {"privacyStatus": "public"}
        })
    }

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .ok()?;
        sqlx::migrate!().run(&pool).await.ok()?;
        Some(pool)
    }

    /// Remove every row a prior run of the same test may have left behind,
    /// so assertions about seed/skip behavior start from a clean slate
    async fn scrub(pool: &PgPool, tag: &str, channel_ids: &[&str]) {
        for channel_id in channel_ids {
            for sql in [
                "DELETE FROM video_top_comment WHERE video_id IN (SELECT id FROM videos WHERE channel_id = $1)",
                "DELETE FROM video_statistics WHERE video_id IN (SELECT id FROM videos WHERE channel_id = $1)",
                "DELETE FROM video_statistics_daily WHERE channel_id = $1",
                "DELETE FROM videos WHERE channel_id = $1",
                "DELETE FROM playlists WHERE channel_id = $1",
                "DELETE FROM subscriptions WHERE channel_id = $1",
                "DELETE FROM channel_statistics WHERE channel_id = $1",
                "DELETE FROM channel_statistics_daily WHERE channel_id = $1",
                "DELETE FROM channels WHERE id = $1",
            ] {
                sqlx::query(sql).bind(channel_id).execute(pool).await.unwrap();
            }
        }
        sqlx::query("DELETE FROM etag_cache WHERE resource_id LIKE '%' || $1 || '%'")
            .bind(tag)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_refresh_mirrors_playlist_videos_owned_by_other_channels() {
        let Some(pool) = test_pool().await else {
            eprintln!("[test] DATABASE_URL not reachable, skipping");
            return;
        };
        scrub(&pool, "xch", &["UC-xch", "UC-other-xch"]).await;

        // The secondary playlist contains v-xch-b, owned by a channel that
        // has no mirror row and never will
        let platform = StubPlatform {
            channels: vec![channel_json("UC-xch", "ch-xch-1", "UU-xch", 100)],
            playlists: vec![playlist_json("PL-xch", "pl-xch-1", "UC-xch")],
            playlist_items: HashMap::from([
                (
                    "PL-xch".to_string(),
                    vec!["v-xch-a".to_string(), "v-xch-b".to_string()],
                ),
                ("UU-xch".to_string(), vec!["v-xch-a".to_string()]),
            ]),
            videos: vec![
                video_json("v-xch-a", "ve-xch-a1", "UC-xch", 10, "PT4M"),
                video_json("v-xch-b", "ve-xch-b1", "UC-other-xch", 20, "PT1M"),
            ],
            comments: CommentsMode::Threads(vec![]),
        };
        let (_stub, base) = serve_stub(platform).await;
        let client = YouTubeClient::new("test-key").with_base_url(&base);

        let outcome = refresh(&pool, &client, "UC-xch").await.unwrap();
        assert_eq!(outcome.playlists_processed, 1);
        assert_eq!(outcome.videos_processed, 2);

        let foreign = videos::get_video(&pool, "v-xch-b").await.unwrap().unwrap();
        assert_eq!(foreign.channel_id, "UC-other-xch");
        assert_eq!(foreign.playlist_id.as_deref(), Some("PL-xch"));
        assert!(foreign.is_short);
    }

    #[tokio::test]
    async fn test_refresh_unchanged_etag_skips_writes_but_snapshots() {
        let Some(pool) = test_pool().await else {
            eprintln!("[test] DATABASE_URL not reachable, skipping");
            return;
        };
        scrub(&pool, "skp", &["UC-skp"]).await;

        let platform = StubPlatform {
            channels: vec![channel_json("UC-skp", "ch-skp-1", "UU-skp", 100)],
            playlists: vec![],
            playlist_items: HashMap::from([(
                "UU-skp".to_string(),
                vec!["v-skp-a".to_string()],
            )]),
            videos: vec![video_json("v-skp-a", "ve-skp-a1", "UC-skp", 10, "PT10M")],
            comments: CommentsMode::Threads(vec![]),
        };
        let (stub, base) = serve_stub(platform).await;
        let client = YouTubeClient::new("test-key").with_base_url(&base);

        refresh(&pool, &client, "UC-skp").await.unwrap();

        // Counters move upstream, etags stay the same
        {
            let mut stub = stub.lock().unwrap();
            stub.channels[0]["statistics"]["subscriberCount"] = json!("999");
            stub.videos[0]["statistics"]["viewCount"] = json!("777");
        }
        refresh(&pool, &client, "UC-skp").await.unwrap();

        // Current-state rows keep their first-run values
        let stats = channels::get_channel_statistics(&pool, "UC-skp")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.subscriber_count, 100);
        let vstats = videos::get_video_statistics(&pool, "v-skp-a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vstats.view_count, 10);

        // The day's snapshot was still captured, exactly once, with the
        // fresh counters
        let today = Utc::now().date_naive();
        let days = channels::get_channel_daily_range(&pool, "UC-skp", today, today)
            .await
            .unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].subscriber_count, 999);
        let vdays = videos::get_video_daily_range(&pool, "v-skp-a", today, today)
            .await
            .unwrap();
        assert_eq!(vdays.len(), 1);
        assert_eq!(vdays[0].view_count, 777);
    }

    #[tokio::test]
    async fn test_refresh_writes_video_despite_top_comment_failure() {
        let Some(pool) = test_pool().await else {
            eprintln!("[test] DATABASE_URL not reachable, skipping");
            return;
        };
        scrub(&pool, "cmf", &["UC-cmf"]).await;

        let platform = StubPlatform {
            channels: vec![channel_json("UC-cmf", "ch-cmf-1", "UU-cmf", 100)],
            playlists: vec![],
            playlist_items: HashMap::from([(
                "UU-cmf".to_string(),
                vec!["v-cmf-a".to_string()],
            )]),
            videos: vec![video_json("v-cmf-a", "ve-cmf-a1", "UC-cmf", 5, "PT2M59S")],
            comments: CommentsMode::Fail(500, "comment backend exploded"),
        };
        let (_stub, base) = serve_stub(platform).await;
        let client = YouTubeClient::new("test-key").with_base_url(&base);

        let outcome = refresh(&pool, &client, "UC-cmf").await.unwrap();
        assert_eq!(outcome.videos_processed, 1);

        let row = videos::get_video(&pool, "v-cmf-a").await.unwrap().unwrap();
        assert!(row.is_short);
        let vstats = videos::get_video_statistics(&pool, "v-cmf-a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vstats.view_count, 5);
        assert!(
            videos::get_top_comment(&pool, "v-cmf-a")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_subscribe_seeds_channel_and_defers_crawl() {
        let Some(pool) = test_pool().await else {
            eprintln!("[test] DATABASE_URL not reachable, skipping");
            return;
        };
        scrub(&pool, "sub", &["UC-sub"]).await;

        let platform = StubPlatform {
            channels: vec![channel_json("UC-sub", "ch-sub-1", "UU-sub", 55)],
            playlists: vec![],
            playlist_items: HashMap::new(),
            videos: vec![],
            comments: CommentsMode::Threads(vec![]),
        };
        let (_stub, base) = serve_stub(platform).await;
        let client = YouTubeClient::new("test-key").with_base_url(&base);
        let queue = RefreshQueue::connect(pool.clone()).await.unwrap();

        let outcome = subscribe(&pool, &client, &queue, 4242, "UC-sub")
            .await
            .unwrap();
        assert!(outcome.subscribed);
        assert!(outcome.sync_scheduled);

        // Seed only: channel and statistics rows exist, the crawl is deferred
        assert!(
            channels::get_channel(&pool, "UC-sub")
                .await
                .unwrap()
                .is_some()
        );
        let stats = channels::get_channel_statistics(&pool, "UC-sub")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.subscriber_count, 55);
        assert!(
            playlists::list_playlists_by_channel(&pool, "UC-sub")
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            videos::list_videos_by_channel(&pool, "UC-sub", 10, 0)
                .await
                .unwrap()
                .is_empty()
        );

        // Second subscriber: membership only, no re-seed
        let outcome = subscribe(&pool, &client, &queue, 4343, "UC-sub")
            .await
            .unwrap();
        assert!(!outcome.sync_scheduled);
        let members: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
                .bind("UC-sub")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(members, 2);

        // A channel missing upstream is terminal and nothing is persisted
        let err = subscribe(&pool, &client, &queue, 4242, "UC-sub-missing")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::ChannelNotFound(_)));
        assert!(
            channels::get_channel(&pool, "UC-sub-missing")
                .await
                .unwrap()
                .is_none()
        );
    }
}
