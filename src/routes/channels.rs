//! Channel endpoints: subscription lifecycle, manual refresh, and read-only
//! reporting queries over the mirror

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

use super::{get_user_id_from_headers, sync_error_status};
use crate::AppState;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::{channels, playlists, videos};
use crate::services::error::LogErr;
use crate::sync;
use crate::youtube;

pub fn routes() -> Router<Arc<AppState>> {
    // Manual refresh triggers a full upstream crawl; keep it behind a strict
    // rate limit so it cannot burn the API quota
    let refresh_rate_limit = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(3)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .expect("Failed to build rate limit config");

    let refresh_routes = Router::new()
        .route("/channels/{id}/refresh", post(refresh_channel))
        .layer(GovernorLayer {
            config: refresh_rate_limit.into(),
        });

    Router::new()
        .route("/channels", get(list_channels))
        .route("/channels/resolve", get(resolve_channel))
        .route("/channels/{id}", get(get_channel))
        .route(
            "/channels/{id}/subscribe",
            post(subscribe_channel).delete(unsubscribe_channel),
        )
        .route("/channels/{id}/playlists", get(list_channel_playlists))
        .route("/channels/{id}/videos", get(list_channel_videos))
        .route("/channels/{id}/stats/daily", get(channel_daily_stats))
        .merge(refresh_routes)
}

/// POST /channels/:id/subscribe - Subscribe the calling user to a channel.
/// Seeds unseen channels synchronously and defers the full crawl to the
/// refresh queue.
async fn subscribe_channel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(channel_id): Path<String>,
) -> Result<Json<sync::SubscribeOutcome>, StatusCode> {
    let user_id = get_user_id_from_headers(&headers)?;

    let outcome = sync::subscribe(
        &state.db,
        &state.youtube,
        &state.refresh_queue,
        user_id,
        &channel_id,
    )
    .await
    .map_err(|e| {
        eprintln!("Subscribe error for channel {}: {}", channel_id, e);
        sync_error_status(&e)
    })?;

    Ok(Json(outcome))
}

/// DELETE /channels/:id/subscribe - Remove the calling user's subscription
async fn unsubscribe_channel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(channel_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let user_id = get_user_id_from_headers(&headers)?;

    let removed = sync::unsubscribe(&state.db, user_id, &channel_id)
        .await
        .log_500("Unsubscribe error")?;

    if !removed {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /channels/:id/refresh - Run a full synchronous refresh
async fn refresh_channel(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> Result<Json<sync::RefreshOutcome>, StatusCode> {
    let outcome = sync::refresh(&state.db, &state.youtube, &channel_id)
        .await
        .map_err(|e| {
            eprintln!("Refresh error for channel {}: {}", channel_id, e);
            sync_error_status(&e)
        })?;

    Ok(Json(outcome))
}

#[derive(Deserialize)]
struct ResolveQuery {
    handle: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedChannel {
    channel_id: String,
    title: String,
    custom_url: Option<String>,
    thumbnail_url: Option<String>,
}

/// GET /channels/resolve?handle=@name - Resolve a custom handle to a channel
/// id via the platform, for clients that only know the @handle
async fn resolve_channel(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolvedChannel>, StatusCode> {
    let record = state
        .youtube
        .fetch_channel_by_handle(&query.handle)
        .await
        .log_502("Resolve channel handle error")?;

    match record {
        youtube::Fetch::Found(channel) => Ok(Json(ResolvedChannel {
            channel_id: channel.id,
            title: channel.title,
            custom_url: channel.custom_url,
            thumbnail_url: channel.thumbnail_url,
        })),
        youtube::Fetch::NotFound => Err(StatusCode::NOT_FOUND),
    }
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// GET /channels - List mirrored channels
async fn list_channels(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<channels::ChannelRow>>, StatusCode> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let rows = channels::list_channels(&state.db, limit, offset)
        .await
        .log_500("List channels error")?;

    Ok(Json(rows))
}

#[derive(Serialize)]
struct ChannelDetail {
    #[serde(flatten)]
    channel: channels::ChannelRow,
    statistics: Option<channels::ChannelStatisticsRow>,
}

/// GET /channels/:id - Get one channel with its current statistics
async fn get_channel(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> Result<Json<ChannelDetail>, StatusCode> {
    let channel = channels::get_channel(&state.db, &channel_id)
        .await
        .log_500("Get channel error")?
        .ok_or(StatusCode::NOT_FOUND)?;

    let statistics = channels::get_channel_statistics(&state.db, &channel_id)
        .await
        .log_500("Get channel statistics error")?;

    Ok(Json(ChannelDetail {
        channel,
        statistics,
    }))
}

/// GET /channels/:id/playlists - List a channel's mirrored playlists
async fn list_channel_playlists(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> Result<Json<Vec<playlists::PlaylistRow>>, StatusCode> {
    let rows = playlists::list_playlists_by_channel(&state.db, &channel_id)
        .await
        .log_500("List playlists error")?;

    Ok(Json(rows))
}

/// GET /channels/:id/videos - List a channel's mirrored videos
async fn list_channel_videos(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<videos::VideoRow>>, StatusCode> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let rows = videos::list_videos_by_channel(&state.db, &channel_id, limit, offset)
        .await
        .log_500("List channel videos error")?;

    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct DailyRangeQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// Default to the trailing 30 days when the caller gives no range
pub fn resolve_range(query: &DailyRangeQuery) -> (NaiveDate, NaiveDate) {
    let end = query.end.unwrap_or_else(|| Utc::now().date_naive());
    let start = query.start.unwrap_or_else(|| {
        end.checked_sub_days(Days::new(30)).unwrap_or(end)
    });
    (start, end)
}

/// GET /channels/:id/stats/daily - Daily statistics snapshots for a channel
async fn channel_daily_stats(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
    Query(query): Query<DailyRangeQuery>,
) -> Result<Json<Vec<channels::ChannelDailyRow>>, StatusCode> {
    let (start, end) = resolve_range(&query);

    let rows = channels::get_channel_daily_range(&state.db, &channel_id, start, end)
        .await
        .log_500("Channel daily stats error")?;

    Ok(Json(rows))
}
