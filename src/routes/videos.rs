//! Video endpoints: read-only reporting queries over the mirror

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;

use super::channels::{DailyRangeQuery, resolve_range};
use crate::AppState;
use crate::domain::videos;
use crate::services::error::LogErr;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/videos/{id}", get(get_video))
        .route("/videos/{id}/stats/daily", get(video_daily_stats))
}

#[derive(Serialize)]
struct VideoDetail {
    #[serde(flatten)]
    video: videos::VideoRow,
    statistics: Option<videos::VideoStatisticsRow>,
    top_comment: Option<videos::TopCommentRow>,
}

/// GET /videos/:id - One video with current statistics and its top comment
async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoDetail>, StatusCode> {
    let video = videos::get_video(&state.db, &video_id)
        .await
        .log_500("Get video error")?
        .ok_or(StatusCode::NOT_FOUND)?;

    let statistics = videos::get_video_statistics(&state.db, &video_id)
        .await
        .log_500("Get video statistics error")?;

    let top_comment = videos::get_top_comment(&state.db, &video_id)
        .await
        .log_500("Get top comment error")?;

    Ok(Json(VideoDetail {
        video,
        statistics,
        top_comment,
    }))
}

/// GET /videos/:id/stats/daily - Daily statistics snapshots for a video
async fn video_daily_stats(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    Query(query): Query<DailyRangeQuery>,
) -> Result<Json<Vec<videos::VideoDailyRow>>, StatusCode> {
    let (start, end) = resolve_range(&query);

    let rows = videos::get_video_daily_range(&state.db, &video_id, start, end)
        .await
        .log_500("Video daily stats error")?;

    Ok(Json(rows))
}
