pub mod channels;
pub mod videos;

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use std::sync::Arc;

use crate::AppState;
use crate::sync::SyncError;

/// Build all routes for the API
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(channels::routes())
        .merge(videos::routes())
}

/// Extract the authenticated user id supplied by the auth collaborator in
/// the X-User-Id header. The core trusts this id verbatim.
pub fn get_user_id_from_headers(headers: &HeaderMap) -> Result<i64, StatusCode> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or(StatusCode::UNAUTHORIZED)
}

/// Map the sync error taxonomy onto response statuses
pub fn sync_error_status(e: &SyncError) -> StatusCode {
    match e {
        SyncError::ChannelNotFound(_) => StatusCode::NOT_FOUND,
        SyncError::Upstream(_) => StatusCode::BAD_GATEWAY,
        SyncError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
