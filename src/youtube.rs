//! YouTube Data API v3 client
//!
//! Fetches channel, playlist, playlist-membership, video, and comment-thread
//! resources. Single-resource lookups return a tagged [`Fetch`] so callers
//! must handle found/not-found/error explicitly; every record carries the
//! platform's nullable etag for change detection downstream.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::constants::{API_PAGE_SIZE, MAX_PAGES_PER_LIST, VIDEO_ID_BATCH_SIZE};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Outcome of a single-resource lookup
#[derive(Debug)]
pub enum Fetch<T> {
    Found(T),
    NotFound,
}

#[derive(Debug)]
pub enum YouTubeError {
    /// Network-level failure, the platform was never reached
    Unreachable(reqwest::Error),
    /// 4xx from the platform, terminal for the resource
    Rejected(StatusCode, String),
    /// 5xx or timeout, retryable by the next scheduled run
    Degraded(String),
    /// Response body did not match the expected shape
    Decode(reqwest::Error),
}

impl From<reqwest::Error> for YouTubeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            YouTubeError::Degraded(format!("request timed out: {}", e))
        } else if e.is_decode() {
            YouTubeError::Decode(e)
        } else {
            YouTubeError::Unreachable(e)
        }
    }
}

impl std::fmt::Display for YouTubeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YouTubeError::Unreachable(e) => write!(f, "upstream unreachable: {}", e),
            YouTubeError::Rejected(status, body) => {
                write!(f, "upstream rejected request ({}): {}", status, body)
            }
            YouTubeError::Degraded(msg) => write!(f, "upstream degraded: {}", msg),
            YouTubeError::Decode(e) => write!(f, "upstream response decode error: {}", e),
        }
    }
}

impl std::error::Error for YouTubeError {}

// ============================================================================
// Typed records handed to the orchestrator
// ============================================================================

#[derive(Debug, Clone)]
pub struct ChannelRecord {
    pub id: String,
    pub etag: Option<String>,
    pub title: String,
    pub description: String,
    pub custom_url: Option<String>,
    pub country: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub uploads_playlist_id: Option<String>,
    pub subscriber_count: i64,
    pub video_count: i64,
    pub view_count: i64,
    pub hidden_subscriber_count: bool,
}

#[derive(Debug, Clone)]
pub struct PlaylistRecord {
    pub id: String,
    pub etag: Option<String>,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub item_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VideoRecord {
    pub id: String,
    pub etag: Option<String>,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub caption: bool,
    pub definition: Option<String>,
    pub licensed_content: bool,
    pub tags: Vec<String>,
    pub default_language: Option<String>,
    pub default_audio_language: Option<String>,
    pub privacy_status: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub favorite_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone)]
pub struct TopCommentRecord {
    pub comment_id: String,
    pub author_display_name: String,
    pub author_channel_id: Option<String>,
    pub text: String,
    pub like_count: i64,
    pub published_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl YouTubeClient {
    pub fn new(api_key: &str) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            http,
        }
    }

    /// Point the client at a different API root (stub servers in tests)
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Look up a channel by its opaque id
    pub async fn fetch_channel_by_id(
        &self,
        channel_id: &str,
    ) -> Result<Fetch<ChannelRecord>, YouTubeError> {
        let url = format!(
            "{}/channels?part=snippet%2Cstatistics%2CcontentDetails&id={}&key={}",
            self.base_url,
            percent_encode(channel_id),
            percent_encode(&self.api_key)
        );
        self.fetch_single_channel(&url).await
    }

    /// Look up a channel by its custom handle (the `@name` form)
    pub async fn fetch_channel_by_handle(
        &self,
        handle: &str,
    ) -> Result<Fetch<ChannelRecord>, YouTubeError> {
        let url = format!(
            "{}/channels?part=snippet%2Cstatistics%2CcontentDetails&forHandle={}&key={}",
            self.base_url,
            percent_encode(handle),
            percent_encode(&self.api_key)
        );
        self.fetch_single_channel(&url).await
    }

    async fn fetch_single_channel(
        &self,
        url: &str,
    ) -> Result<Fetch<ChannelRecord>, YouTubeError> {
        let resp = self.http.get(url).send().await?;
        let resp = check_status(resp).await?;
        let list: ListResponse<ChannelItem> = resp.json().await?;

        // An empty items array is how the platform spells "no such channel"
        match list.items.into_iter().next() {
            Some(item) => Ok(Fetch::Found(item.into_record())),
            None => Ok(Fetch::NotFound),
        }
    }

    /// Fetch every playlist owned by a channel, following pagination cursors
    /// until exhausted
    pub async fn fetch_playlists_by_channel(
        &self,
        channel_id: &str,
    ) -> Result<Vec<PlaylistRecord>, YouTubeError> {
        let mut playlists = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES_PER_LIST {
            let mut url = format!(
                "{}/playlists?part=snippet%2CcontentDetails&channelId={}&maxResults={}&key={}",
                self.base_url,
                percent_encode(channel_id),
                API_PAGE_SIZE,
                percent_encode(&self.api_key)
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", percent_encode(token)));
            }

            let resp = self.http.get(&url).send().await?;
            let resp = check_status(resp).await?;
            let list: ListResponse<PlaylistItem> = resp.json().await?;

            playlists.extend(list.items.into_iter().map(PlaylistItem::into_record));

            page_token = list.next_page_token;
            if page_token.is_none() {
                return Ok(playlists);
            }
        }

        Err(YouTubeError::Degraded(format!(
            "playlist pagination for channel {} exceeded {} pages",
            channel_id, MAX_PAGES_PER_LIST
        )))
    }

    /// Fetch the ordered video-id list of a playlist, following pagination
    /// cursors until exhausted
    pub async fn fetch_playlist_video_ids(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<String>, YouTubeError> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES_PER_LIST {
            let mut url = format!(
                "{}/playlistItems?part=contentDetails&playlistId={}&maxResults={}&key={}",
                self.base_url,
                percent_encode(playlist_id),
                API_PAGE_SIZE,
                percent_encode(&self.api_key)
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", percent_encode(token)));
            }

            let resp = self.http.get(&url).send().await?;
            let resp = check_status(resp).await?;
            let list: ListResponse<PlaylistItemEntry> = resp.json().await?;

            ids.extend(
                list.items
                    .into_iter()
                    .map(|item| item.content_details.video_id),
            );

            page_token = list.next_page_token;
            if page_token.is_none() {
                return Ok(ids);
            }
        }

        Err(YouTubeError::Degraded(format!(
            "playlist item pagination for {} exceeded {} pages",
            playlist_id, MAX_PAGES_PER_LIST
        )))
    }

    /// Fetch full details for an arbitrary-length id list, split into
    /// platform-maximum batches. A failed batch fails the whole call so the
    /// caller never sees a silently-partial result set.
    pub async fn fetch_videos_by_ids(
        &self,
        video_ids: &[String],
    ) -> Result<Vec<VideoRecord>, YouTubeError> {
        let mut videos = Vec::with_capacity(video_ids.len());

        for batch in video_ids.chunks(VIDEO_ID_BATCH_SIZE) {
            let url = format!(
                "{}/videos?part=snippet%2CcontentDetails%2Cstatistics%2Cstatus&id={}&key={}",
                self.base_url,
                percent_encode(&batch.join(",")),
                percent_encode(&self.api_key)
            );

            let resp = self.http.get(&url).send().await?;
            let resp = check_status(resp).await?;
            let list: ListResponse<VideoItem> = resp.json().await?;

            videos.extend(list.items.into_iter().map(VideoItem::into_record));
        }

        Ok(videos)
    }

    /// Walk comment threads in relevance order and return the first one not
    /// authored by `exclude_channel_id` (the video's own channel). `None`
    /// when no eligible comment exists or the video has comments disabled.
    pub async fn fetch_top_comment(
        &self,
        video_id: &str,
        exclude_channel_id: &str,
    ) -> Result<Option<TopCommentRecord>, YouTubeError> {
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES_PER_LIST {
            let mut url = format!(
                "{}/commentThreads?part=snippet&videoId={}&order=relevance&maxResults={}&key={}",
                self.base_url,
                percent_encode(video_id),
                API_PAGE_SIZE,
                percent_encode(&self.api_key)
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", percent_encode(token)));
            }

            let resp = self.http.get(&url).send().await?;
            let resp = match check_status(resp).await {
                Ok(resp) => resp,
                // Comments disabled on the video is an expected state, not
                // an upstream failure
                Err(YouTubeError::Rejected(status, body))
                    if status == StatusCode::FORBIDDEN && body.contains("commentsDisabled") =>
                {
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };
            let list: ListResponse<CommentThreadItem> = resp.json().await?;

            if let Some(record) = first_eligible_comment(list.items, exclude_channel_id) {
                return Ok(Some(record));
            }

            page_token = list.next_page_token;
            if page_token.is_none() {
                return Ok(None);
            }
        }

        Err(YouTubeError::Degraded(format!(
            "comment thread pagination for video {} exceeded {} pages",
            video_id, MAX_PAGES_PER_LIST
        )))
    }
}

/// First comment thread (in the order the platform returned, i.e. relevance)
/// whose top-level author is not the excluded channel
fn first_eligible_comment(
    items: Vec<CommentThreadItem>,
    exclude_channel_id: &str,
) -> Option<TopCommentRecord> {
    for item in items {
        let comment = item.snippet.top_level_comment;
        let author = comment.snippet.author_channel_id.map(|a| a.value);
        if author.as_deref() == Some(exclude_channel_id) {
            continue;
        }
        return Some(TopCommentRecord {
            comment_id: comment.id,
            author_display_name: comment.snippet.author_display_name,
            author_channel_id: author,
            text: comment.snippet.text_display,
            like_count: comment.snippet.like_count,
            published_at: comment.snippet.published_at,
        });
    }
    None
}

/// Map non-success statuses to the error taxonomy
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, YouTubeError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    if status.is_client_error() {
        Err(YouTubeError::Rejected(status, body))
    } else {
        Err(YouTubeError::Degraded(format!("{}: {}", status, body)))
    }
}

fn percent_encode(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, percent_encoding::NON_ALPHANUMERIC).to_string()
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    fn best_url(self) -> Option<String> {
        self.high
            .or(self.medium)
            .or(self.default)
            .map(|t| t.url)
    }
}

fn parse_count(raw: Option<String>) -> i64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    id: String,
    etag: Option<String>,
    snippet: ChannelSnippet,
    statistics: Option<ChannelStatisticsWire>,
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    title: String,
    #[serde(default)]
    description: String,
    custom_url: Option<String>,
    country: Option<String>,
    published_at: Option<DateTime<Utc>>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatisticsWire {
    subscriber_count: Option<String>,
    video_count: Option<String>,
    view_count: Option<String>,
    #[serde(default)]
    hidden_subscriber_count: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

impl ChannelItem {
    fn into_record(self) -> ChannelRecord {
        let stats = self.statistics;
        let (subscriber_count, video_count, view_count, hidden) = match stats {
            Some(s) => (
                parse_count(s.subscriber_count),
                parse_count(s.video_count),
                parse_count(s.view_count),
                s.hidden_subscriber_count,
            ),
            None => (0, 0, 0, false),
        };

        ChannelRecord {
            id: self.id,
            etag: self.etag,
            title: self.snippet.title,
            description: self.snippet.description,
            custom_url: self.snippet.custom_url,
            country: self.snippet.country,
            published_at: self.snippet.published_at,
            thumbnail_url: self.snippet.thumbnails.and_then(Thumbnails::best_url),
            uploads_playlist_id: self
                .content_details
                .and_then(|c| c.related_playlists)
                .and_then(|r| r.uploads),
            subscriber_count,
            video_count,
            view_count,
            hidden_subscriber_count: hidden,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    id: String,
    etag: Option<String>,
    snippet: PlaylistSnippet,
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    channel_id: String,
    title: String,
    #[serde(default)]
    description: String,
    published_at: Option<DateTime<Utc>>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    item_count: Option<i64>,
}

impl PlaylistItem {
    fn into_record(self) -> PlaylistRecord {
        PlaylistRecord {
            id: self.id,
            etag: self.etag,
            channel_id: self.snippet.channel_id,
            title: self.snippet.title,
            description: self.snippet.description,
            item_count: self.content_details.and_then(|c| c.item_count).unwrap_or(0),
            published_at: self.snippet.published_at,
            thumbnail_url: self.snippet.thumbnails.and_then(Thumbnails::best_url),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemEntry {
    content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    etag: Option<String>,
    snippet: VideoSnippet,
    content_details: Option<VideoContentDetails>,
    statistics: Option<VideoStatisticsWire>,
    status: Option<VideoStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    channel_id: String,
    title: String,
    #[serde(default)]
    description: String,
    published_at: Option<DateTime<Utc>>,
    thumbnails: Option<Thumbnails>,
    #[serde(default)]
    tags: Vec<String>,
    default_language: Option<String>,
    default_audio_language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoContentDetails {
    duration: Option<String>,
    caption: Option<String>,
    definition: Option<String>,
    #[serde(default)]
    licensed_content: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatisticsWire {
    view_count: Option<String>,
    like_count: Option<String>,
    favorite_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatus {
    privacy_status: Option<String>,
}

impl VideoItem {
    fn into_record(self) -> VideoRecord {
        let (duration, caption, definition, licensed_content) = match self.content_details {
            Some(c) => (
                c.duration,
                c.caption.as_deref() == Some("true"),
                c.definition,
                c.licensed_content,
            ),
            None => (None, false, None, false),
        };
        let (view_count, like_count, favorite_count, comment_count) = match self.statistics {
            Some(s) => (
                parse_count(s.view_count),
                parse_count(s.like_count),
                parse_count(s.favorite_count),
                parse_count(s.comment_count),
            ),
            None => (0, 0, 0, 0),
        };

        VideoRecord {
            id: self.id,
            etag: self.etag,
            channel_id: self.snippet.channel_id,
            title: self.snippet.title,
            description: self.snippet.description,
            published_at: self.snippet.published_at,
            thumbnail_url: self.snippet.thumbnails.and_then(Thumbnails::best_url),
            duration,
            caption,
            definition,
            licensed_content,
            tags: self.snippet.tags,
            default_language: self.snippet.default_language,
            default_audio_language: self.snippet.default_audio_language,
            privacy_status: self.status.and_then(|s| s.privacy_status),
            view_count,
            like_count,
            favorite_count,
            comment_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadItem {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopLevelComment {
    id: String,
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    author_display_name: String,
    author_channel_id: Option<AuthorChannelId>,
    text_display: String,
    #[serde(default)]
    like_count: i64,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AuthorChannelId {
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_item_mapping() {
        let json = serde_json::json!({
            "id": "UC123",
            "etag": "etag-a",
            "snippet": {
                "title": "A Channel",
                "description": "desc",
                "customUrl": "@achannel",
                "country": "DE",
                "publishedAt": "2020-01-02T03:04:05Z",
                "thumbnails": {
                    "default": {"url": "http://img/default.jpg"},
                    "high": {"url": "http://img/high.jpg"}
                }
            },
            "statistics": {
                "subscriberCount": "1200",
                "videoCount": "34",
                "viewCount": "56789",
                "hiddenSubscriberCount": false
            },
            "contentDetails": {
                "relatedPlaylists": {"uploads": "UU123"}
            }
        });
        let item: ChannelItem = serde_json::from_value(json).unwrap();
        let record = item.into_record();
        assert_eq!(record.id, "UC123");
        assert_eq!(record.etag.as_deref(), Some("etag-a"));
        assert_eq!(record.custom_url.as_deref(), Some("@achannel"));
        assert_eq!(record.uploads_playlist_id.as_deref(), Some("UU123"));
        assert_eq!(record.subscriber_count, 1200);
        assert_eq!(record.thumbnail_url.as_deref(), Some("http://img/high.jpg"));
    }

    #[test]
    fn test_hidden_counts_parse_as_zero() {
        let json = serde_json::json!({
            "id": "UC9",
            "snippet": {"title": "Hidden"},
            "statistics": {"hiddenSubscriberCount": true, "viewCount": "10"}
        });
        let item: ChannelItem = serde_json::from_value(json).unwrap();
        let record = item.into_record();
        assert!(record.hidden_subscriber_count);
        assert_eq!(record.subscriber_count, 0);
        assert_eq!(record.view_count, 10);
        assert!(record.etag.is_none());
    }

    #[test]
    fn test_video_item_mapping() {
        let json = serde_json::json!({
            "id": "vid1",
            "etag": "etag-v",
            "snippet": {
                "channelId": "UC123",
                "title": "A Video",
                "tags": ["rust", "sync"],
                "defaultLanguage": "en"
            },
            "contentDetails": {
                "duration": "PT2M59S",
                "caption": "true",
                "definition": "hd",
                "licensedContent": true
            },
            "statistics": {"viewCount": "42", "likeCount": "7"},
            "status": {"privacyStatus": "public"}
        });
        let item: VideoItem = serde_json::from_value(json).unwrap();
        let record = item.into_record();
        assert_eq!(record.duration.as_deref(), Some("PT2M59S"));
        assert!(record.caption);
        assert!(record.licensed_content);
        assert_eq!(record.tags, vec!["rust", "sync"]);
        assert_eq!(record.view_count, 42);
        assert_eq!(record.comment_count, 0);
        assert_eq!(record.privacy_status.as_deref(), Some("public"));
    }

    fn thread(author_channel_id: Option<&str>, comment_id: &str) -> CommentThreadItem {
        let mut snippet = serde_json::json!({
            "authorDisplayName": format!("author-{}", comment_id),
            "textDisplay": "nice video",
            "likeCount": 3
        });
        if let Some(id) = author_channel_id {
            snippet["authorChannelId"] = serde_json::json!({"value": id});
        }
        serde_json::from_value(serde_json::json!({
            "snippet": {
                "topLevelComment": {"id": comment_id, "snippet": snippet}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_top_comment_skips_video_owner() {
        // Relevance order: owner X first, then Y and Z
        let items = vec![
            thread(Some("UC-X"), "c1"),
            thread(Some("UC-Y"), "c2"),
            thread(Some("UC-Z"), "c3"),
        ];
        let picked = first_eligible_comment(items, "UC-X").unwrap();
        assert_eq!(picked.comment_id, "c2");
        assert_eq!(picked.author_channel_id.as_deref(), Some("UC-Y"));
    }

    #[test]
    fn test_top_comment_none_when_only_owner_comments() {
        let items = vec![thread(Some("UC-X"), "c1"), thread(Some("UC-X"), "c2")];
        assert!(first_eligible_comment(items, "UC-X").is_none());
    }

    #[test]
    fn test_top_comment_anonymous_author_is_eligible() {
        let items = vec![thread(None, "c1")];
        let picked = first_eligible_comment(items, "UC-X").unwrap();
        assert_eq!(picked.comment_id, "c1");
        assert!(picked.author_channel_id.is_none());
    }

    #[test]
    fn test_empty_items_deserializes() {
        let json = serde_json::json!({"kind": "youtube#channelListResponse"});
        let list: ListResponse<ChannelItem> = serde_json::from_value(json).unwrap();
        assert!(list.items.is_empty());
        assert!(list.next_page_token.is_none());
    }
}
