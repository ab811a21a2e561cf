//! Application constants

/// Maximum number of video ids the platform accepts in a single videos.list call
pub const VIDEO_ID_BATCH_SIZE: usize = 50;

/// Page size requested for paginated platform list calls
pub const API_PAGE_SIZE: u32 = 50;

/// Hard cap on pages followed per pagination loop so a bad upstream
/// cursor cannot spin forever
pub const MAX_PAGES_PER_LIST: usize = 200;

/// Videos at or under this duration are classified as Shorts
pub const SHORTS_MAX_SECONDS: i64 = 180;

/// Version of the Shorts classification rule currently in effect.
/// Version 1 was the 60-second rule; version 2 is the 3-minute rule.
pub const SHORTS_RULE_VERSION: i32 = 2;

/// Default page size for paginated list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum page size for paginated list endpoints
pub const MAX_PAGE_SIZE: i64 = 100;
