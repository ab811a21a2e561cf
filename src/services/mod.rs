pub mod error;
pub mod etag_cache;
pub mod subscriptions;
