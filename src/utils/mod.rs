//! Utility functions and helpers.

pub mod http;
pub mod tags;
pub mod url;

pub use self::http::{HttpClient, HttpResponse, ReqwestClient};
pub use self::tags::infer_tags;
pub use self::url::{fallback_title, is_savable_url, normalize};

use chrono::Utc;

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a new opaque reel identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
