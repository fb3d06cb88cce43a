use serde::{Deserialize, Serialize};

use super::null_as_default;

/// `data` of `GET /api/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ForumStats {
    #[serde(default)]
    pub user_count: i64,
    #[serde(default)]
    pub thread_count: i64,
    #[serde(default)]
    pub message_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_threads: Vec<RecentThread>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_users: Vec<ActiveUser>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecentThread {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Author username (already flattened by the backend)
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ActiveUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub message_count: i64,
}
