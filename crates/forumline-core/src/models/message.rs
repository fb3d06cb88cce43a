use std::fmt;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::user::UserSummary;
use crate::utils::author_display;

/// A reply in a thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Message {
    pub id: i64,
    #[serde(default)]
    pub thread_id: i64,
    #[serde(default)]
    pub author_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
    #[serde(default)]
    pub author: Option<UserSummary>,
}

impl Message {
    pub fn author_name(&self) -> &str {
        author_display(self.author.as_ref())
    }

    pub fn score(&self) -> i64 {
        self.likes - self.dislikes
    }
}

/// Body of `POST /api/threads/{id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct NewMessage<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    /// Path segment under `/api/messages/{id}/`
    pub fn path_segment(&self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageSort {
    #[default]
    Newest,
    Oldest,
    Likes,
}

impl MessageSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSort::Newest => "newest",
            MessageSort::Oldest => "oldest",
            MessageSort::Likes => "likes",
        }
    }
}

impl std::str::FromStr for MessageSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(MessageSort::Newest),
            "oldest" => Ok(MessageSort::Oldest),
            "likes" | "popularity" => Ok(MessageSort::Likes),
            other => Err(format!("unknown sort order {:?}", other)),
        }
    }
}

/// Pagination and ordering for `GET /api/threads/{id}/messages`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort_by: MessageSort,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            sort_by: MessageSort::Newest,
        }
    }
}

impl MessageQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.max(1).to_string()),
            ("per_page".to_string(), self.per_page.max(1).to_string()),
            ("sort_by".to_string(), self.sort_by.as_str().to_string()),
        ]
    }
}
