//! Discussion thread models.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::message::Message;
use super::null_as_default;
use super::user::UserSummary;
use crate::utils::{author_display, truncate_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    #[default]
    Open,
    Closed,
    Archived,
}

impl ThreadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadStatus::Open => "open",
            ThreadStatus::Closed => "closed",
            ThreadStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThreadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(ThreadStatus::Open),
            "closed" => Ok(ThreadStatus::Closed),
            "archived" => Ok(ThreadStatus::Archived),
            other => Err(format!("unknown thread status {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// A discussion thread.
///
/// `tags` arrive as a comma-joined string from the list endpoint and as an
/// array from the detail endpoint; both land here as a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Thread {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub message_count: Option<i64>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub author: Option<UserSummary>,
}

impl Thread {
    pub fn author_name(&self) -> &str {
        author_display(self.author.as_ref())
    }

    pub fn tag_list(&self) -> String {
        self.tags.join(", ")
    }

    /// Description shortened for list views
    pub fn preview(&self, max_len: usize) -> String {
        truncate_string(self.description.trim(), max_len)
    }

    pub fn status(&self) -> Option<ThreadStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn is_open(&self) -> bool {
        self.status().map(|s| s == ThreadStatus::Open).unwrap_or(true)
    }
}

/// `data` of `GET /api/threads/{id}`: the thread plus its first page of
/// messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ThreadDetail {
    #[serde(flatten)]
    pub thread: Thread,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub views: Option<i64>,
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        Joined(String),
        List(Vec<String>),
    }

    let tags = match Option::<Tags>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Tags::Joined(s)) => s.split(',').map(str::to_string).collect(),
        Some(Tags::List(list)) => list,
    };
    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

/// Body of `POST /api/threads`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewThread {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body of `PUT /api/threads/{id}`. The backend replaces title, description
/// and tags wholesale; `status` is only changed when given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ThreadUpdate {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ThreadStatus>,
}

impl From<&Thread> for ThreadUpdate {
    fn from(thread: &Thread) -> Self {
        Self {
            title: thread.title.clone(),
            description: thread.description.clone(),
            tags: thread.tags.clone(),
            status: None,
        }
    }
}

/// Filters and pagination for `GET /api/threads`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadQuery {
    pub page: u32,
    pub per_page: u32,
    pub status: ThreadStatus,
    pub visibility: Visibility,
}

impl Default for ThreadQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            status: ThreadStatus::Open,
            visibility: Visibility::Public,
        }
    }
}

impl ThreadQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.max(1).to_string()),
            ("per_page".to_string(), self.per_page.max(1).to_string()),
            ("status".to_string(), self.status.as_str().to_string()),
            ("visibility".to_string(), self.visibility.as_str().to_string()),
        ]
    }
}
