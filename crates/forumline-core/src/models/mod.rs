//! Data models for forum entities.
//!
//! This module contains the data structures used to represent the
//! backend's JSON payloads:
//!
//! - `User`, `UserSummary`, `AuthSession`: accounts and login results
//! - `Thread`, `ThreadDetail`: discussion threads
//! - `Message`, `Reaction`: replies and likes/dislikes
//! - `ForumStats`: site-wide counters
//!
//! The backend is loose about `null` lists and mixes representations for
//! some fields, so deserialization is deliberately lenient.

pub mod message;
pub mod stats;
pub mod thread;
pub mod user;

pub use message::{Message, MessageQuery, MessageSort, NewMessage, Reaction};
pub use stats::{ActiveUser, ForumStats, RecentThread};
pub use thread::{NewThread, Thread, ThreadDetail, ThreadQuery, ThreadStatus, ThreadUpdate, Visibility};
pub use user::{AuthSession, LoginRequest, ProfileUpdate, RegisterRequest, User, UserSummary};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
