//! forumline core - session-aware client for the forum backend.
//!
//! This crate holds everything the front-ends share: the bearer-token
//! request client, credential stores, forum models, and configuration.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiError, ForumApi, Method, Navigator, RequestEnvelope, ResponseEnvelope, SessionedClient};
pub use auth::{open_store, CredentialBackend, SessionStore, TokenClaims};
pub use config::Config;
