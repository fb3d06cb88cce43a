//! REST client for the forum backend.
//!
//! `SessionedClient` attaches the stored bearer token to every call, decodes
//! JSON or plain-text bodies into a `ResponseEnvelope`, and on a 401 clears
//! the token and hands control to the `Navigator`. `ForumApi` layers the
//! typed forum operations on top of it.

pub mod client;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod forum;
pub mod navigator;

pub use client::SessionedClient;
pub use decode::DecodedBody;
pub use envelope::{Method, RequestEnvelope, ResponseEnvelope};
pub use error::{ApiError, FALLBACK_ERROR_MESSAGE};
pub use forum::ForumApi;
pub use navigator::{Navigator, NoopNavigator};
