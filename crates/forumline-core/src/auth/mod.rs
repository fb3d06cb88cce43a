//! Credential storage for the bearer token.
//!
//! This module provides:
//! - `SessionStore`: the slot the request client reads and clears
//! - `MemoryStore`, `FileStore`, `KeyringStore`: its backends
//! - `TokenClaims`: display-only decoding of the token payload
//!
//! There is no client-side expiry; a token is dropped when the backend
//! answers 401 or the user logs out.

pub mod claims;
pub mod credentials;
pub mod session;
pub mod store;

pub use claims::TokenClaims;
pub use credentials::KeyringStore;
pub use session::{FileStore, SessionData};
pub use store::{open_store, CredentialBackend, MemoryStore, SessionStore, CREDENTIAL_KEY};
