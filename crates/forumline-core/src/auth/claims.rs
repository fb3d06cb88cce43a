use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Identity fields carried in the backend's JWT payload.
///
/// Decoded for display only: the signature is not checked and no expiry is
/// enforced. The backend's 401 is the only authority on validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub role: String,
}

impl TokenClaims {
    pub fn decode(token: &str) -> Result<Self> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Token is not a JWT"))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .context("Token payload is not base64url")?;

        serde_json::from_slice(&bytes).context("Token payload is not valid claims JSON")
    }

    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}
