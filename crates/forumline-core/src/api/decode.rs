//! Response body decoding.
//!
//! Two branches: JSON, and fallback text. Anything the backend (or a proxy in
//! front of it) sends back ends up as a [`ResponseEnvelope`]; a body that is
//! not JSON is never an error in itself.

use serde_json::Value;

use super::envelope::ResponseEnvelope;

/// Keys that mark a JSON object as the backend's envelope rather than a bare
/// payload.
const ENVELOPE_KEYS: [&str; 3] = ["status", "data", "message"];

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Json(Value),
    Text(String),
}

impl DecodedBody {
    /// Decode a raw body given the response's `Content-Type`, if any.
    ///
    /// A JSON content type that fails to parse still falls back to text, and
    /// a non-JSON content type whose body happens to parse is treated as JSON.
    pub fn decode(content_type: Option<&str>, raw: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(raw);
        match parsed {
            Ok(value) => DecodedBody::Json(value),
            Err(e) => {
                if content_type.map(is_json_content_type).unwrap_or(false) {
                    tracing::debug!(error = %e, "JSON content type with unparseable body, keeping text");
                }
                DecodedBody::Text(raw.to_string())
            }
        }
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        match self {
            DecodedBody::Json(Value::Object(map))
                if ENVELOPE_KEYS.iter().any(|k| map.contains_key(*k)) =>
            {
                let value = Value::Object(map);
                match serde_json::from_value::<ResponseEnvelope>(value.clone()) {
                    Ok(envelope) => envelope,
                    // e.g. a numeric `status`; keep the payload rather than lose it
                    Err(_) => ResponseEnvelope {
                        data: Some(value),
                        ..Default::default()
                    },
                }
            }
            DecodedBody::Json(Value::Null) => ResponseEnvelope::default(),
            DecodedBody::Json(value) => ResponseEnvelope {
                data: Some(value),
                ..Default::default()
            },
            DecodedBody::Text(text) => {
                let text = text.trim();
                ResponseEnvelope {
                    message: (!text.is_empty()).then(|| text.to_string()),
                    ..Default::default()
                }
            }
        }
    }
}

/// Whether a `Content-Type` header value names JSON (`application/json`,
/// `application/problem+json`, with or without parameters).
pub fn is_json_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}
