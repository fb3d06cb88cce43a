//! Request and response envelopes exchanged with the forum backend.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::error::{ApiError, FALLBACK_ERROR_MESSAGE};

/// HTTP methods the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(ApiError::InvalidRequest(format!(
                "unsupported method {}",
                other
            ))),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outgoing call. Built per call by the caller, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestEnvelope {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl RequestEnvelope {
    pub fn new(endpoint: impl Into<String>, method: Method) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, Method::Get)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, Method::Post)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, Method::Put)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, Method::Delete)
    }

    /// Attach a JSON body, serialized from any `Serialize` value.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// The backend's uniform `{status, data, message}` wrapper.
///
/// `data` is passed through untouched; typed callers pull it out with
/// [`ResponseEnvelope::data_as`] or [`ResponseEnvelope::field_as`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `status` value the backend uses for failures.
const STATUS_ERROR: &str = "error";

impl ResponseEnvelope {
    /// True unless the backend explicitly reported `status: "error"`.
    pub fn is_success(&self) -> bool {
        !self
            .status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case(STATUS_ERROR))
            .unwrap_or(false)
    }

    pub fn message_or_fallback(&self) -> String {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_ERROR_MESSAGE)
            .to_string()
    }

    /// Deserialize the whole `data` payload.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| ApiError::InvalidResponse("response has no data payload".to_string()))?;
        T::deserialize(data)
            .map_err(|e| ApiError::InvalidResponse(format!("unexpected data payload: {}", e)))
    }

    /// Deserialize one field of an object `data` payload, e.g. `data.threads`.
    /// A missing or `null` field yields `T::default()`.
    pub fn field_as<T: DeserializeOwned + Default>(&self, field: &str) -> Result<T, ApiError> {
        match self.data.as_ref().and_then(|d| d.get(field)) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => T::deserialize(value).map_err(|e| {
                ApiError::InvalidResponse(format!("unexpected `{}` payload: {}", field, e))
            }),
        }
    }
}
