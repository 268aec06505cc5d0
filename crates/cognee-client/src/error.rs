//! Client error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::TransportError;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Server returned a non-success status.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status of a gateway error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Gateway(err) => err.status_code,
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Check if the caller lacks permission for the resource.
    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(status) if status >= 500)
    }

    /// Borrow the normalized gateway error, if this is one.
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Error::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Normalized failure for a non-success HTTP response.
///
/// `message` is the server's own `message` field when one was returned,
/// otherwise a synthesized `HTTP <status>: <reason>` string.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayError {
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    pub status_code: Option<u16>,
    /// Error body recovered from the response.
    pub payload: Option<ErrorPayload>,
}

impl GatewayError {
    pub(crate) fn new(
        message: impl Into<String>,
        status_code: Option<u16>,
        payload: Option<ErrorPayload>,
    ) -> Self {
        Self {
            message: message.into(),
            status_code,
            payload,
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "API error ({}): {}", status, self.message),
            None => write!(f, "API error: {}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Error body returned by the server.
///
/// Every field is optional; anything beyond the known fields (FastAPI's
/// `detail`, for example) is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error class name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Status code echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ErrorPayload {
    /// Payload carrying only a message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Recover a payload from any JSON object.
    ///
    /// Known fields are lifted out only when they have the expected type;
    /// anything else stays in `extra` untouched.
    pub fn from_fields(mut fields: serde_json::Map<String, serde_json::Value>) -> Self {
        let message = take_field(&mut fields, "message", |v| v.as_str().map(str::to_string));
        let name = take_field(&mut fields, "name", |v| v.as_str().map(str::to_string));
        let status_code = take_field(&mut fields, "status_code", |v| {
            v.as_u64().and_then(|n| u16::try_from(n).ok())
        });
        Self {
            message,
            name,
            status_code,
            extra: fields,
        }
    }
}

fn take_field<T>(
    fields: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
    convert: impl Fn(&serde_json::Value) -> Option<T>,
) -> Option<T> {
    let converted = fields.get(key).and_then(convert)?;
    fields.remove(key);
    Some(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(status: u16) -> Error {
        Error::Gateway(GatewayError::new("boom", Some(status), None))
    }

    #[test]
    fn test_status_predicates() {
        assert!(gateway(404).is_not_found());
        assert!(gateway(401).is_auth_error());
        assert!(gateway(403).is_forbidden());
        assert!(gateway(502).is_server_error());
        assert!(!gateway(400).is_server_error());
        assert_eq!(gateway(418).status_code(), Some(418));
    }

    #[test]
    fn test_non_gateway_has_no_status() {
        let err = Error::Config("missing".to_string());
        assert_eq!(err.status_code(), None);
        assert!(err.as_gateway().is_none());
    }

    #[test]
    fn test_display() {
        let err = gateway(404);
        assert_eq!(err.to_string(), "API error (404): boom");
    }

    #[test]
    fn test_payload_keeps_unknown_fields() {
        let payload: ErrorPayload =
            serde_json::from_str(r#"{"message":"nope","detail":"missing field"}"#).unwrap();
        assert_eq!(payload.message.as_deref(), Some("nope"));
        assert_eq!(payload.extra["detail"], "missing field");
    }

    #[test]
    fn test_from_fields_keeps_mistyped_known_fields() {
        let fields = serde_json::json!({
            "message": "Dataset is locked",
            "name": {"cls": "LockError"},
            "status_code": "409"
        });
        let serde_json::Value::Object(fields) = fields else {
            unreachable!()
        };
        let payload = ErrorPayload::from_fields(fields);
        assert_eq!(payload.message.as_deref(), Some("Dataset is locked"));
        assert!(payload.name.is_none());
        assert!(payload.status_code.is_none());
        assert_eq!(payload.extra["name"]["cls"], "LockError");
        assert_eq!(payload.extra["status_code"], "409");
    }
}
