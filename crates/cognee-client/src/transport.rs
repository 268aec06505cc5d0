//! HTTP transport boundary.
//!
//! The gateway never talks to `reqwest` directly: it hands a fully assembled
//! [`HttpRequest`] to a [`Transport`] and classifies the buffered
//! [`HttpResponse`] it gets back. [`ReqwestTransport`] is the production
//! implementation; [`MockTransport`] records requests and replays canned
//! responses for tests.

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use url::Url;

/// Failure to complete an HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying HTTP client failed (connect, DNS, TLS, body read).
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    /// The request body could not be encoded for the wire.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / Response
// ─────────────────────────────────────────────────────────────────────────────

/// Request body, tagged by encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    /// `multipart/form-data` parts. The transport owns the boundary.
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    /// Build a JSON body from any serializable value.
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }

    /// Check if this body is a multipart form.
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// One named field of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    /// Form field name.
    pub name: String,
    /// Field content.
    pub value: PartValue,
}

impl FormPart {
    /// A plain text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: PartValue::Text(value.into()),
        }
    }

    /// A file field.
    pub fn file(name: impl Into<String>, file: UploadFile) -> Self {
        Self {
            name: name.into(),
            value: PartValue::File(file),
        }
    }
}

/// Content of a multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    /// Text value.
    Text(String),
    /// File upload.
    File(UploadFile),
}

/// An opaque file payload for upload.
#[derive(Clone, PartialEq)]
pub struct UploadFile {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// File contents.
    pub bytes: Bytes,
}

impl UploadFile {
    /// Create an upload from in-memory contents.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk. The file name is the path's final component.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A fully assembled outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including query string.
    pub url: Url,
    /// Final header set.
    pub headers: HeaderMap,
    /// Request body.
    pub body: RequestBody,
}

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Full response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// A response carrying a JSON body and `application/json` content type.
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// A response carrying a `text/plain` body.
    pub fn text(status: StatusCode, text: impl Into<String>) -> Self {
        Self::new(status, text.into())
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
    }

    /// Add a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Reason phrase for the status ("Not Found", "Internal Server Error", ...).
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Check if the declared content type is JSON.
    pub fn is_json(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport trait
// ─────────────────────────────────────────────────────────────────────────────

/// Sends one request and returns the buffered response.
///
/// Implementations must not retry and must report non-2xx statuses as a
/// normal `Ok` response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the exchange.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// reqwest
// ─────────────────────────────────────────────────────────────────────────────

/// [`Transport`] backed by `reqwest`, with a cookie store enabled so
/// session cookies set by the server (e.g. on login) are sent back.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with default settings.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Create a transport builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Wrap an existing client. Cookie handling is whatever that client was
    /// built with.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let builder = self.http.request(method, url).headers(headers);
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(
                serde_json::to_vec(&value).map_err(|e| TransportError::Encode(e.to_string()))?,
            ),
            RequestBody::Form(pairs) => builder.body(encode_form(&pairs)),
            RequestBody::Multipart(parts) => builder.multipart(build_multipart(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn encode_form(pairs: &[(String, String)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn build_multipart(parts: Vec<FormPart>) -> Result<reqwest::multipart::Form, TransportError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part.value {
            PartValue::Text(text) => form.text(part.name, text),
            PartValue::File(file) => {
                let mut file_part =
                    reqwest::multipart::Part::bytes(file.bytes.to_vec()).file_name(file.file_name);
                if let Some(mime) = &file.mime_type {
                    file_part = file_part
                        .mime_str(mime)
                        .map_err(|e| TransportError::Encode(e.to_string()))?;
                }
                form.part(part.name, file_part)
            }
        };
    }
    Ok(form)
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Default)]
pub struct ReqwestTransportBuilder {
    cookie_jar: Option<Arc<reqwest::cookie::Jar>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ReqwestTransportBuilder {
    /// Share a cookie jar with the caller (to seed or inspect cookies).
    pub fn cookie_jar(mut self, jar: Arc<reqwest::cookie::Jar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Bound every request. Unset by default: requests wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("cognee-client/{}", env!("CARGO_PKG_VERSION")));

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        builder = match self.cookie_jar {
            Some(jar) => builder.cookie_provider(jar),
            None => builder.cookie_store(true),
        };
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ReqwestTransport {
            http: builder.build()?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock
// ─────────────────────────────────────────────────────────────────────────────

/// A recording transport for tests.
///
/// Replies are returned in order. Once they run out, every further request
/// fails with a transport error.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, String>>>,
    request_log: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Create a mock that returns the given responses.
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            replies: Mutex::new(responses.into_iter().map(Ok).collect()),
            request_log: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock with a single response.
    pub fn with_response(response: HttpResponse) -> Self {
        Self::new(vec![response])
    }

    /// Queue a transport failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock_replies().push_back(Err(message.into()));
    }

    /// Queue a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.lock_replies().push_back(Ok(response));
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock_log().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.lock_log().last().cloned()
    }

    /// Number of requests sent.
    pub fn request_count(&self) -> usize {
        self.lock_log().len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<HttpResponse, String>>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_log(&self) -> std::sync::MutexGuard<'_, Vec<HttpRequest>> {
        self.request_log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.lock_log().push(request);
        match self.lock_replies().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other(
                "MockTransport: no more responses available".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_json_matches_parameters() {
        let response = HttpResponse::new(StatusCode::OK, "{}").with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(response.is_json());
        assert!(!HttpResponse::text(StatusCode::OK, "hi").is_json());
        assert!(!HttpResponse::new(StatusCode::OK, "").is_json());
    }

    #[test]
    fn test_status_text() {
        let response = HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(response.status_text(), "Internal Server Error");
    }

    #[test]
    fn test_encode_form() {
        let pairs = vec![
            ("username".to_string(), "a@b.c".to_string()),
            ("password".to_string(), "p w&d".to_string()),
        ];
        assert_eq!(encode_form(&pairs), "username=a%40b.c&password=p+w%26d");
    }

    #[test]
    fn test_json_body_from_serializable() {
        let body = RequestBody::json(&json!({"query": "hello"})).unwrap();
        assert_eq!(body, RequestBody::Json(json!({"query": "hello"})));
        assert!(!body.is_multipart());
    }

    #[test]
    fn test_upload_debug_hides_contents() {
        let file = UploadFile::new("notes.txt", "secret contents").with_mime_type("text/plain");
        let debug = format!("{:?}", file);
        assert!(debug.contains("notes.txt"));
        assert!(!debug.contains("secret contents"));
    }

    #[tokio::test]
    async fn test_mock_replays_in_order_then_fails() {
        let mock = MockTransport::new(vec![
            HttpResponse::text(StatusCode::OK, "one"),
            HttpResponse::text(StatusCode::CREATED, "two"),
        ]);
        let request = HttpRequest {
            method: Method::GET,
            url: Url::parse("http://localhost/").unwrap(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        };

        assert_eq!(mock.send(request.clone()).await.unwrap().status, StatusCode::OK);
        assert_eq!(mock.send(request.clone()).await.unwrap().status, StatusCode::CREATED);
        assert!(mock.send(request).await.is_err());
        assert_eq!(mock.request_count(), 3);
    }
}
