//! Request gateway.
//!
//! Every endpoint goes through [`dispatch`] (or [`dispatch_binary`] for raw
//! file downloads). The gateway turns a [`RequestDescriptor`] into an
//! [`HttpRequest`] by resolving the URL and applying the credential and
//! content-type policy, sends it exactly once, and classifies the response:
//!
//! - non-2xx becomes an [`Error::Gateway`] carrying a [`GatewayError`]
//! - 2xx with a JSON content type is parsed as `T`
//! - any other 2xx body is returned as text

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, ErrorPayload, GatewayError, Result};
use crate::transport::{FormPart, HttpRequest, HttpResponse, RequestBody, Transport};

/// Path prefix for data-plane endpoints.
pub const API_PREFIX: &str = "/api/v1";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Where a path is rooted on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiScope {
    /// Under `/api/v1`.
    #[default]
    Versioned,
    /// Directly under the base URL (health and root endpoints).
    Root,
}

/// Per-call description of a request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    scope: ApiScope,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: RequestBody,
}

impl RequestDescriptor {
    /// Describe a request. `path` starts with `/` and is used as given:
    /// reserved characters in path segments must already be encoded.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            scope: ApiScope::Versioned,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Root the path at the base URL instead of `/api/v1`.
    pub fn root(mut self) -> Self {
        self.scope = ApiScope::Root;
        self
    }

    /// Append a query parameter. Repeated keys are kept in order.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append one `key=value` pair per value.
    pub fn query_all<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.query
            .extend(values.into_iter().map(|v| (key.to_string(), v.into())));
        self
    }

    /// Set a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Ask for a JSON response.
    pub fn accept_json(self) -> Self {
        self.header(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        )
    }

    /// Set a JSON body.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::json(body)?;
        Ok(self)
    }

    /// Set a URL-encoded form body with a matching content type.
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(pairs);
        self.header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        )
    }

    /// Set a multipart body.
    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// API scope.
    pub fn scope(&self) -> ApiScope {
        self.scope
    }

    /// Path suffix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Whether the default JSON content type must be left off.
    pub fn suppresses_json_content_type(&self) -> bool {
        match self.body {
            RequestBody::Multipart(_) => true,
            RequestBody::Empty | RequestBody::Json(_) | RequestBody::Form(_) => false,
        }
    }
}

/// A decoded success body.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedResponse<T> {
    /// Parsed JSON body.
    Json(T),
    /// Body of a non-JSON response.
    Text(String),
    /// Raw bytes from a binary download.
    Binary(Bytes),
}

impl<T: DeserializeOwned> DecodedResponse<T> {
    /// Collapse into `T`.
    ///
    /// A text (or binary) body is decoded as a JSON string value, so text
    /// endpoints can be typed as `String`.
    pub fn into_value(self) -> Result<T> {
        match self {
            DecodedResponse::Json(value) => Ok(value),
            DecodedResponse::Text(text) => {
                Ok(serde_json::from_value(serde_json::Value::String(text))?)
            }
            DecodedResponse::Binary(bytes) => Ok(serde_json::from_value(
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            )?),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request construction
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the absolute URL for a descriptor.
pub fn build_url(config: &ClientConfig, descriptor: &RequestDescriptor) -> Result<Url> {
    let prefix = match descriptor.scope {
        ApiScope::Versioned => API_PREFIX,
        ApiScope::Root => "",
    };
    let mut url = Url::parse(&format!(
        "{}{}{}",
        config.base_url(),
        prefix,
        descriptor.path
    ))?;

    if !descriptor.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &descriptor.query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Assemble the outgoing header set.
pub fn build_headers(config: &ClientConfig, descriptor: &RequestDescriptor) -> Result<HeaderMap> {
    let mut headers = descriptor.headers.clone();

    if let Some(api_key) = config.api_key() {
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            sensitive_value(api_key, "API key")?,
        );
    }

    if let Some(token) = config.auth_token() {
        headers.insert(
            AUTHORIZATION,
            sensitive_value(&format!("Bearer {}", token), "auth token")?,
        );
    }

    if !descriptor.suppresses_json_content_type() && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}

fn sensitive_value(value: &str, what: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| Error::InvalidHeader(format!("{} contains invalid characters", what)))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Build the transport request for a descriptor.
pub fn build_request(config: &ClientConfig, descriptor: RequestDescriptor) -> Result<HttpRequest> {
    let url = build_url(config, &descriptor)?;
    let headers = build_headers(config, &descriptor)?;
    Ok(HttpRequest {
        method: descriptor.method,
        url,
        headers,
        body: descriptor.body,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Send a request and decode the response by its content type.
pub async fn dispatch<T: DeserializeOwned>(
    transport: &dyn Transport,
    config: &ClientConfig,
    descriptor: RequestDescriptor,
) -> Result<DecodedResponse<T>> {
    let response = send(transport, config, descriptor).await?;
    decode_response(response)
}

/// Send a request and return the raw body without inspecting its type.
pub async fn dispatch_binary(
    transport: &dyn Transport,
    config: &ClientConfig,
    descriptor: RequestDescriptor,
) -> Result<Bytes> {
    let response = send(transport, config, descriptor).await?;

    if !response.status.is_success() {
        let status = response.status.as_u16();
        tracing::warn!(status, "binary download failed");
        return Err(GatewayError::new(
            format!("Failed to download file: {}", response.status_text()),
            Some(status),
            None,
        )
        .into());
    }

    Ok(response.body)
}

async fn send(
    transport: &dyn Transport,
    config: &ClientConfig,
    descriptor: RequestDescriptor,
) -> Result<HttpResponse> {
    let request = build_request(config, descriptor)?;
    tracing::debug!(method = %request.method, url = %request.url, "dispatching request");

    let response = transport.send(request).await?;
    tracing::debug!(status = response.status.as_u16(), "received response");
    Ok(response)
}

/// Classify a response: normalized error on failure, JSON or text on success.
pub fn decode_response<T: DeserializeOwned>(response: HttpResponse) -> Result<DecodedResponse<T>> {
    if !response.status.is_success() {
        let err = normalize_failure(&response);
        tracing::warn!(status = ?err.status_code, message = %err.message, "request failed");
        return Err(err.into());
    }

    if response.is_json() {
        Ok(DecodedResponse::Json(serde_json::from_slice(&response.body)?))
    } else {
        Ok(DecodedResponse::Text(
            String::from_utf8_lossy(&response.body).into_owned(),
        ))
    }
}

/// Normalize a non-success response.
///
/// The server's `message` wins when the body is a JSON object carrying a
/// non-empty string `message`, whatever the types of its other fields.
/// Otherwise the message is `HTTP <status>: <reason>`. A body that is not a
/// JSON object yields the payload `{ "message": <reason> }`.
pub fn normalize_failure(response: &HttpResponse) -> GatewayError {
    let status = response.status.as_u16();
    let reason = response.status_text();
    let synthesized = || format!("HTTP {}: {}", status, reason);

    match serde_json::from_slice::<serde_json::Value>(&response.body) {
        Ok(serde_json::Value::Object(fields)) => {
            let payload = ErrorPayload::from_fields(fields);
            let message = payload
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(synthesized);
            GatewayError::new(message, Some(status), Some(payload))
        }
        _ => GatewayError::new(
            synthesized(),
            Some(status),
            Some(ErrorPayload::from_message(reason)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, UploadFile};
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    fn config() -> ClientConfig {
        ClientConfig::new("https://api.example.com")
    }

    #[test]
    fn test_versioned_url() {
        let url = build_url(&config(), &RequestDescriptor::post("/search")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/search");
    }

    #[test]
    fn test_root_url() {
        let url = build_url(&config(), &RequestDescriptor::get("/health").root()).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/health");
    }

    #[test]
    fn test_base_url_path_prefix_kept() {
        let config = ClientConfig::new("https://host.example.com/cognee/");
        let url = build_url(&config, &RequestDescriptor::get("/datasets")).unwrap();
        assert_eq!(url.as_str(), "https://host.example.com/cognee/api/v1/datasets");
    }

    #[test]
    fn test_repeated_query_keys() {
        let descriptor =
            RequestDescriptor::get("/datasets/status").query_all("dataset", ["d1", "d2"]);
        let url = build_url(&config(), &descriptor).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v1/datasets/status?dataset=d1&dataset=d2"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::new("not a url");
        let err = build_url(&config, &RequestDescriptor::get("/datasets")).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_both_credentials_attached() {
        let config = config().with_api_key("key-1").with_auth_token("tok-1");
        let headers = build_headers(&config, &RequestDescriptor::get("/datasets")).unwrap();
        assert_eq!(headers[API_KEY_HEADER], "key-1");
        assert_eq!(headers[AUTHORIZATION], "Bearer tok-1");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_no_credentials_without_config() {
        let headers = build_headers(&config(), &RequestDescriptor::get("/datasets")).unwrap();
        assert!(!headers.contains_key(API_KEY_HEADER));
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_json_content_type_defaulted() {
        let descriptor = RequestDescriptor::post("/search")
            .json(&json!({"query": "hello"}))
            .unwrap();
        let headers = build_headers(&config(), &descriptor).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_caller_content_type_kept() {
        let descriptor = RequestDescriptor::post("/auth/login")
            .form(vec![("username".to_string(), "u".to_string())]);
        let headers = build_headers(&config(), &descriptor).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/x-www-form-urlencoded");
    }

    #[test]
    fn test_multipart_has_no_json_content_type() {
        let descriptor = RequestDescriptor::post("/add").multipart(vec![FormPart::file(
            "data",
            UploadFile::new("a.txt", "hello"),
        )]);
        assert!(descriptor.suppresses_json_content_type());
        let headers = build_headers(&config().with_api_key("k"), &descriptor).unwrap();
        assert!(!headers.contains_key(CONTENT_TYPE));
        assert_eq!(headers[API_KEY_HEADER], "k");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let config = config().with_auth_token("bad\ntoken");
        let err = build_headers(&config, &RequestDescriptor::get("/datasets")).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn test_decode_json_success() {
        let response = HttpResponse::json(StatusCode::OK, &json!([{"id": 1}, {"id": 2}]));
        let decoded: DecodedResponse<Value> = decode_response(response).unwrap();
        assert_eq!(decoded, DecodedResponse::Json(json!([{"id": 1}, {"id": 2}])));
    }

    #[test]
    fn test_decode_text_success() {
        let response = HttpResponse::text(StatusCode::OK, "<html></html>");
        let decoded: DecodedResponse<String> = decode_response(response).unwrap();
        assert_eq!(decoded, DecodedResponse::Text("<html></html>".to_string()));
        assert_eq!(decoded.into_value().unwrap(), "<html></html>");
    }

    #[test]
    fn test_malformed_json_success_propagates() {
        let response = HttpResponse::new(StatusCode::OK, "{not json").with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let err = decode_response::<Value>(response).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_failure_uses_server_message() {
        let response = HttpResponse::json(
            StatusCode::NOT_FOUND,
            &json!({"message": "Dataset not found", "name": "EntityNotFoundError"}),
        );
        let err = normalize_failure(&response);
        assert_eq!(err.message, "Dataset not found");
        assert_eq!(err.status_code, Some(404));
        let payload = err.payload.unwrap();
        assert_eq!(payload.name.as_deref(), Some("EntityNotFoundError"));
    }

    #[test]
    fn test_failure_message_survives_mistyped_fields() {
        let response = HttpResponse::json(
            StatusCode::BAD_REQUEST,
            &json!({"message": "Invalid dataset name", "status_code": "400"}),
        );
        let err = normalize_failure(&response);
        assert_eq!(err.message, "Invalid dataset name");
        assert_eq!(err.status_code, Some(400));
        let payload = err.payload.unwrap();
        assert!(payload.status_code.is_none());
        assert_eq!(payload.extra["status_code"], "400");

        let response = HttpResponse::json(
            StatusCode::CONFLICT,
            &json!({"message": "Dataset is locked", "name": {"cls": "LockError"}}),
        );
        let err = normalize_failure(&response);
        assert_eq!(err.message, "Dataset is locked");
        assert_eq!(err.payload.unwrap().extra["name"]["cls"], "LockError");
    }

    #[test]
    fn test_failure_non_string_message_synthesized() {
        let response = HttpResponse::json(StatusCode::BAD_REQUEST, &json!({"message": ["a", "b"]}));
        let err = normalize_failure(&response);
        assert_eq!(err.message, "HTTP 400: Bad Request");
        assert_eq!(err.payload.unwrap().extra["message"], json!(["a", "b"]));
    }

    #[test]
    fn test_failure_empty_body_synthesizes_message() {
        let response = HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "");
        let err = normalize_failure(&response);
        assert_eq!(err.message, "HTTP 500: Internal Server Error");
        assert_eq!(err.status_code, Some(500));
        assert_eq!(
            err.payload,
            Some(ErrorPayload::from_message("Internal Server Error"))
        );
    }

    #[test]
    fn test_failure_non_json_body() {
        let response = HttpResponse::text(StatusCode::BAD_GATEWAY, "<h1>bad gateway</h1>");
        let err = normalize_failure(&response);
        assert_eq!(err.message, "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_failure_json_without_message() {
        let response = HttpResponse::json(
            StatusCode::UNPROCESSABLE_ENTITY,
            &json!({"detail": "field required"}),
        );
        let err = normalize_failure(&response);
        assert_eq!(err.message, "HTTP 422: Unprocessable Entity");
        assert_eq!(err.payload.unwrap().extra["detail"], "field required");
    }

    #[tokio::test]
    async fn test_dispatch_records_single_request() {
        let mock = MockTransport::with_response(HttpResponse::json(StatusCode::OK, &json!([])));
        let descriptor = RequestDescriptor::post("/search")
            .json(&json!({"query": "hello"}))
            .unwrap();

        let decoded: DecodedResponse<Value> = dispatch(&mock, &config(), descriptor).await.unwrap();
        assert_eq!(decoded, DecodedResponse::Json(json!([])));

        let request = mock.last_request().unwrap();
        assert_eq!(mock.request_count(), 1);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "https://api.example.com/api/v1/search");
        assert_eq!(request.body, RequestBody::Json(json!({"query": "hello"})));
    }

    #[tokio::test]
    async fn test_dispatch_failure_not_retried() {
        let mock = MockTransport::new(vec![
            HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE, ""),
            HttpResponse::json(StatusCode::OK, &json!({})),
        ]);
        let err = dispatch::<Value>(&mock, &config(), RequestDescriptor::get("/settings"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_transport_error() {
        let mock = MockTransport::default();
        mock.push_failure("connection refused");
        let err = dispatch::<Value>(&mock, &config(), RequestDescriptor::get("/datasets"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn test_binary_ignores_json_content_type() {
        let mock = MockTransport::with_response(
            HttpResponse::new(StatusCode::OK, "{not json")
                .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json")),
        );
        let descriptor = RequestDescriptor::get("/datasets/a/data/b/raw");
        let bytes = dispatch_binary(&mock, &config(), descriptor).await.unwrap();
        assert_eq!(&bytes[..], b"{not json");
    }

    #[tokio::test]
    async fn test_binary_failure_has_no_payload() {
        let mock = MockTransport::with_response(HttpResponse::json(
            StatusCode::NOT_FOUND,
            &json!({"message": "gone"}),
        ));
        let descriptor = RequestDescriptor::get("/datasets/a/data/b/raw");
        let err = dispatch_binary(&mock, &config(), descriptor)
            .await
            .unwrap_err();
        let gateway = err.as_gateway().unwrap();
        assert_eq!(gateway.message, "Failed to download file: Not Found");
        assert_eq!(gateway.status_code, Some(404));
        assert!(gateway.payload.is_none());
    }
}
