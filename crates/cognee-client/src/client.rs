//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::api::{
    AuthApi, CognifyApi, DatasetsApi, HealthApi, IngestApi, NotebooksApi, PermissionsApi,
    ResponsesApi, SearchApi, SettingsApi, SyncApi, UsersApi,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::gateway::{self, DecodedResponse, RequestDescriptor};
use crate::transport::{ReqwestTransport, Transport};

/// Cognee API client.
///
/// Cheap to clone; clones share the configuration and transport. Calls
/// carry no state between them, so any number may run concurrently.
///
/// # Example
///
/// ```no_run
/// use cognee_client::CogneeClient;
///
/// # async fn example() -> cognee_client::Result<()> {
/// let client = CogneeClient::builder()
///     .base_url("http://localhost:8000")
///     .api_key("secret")
///     .build()?;
///
/// let datasets = client.datasets().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CogneeClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for CogneeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CogneeClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl CogneeClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a config using the default transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Create a client with default settings pointing to localhost.
    pub fn localhost() -> Result<Self> {
        Self::builder().base_url("http://127.0.0.1:8000").build()
    }

    /// Create a client from `COGNEE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client for the current context of the profile file.
    pub fn from_current_context() -> Result<Self> {
        let profiles =
            cognee_config::load_client_config().map_err(|e| Error::Config(e.to_string()))?;
        let context = profiles
            .current()
            .ok_or_else(|| Error::Config("no current context configured".to_string()))?;

        let mut builder = ClientBuilder::new().config(ClientConfig::from_context(context)?);
        if let Some(secs) = context.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// Get the connection settings.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the ingestion API.
    pub fn ingest(&self) -> IngestApi {
        IngestApi::new(self.clone())
    }

    /// Access the cognify/memify/code pipeline API.
    pub fn cognify(&self) -> CognifyApi {
        CognifyApi::new(self.clone())
    }

    /// Access the datasets API.
    pub fn datasets(&self) -> DatasetsApi {
        DatasetsApi::new(self.clone())
    }

    /// Access the search API.
    pub fn search(&self) -> SearchApi {
        SearchApi::new(self.clone())
    }

    /// Access the settings API.
    pub fn settings(&self) -> SettingsApi {
        SettingsApi::new(self.clone())
    }

    /// Access the sync API.
    pub fn sync(&self) -> SyncApi {
        SyncApi::new(self.clone())
    }

    /// Access the permissions API.
    pub fn permissions(&self) -> PermissionsApi {
        PermissionsApi::new(self.clone())
    }

    /// Access the notebooks API.
    pub fn notebooks(&self) -> NotebooksApi {
        NotebooksApi::new(self.clone())
    }

    /// Access the OpenAI-compatible responses API.
    pub fn responses(&self) -> ResponsesApi {
        ResponsesApi::new(self.clone())
    }

    /// Access the health API.
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Send an arbitrary request through the gateway.
    pub async fn dispatch<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<DecodedResponse<T>> {
        gateway::dispatch(
            self.inner.transport.as_ref(),
            &self.inner.config,
            descriptor,
        )
        .await
    }

    /// Send a request and return the raw response body.
    pub async fn dispatch_binary(&self, descriptor: RequestDescriptor) -> Result<Bytes> {
        gateway::dispatch_binary(
            self.inner.transport.as_ref(),
            &self.inner.config,
            descriptor,
        )
        .await
    }

    /// Send a request and decode the success body as `T`.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T> {
        self.dispatch(descriptor).await?.into_value()
    }

    /// Send a request whose success body carries nothing of interest.
    pub(crate) async fn send_empty(&self, descriptor: RequestDescriptor) -> Result<()> {
        self.dispatch::<IgnoredAny>(descriptor).await.map(|_| ())
    }
}

/// Builder for creating a CogneeClient.
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    auth_token: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    cookie_jar: Option<Arc<reqwest::cookie::Jar>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL and credentials from a config value.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.base_url = Some(config.base_url().to_string());
        self.api_key = config.api_key().map(str::to_string);
        self.auth_token = config.auth_token().map(str::to_string);
        self
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key (`X-Api-Key`).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the bearer token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Use a custom transport. Transport options on this builder are then
    /// ignored.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Share a cookie jar with the default transport.
    pub fn cookie_jar(mut self, jar: Arc<reqwest::cookie::Jar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Bound every request made by the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CogneeClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        let mut config = ClientConfig::new(base_url);
        url::Url::parse(config.base_url())?;
        if let Some(key) = self.api_key {
            config = config.with_api_key(key);
        }
        if let Some(token) = self.auth_token {
            config = config.with_auth_token(token);
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = ReqwestTransport::builder();
                if let Some(jar) = self.cookie_jar {
                    builder = builder.cookie_jar(jar);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(agent) = self.user_agent {
                    builder = builder.user_agent(agent);
                }
                Arc::new(builder.build()?)
            }
        };

        Ok(CogneeClient {
            inner: Arc::new(ClientInner { config, transport }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpResponse, MockTransport};
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = ClientBuilder::new().base_url("::not a url::").build();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000/")
            .build()
            .unwrap();

        assert_eq!(client.config().base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_builder_from_config() {
        let config = ClientConfig::new("http://localhost:8000")
            .with_api_key("k")
            .with_auth_token("t");
        let client = CogneeClient::new(config.clone()).unwrap();
        assert_eq!(client.config(), &config);
    }

    #[tokio::test]
    async fn test_send_empty_ignores_body() {
        let mock = Arc::new(MockTransport::new(vec![
            HttpResponse::json(StatusCode::OK, &json!({"anything": [1, 2, 3]})),
            HttpResponse::text(StatusCode::OK, "ok"),
        ]));
        let client = CogneeClient::builder()
            .base_url("http://localhost:8000")
            .transport(mock.clone())
            .build()
            .unwrap();

        client
            .send_empty(RequestDescriptor::post("/auth/logout"))
            .await
            .unwrap();
        client
            .send_empty(RequestDescriptor::post("/auth/logout"))
            .await
            .unwrap();
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_transport() {
        let mock = Arc::new(MockTransport::new(vec![
            HttpResponse::json(StatusCode::OK, &json!([])),
            HttpResponse::json(StatusCode::OK, &json!([])),
        ]));
        let client = CogneeClient::builder()
            .base_url("http://localhost:8000")
            .transport(mock.clone())
            .build()
            .unwrap();
        let other = client.clone();

        let (a, b) = tokio::join!(
            client.send::<Vec<serde_json::Value>>(RequestDescriptor::get("/datasets")),
            other.send::<Vec<serde_json::Value>>(RequestDescriptor::get("/datasets")),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(mock.request_count(), 2);
    }
}
