//! Connection settings shared by every request.

use std::fmt;

use cognee_config::{Context, ResolvedContext};

use crate::error::{Error, Result};

/// Environment variable holding the server base URL.
pub const BASE_URL_ENV: &str = "COGNEE_BASE_URL";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "COGNEE_API_KEY";

/// Environment variable holding the bearer token.
pub const AUTH_TOKEN_ENV: &str = "COGNEE_AUTH_TOKEN";

/// Immutable connection settings.
///
/// `api_key` is sent as `X-Api-Key` and `auth_token` as a bearer
/// `Authorization` header. Either, both or neither may be set.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_key: Option<String>,
    auth_token: Option<String>,
}

impl ClientConfig {
    /// Create a config for a server. A trailing slash is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            auth_token: None,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Read `COGNEE_BASE_URL`, `COGNEE_API_KEY` and `COGNEE_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = non_empty_env(BASE_URL_ENV)
            .ok_or_else(|| Error::Config(format!("{} is not set", BASE_URL_ENV)))?;

        let mut config = Self::new(base_url);
        config.api_key = non_empty_env(API_KEY_ENV);
        config.auth_token = non_empty_env(AUTH_TOKEN_ENV);
        Ok(config)
    }

    /// Build a config from a profile context, resolving its credential.
    pub fn from_context(context: &Context) -> Result<Self> {
        let resolved = context
            .resolve()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(resolved.into())
    }

    /// Server base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API key, if configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Bearer token, if configured.
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

impl From<ResolvedContext> for ClientConfig {
    fn from(resolved: ResolvedContext) -> Self {
        let mut config = Self::new(resolved.server);
        config.api_key = resolved.api_key;
        config.auth_token = resolved.auth_token;
        config
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}
