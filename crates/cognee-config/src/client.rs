//! Connection profiles for Cognee servers.
//!
//! Kubeconfig-style file with named contexts:
//!
//! ```yaml
//! api-version: v1
//! kind: ClientConfig
//!
//! current-context: local
//!
//! contexts:
//!   - name: local
//!     server: http://localhost:8000
//!   - name: prod
//!     server: https://cognee.example.com
//!     auth:
//!       type: api-key
//!       key-env: COGNEE_API_KEY
//!   - name: ci
//!     server: https://cognee.internal
//!     auth:
//!       type: bearer
//!       token-file: ~/.config/cognee/ci.token
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// API version for the profile file format.
pub const API_VERSION: &str = "v1";

/// Kind identifier for profile files.
pub const KIND: &str = "ClientConfig";

/// Overrides the directory holding `client.yaml`.
pub const CONFIG_DIR_ENV: &str = "COGNEE_CONFIG_DIR";

const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Root of the profile file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    /// Name of the default context.
    #[serde(default)]
    pub current_context: Option<String>,

    /// Named connection contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ClientConfig {
    /// Create an empty profile file.
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            ..Default::default()
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// The current context, if set and present.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_ref()
            .and_then(|name| self.get_context(name))
    }

    /// Resolve the current context's server and credentials.
    pub fn resolve_current(&self) -> Result<ResolvedContext> {
        let name = self
            .current_context
            .as_deref()
            .ok_or(ConfigError::NoCurrentContext)?;
        self.get_context(name)
            .ok_or_else(|| ConfigError::ContextNotFound(name.to_string()))?
            .resolve()
    }

    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn get_context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add a context, replacing one with the same name.
    pub fn set_context(&mut self, context: Context) {
        if let Some(existing) = self.get_context_mut(&context.name) {
            *existing = context;
        } else {
            self.contexts.push(context);
        }
    }

    /// Remove a context by name. Clears `current-context` if it pointed there.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        let pos = self.contexts.iter().position(|c| c.name == name)?;
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Some(self.contexts.remove(pos))
    }

    /// Make a context current. Fails if it doesn't exist.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.get_context(name).is_none() {
            return Err(ConfigError::ContextNotFound(name.to_string()));
        }
        self.current_context = Some(name.to_string());
        Ok(())
    }

    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A named connection context (server + auth bundle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    pub name: String,

    /// Server base URL, e.g. `http://localhost:8000`.
    pub server: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    /// Request timeout override (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Context {
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            auth: None,
            timeout: None,
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read this context's credential and pair it with the server URL.
    pub fn resolve(&self) -> Result<ResolvedContext> {
        let mut resolved = ResolvedContext {
            server: self.server.clone(),
            api_key: None,
            auth_token: None,
        };
        match &self.auth {
            Some(auth @ AuthConfig::ApiKey { .. }) => resolved.api_key = auth.resolve()?,
            Some(auth @ AuthConfig::Bearer { .. }) => resolved.auth_token = auth.resolve()?,
            Some(AuthConfig::None) | None => {}
        }
        Ok(resolved)
    }
}

/// Server URL plus whichever credential the context resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub server: String,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication configuration for a context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuthConfig {
    None,

    /// Sent as `X-Api-Key`.
    #[serde(rename_all = "kebab-case")]
    ApiKey {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_file: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_env: Option<String>,
    },

    /// Sent as `Authorization: Bearer`.
    #[serde(rename_all = "kebab-case")]
    Bearer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_file: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_env: Option<String>,
    },
}

impl AuthConfig {
    pub fn api_key_file(path: impl Into<PathBuf>) -> Self {
        Self::ApiKey {
            key_file: Some(path.into()),
            key_env: None,
        }
    }

    pub fn api_key_env(var: impl Into<String>) -> Self {
        Self::ApiKey {
            key_file: None,
            key_env: Some(var.into()),
        }
    }

    pub fn bearer_file(path: impl Into<PathBuf>) -> Self {
        Self::Bearer {
            token_file: Some(path.into()),
            token_env: None,
        }
    }

    pub fn bearer_env(var: impl Into<String>) -> Self {
        Self::Bearer {
            token_file: None,
            token_env: Some(var.into()),
        }
    }

    /// Resolve the credential value.
    ///
    /// The file wins over the environment variable when both are set and the
    /// file exists. Values from either source are trimmed, and a blank
    /// environment variable counts as unset.
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            AuthConfig::None => Ok(None),
            AuthConfig::ApiKey { key_file, key_env } => {
                read_secret(key_file.as_deref(), key_env.as_deref())
            }
            AuthConfig::Bearer {
                token_file,
                token_env,
            } => read_secret(token_file.as_deref(), token_env.as_deref()),
        }
    }
}

fn read_secret(file: Option<&Path>, env: Option<&str>) -> Result<Option<String>> {
    if let Some(path) = file {
        let expanded = expand_path(path);
        if expanded.exists() {
            let secret = std::fs::read_to_string(&expanded).map_err(|e| ConfigError::ReadFile {
                path: expanded.display().to_string(),
                source: e,
            })?;
            return Ok(Some(secret.trim().to_string()));
        }
    }
    if let Some(var) = env
        && let Ok(secret) = std::env::var(var)
    {
        let secret = secret.trim();
        if !secret.is_empty() {
            return Ok(Some(secret.to_string()));
        }
    }
    Ok(None)
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading / Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Directory holding the profile file.
///
/// `$COGNEE_CONFIG_DIR` if set, otherwise `<platform config dir>/cognee`.
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|d| d.join("cognee")),
    }
}

/// Path to the profile file.
pub fn client_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}

/// Load the profile file. A missing file yields an empty config.
pub fn load_client_config() -> Result<ClientConfig> {
    load_client_config_from(client_config_path().as_deref())
}

/// Load the profile file from a specific path.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::new());
    };

    if !path.exists() {
        return Ok(ClientConfig::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    ClientConfig::from_yaml(&contents)
}

/// Save the profile file.
pub fn save_client_config(config: &ClientConfig) -> Result<()> {
    let path = client_config_path()
        .ok_or_else(|| ConfigError::Other("could not determine config directory".to_string()))?;
    save_client_config_to(config, &path)
}

/// Save the profile file to a specific path, creating parent directories.
pub fn save_client_config_to(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_yaml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/"))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
