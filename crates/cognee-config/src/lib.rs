//! Connection profiles for Cognee clients.
//!
//! Kubeconfig-style YAML file with:
//! - Named connection contexts (server + auth)
//! - `current-context` for default selection
//! - API key or bearer token credentials, read from a file or an env var

pub mod client;
pub mod error;

pub use client::{
    AuthConfig, ClientConfig, Context, ResolvedContext, client_config_path, config_dir, expand_path,
    load_client_config, load_client_config_from, save_client_config, save_client_config_to,
};
pub use error::{ConfigError, Result};
