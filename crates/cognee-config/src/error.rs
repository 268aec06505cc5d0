//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors from loading, saving or resolving connection profiles.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write config file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    ParseYaml(String),

    #[error("context '{0}' not found")]
    ContextNotFound(String),

    /// `current-context` is unset.
    #[error("no current context selected")]
    NoCurrentContext,

    #[error("{0}")]
    Other(String),
}
