//! Error types for jobswarm.

/// Top-level error type for the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the hosting-platform REST client.
///
/// Non-2xx responses are wrapped with status code and response body so callers
/// can log the upstream failure verbatim.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("GitHub API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Action execution errors.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Failed to spawn command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Command exited with status {code:?}: {output}")]
    CommandFailed { code: Option<i32>, output: String },

    #[error("Invalid webhook method: {0}")]
    InvalidMethod(String),

    #[error("Webhook request to {url} failed: {reason}")]
    WebhookRequest { url: String, reason: String },

    #[error("Webhook {method} {url} returned {status}")]
    WebhookStatus {
        method: String,
        url: String,
        status: u16,
    },

    #[error("Job dispatch failed: {0}")]
    Dispatch(#[from] GitHubError),
}

/// Result type alias for the orchestrator.
pub type Result<T> = std::result::Result<T, Error>;
