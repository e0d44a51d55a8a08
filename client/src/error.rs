use std::path::PathBuf;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-success response. `message` is the server's `error` field when
    /// it sent one.
    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },

    #[error("invalid host `{0}`: expected an http:// or https:// URL")]
    InvalidHost(String),

    #[error("could not access session file {}: {source}", path.display())]
    Session {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("no home directory to keep the session in; pass --session-file")]
    NoHome,

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}
