use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The `error: true` envelope as the API sent it, or one synthesized for a
/// body that could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub msg_trans: Option<String>,
}

impl ErrorEnvelope {
    pub fn malformed(reason: impl fmt::Display) -> Self {
        Self {
            error: true,
            data: None,
            msg_trans: Some(format!("malformed response: {}", reason)),
        }
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.msg_trans {
            Some(msg) => f.write_str(msg),
            None => f.write_str("request failed"),
        }
    }
}

/// Failure of a remote data request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api error: {0}")]
    Api(ErrorEnvelope),
}

impl ApiError {
    /// The envelope for API and decode failures.
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            ApiError::Api(envelope) => Some(envelope),
            ApiError::Transport(_) => None,
        }
    }
}

/// Failure of the session handshake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("trusted context failed to load: {0}")]
    Load(String),

    #[error("failed to post session request: {0}")]
    Post(String),

    #[error("trusted context closed before replying")]
    Closed,

    #[error("reply carried no session id")]
    NoPayload,
}
