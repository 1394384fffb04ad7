use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::error::HandshakeError;

/// Outbound `{request: "sessionId"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub request: String,
}

impl SessionRequest {
    pub fn session_id() -> Self {
        Self {
            request: "sessionId".to_string(),
        }
    }
}

/// Inbound `{data: {sessionId}}`. Anything else reads as an empty message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub data: Option<SessionPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionPayload {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

impl InboundMessage {
    pub fn with_session(session_id: impl Into<String>) -> Self {
        Self {
            data: Some(SessionPayload {
                session_id: Some(session_id.into()),
            }),
        }
    }

    pub fn into_session_id(self) -> Option<String> {
        self.data
            .and_then(|d| d.session_id)
            .filter(|id| !id.is_empty())
    }
}

/// Message channel to the trusted context that owns the session.
pub trait MessagePort: Send {
    /// Open the context; resolves once it signals ready.
    fn load(&mut self) -> impl Future<Output = Result<(), HandshakeError>> + Send;

    fn post(&mut self, message: &SessionRequest) -> impl Future<Output = Result<(), HandshakeError>> + Send;

    /// Next inbound message.
    fn recv(&mut self) -> impl Future<Output = Result<InboundMessage, HandshakeError>> + Send;

    /// Stop listening and release the context.
    fn detach(&mut self) -> impl Future<Output = ()> + Send;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// [`MessagePort`] over a WebSocket bridge. The connection opening is the
/// ready signal and text frames carry the JSON messages.
pub struct WsPort {
    url: String,
    stream: Option<WsStream>,
}

impl WsPort {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            stream: None,
        }
    }
}

impl MessagePort for WsPort {
    async fn load(&mut self) -> Result<(), HandshakeError> {
        debug!("[bridge] Connecting to {}", self.url);
        let (ws_stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| HandshakeError::Load(e.to_string()))?;
        self.stream = Some(ws_stream);
        debug!("[bridge] Connected");
        Ok(())
    }

    async fn post(&mut self, message: &SessionRequest) -> Result<(), HandshakeError> {
        let stream = self.stream.as_mut().ok_or(HandshakeError::Closed)?;
        let text = serde_json::to_string(message).map_err(|e| HandshakeError::Post(e.to_string()))?;
        stream
            .send(tungstenite::Message::Text(text))
            .await
            .map_err(|e| HandshakeError::Post(e.to_string()))
    }

    async fn recv(&mut self) -> Result<InboundMessage, HandshakeError> {
        let stream = self.stream.as_mut().ok_or(HandshakeError::Closed)?;
        while let Some(msg) = stream.next().await {
            match msg {
                Ok(tungstenite::Message::Text(text)) => {
                    let mut bytes = text.into_bytes();
                    return Ok(simd_json::from_slice::<InboundMessage>(&mut bytes).unwrap_or_default());
                }
                Ok(tungstenite::Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("[bridge] Error: {}", e);
                    break;
                }
            }
        }
        Err(HandshakeError::Closed)
    }

    async fn detach(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.close(None).await {
                debug!("[bridge] Close failed: {}", e);
            }
        }
    }
}
