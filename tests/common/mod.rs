//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use serde_json::{json, Value};
use stream_odds::error::HandshakeError;
use stream_odds::session::{InboundMessage, MessagePort, SessionRequest};

pub const EVENTS_PATH: &str = "/apiv2/events/current=1";
pub const PENDING_PATH: &str = "/apiv2/bets/pending";

/// The single-event payload used across scenarios.
pub fn faker_event() -> Value {
    json!({
        "eid": 7,
        "name": "A vs B",
        "state": 1,
        "streams": [{"stream_type": "stream_twitch", "is_live": true, "video_html": "?channel=Faker"}],
        "markets": [{"team_name": "A", "odd": 1.5}, {"team_name": "B", "odd": 2.1}],
    })
}

pub fn ok_envelope(data: Value) -> Value {
    json!({ "error": false, "data": data })
}

/// Trusted context that answers with one scripted message.
pub struct ReplyPort {
    reply: Option<InboundMessage>,
}

impl ReplyPort {
    pub fn session(id: &str) -> Self {
        Self {
            reply: Some(InboundMessage::with_session(id)),
        }
    }

    pub fn silent() -> Self {
        Self { reply: None }
    }
}

impl MessagePort for ReplyPort {
    async fn load(&mut self) -> Result<(), HandshakeError> {
        Ok(())
    }

    async fn post(&mut self, _message: &SessionRequest) -> Result<(), HandshakeError> {
        Ok(())
    }

    async fn recv(&mut self) -> Result<InboundMessage, HandshakeError> {
        self.reply.take().ok_or(HandshakeError::Closed)
    }

    async fn detach(&mut self) {}
}

/// Trusted context that loads but never answers.
pub struct HangingPort;

impl MessagePort for HangingPort {
    async fn load(&mut self) -> Result<(), HandshakeError> {
        Ok(())
    }

    async fn post(&mut self, _message: &SessionRequest) -> Result<(), HandshakeError> {
        Ok(())
    }

    async fn recv(&mut self) -> Result<InboundMessage, HandshakeError> {
        std::future::pending().await
    }

    async fn detach(&mut self) {}
}
