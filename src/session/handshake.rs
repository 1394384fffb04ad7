use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::HandshakeError;
use crate::store::{CacheEntry, TtlStore, SESSION_KEY};

use super::port::{MessagePort, SessionRequest};

/// Where a handshake currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    AwaitingLoad,
    AwaitingMessage,
    Resolved(Result<(), HandshakeError>),
}

/// Obtains the session id from the trusted context, caching it for `ttl`.
pub struct SessionHandshake {
    store: TtlStore,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Mutex<HandshakeState>,
}

impl SessionHandshake {
    pub fn new(store: TtlStore, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            state: Mutex::new(HandshakeState::Idle),
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(HandshakeState::Idle)
    }

    fn enter(&self, next: HandshakeState) {
        debug!("Handshake -> {:?}", next);
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    /// Cached session id if fresh, otherwise run the exchange over `port`.
    ///
    /// The port is only touched when the cache misses, and is always
    /// detached once the exchange resolves either way.
    pub async fn get_session_id<P: MessagePort>(&self, mut port: P) -> Result<String, HandshakeError> {
        if let Some(session_id) = self
            .store
            .read::<String>(SESSION_KEY)
            .and_then(|entry| entry.into_fresh(self.clock.now_ms()))
        {
            debug!("Using cached session");
            self.enter(HandshakeState::Resolved(Ok(())));
            return Ok(session_id);
        }

        let result = self.exchange(&mut port).await;
        port.detach().await;

        match &result {
            Ok(session_id) => {
                let entry = CacheEntry::new(session_id.clone(), self.clock.now_ms(), self.ttl);
                self.store.write(SESSION_KEY, &entry);
                info!("Session acquired");
                self.enter(HandshakeState::Resolved(Ok(())));
            }
            Err(e) => {
                warn!("Session handshake failed: {}", e);
                self.enter(HandshakeState::Resolved(Err(e.clone())));
            }
        }
        result
    }

    async fn exchange<P: MessagePort>(&self, port: &mut P) -> Result<String, HandshakeError> {
        self.enter(HandshakeState::AwaitingLoad);
        port.load().await?;

        port.post(&SessionRequest::session_id()).await?;
        self.enter(HandshakeState::AwaitingMessage);

        let message = port.recv().await?;
        message.into_session_id().ok_or(HandshakeError::NoPayload)
    }
}
