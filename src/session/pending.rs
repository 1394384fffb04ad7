use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::api::{ApiClient, PendingItem, PendingPayload, PendingRequest};
use crate::clock::Clock;
use crate::error::{ApiError, ErrorEnvelope};
use crate::store::{CacheEntry, TtlStore, PENDING_KEY};

/// Bets as stored under the `"pending"` key, tagged with the session that
/// fetched them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSnapshot {
    pub session_id: String,
    pub items: Vec<PendingItem>,
}

/// The viewer's open bets, fetched with a session id.
pub struct PendingBets {
    client: ApiClient,
    store: TtlStore,
    clock: Arc<dyn Clock>,
    pending_url: String,
    ttl: Duration,
}

impl PendingBets {
    pub fn new(
        client: ApiClient,
        store: TtlStore,
        clock: Arc<dyn Clock>,
        pending_url: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            store,
            clock,
            pending_url: pending_url.into(),
            ttl,
        }
    }

    /// Cached bets if fresh and fetched for this same session, otherwise
    /// POST the session id and store the result.
    pub async fn fetch(&self, session_id: &str) -> Result<Vec<PendingItem>, ApiError> {
        if let Some(snapshot) = self
            .store
            .read::<PendingSnapshot>(PENDING_KEY)
            .and_then(|entry| entry.into_fresh(self.clock.now_ms()))
        {
            if snapshot.session_id == session_id {
                debug!("Serving {} cached pending bets", snapshot.items.len());
                return Ok(snapshot.items);
            }
            debug!("Cached pending bets belong to another session");
        }

        let body = serde_json::to_value(PendingRequest { session_id })
            .map_err(|e| ApiError::Api(ErrorEnvelope::malformed(e)))?;
        let payload: PendingPayload = self.client.post(&self.pending_url, body).await?;

        let snapshot = PendingSnapshot {
            session_id: session_id.to_string(),
            items: payload.items,
        };
        let entry = CacheEntry::new(snapshot, self.clock.now_ms(), self.ttl);
        self.store.write(PENDING_KEY, &entry);
        Ok(entry.items.items)
    }
}
