use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::{ApiClient, EventsPayload};
use crate::clock::Clock;
use crate::error::ApiError;
use crate::store::{CacheEntry, TtlStore, EVENTS_KEY};

use super::normalize::{normalize_events, StreamGate};
use super::record::EventRecord;

/// Serves normalized events from the store while fresh, refetching once
/// they expire.
pub struct EventCache {
    client: ApiClient,
    store: TtlStore,
    clock: Arc<dyn Clock>,
    events_url: String,
    ttl: Duration,
    gate: StreamGate,
}

impl EventCache {
    pub fn new(
        client: ApiClient,
        store: TtlStore,
        clock: Arc<dyn Clock>,
        events_url: impl Into<String>,
        ttl: Duration,
        gate: StreamGate,
    ) -> Self {
        Self {
            client,
            store,
            clock,
            events_url: events_url.into(),
            ttl,
            gate,
        }
    }

    /// Cached records if fresh, otherwise fetch, normalize and store.
    ///
    /// On failure the stored entry is left alone and an expired entry is
    /// not served in its place.
    pub async fn fetch_events(&self) -> Result<Vec<EventRecord>, ApiError> {
        if let Some(entry) = self.store.read::<Vec<EventRecord>>(EVENTS_KEY) {
            let now = self.clock.now_ms();
            if entry.is_fresh(now) {
                debug!("Serving {} cached events ({}ms left)", entry.items.len(), entry.expiry.saturating_sub(now));
                return Ok(entry.items);
            }
            debug!("Cached events expired {}ms ago", now.saturating_sub(entry.expiry));
        }

        let payload: EventsPayload = self.client.get(&self.events_url).await?;
        let records = normalize_events(&payload.items, self.gate);
        info!("Fetched {} events, {} with live channels", payload.items.len(), records.len());

        let entry = CacheEntry::new(records, self.clock.now_ms(), self.ttl);
        self.store.write(EVENTS_KEY, &entry);

        Ok(entry.items)
    }
}
