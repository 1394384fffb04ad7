//! Popup open: both flows at once, then match the tab.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::ApiError;
use crate::events::{match_tab, EventCache, MatchOutcome, NoData, TieBreak};
use crate::render::EventView;
use crate::session::{MessagePort, PendingBets, SessionHandshake};
use crate::store::{KvStore, TtlStore};

/// What the popup ends up showing.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupView {
    Event(EventView),
    NoData(NoData),
    /// Visible error notice; the popup stays usable.
    Notice(String),
}

pub struct Popup {
    events: EventCache,
    handshake: SessionHandshake,
    pending: PendingBets,
    site_url: String,
    tie_break: TieBreak,
}

impl Popup {
    pub fn new(config: &Config, store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        let client = ApiClient::new();
        let store = TtlStore::new(store);

        Self {
            events: EventCache::new(
                client.clone(),
                store.clone(),
                clock.clone(),
                config.api.events_url.clone(),
                config.cache.events_ttl(),
                config.matching.stream_gate,
            ),
            handshake: SessionHandshake::new(store.clone(), clock.clone(), config.cache.session_ttl()),
            pending: PendingBets::new(
                client,
                store,
                clock,
                config.api.pending_url.clone(),
                config.cache.pending_ttl(),
            ),
            site_url: config.api.site_url.clone(),
            tie_break: config.matching.tie_break,
        }
    }

    pub fn handshake(&self) -> &SessionHandshake {
        &self.handshake
    }

    /// Run the session flow and the event flow concurrently. Only the event
    /// flow decides the view, and `render` gets it as soon as it is known,
    /// without waiting on the session. Session problems are logged.
    pub async fn open<P, F>(&self, tab_url: Option<&str>, port: P, render: F) -> PopupView
    where
        P: MessagePort,
        F: FnOnce(&PopupView),
    {
        let events = async {
            let view = self.event_flow(tab_url).await;
            render(&view);
            view
        };
        let (_, view) = tokio::join!(self.session_flow(port), events);
        view
    }

    async fn session_flow<P: MessagePort>(&self, port: P) {
        let session_id = match self.handshake.get_session_id(port).await {
            Ok(id) => id,
            Err(e) => {
                warn!("No session: {}", e);
                return;
            }
        };

        match self.pending.fetch(&session_id).await {
            Ok(items) => info!("{} pending bets", items.len()),
            Err(e) => warn!("Pending bets unavailable: {}", e),
        }
    }

    async fn event_flow(&self, tab_url: Option<&str>) -> PopupView {
        let records = match self.events.fetch_events().await {
            Ok(records) => records,
            Err(e) => return notice(&e),
        };

        match match_tab(tab_url, &records, self.tie_break) {
            MatchOutcome::Found(record) => {
                info!("Tab matches event {}", record.id);
                PopupView::Event(EventView::from_record(record, &self.site_url))
            }
            MatchOutcome::NoData(reason) => {
                info!("No data: {:?}", reason);
                PopupView::NoData(reason)
            }
        }
    }
}

fn notice(e: &ApiError) -> PopupView {
    error!("Failed to load events: {}", e);
    let message = match e.envelope() {
        Some(envelope) => envelope.to_string(),
        None => e.to_string(),
    };
    PopupView::Notice(message)
}
