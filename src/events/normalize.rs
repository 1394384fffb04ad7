use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::api::{RawEvent, RawStream};

use super::record::{EventRecord, Team};

/// Events with a state above this are closed.
const MAX_OPEN_STATE: i64 = 3;

const TWITCH_STREAM_TYPE: &str = "stream_twitch";

static CHANNEL_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\?channel=([A-Za-z0-9_]+)").expect("static regex")
});

/// Which streams decide whether an event is kept.
///
/// `FirstStream` is how the live popup has always behaved: only the first
/// stream has to be a live twitch stream, later ones are not consulted.
/// `AnyStream` keeps the event if any stream qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamGate {
    #[default]
    FirstStream,
    AnyStream,
}

/// Channel name for a live twitch stream, `None` for anything else.
fn stream_channel(stream: &RawStream) -> Option<String> {
    if stream.stream_type.as_deref() != Some(TWITCH_STREAM_TYPE) || stream.is_live != Some(true) {
        return None;
    }
    let html = stream.video_html.as_deref()?;
    CHANNEL_PARAM
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Turn one raw event into a record, or drop it.
pub fn normalize_event(raw: &RawEvent, gate: StreamGate) -> Option<EventRecord> {
    if raw.streams.is_empty() || raw.state > MAX_OPEN_STATE {
        return None;
    }

    let mapped: Vec<Option<String>> = raw.streams.iter().map(stream_channel).collect();

    let admitted = match gate {
        StreamGate::FirstStream => mapped[0].is_some(),
        StreamGate::AnyStream => mapped.iter().any(Option::is_some),
    };
    if !admitted {
        debug!("Dropping event {}: no qualifying stream", raw.eid);
        return None;
    }

    let [a, b] = match raw.markets.as_slice() {
        [a, b, ..] => [a, b],
        _ => {
            debug!("Dropping event {}: {} markets", raw.eid, raw.markets.len());
            return None;
        }
    };

    Some(EventRecord {
        id: raw.eid.clone(),
        teams: [
            Team { name: a.team_name.clone(), odds: a.odd.clone() },
            Team { name: b.team_name.clone(), odds: b.odd.clone() },
        ],
        channels: mapped.into_iter().flatten().collect(),
        name: raw.name.clone(),
    })
}

/// Normalize a whole payload, keeping input order. Items that do not decode
/// as an event are dropped like any other discarded event.
pub fn normalize_events(items: &[serde_json::Value], gate: StreamGate) -> Vec<EventRecord> {
    items
        .iter()
        .filter_map(|item| match RawEvent::deserialize(item) {
            Ok(raw) => normalize_event(&raw, gate),
            Err(e) => {
                debug!("Dropping undecodable event: {}", e);
                None
            }
        })
        .collect()
}
