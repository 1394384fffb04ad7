use serde::{Deserialize, Serialize};
use std::fmt;

/// Event id as the API sends it: sometimes a number, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Num(u64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Num(n) => write!(f, "{}", n),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

/// Odds kept in their wire form so they render exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Odds {
    Num(f64),
    Text(String),
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Odds::Num(n) => write!(f, "{}", n),
            Odds::Text(s) => f.write_str(s),
        }
    }
}

/// `data` of the events endpoint. Items stay untyped here so one bad event
/// cannot sink the rest; each is decoded on its own during normalization.
#[derive(Debug, Deserialize)]
pub struct EventsPayload {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

/// One event from the events endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub eid: EventId,

    #[serde(default)]
    pub name: String,

    /// Lifecycle ordinal; anything above 3 is closed.
    #[serde(default)]
    pub state: i64,

    #[serde(default)]
    pub streams: Vec<RawStream>,

    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStream {
    pub stream_type: Option<String>,
    pub is_live: Option<bool>,
    /// Embed markup, e.g. `<iframe src="...?channel=faker">`
    pub video_html: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMarket {
    #[serde(default)]
    pub team_name: String,
    pub odd: Odds,
}

/// Body of the pending-bets request.
#[derive(Debug, Serialize)]
pub struct PendingRequest<'a> {
    pub session_id: &'a str,
}

/// `data` of the pending-bets endpoint. Items are passed through untouched.
#[derive(Debug, Deserialize)]
pub struct PendingPayload {
    #[serde(default)]
    pub items: Vec<PendingItem>,
}

pub type PendingItem = serde_json::Value;
