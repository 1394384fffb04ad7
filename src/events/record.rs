use serde::{Deserialize, Serialize};

use crate::api::{EventId, Odds};

/// One side of a matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub odds: Odds,
}

/// Normalized event as stored under the `"events"` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    /// Team A then team B, in market order.
    pub teams: [Team; 2],
    /// Lower-cased channel names, in stream order.
    pub channels: Vec<String>,
    pub name: String,
}

impl EventRecord {
    /// `channel` must already be lower-cased.
    pub fn has_channel(&self, channel: &str) -> bool {
        self.channels.iter().any(|c| c == channel)
    }
}
