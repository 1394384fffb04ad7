//! Event pipeline: normalize the API payload, cache it, match a tab against it.

mod cache;
mod matcher;
mod normalize;
mod record;

pub use cache::EventCache;
pub use matcher::{channel_from_url, find_event, match_tab, MatchOutcome, NoData, TieBreak};
pub use normalize::{normalize_event, normalize_events, StreamGate};
pub use record::{EventRecord, Team};
