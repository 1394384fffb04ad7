use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use super::record::EventRecord;

static TWITCH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?twitch\.tv/([^/?#]+)").expect("static regex")
});

/// Which record wins when several list the same channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First record in cache order (the shipped behavior).
    #[default]
    First,
    /// Last record in cache order.
    Latest,
}

/// Why there is nothing to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoData {
    /// Tab is not on a twitch channel page.
    UnparseableUrl,
    /// Channel has no open event.
    NoMatch { channel: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<'a> {
    Found(&'a EventRecord),
    NoData(NoData),
}

/// Lower-cased channel name from a twitch page URL.
pub fn channel_from_url(url: &str) -> Option<String> {
    TWITCH_URL
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Record listing `channel`, compared case-insensitively.
pub fn find_event<'a>(
    channel: &str,
    records: &'a [EventRecord],
    tie_break: TieBreak,
) -> Option<&'a EventRecord> {
    let channel = channel.to_lowercase();
    let mut matches = records.iter().filter(|r| r.has_channel(&channel));
    match tie_break {
        TieBreak::First => matches.next(),
        TieBreak::Latest => matches.last(),
    }
}

/// Resolve a tab URL against the cached records.
pub fn match_tab<'a>(
    tab_url: Option<&str>,
    records: &'a [EventRecord],
    tie_break: TieBreak,
) -> MatchOutcome<'a> {
    let Some(channel) = tab_url.and_then(channel_from_url) else {
        return MatchOutcome::NoData(NoData::UnparseableUrl);
    };
    match find_event(&channel, records, tie_break) {
        Some(record) => MatchOutcome::Found(record),
        None => MatchOutcome::NoData(NoData::NoMatch { channel }),
    }
}
