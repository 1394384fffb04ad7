use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::events::{StreamGate, TieBreak};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub api: Api,
    pub cache: Cache,
    pub handshake: Handshake,
    pub matching: Matching,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Api {
    /// Base for event page links
    pub site_url: String,
    pub events_url: String,
    pub pending_url: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            site_url: "https://unikrn.com".to_string(),
            events_url: "https://unikrn.com/apiv2/events/current=1".to_string(),
            pending_url: "https://unikrn.com/apiv2/bets/pending".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Cache {
    /// Directory shared by every popup run
    pub dir: PathBuf,
    pub events_ttl_secs: u64,
    pub session_ttl_secs: u64,
    pub pending_ttl_secs: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".stream-odds"),
            events_ttl_secs: 5 * 60,
            session_ttl_secs: 12 * 60 * 60,
            pending_ttl_secs: 5 * 60,
        }
    }
}

impl Cache {
    pub fn events_ttl(&self) -> Duration {
        Duration::from_secs(self.events_ttl_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn pending_ttl(&self) -> Duration {
        Duration::from_secs(self.pending_ttl_secs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Handshake {
    /// Trusted context that hands out the session id
    pub bridge_url: String,
}

impl Default for Handshake {
    fn default() -> Self {
        Self {
            bridge_url: "wss://unikrn.com/extension/bridge".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Matching {
    pub stream_gate: StreamGate,
    pub tie_break: TieBreak,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file means all defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
