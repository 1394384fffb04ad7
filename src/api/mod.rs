mod client;
mod types;

pub use client::{decode_envelope, ApiClient};
pub use types::{
    EventId, EventsPayload, Odds, PendingItem, PendingPayload, PendingRequest, RawEvent,
    RawMarket, RawStream,
};
