//! Event cache against a mock events endpoint.

mod common;

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{faker_event, ok_envelope, EVENTS_PATH};
use stream_odds::api::{ApiClient, EventId};
use stream_odds::clock::ManualClock;
use stream_odds::error::ApiError;
use stream_odds::events::{EventCache, EventRecord, StreamGate};
use stream_odds::store::{CacheEntry, KvStore, MemoryStore, TtlStore, EVENTS_KEY};

const TTL: Duration = Duration::from_secs(300);
const NOW: i64 = 1_700_000_000_000;

fn cache_for(server: &MockServer, store: &TtlStore, clock: Arc<ManualClock>) -> EventCache {
    EventCache::new(
        ApiClient::new(),
        store.clone(),
        clock,
        format!("{}{}", server.uri(), EVENTS_PATH),
        TTL,
        StreamGate::FirstStream,
    )
}

fn cached_record(id: u64) -> EventRecord {
    serde_json::from_value(json!({
        "id": id,
        "teams": [{"name": "X", "odds": 1.1}, {"name": "Y", "odds": 3.0}],
        "channels": ["cached"],
        "name": "cached event",
    }))
    .unwrap()
}

#[tokio::test]
async fn test_fresh_cache_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"items": []}))))
        .expect(0)
        .mount(&server)
        .await;

    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    store.write(EVENTS_KEY, &CacheEntry { items: vec![cached_record(1)], expiry: NOW + 1 });

    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(NOW)));
    let records = cache.fetch_events().await.unwrap();

    assert_eq!(records, vec![cached_record(1)]);
}

#[tokio::test]
async fn test_expiry_instant_is_still_fresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"items": []}))))
        .expect(0)
        .mount(&server)
        .await;

    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    store.write(EVENTS_KEY, &CacheEntry { items: vec![cached_record(1)], expiry: NOW });

    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(NOW)));
    assert_eq!(cache.fetch_events().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_expired_cache_refetches_and_rewrites() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "items": [
                faker_event(),
                {"eid": 8, "state": 5, "streams": [], "markets": []},
            ]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    store.write(EVENTS_KEY, &CacheEntry { items: vec![cached_record(1)], expiry: NOW - 1 });

    let clock = Arc::new(ManualClock::new(NOW));
    let cache = cache_for(&server, &store, clock.clone());
    let records = cache.fetch_events().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, EventId::Num(7));
    assert_eq!(records[0].channels, vec!["faker".to_string()]);

    let stored: CacheEntry<Vec<EventRecord>> = store.read(EVENTS_KEY).unwrap();
    assert_eq!(stored.items, records);
    assert_eq!(stored.expiry, NOW + 300_000);

    // Second open inside the TTL is served from the store (expect(1) above).
    clock.advance_ms(299_000);
    assert_eq!(cache.fetch_events().await.unwrap(), records);
}

#[tokio::test]
async fn test_empty_store_fetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"items": [faker_event()]}))))
        .expect(1)
        .mount(&server)
        .await;

    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(NOW)));

    assert_eq!(cache.fetch_events().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_api_error_leaves_cache_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": true, "msg_trans": "down"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    let stale = CacheEntry { items: vec![cached_record(1)], expiry: NOW - 10 };
    store.write(EVENTS_KEY, &stale);

    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(NOW)));
    let err = cache.fetch_events().await.unwrap_err();

    let envelope = err.envelope().unwrap();
    assert!(envelope.error);
    assert_eq!(envelope.msg_trans.as_deref(), Some("down"));

    // Stale entry neither served nor replaced.
    let stored: CacheEntry<Vec<EventRecord>> = store.read(EVENTS_KEY).unwrap();
    assert_eq!(stored, stale);
}

#[tokio::test]
async fn test_malformed_body_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(NOW)));

    assert!(matches!(cache.fetch_events().await, Err(ApiError::Api(_))));
    assert!(store.read::<Vec<EventRecord>>(EVENTS_KEY).is_none());
}

#[tokio::test]
async fn test_transport_failure_is_transport_error() {
    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    let cache = EventCache::new(
        ApiClient::new(),
        store.clone(),
        Arc::new(ManualClock::new(NOW)),
        "http://127.0.0.1:1/apiv2/events",
        TTL,
        StreamGate::FirstStream,
    );

    assert!(matches!(cache.fetch_events().await, Err(ApiError::Transport(_))));
    assert!(store.read::<Vec<EventRecord>>(EVENTS_KEY).is_none());
}

#[tokio::test]
async fn test_corrupt_cache_falls_through_to_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"items": [faker_event()]}))))
        .expect(1)
        .mount(&server)
        .await;

    let backing = Arc::new(MemoryStore::new());
    backing.set(EVENTS_KEY, "][".to_string());
    let store = TtlStore::new(backing);

    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(NOW)));
    assert_eq!(cache.fetch_events().await.unwrap()[0].id, EventId::Num(7));
}

#[tokio::test]
async fn test_one_bad_event_does_not_sink_the_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "items": [
                faker_event(),
                {"eid": 8, "markets": [{"odd": null}, {"team_name": "D"}]},
            ]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(NOW)));
    let records = cache.fetch_events().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, EventId::Num(7));

    let stored: CacheEntry<Vec<EventRecord>> = store.read(EVENTS_KEY).unwrap();
    assert_eq!(stored.items, records);
}

#[tokio::test]
async fn test_extreme_expiry_with_debug_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"items": [faker_event()]}))))
        .expect(1)
        .mount(&server)
        .await;

    // Long expired: falls through to a fetch.
    let backing = Arc::new(MemoryStore::new());
    backing.set(EVENTS_KEY, format!(r#"{{"items":[],"expiry":{}}}"#, i64::MIN));
    let store = TtlStore::new(backing);
    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(NOW)));
    assert_eq!(cache.fetch_events().await.unwrap()[0].id, EventId::Num(7));

    // Never expires, clock before the epoch: served from the store.
    let store = TtlStore::new(Arc::new(MemoryStore::new()));
    store.write(EVENTS_KEY, &CacheEntry { items: vec![cached_record(1)], expiry: i64::MAX });
    let cache = cache_for(&server, &store, Arc::new(ManualClock::new(-1)));
    assert_eq!(cache.fetch_events().await.unwrap(), vec![cached_record(1)]);
}
