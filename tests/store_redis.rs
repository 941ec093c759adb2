//! Tests against a live Redis server.
//!
//! Run with `REDIS_ADDR=127.0.0.1:6379 cargo test --test store_redis -- --ignored`.
//! Databases 13-15 are flushed by these tests.

use std::time::Duration;
use url_redirector::infrastructure::store::{KeyValueStore, RedisStore, StoreError};

async fn connect(db: u8) -> RedisStore {
    let addr = std::env::var("REDIS_ADDR").unwrap_or_else(|_| "127.0.0.1:6379".to_string());
    let store = RedisStore::connect(
        &format!("redis://{}/{}", addr, db),
        db,
        Duration::from_secs(2),
        Duration::from_millis(500),
    )
    .await
    .expect("REDIS_ADDR must point to a running Redis server");

    let client = redis::Client::open(format!("redis://{}/{}", addr, db)).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    redis::cmd("FLUSHDB")
        .query_async::<()>(&mut conn)
        .await
        .unwrap();

    store
}

#[tokio::test]
async fn test_redis_connect_unreachable_fails_within_timeout() {
    let started = std::time::Instant::now();
    let result = RedisStore::connect(
        "redis://127.0.0.1:1/2",
        2,
        Duration::from_secs(1),
        Duration::from_millis(500),
    )
    .await;

    assert!(matches!(result, Err(StoreError::Connection(_))));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_redis_connect_rejects_malformed_url() {
    let result = RedisStore::connect(
        "redis://:ab/cd#ef@127.0.0.1:6379/1",
        1,
        Duration::from_secs(1),
        Duration::from_millis(500),
    )
    .await;

    assert!(matches!(result, Err(StoreError::Connection(_))));
}

#[tokio::test]
#[ignore]
async fn test_redis_set_if_absent_and_ttl() {
    let store = connect(15).await;

    assert!(
        store
            .set_if_absent("tok", "https://a.com", Duration::from_secs(60))
            .await
            .unwrap()
    );
    assert!(
        !store
            .set_if_absent("tok", "https://b.com", Duration::from_secs(60))
            .await
            .unwrap()
    );
    assert_eq!(
        store.get("tok").await.unwrap(),
        Some("https://a.com".to_string())
    );

    let ttl = store.time_to_live("tok").await.unwrap().unwrap();
    assert!(ttl <= Duration::from_secs(60));
    assert!(store.delete("tok").await.unwrap());
    assert_eq!(store.time_to_live("tok").await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_redis_windowed_decrement() {
    let store = connect(14).await;
    let window = Duration::from_secs(60);

    let first = store.decrement_within_window("ip", 2, window).await.unwrap();
    assert!(first.accepted);
    assert_eq!(first.remaining, 1);

    let second = store.decrement_within_window("ip", 2, window).await.unwrap();
    assert!(second.accepted);
    assert_eq!(second.remaining, 0);

    let third = store.decrement_within_window("ip", 2, window).await.unwrap();
    assert!(!third.accepted);
    assert_eq!(third.remaining, 0);
    assert!(third.resets_in <= window);

    assert_eq!(store.get("ip").await.unwrap(), Some("0".to_string()));
}

#[tokio::test]
#[ignore]
async fn test_redis_counters() {
    let store = connect(13).await;

    assert_eq!(store.increment("c").await.unwrap(), 1);
    assert_eq!(store.increment("c").await.unwrap(), 2);
    assert_eq!(store.decrement("c").await.unwrap(), 1);
    assert_eq!(store.time_to_live("c").await.unwrap(), None);
    store.ping().await.unwrap();
}
