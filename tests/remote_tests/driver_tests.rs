//! Tests for RemoteDriver
//!
//! These tests verify:
//! - Routing of the driver contract onto native commands
//! - TTL conversion to whole seconds
//! - Native semantics through the in-process MemoryClient

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cachette::{CacheDriver, CacheError, MemoryClient, RemoteClient, RemoteDriver, Result};
use parking_lot::Mutex;
use serde_json::json;

const KEY: &str = "some:cache:key";

// =============================================================================
// Recording Client
// =============================================================================

/// Records every call and answers with fixed values
#[derive(Default)]
struct RecordingClient {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingClient {
    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl RemoteClient for RecordingClient {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.record(format!("GET {}", key));
        Ok(Some("stored".to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.record(format!("SET {} {}", key, value));
        Ok(())
    }

    async fn set_ex(&self, key: &str, seconds: u64, value: &str) -> Result<()> {
        self.record(format!("SETEX {} {} {}", key, seconds, value));
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.record(format!("INCR {}", key));
        Ok(1)
    }

    async fn incr_by(&self, key: &str, by: i64) -> Result<i64> {
        self.record(format!("INCRBY {} {}", key, by));
        Ok(by)
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        self.record(format!("DECR {}", key));
        Ok(-1)
    }

    async fn decr_by(&self, key: &str, by: i64) -> Result<i64> {
        self.record(format!("DECRBY {} {}", key, by));
        Ok(-by)
    }

    async fn del(&self, key: &str) -> Result<u64> {
        self.record(format!("DEL {}", key));
        Ok(1)
    }

    async fn flush_all(&self) -> Result<()> {
        self.record("FLUSHALL".to_string());
        Ok(())
    }
}

fn setup_recording_driver() -> (Arc<Mutex<Vec<String>>>, RemoteDriver<RecordingClient>) {
    let client = RecordingClient::default();
    let calls = Arc::clone(&client.calls);
    (calls, RemoteDriver::new(client))
}

// =============================================================================
// Routing Tests
// =============================================================================

#[tokio::test]
async fn test_set_without_ttl_uses_set() {
    let (calls, driver) = setup_recording_driver();

    driver.set(KEY, &json!("some value"), None).await.unwrap();

    assert_eq!(*calls.lock(), vec![format!("SET {} some value", KEY)]);
}

#[tokio::test]
async fn test_set_with_ttl_floors_to_seconds() {
    let (calls, driver) = setup_recording_driver();

    driver.set("a", &json!("v"), Some(2_000)).await.unwrap();
    driver.set("b", &json!("v"), Some(2_999)).await.unwrap();
    driver.set("c", &json!("v"), Some(999)).await.unwrap();

    assert_eq!(
        *calls.lock(),
        vec!["SETEX a 2 v", "SETEX b 2 v", "SETEX c 0 v"]
    );
}

#[tokio::test]
async fn test_zero_ttl_is_treated_as_indefinite() {
    let (calls, driver) = setup_recording_driver();

    driver.set("a", &json!("v"), Some(0)).await.unwrap();

    assert_eq!(*calls.lock(), vec!["SET a v"]);
}

#[tokio::test]
async fn test_non_string_values_are_stored_as_json() {
    let (calls, driver) = setup_recording_driver();

    driver.set("n", &json!(99), None).await.unwrap();
    driver.set("o", &json!({ "a": [1, 2] }), None).await.unwrap();

    assert_eq!(*calls.lock(), vec!["SET n 99", r#"SET o {"a":[1,2]}"#]);
}

#[tokio::test]
async fn test_get_returns_stored_text() {
    let (calls, driver) = setup_recording_driver();

    assert_eq!(driver.get(KEY).await.unwrap(), Some(json!("stored")));
    assert_eq!(*calls.lock(), vec![format!("GET {}", KEY)]);
}

#[tokio::test]
async fn test_increment_routing() {
    let (calls, driver) = setup_recording_driver();

    assert_eq!(driver.increment("k", 1).await.unwrap(), 1);
    assert_eq!(driver.increment("k", 100).await.unwrap(), 100);
    assert_eq!(driver.increment("k", 0).await.unwrap(), 1);

    assert_eq!(*calls.lock(), vec!["INCRBY k 1", "INCRBY k 100", "INCR k"]);
}

#[tokio::test]
async fn test_decrement_routing() {
    let (calls, driver) = setup_recording_driver();

    driver.decrement("k", 1).await.unwrap();
    driver.decrement("k", 100).await.unwrap();
    driver.decrement("k", 0).await.unwrap();

    assert_eq!(*calls.lock(), vec!["DECRBY k 1", "DECRBY k 100", "DECR k"]);
}

#[tokio::test]
async fn test_delete_and_flush_routing() {
    let (calls, driver) = setup_recording_driver();

    assert_eq!(driver.delete("k").await.unwrap(), 1);
    driver.flush().await.unwrap();

    assert_eq!(*calls.lock(), vec!["DEL k", "FLUSHALL"]);
}

// =============================================================================
// Native Semantics (MemoryClient)
// =============================================================================

fn setup_memory_driver() -> RemoteDriver<MemoryClient> {
    RemoteDriver::new(MemoryClient::new())
}

#[tokio::test]
async fn test_memory_get_set() {
    let driver = setup_memory_driver();

    assert_eq!(driver.get(KEY).await.unwrap(), None);

    driver.set(KEY, &json!("some value"), None).await.unwrap();
    assert_eq!(driver.get(KEY).await.unwrap(), Some(json!("some value")));
}

#[tokio::test]
async fn test_memory_ttl_expires() {
    let driver = setup_memory_driver();

    driver.set(KEY, &json!("some value"), Some(1_000)).await.unwrap();
    assert_eq!(driver.get(KEY).await.unwrap(), Some(json!("some value")));

    tokio::time::sleep(Duration::from_millis(1_100)).await;

    assert_eq!(driver.get(KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_memory_sub_second_ttl_is_rejected_by_server() {
    let driver = setup_memory_driver();

    assert!(matches!(
        driver.set(KEY, &json!("v"), Some(500)).await,
        Err(CacheError::Remote(_))
    ));
}

#[tokio::test]
async fn test_memory_increment_persists() {
    let driver = setup_memory_driver();

    driver.set(KEY, &json!(99), None).await.unwrap();

    assert_eq!(driver.increment(KEY, 1).await.unwrap(), 100);
    assert_eq!(driver.get(KEY).await.unwrap(), Some(json!("100")));

    assert_eq!(driver.increment(KEY, 99).await.unwrap(), 199);
    assert_eq!(driver.get(KEY).await.unwrap(), Some(json!("199")));
}

#[tokio::test]
async fn test_memory_decrement_persists() {
    let driver = setup_memory_driver();

    driver.set(KEY, &json!(99), None).await.unwrap();

    assert_eq!(driver.decrement(KEY, 1).await.unwrap(), 98);
    assert_eq!(driver.decrement(KEY, 99).await.unwrap(), -1);
    assert_eq!(driver.get(KEY).await.unwrap(), Some(json!("-1")));
}

#[tokio::test]
async fn test_memory_increment_missing_key() {
    let driver = setup_memory_driver();

    assert_eq!(driver.increment(KEY, 1234).await.unwrap(), 1234);
    assert_eq!(driver.decrement("other", 109).await.unwrap(), -109);
}

#[tokio::test]
async fn test_memory_increment_non_integer() {
    let driver = setup_memory_driver();

    driver.set(KEY, &json!("none-integer-value"), None).await.unwrap();

    assert!(matches!(
        driver.increment(KEY, 1).await,
        Err(CacheError::Remote(_))
    ));
}

#[tokio::test]
async fn test_memory_concurrent_increments_are_atomic() {
    let driver = Arc::new(setup_memory_driver());

    let mut handles = Vec::new();
    for _ in 0..50 {
        let driver = Arc::clone(&driver);
        handles.push(tokio::spawn(async move {
            driver.increment(KEY, 1).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(driver.get(KEY).await.unwrap(), Some(json!("50")));
}

#[tokio::test]
async fn test_memory_delete_and_flush() {
    let driver = setup_memory_driver();

    driver.set("a", &json!(1), None).await.unwrap();
    driver.set("b", &json!(2), None).await.unwrap();

    assert_eq!(driver.delete("a").await.unwrap(), 1);
    assert_eq!(driver.delete("a").await.unwrap(), 0);

    driver.flush().await.unwrap();
    assert_eq!(driver.get("b").await.unwrap(), None);
    assert!(driver.client().is_empty());
}
