//! Store open/reopen tests
//!
//! Run with: cargo test --test connection_retry_test -- --nocapture

use std::time::Instant;
use tempfile::TempDir;

use motoshop_core::adapters::duckdb::DuckDbStore;
use motoshop_core::ports::KeyValueStore;

/// Opening the same store file repeatedly keeps schema and data intact
#[test]
fn test_sequential_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("shop.duckdb");

    for i in 0..5 {
        let start = Instant::now();
        let store = DuckDbStore::new(&db_path).unwrap();
        let result = store.run_migrations().unwrap();
        if i > 0 {
            assert!(result.applied.is_empty(), "migrations re-applied on open {}", i);
        }

        store.set(&format!("key-{}", i), "{}").unwrap();
        assert_eq!(store.len().unwrap(), i + 1);
        println!("Connection {}: opened in {:?}", i, start.elapsed());
    }
}

/// Opening a store in a directory that does not exist fails without retrying forever
#[test]
fn test_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("missing").join("shop.duckdb");

    let start = Instant::now();
    assert!(DuckDbStore::new(&db_path).is_err());
    println!("Failed after {:?}", start.elapsed());
}

#[test]
fn test_in_memory_store() {
    let store = DuckDbStore::in_memory().unwrap();
    store.ensure_schema().unwrap();
    store.set("cart-state", "{}").unwrap();
    assert_eq!(store.get("cart-state").unwrap().as_deref(), Some("{}"));
    assert_eq!(store.db_path().to_str(), Some(":memory:"));
}
