//! Key-value store port - durable storage abstraction

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;

/// Logical keys under which the stores persist their state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    CartState,
    SessionUser,
    AccountRegistry,
    /// Order history of one user, partitioned by user id
    OrderLedger(String),
}

impl StorageKey {
    pub fn as_string(&self) -> String {
        match self {
            StorageKey::CartState => "cart-state".to_string(),
            StorageKey::SessionUser => "session-user".to_string(),
            StorageKey::AccountRegistry => "account-registry".to_string(),
            StorageKey::OrderLedger(user_id) => format!("order-ledger/{}", user_id),
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// Durable string key-value storage
///
/// Every call is synchronous and completes before returning. Adapters
/// decide where the bytes live (DuckDB file, memory).
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, sorted
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Read and parse JSON state
///
/// Missing keys, read errors and unparsable values all come back as
/// `None`: stored state is a cache of user intent, never a reason to fail.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &StorageKey) -> Option<T> {
    let raw = store.get(&key.as_string()).ok()??;
    serde_json::from_str(&raw).ok()
}

/// Read and parse JSON state before a read-modify-write
///
/// Unlike `read_json`, a failing store is an error: writing back state
/// built from a failed read would overwrite what is stored. Unparsable
/// values still count as absent.
pub fn try_read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &StorageKey,
) -> Result<Option<T>> {
    Ok(store
        .get(&key.as_string())?
        .and_then(|raw| serde_json::from_str(&raw).ok()))
}

/// Serialize state as pretty JSON and write it under `key`
pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &StorageKey, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    store.set(&key.as_string(), &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::failing::FailingStore;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::result::Error;

    #[test]
    fn test_key_names() {
        assert_eq!(StorageKey::CartState.to_string(), "cart-state");
        assert_eq!(StorageKey::SessionUser.to_string(), "session-user");
        assert_eq!(StorageKey::AccountRegistry.to_string(), "account-registry");
        assert_eq!(
            StorageKey::OrderLedger("u-1".to_string()).to_string(),
            "order-ledger/u-1"
        );
    }

    #[test]
    fn test_read_json_treats_garbage_as_absent() {
        let store = MemoryStore::new();
        store.set("cart-state", "{not json").unwrap();
        let parsed: Option<Vec<u32>> = read_json(&store, &StorageKey::CartState);
        assert!(parsed.is_none());

        let missing: Option<Vec<u32>> = read_json(&store, &StorageKey::SessionUser);
        assert!(missing.is_none());
    }

    #[test]
    fn test_try_read_json_surfaces_store_errors() {
        let store = FailingStore::new();
        write_json(&store, &StorageKey::CartState, &vec![1u32]).unwrap();

        store.fail_reads(true);
        let lenient: Option<Vec<u32>> = read_json(&store, &StorageKey::CartState);
        assert!(lenient.is_none());
        let strict: Result<Option<Vec<u32>>> = try_read_json(&store, &StorageKey::CartState);
        assert!(matches!(strict, Err(Error::Storage(_))));

        store.fail_reads(false);
        store.set("cart-state", "{not json").unwrap();
        let garbage: Option<Vec<u32>> = try_read_json(&store, &StorageKey::CartState).unwrap();
        assert!(garbage.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        write_json(&store, &StorageKey::CartState, &vec![1u32, 2, 3]).unwrap();
        let parsed: Option<Vec<u32>> = read_json(&store, &StorageKey::CartState);
        assert_eq!(parsed, Some(vec![1, 2, 3]));
    }
}
