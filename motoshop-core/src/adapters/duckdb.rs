//! DuckDB key-value store implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::migrations::MIGRATIONS;
use crate::ports::KeyValueStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

fn storage_err(e: duckdb::Error) -> Error {
    Error::storage(e.to_string())
}

/// File-backed store: one row per key in `kv_store`
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbStore {
    /// Open (or create) the store database
    ///
    /// Retries with exponential backoff while another process holds the
    /// file lock, e.g. two `moto` commands started at the same time.
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[motoshop] Store busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open store after {} retries", MAX_RETRIES)))
    }

    /// Open a store that lives only in memory
    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: PathBuf::from(":memory:"),
        })
    }

    fn try_open_connection(db_path: &Path) -> anyhow::Result<Connection> {
        // Extension autoloading off: cached extensions can fail code signing on macOS
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    /// Run pending schema migrations
    pub fn run_migrations(&self) -> anyhow::Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure the kv_store schema exists
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .map_err(storage_err)?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl KeyValueStore for DuckDbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        match conn.query_row(
            "SELECT store_value FROM kv_store WHERE store_key = ?",
            [key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(storage_err(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_store (store_key, store_value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT (store_key) DO UPDATE SET
                store_value = EXCLUDED.store_value,
                updated_at = EXCLUDED.updated_at",
            params![key, value, chrono::Utc::now().timestamp_millis()],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_store WHERE store_key = ?", [key])
            .map_err(storage_err)?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT store_key FROM kv_store WHERE starts_with(store_key, ?) ORDER BY store_key")
            .map_err(storage_err)?;
        let keys = stmt
            .query_map([prefix], |row| row.get::<_, String>(0))
            .map_err(storage_err)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> DuckDbStore {
        let store = DuckDbStore::new(&dir.path().join("shop.duckdb")).unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_set_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        store.set("cart-state", "{\"lines\": []}").unwrap();
        store.set("cart-state", "{\"lines\": [1]}").unwrap();
        assert_eq!(store.get("cart-state").unwrap().as_deref(), Some("{\"lines\": [1]}"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_missing_key_and_remove() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        assert_eq!(store.get("session-user").unwrap(), None);
        store.set("session-user", "{}").unwrap();
        store.remove("session-user").unwrap();
        store.remove("session-user").unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open(&dir);
            store.set("order-ledger/u1", "[]").unwrap();
            store.set("order-ledger/u2", "[]").unwrap();
            store.set("cart-state", "{}").unwrap();
        }
        let store = open(&dir);
        assert_eq!(
            store.keys_with_prefix("order-ledger/").unwrap(),
            vec!["order-ledger/u1", "order-ledger/u2"]
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable_error("IO Error: database is locked"));
        assert!(!is_retryable_error("Catalog Error: table does not exist"));
    }
}
