//! In-memory store whose reads and writes can be switched to fail

use std::sync::atomic::{AtomicBool, Ordering};

use crate::adapters::memory::MemoryStore;
use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::storage(format!("{} failed: disk unavailable", op)));
        }
        Ok(())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.remove(key)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.keys_with_prefix(prefix)
    }
}
