//! Password hashing parameters

use serde::{Deserialize, Serialize};

/// Default Argon2id parameters
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_MEMORY_COST: u32 = 65536; // 64 MiB
pub const DEFAULT_PARALLELISM: u32 = 4;
pub const DEFAULT_HASH_LEN: u32 = 32;

/// Argon2id parameters used when hashing new passwords
///
/// Existing hashes carry their own parameters in the PHC string, so
/// changing these only affects accounts created afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argon2Params {
    pub time_cost: u32,
    /// Memory in KiB
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

impl Argon2Params {
    /// Smallest parameters argon2 accepts; only for tests
    pub fn insecure_fast() -> Self {
        Self {
            time_cost: 1,
            memory_cost: 64,
            parallelism: 1,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}
