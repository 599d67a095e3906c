//! Password hashing - salted Argon2id with PHC string output
//!
//! Stored hashes carry algorithm, parameters and salt, so verification
//! works regardless of the parameters currently configured.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::domain::result::{Error, Result};
use crate::domain::Argon2Params;

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Hashes new passwords and verifies stored ones
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Argon2Params,
}

impl PasswordHasher {
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            Some(self.params.hash_len as usize),
        )
        .map_err(|e| Error::PasswordHash(format!("Invalid argon2 params: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| Error::PasswordHash(format!("Failed to encode salt: {}", e)))?;

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string
    ///
    /// Constant-time comparison; a malformed stored hash simply fails.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Run one Argon2 pass that can never match
    ///
    /// Login calls this when there is no stored hash to check, so a miss
    /// costs about as much as a wrong password.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let Ok(salt) = SaltString::encode_b64(&[0u8; SALT_LEN]) else {
            return false;
        };
        if let Ok(argon2) = self.argon2() {
            let _ = argon2.hash_password(password.as_bytes(), &salt);
        }
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Argon2Params::default())
    }
}
