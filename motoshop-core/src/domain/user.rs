//! User and account registry domain models

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Public view of a user, as held by the active session
///
/// Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            avatar: None,
        }
    }

    /// Merge the set fields of `update` into this user
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(avatar) = &update.avatar {
            self.avatar = Some(avatar.clone());
        }
    }
}

/// Registry entry for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Argon2id hash in PHC string format
    pub password_hash: String,
}

impl UserRecord {
    /// Create a record with a fresh v4 id
    pub fn new(email: impl Into<String>, name: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            name: name.into(),
            avatar: None,
            password_hash,
        }
    }

    pub fn public_view(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Partial profile changes; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}

/// All registered accounts, keyed by email exactly as entered at signup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountRegistry {
    accounts: BTreeMap<String, UserRecord>,
}

impl AccountRegistry {
    pub fn get(&self, email: &str) -> Option<&UserRecord> {
        self.accounts.get(email)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.accounts.contains_key(email)
    }

    /// Insert a new record. Returns false, leaving the registry untouched,
    /// if the email is already registered.
    pub fn insert(&mut self, record: UserRecord) -> bool {
        if self.accounts.contains_key(&record.email) {
            return false;
        }
        self.accounts.insert(record.email.clone(), record);
        true
    }

    /// Remove and return the record stored under `email`
    pub fn take(&mut self, email: &str) -> Option<UserRecord> {
        self.accounts.remove(email)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Loose shape check: something@domain.tld, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}
