//! Auth service - account registry and the active session
//!
//! The registry (`account-registry`) maps email to account record and only
//! ever holds Argon2id hashes. The session (`session-user`) holds the public
//! view of the logged-in user and is written or removed on every change.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{
    is_valid_email, AccountRegistry, ProfileUpdate, User, UserRecord, MIN_PASSWORD_LEN,
};
use crate::ports::{read_json, try_read_json, write_json, KeyValueStore, StorageKey};
use crate::services::PasswordHasher;

pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    hasher: PasswordHasher,
    registry: AccountRegistry,
    session: Option<User>,
}

impl AuthService {
    /// Rehydrate registry and session from storage
    pub fn load(store: Arc<dyn KeyValueStore>, hasher: PasswordHasher) -> Self {
        let registry = read_json(store.as_ref(), &StorageKey::AccountRegistry).unwrap_or_default();
        let session = read_json(store.as_ref(), &StorageKey::SessionUser);
        Self {
            store,
            hasher,
            registry,
            session,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Log in with email and password
    ///
    /// Short password, unknown email and wrong password all fail with the
    /// same `InvalidCredentials`, after the same amount of hashing work.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let record = if password.chars().count() < MIN_PASSWORD_LEN {
            None
        } else {
            self.registry.get(email.trim())
        };
        let Some(record) = record else {
            self.hasher.verify_dummy(password);
            return Err(Error::InvalidCredentials);
        };
        if !self.hasher.verify(password, &record.password_hash) {
            return Err(Error::InvalidCredentials);
        }

        let user = record.public_view();
        self.set_session(Some(user.clone()))?;
        Ok(user)
    }

    /// Register a new account and log it in
    ///
    /// The registry is re-read before the write; if that read fails the
    /// signup fails and stored accounts are left alone.
    pub fn signup(&mut self, email: &str, password: &str, name: &str) -> Result<User> {
        let email = email.trim();
        let name = name.trim();

        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(Error::validation("email, password and name are required"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if !is_valid_email(email) {
            return Err(Error::validation("email address is not valid"));
        }
        let mut registry = self.fresh_registry()?;
        if registry.contains(email) {
            self.registry = registry;
            return Err(Error::EmailTaken);
        }

        let record = UserRecord::new(email, name, self.hasher.hash(password)?);
        let user = record.public_view();

        if !registry.insert(record) {
            return Err(Error::EmailTaken);
        }
        write_json(self.store.as_ref(), &StorageKey::AccountRegistry, &registry)?;
        self.registry = registry;

        self.set_session(Some(user.clone()))?;
        Ok(user)
    }

    /// Check the signup form's confirmation field
    pub fn confirm_password(password: &str, confirmation: &str) -> Result<()> {
        if password != confirmation {
            return Err(Error::validation("passwords do not match"));
        }
        Ok(())
    }

    /// End the session; the registry is untouched
    pub fn logout(&mut self) -> Result<()> {
        self.set_session(None)
    }

    /// Merge profile changes into the logged-in user
    ///
    /// Returns `Ok(None)` without touching anything when nobody is logged
    /// in. Name and email are trimmed like at signup. An email change moves
    /// the registry entry to the new key.
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Option<User>> {
        let Some(current) = self.session.clone() else {
            return Ok(None);
        };
        let update = ProfileUpdate {
            name: update.name.as_deref().map(|n| n.trim().to_string()),
            email: update.email.as_deref().map(|e| e.trim().to_string()),
            avatar: update.avatar.clone(),
        };

        if let Some(name) = &update.name {
            if name.is_empty() {
                return Err(Error::validation("name cannot be empty"));
            }
        }
        if let Some(email) = &update.email {
            if !is_valid_email(email) {
                return Err(Error::validation("email address is not valid"));
            }
        }

        let mut registry = self.fresh_registry()?;
        if let Some(email) = &update.email {
            if *email != current.email && registry.contains(email) {
                self.registry = registry;
                return Err(Error::EmailTaken);
            }
        }

        let mut user = current.clone();
        user.apply(&update);

        if let Some(mut record) = registry.take(&current.email) {
            record.email = user.email.clone();
            record.name = user.name.clone();
            record.avatar = user.avatar.clone();
            registry.insert(record);
            write_json(self.store.as_ref(), &StorageKey::AccountRegistry, &registry)?;
            self.registry = registry;
        }

        self.set_session(Some(user.clone()))?;
        Ok(Some(user))
    }

    /// Registry as currently stored, for read-modify-write
    fn fresh_registry(&self) -> Result<AccountRegistry> {
        Ok(try_read_json(self.store.as_ref(), &StorageKey::AccountRegistry)?.unwrap_or_default())
    }

    fn set_session(&mut self, user: Option<User>) -> Result<()> {
        match &user {
            Some(user) => write_json(self.store.as_ref(), &StorageKey::SessionUser, user)?,
            None => self.store.remove(&StorageKey::SessionUser.as_string())?,
        }
        self.session = user;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::failing::FailingStore;
    use crate::adapters::memory::MemoryStore;
    use std::time::Instant;
    use crate::domain::Argon2Params;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(Argon2Params::insecure_fast())
    }

    fn service() -> (Arc<MemoryStore>, AuthService) {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::load(store.clone(), hasher());
        (store, auth)
    }

    #[test]
    fn test_signup_logs_in_and_hashes() {
        let (store, mut auth) = service();
        let user = auth.signup("rider@example.com", "hunter22", "Rider").unwrap();

        assert!(auth.is_logged_in());
        assert_eq!(auth.current_user(), Some(&user));
        assert!(uuid::Uuid::parse_str(&user.id).is_ok());

        let raw = store.get("account-registry").unwrap().unwrap();
        assert!(!raw.contains("hunter22"));
        assert!(raw.contains("$argon2id$"));

        let session = store.get("session-user").unwrap().unwrap();
        assert!(!session.contains("passwordHash"));
    }

    #[test]
    fn test_signup_validation() {
        let (_, mut auth) = service();
        assert!(matches!(auth.signup("", "hunter22", "Rider"), Err(Error::Validation(_))));
        assert!(matches!(auth.signup("a@b.co", "hunter22", "  "), Err(Error::Validation(_))));
        assert!(matches!(auth.signup("a@b.co", "short", "Rider"), Err(Error::Validation(_))));
        assert!(matches!(auth.signup("not-an-email", "hunter22", "Rider"), Err(Error::Validation(_))));
        assert!(!auth.is_logged_in());
        assert!(auth.registry().is_empty());
    }

    #[test]
    fn test_duplicate_signup_keeps_original() {
        let (_, mut auth) = service();
        let first = auth.signup("rider@example.com", "hunter22", "Rider").unwrap();
        auth.logout().unwrap();

        let err = auth.signup("rider@example.com", "other-pass", "Imposter").unwrap_err();
        assert!(matches!(err, Error::EmailTaken));
        assert!(!auth.is_logged_in());

        let record = auth.registry().get("rider@example.com").unwrap();
        assert_eq!(record.id, first.id);
        assert_eq!(record.name, "Rider");
        assert!(auth.login("rider@example.com", "hunter22").is_ok());
    }

    #[test]
    fn test_login_failures_are_uniform() {
        let (_, mut auth) = service();
        auth.signup("rider@example.com", "hunter22", "Rider").unwrap();
        auth.logout().unwrap();

        let wrong_password = auth.login("rider@example.com", "hunter23").unwrap_err();
        let unknown_email = auth.login("ghost@example.com", "hunter22").unwrap_err();
        let too_short = auth.login("rider@example.com", "hunt").unwrap_err();

        assert!(matches!(wrong_password, Error::InvalidCredentials));
        assert!(matches!(unknown_email, Error::InvalidCredentials));
        assert!(matches!(too_short, Error::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn test_session_survives_reload() {
        let (store, mut auth) = service();
        let user = auth.signup("rider@example.com", "hunter22", "Rider").unwrap();

        let reloaded = AuthService::load(store.clone(), hasher());
        assert_eq!(reloaded.current_user(), Some(&user));

        auth.logout().unwrap();
        let reloaded = AuthService::load(store, hasher());
        assert!(!reloaded.is_logged_in());
        assert_eq!(reloaded.registry().len(), 1);
    }

    #[test]
    fn test_confirm_password() {
        assert!(AuthService::confirm_password("hunter22", "hunter22").is_ok());
        assert!(matches!(
            AuthService::confirm_password("hunter22", "hunter23"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_update_profile_without_session_is_noop() {
        let (store, mut auth) = service();
        let update = ProfileUpdate {
            name: Some("Nobody".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(auth.update_profile(&update).unwrap(), None);
        assert_eq!(store.get("session-user").unwrap(), None);
    }

    #[test]
    fn test_update_profile_rekeys_registry() {
        let (store, mut auth) = service();
        auth.signup("old@example.com", "hunter22", "Rider").unwrap();

        let update = ProfileUpdate {
            email: Some("new@example.com".to_string()),
            avatar: Some("https://img.example.com/me.png".to_string()),
            ..ProfileUpdate::default()
        };
        let user = auth.update_profile(&update).unwrap().unwrap();
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.name, "Rider");

        let reloaded = AuthService::load(store, hasher());
        assert!(reloaded.registry().get("old@example.com").is_none());
        assert_eq!(
            reloaded.registry().get("new@example.com").unwrap().avatar.as_deref(),
            Some("https://img.example.com/me.png")
        );
        assert_eq!(reloaded.current_user().unwrap().email, "new@example.com");

        auth.logout().unwrap();
        assert!(auth.login("new@example.com", "hunter22").is_ok());
    }

    #[test]
    fn test_update_profile_email_taken() {
        let (_, mut auth) = service();
        auth.signup("taken@example.com", "hunter22", "First").unwrap();
        auth.signup("me@example.com", "hunter22", "Second").unwrap();

        let update = ProfileUpdate {
            email: Some("taken@example.com".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(matches!(auth.update_profile(&update), Err(Error::EmailTaken)));
        assert_eq!(auth.current_user().unwrap().email, "me@example.com");
        assert_eq!(auth.registry().get("taken@example.com").unwrap().name, "First");
    }

    #[test]
    fn test_update_profile_trims_fields() {
        let (store, mut auth) = service();
        auth.signup("old@example.com", "hunter22", "Rider").unwrap();

        let update = ProfileUpdate {
            name: Some("  Bob ".to_string()),
            email: Some(" bob@example.com ".to_string()),
            ..ProfileUpdate::default()
        };
        let user = auth.update_profile(&update).unwrap().unwrap();
        assert_eq!(user.name, "Bob");
        assert_eq!(user.email, "bob@example.com");

        let reloaded = AuthService::load(store, hasher());
        assert_eq!(reloaded.registry().get("bob@example.com").unwrap().name, "Bob");
        assert!(reloaded.registry().get(" bob@example.com ").is_none());

        let blank = ProfileUpdate {
            name: Some("   ".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(matches!(auth.update_profile(&blank), Err(Error::Validation(_))));
    }

    #[test]
    fn test_signup_after_failed_load_keeps_accounts() {
        let store = Arc::new(FailingStore::new());
        AuthService::load(store.clone(), hasher())
            .signup("old@example.com", "hunter22", "Old")
            .unwrap();

        store.fail_reads(true);
        let mut auth = AuthService::load(store.clone(), hasher());
        assert!(auth.registry().is_empty());

        let err = auth.signup("new@example.com", "hunter22", "New").unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        store.fail_reads(false);
        auth.signup("new@example.com", "hunter22", "New").unwrap();

        let reloaded = AuthService::load(store, hasher());
        assert_eq!(reloaded.registry().len(), 2);
        assert_eq!(reloaded.registry().get("old@example.com").unwrap().name, "Old");
    }

    #[test]
    fn test_update_profile_on_unreadable_registry_fails() {
        let store = Arc::new(FailingStore::new());
        let mut auth = AuthService::load(store.clone(), hasher());
        auth.signup("other@example.com", "hunter22", "Other").unwrap();
        auth.signup("me@example.com", "hunter22", "Me").unwrap();

        store.fail_reads(true);
        let update = ProfileUpdate {
            name: Some("Renamed".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(matches!(auth.update_profile(&update), Err(Error::Storage(_))));
        assert_eq!(auth.current_user().unwrap().name, "Me");

        store.fail_reads(false);
        let reloaded = AuthService::load(store, hasher());
        assert_eq!(reloaded.registry().len(), 2);
        assert_eq!(reloaded.registry().get("me@example.com").unwrap().name, "Me");
    }

    #[test]
    fn test_login_miss_costs_a_hash() {
        let params = Argon2Params {
            memory_cost: 8192,
            time_cost: 2,
            ..Argon2Params::insecure_fast()
        };
        let mut auth = AuthService::load(Arc::new(MemoryStore::new()), PasswordHasher::new(params));
        auth.signup("rider@example.com", "hunter22", "Rider").unwrap();
        auth.logout().unwrap();

        let start = Instant::now();
        assert!(auth.login("rider@example.com", "hunter23").is_err());
        let wrong_password = start.elapsed();

        let start = Instant::now();
        assert!(auth.login("ghost@example.com", "hunter23").is_err());
        let unknown_email = start.elapsed();

        let start = Instant::now();
        assert!(auth.login("rider@example.com", "hunt").is_err());
        let too_short = start.elapsed();

        assert!(unknown_email * 4 >= wrong_password, "{:?} vs {:?}", unknown_email, wrong_password);
        assert!(too_short * 4 >= wrong_password, "{:?} vs {:?}", too_short, wrong_password);
    }
}
