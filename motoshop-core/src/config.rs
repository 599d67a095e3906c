//! Configuration management
//!
//! Settings live in `settings.json` inside the shop directory:
//! ```json
//! {
//!   "promoCodes": { "MOTO10": 10, "SPRING30": 30 },
//!   "catalogPath": "/path/to/catalog.json",
//!   "passwordHashing": { "timeCost": 3, "memoryCost": 65536, "parallelism": 4, "hashLen": 32 }
//! }
//! ```
//! Fields the shop does not manage are kept intact on save.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{Argon2Params, PromoTable};

/// Environment variable overriding the catalog file
pub const CATALOG_ENV: &str = "MOTOSHOP_CATALOG";

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    promo_codes: Option<BTreeMap<String, u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    catalog_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hashing: Option<Argon2Params>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Shop configuration (resolved view of settings.json plus environment)
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Promo code table; `None` means the built-in codes
    pub promo_codes: Option<BTreeMap<String, u8>>,
    /// Catalog file replacing the built-in lineup
    pub catalog_path: Option<PathBuf>,
    pub password_hashing: Argon2Params,
}

impl Config {
    /// Load config from the shop directory
    ///
    /// A missing or unreadable settings.json yields the defaults.
    /// `MOTOSHOP_CATALOG` takes precedence over `catalogPath`.
    pub fn load(shop_dir: &Path) -> Result<Self> {
        let raw = read_settings(shop_dir)?;

        let catalog_path = match std::env::var(CATALOG_ENV) {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => raw.catalog_path,
        };

        Ok(Self {
            promo_codes: raw.promo_codes,
            catalog_path,
            password_hashing: raw.password_hashing.unwrap_or_default(),
        })
    }

    /// Save config to the shop directory, preserving unmanaged fields
    pub fn save(&self, shop_dir: &Path) -> Result<()> {
        let mut settings = read_settings(shop_dir)?;

        settings.promo_codes = self.promo_codes.clone();
        settings.catalog_path = self.catalog_path.clone();
        settings.password_hashing = Some(self.password_hashing.clone());

        std::fs::create_dir_all(shop_dir)
            .with_context(|| format!("Failed to create {}", shop_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(shop_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// The promo table in effect, validated
    pub fn promo_table(&self) -> crate::domain::result::Result<PromoTable> {
        match &self.promo_codes {
            Some(codes) => PromoTable::new(codes.iter().map(|(code, pct)| (code.as_str(), *pct))),
            None => Ok(PromoTable::default()),
        }
    }
}

fn read_settings(shop_dir: &Path) -> Result<SettingsFile> {
    let settings_path = shop_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_settings() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.promo_codes.is_none());
        assert_eq!(config.password_hashing, Argon2Params::default());
        assert_eq!(config.promo_table().unwrap().lookup("moto10"), Some(("MOTO10".to_string(), 10)));
    }

    #[test]
    fn test_promo_codes_from_settings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "promoCodes": { "SPRING30": 30 } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        let table = config.promo_table().unwrap();
        assert_eq!(table.lookup(" spring30 "), Some(("SPRING30".to_string(), 30)));
        assert!(table.lookup("MOTO10").is_none());
    }

    #[test]
    fn test_invalid_promo_percent_is_config_error() {
        let config = Config {
            promo_codes: Some(BTreeMap::from([("FREE".to_string(), 0)])),
            ..Config::default()
        };
        assert!(config.promo_table().is_err());
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "theme": "dark", "promoCodes": { "MOTO10": 10 } }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.password_hashing = Argon2Params::insecure_fast();
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("settings.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["promoCodes"]["MOTO10"], 10);
        assert_eq!(saved["passwordHashing"]["timeCost"], 1);
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ nope").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.promo_codes.is_none());
        assert_eq!(config.password_hashing, Argon2Params::default());
    }
}
