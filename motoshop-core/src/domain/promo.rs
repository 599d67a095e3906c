//! Promo code table

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Codes accepted out of the box
pub const DEFAULT_PROMO_CODES: &[(&str, u8)] = &[
    ("MOTO10", 10),
    ("SPEED20", 20),
    ("RIDER15", 15),
    ("NEWBIKE", 25),
];

/// Fixed mapping from canonical promo code to discount percent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromoTable {
    codes: BTreeMap<String, u8>,
}

impl Default for PromoTable {
    fn default() -> Self {
        Self {
            codes: DEFAULT_PROMO_CODES
                .iter()
                .map(|(code, percent)| (code.to_string(), *percent))
                .collect(),
        }
    }
}

impl PromoTable {
    /// Build a table from configured codes
    ///
    /// Codes are normalized; percents must be in 1..=100 so that an applied
    /// code always carries a non-zero discount.
    pub fn new<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: AsRef<str>,
    {
        let mut table = BTreeMap::new();
        for (code, percent) in codes {
            let code = Self::normalize(code.as_ref());
            if code.is_empty() {
                return Err(Error::config("promo code cannot be empty"));
            }
            if !(1..=100).contains(&percent) {
                return Err(Error::config(format!(
                    "promo code {} has discount {}%, expected 1..=100",
                    code, percent
                )));
            }
            table.insert(code, percent);
        }
        Ok(Self { codes: table })
    }

    /// Canonical form of user input: trimmed, uppercase
    pub fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Resolve user input to (canonical code, percent)
    pub fn lookup(&self, code: &str) -> Option<(String, u8)> {
        let canonical = Self::normalize(code);
        self.codes
            .get(&canonical)
            .map(|percent| (canonical, *percent))
    }

    pub fn codes(&self) -> impl Iterator<Item = (&str, u8)> {
        self.codes.iter().map(|(code, percent)| (code.as_str(), *percent))
    }
}
