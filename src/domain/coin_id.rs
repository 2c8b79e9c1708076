//! Type-safe coin identifier.
//!
//! [`CoinId`] is a newtype wrapper around the upstream price API's coin
//! slug (e.g. `bitcoin`, `matic-network`) so that coin identifiers cannot
//! be confused with other strings flowing through the service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Maximum length of a coin identifier, matching the `coin_id` column.
pub const MAX_COIN_ID_LEN: usize = 50;

/// Identifier of a tracked coin.
///
/// Always non-empty, trimmed, and at most [`MAX_COIN_ID_LEN`] characters.
/// Not a foreign key to anything: the configured coin list is the only
/// source of truth for which ids get written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(String);

impl CoinId {
    /// Parses and validates a coin identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidRequest`] if the trimmed value is empty
    /// or longer than [`MAX_COIN_ID_LEN`].
    pub fn parse(raw: &str) -> Result<Self, StatsError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StatsError::InvalidRequest(
                "coin parameter is required".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_COIN_ID_LEN {
            return Err(StatsError::InvalidRequest(format!(
                "coin id exceeds {MAX_COIN_ID_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wraps a caller-supplied lookup key without validation.
    ///
    /// Only used for read queries: an id that could never have been stored
    /// (blank, overlong) simply matches no rows. Returns `None` for an
    /// empty string.
    #[must_use]
    pub fn lookup(raw: &str) -> Option<Self> {
        (!raw.is_empty()).then(|| Self(raw.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CoinId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CoinId> for String {
    fn from(id: CoinId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let Ok(id) = CoinId::parse("  bitcoin ") else {
            panic!("valid coin id");
        };
        assert_eq!(id.as_str(), "bitcoin");
        assert_eq!(format!("{id}"), "bitcoin");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(
            CoinId::parse("   "),
            Err(StatsError::InvalidRequest(_))
        ));
    }

    #[test]
    fn parse_rejects_overlong() {
        let long = "x".repeat(MAX_COIN_ID_LEN + 1);
        assert!(CoinId::parse(&long).is_err());
        assert!(CoinId::parse(&"x".repeat(MAX_COIN_ID_LEN)).is_ok());
    }

    #[test]
    fn lookup_keeps_value_verbatim() {
        let long = "x".repeat(MAX_COIN_ID_LEN + 1);
        let Some(id) = CoinId::lookup(&long) else {
            panic!("non-empty lookup key");
        };
        assert_eq!(id.as_str(), long);
        assert_eq!(CoinId::lookup("  ").map(String::from).as_deref(), Some("  "));
        assert!(CoinId::lookup("").is_none());
    }

    #[test]
    fn serde_is_transparent() {
        let Ok(id) = CoinId::parse("matic-network") else {
            panic!("valid coin id");
        };
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"matic-network\""));
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let Ok(id) = CoinId::parse("ethereum") else {
            panic!("valid coin id");
        };
        let mut map = HashMap::new();
        map.insert(id.clone(), "test");
        assert_eq!(map.get(&id), Some(&"test"));
    }
}
