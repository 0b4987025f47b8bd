//! Application settings loaded from environment variables.
//!
//! Values come from the process environment (populated from `.env` by `dotenvy`
//! in `main`). Every setting has a default so a bare checkout starts with a local
//! `SQLite` file and a five minute catalog cache.

use crate::errors::{Error, Result};
use std::time::Duration;

/// Default database location, created on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://bakery_buddy.sqlite?mode=rwc";

/// Default lifetime of the ingredient and recipe snapshots, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default path of the catalog seed file.
pub const DEFAULT_CATALOG_PATH: &str = "config.toml";

/// Settings shared by the whole application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Connection string passed to `SeaORM`
    pub database_url: String,
    /// How long cached catalog reads stay fresh
    pub cache_ttl: Duration,
    /// Where to read the catalog seed file from
    pub catalog_path: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
        }
    }
}

impl AppSettings {
    /// Reads `DATABASE_URL`, `CATALOG_CACHE_TTL_SECS` and `CATALOG_CONFIG_PATH`.
    ///
    /// # Errors
    /// Returns `Error::Config` if `CATALOG_CACHE_TTL_SECS` is not a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_ttl = match lookup("CATALOG_CACHE_TTL_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| Error::Config {
                    message: format!("CATALOG_CACHE_TTL_SECS must be a number of seconds: {e}"),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.cache_ttl,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            cache_ttl,
            catalog_path: lookup("CATALOG_CONFIG_PATH").unwrap_or(defaults.catalog_path),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = AppSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides_are_applied() {
        let settings = AppSettings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("CATALOG_CACHE_TTL_SECS", "60"),
            ("CATALOG_CONFIG_PATH", "seed.toml"),
        ]))
        .unwrap();

        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.cache_ttl, Duration::from_secs(60));
        assert_eq!(settings.catalog_path, "seed.toml");
    }

    #[test]
    fn test_invalid_ttl_is_rejected() {
        let result = AppSettings::from_lookup(lookup_from(&[("CATALOG_CACHE_TTL_SECS", "soon")]));
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
