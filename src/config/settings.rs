use anyhow::{Context, Result, bail};

use crate::ranking::Rank;

#[derive(Debug, Clone)]
pub struct LadderSettings {
    /// Smallest rank gap at which an upset moves anyone.
    /// 1: every upset counts, adjacent players swap.
    /// 2: an upset between adjacent players is ignored.
    pub minimum_upset_gap: Rank,
}

impl Default for LadderSettings {
    fn default() -> Self {
        Self {
            minimum_upset_gap: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
    pub busy_timeout_ms: u64,
    pub pool_size: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "club_ladder.db".to_string(),
            busy_timeout_ms: 5000,
            pool_size: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ladder: LadderSettings,
    pub database: DatabaseSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            ladder: LadderSettings::default(),
            database: DatabaseSettings::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the known keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database.path = path;
        }
        if let Some(value) = lookup("DATABASE_BUSY_TIMEOUT_MS") {
            config.database.busy_timeout_ms = parse_setting("DATABASE_BUSY_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("DATABASE_POOL_SIZE") {
            config.database.pool_size = parse_setting("DATABASE_POOL_SIZE", &value)?;
        }
        if let Some(value) = lookup("LADDER_MINIMUM_UPSET_GAP") {
            config.ladder.minimum_upset_gap = parse_setting("LADDER_MINIMUM_UPSET_GAP", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.ladder.minimum_upset_gap < 1 {
            bail!(
                "LADDER_MINIMUM_UPSET_GAP must be at least 1, got {}",
                self.ladder.minimum_upset_gap
            );
        }
        if self.database.pool_size == 0 {
            bail!("DATABASE_POOL_SIZE must be at least 1");
        }
        Ok(())
    }
}

fn parse_setting<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.ladder.minimum_upset_gap, 1);
        assert_eq!(config.database.path, "club_ladder.db");
        assert_eq!(config.database.pool_size, 4);
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_PATH", "/tmp/ladder.db"),
            ("LADDER_MINIMUM_UPSET_GAP", "2"),
            ("DATABASE_BUSY_TIMEOUT_MS", " 250 "),
        ]))
        .unwrap();

        assert_eq!(config.database.path, "/tmp/ladder.db");
        assert_eq!(config.ladder.minimum_upset_gap, 2);
        assert_eq!(config.database.busy_timeout_ms, 250);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let rejected = [
            ("LADDER_MINIMUM_UPSET_GAP", "0"),
            ("LADDER_MINIMUM_UPSET_GAP", "two"),
            ("DATABASE_POOL_SIZE", "0"),
        ];
        for (key, value) in rejected {
            assert!(AppConfig::from_lookup(lookup_from(&[(key, value)])).is_err(), "{key}={value}");
        }
    }
}
