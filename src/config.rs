//! Configuration Module
//!
//! Cache construction parameters, loadable from environment variables or
//! deserialized from a host application's own configuration.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{CacheError, Result};

// == Sweep Policy ==
/// How much of the cache a `set` scans for expired entries before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPolicy {
    /// Scan every entry on each write.
    #[default]
    Full,
    /// Scan at most `limit` entries, starting from the least recently used.
    Tail { limit: usize },
    /// Never sweep on write; expired entries are reclaimed only when read.
    Off,
}

impl FromStr for SweepPolicy {
    type Err = CacheError;

    /// Parses `full`, `off` or `tail:<n>`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(SweepPolicy::Full),
            "off" => Ok(SweepPolicy::Off),
            other => other
                .strip_prefix("tail:")
                .and_then(|n| n.trim().parse().ok())
                .map(|limit| SweepPolicy::Tail { limit })
                .ok_or_else(|| CacheError::InvalidConfig(format!("unknown sweep policy '{}'", s))),
        }
    }
}

impl fmt::Display for SweepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepPolicy::Full => write!(f, "full"),
            SweepPolicy::Tail { limit } => write!(f, "tail:{}", limit),
            SweepPolicy::Off => write!(f, "off"),
        }
    }
}

// == Cache Config ==
/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries; 0 selects [`DEFAULT_CAPACITY`]
    pub capacity: usize,
    /// Write-path expiry sweep
    pub sweep: SweepPolicy,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 500)
    /// - `CACHE_SWEEP` - `full`, `off` or `tail:<n>` (default: full)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            sweep: env_or("CACHE_SWEEP", defaults.sweep),
        }
    }

    /// Capacity the cache will actually enforce.
    pub fn effective_capacity(&self) -> usize {
        if self.capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            self.capacity
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            sweep: SweepPolicy::Full,
        }
    }
}

fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring {}={:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 500);
        assert_eq!(config.sweep, SweepPolicy::Full);
    }

    #[test]
    fn test_effective_capacity_zero_maps_to_default() {
        let config = CacheConfig {
            capacity: 0,
            sweep: SweepPolicy::Off,
        };
        assert_eq!(config.effective_capacity(), DEFAULT_CAPACITY);

        let config = CacheConfig {
            capacity: 7,
            sweep: SweepPolicy::Off,
        };
        assert_eq!(config.effective_capacity(), 7);
    }

    #[test]
    fn test_sweep_policy_parse() {
        assert_eq!("full".parse::<SweepPolicy>().unwrap(), SweepPolicy::Full);
        assert_eq!("OFF".parse::<SweepPolicy>().unwrap(), SweepPolicy::Off);
        assert_eq!(
            " tail:16 ".parse::<SweepPolicy>().unwrap(),
            SweepPolicy::Tail { limit: 16 }
        );
        assert!(matches!(
            "tail:".parse::<SweepPolicy>(),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            "sometimes".parse::<SweepPolicy>(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sweep_policy_display_parses_back() {
        for policy in [SweepPolicy::Full, SweepPolicy::Off, SweepPolicy::Tail { limit: 3 }] {
            assert_eq!(policy.to_string().parse::<SweepPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: CacheConfig = serde_json::from_str(r#"{"capacity": 32}"#).unwrap();
        assert_eq!(config.capacity, 32);
        assert_eq!(config.sweep, SweepPolicy::Full);

        let config: CacheConfig =
            serde_json::from_str(r#"{"sweep": {"tail": {"limit": 8}}}"#).unwrap();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.sweep, SweepPolicy::Tail { limit: 8 });

        let config: CacheConfig = serde_json::from_str(r#"{"sweep": "off"}"#).unwrap();
        assert_eq!(config.sweep, SweepPolicy::Off);
    }

    // Env vars are process-global, so every env case lives in this one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_SWEEP");
        assert_eq!(CacheConfig::from_env(), CacheConfig::default());

        env::set_var("CACHE_CAPACITY", "64");
        env::set_var("CACHE_SWEEP", "tail:10");
        let config = CacheConfig::from_env();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.sweep, SweepPolicy::Tail { limit: 10 });

        env::set_var("CACHE_CAPACITY", "lots");
        env::set_var("CACHE_SWEEP", "never");
        assert_eq!(CacheConfig::from_env(), CacheConfig::default());

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_SWEEP");
    }
}
