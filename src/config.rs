//! Configuration Module
//!
//! Explicit configuration struct constructed once at startup and passed by
//! reference into the cache and runner constructors. Values load from
//! environment variables with sensible defaults and are validated eagerly so
//! misconfiguration fails at boot, not under load.

use std::env;
use std::time::Duration;

use crate::concurrency::RunnerOptions;
use crate::error::{InfraError, Result};
use crate::pagination::PageLimits;

// == Domain Cache Settings ==
/// Capacity and freshness settings for one named cache domain.
#[derive(Debug, Clone)]
pub struct DomainSettings {
    /// Maximum number of entries the domain cache can hold
    pub max_entries: usize,
    /// Default TTL for entries without an explicit override
    pub ttl: Duration,
    /// Whether a cache hit refreshes the entry's recency
    pub update_age_on_get: bool,
}

impl DomainSettings {
    /// Creates settings with the given capacity and TTL in seconds.
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            max_entries,
            ttl: Duration::from_secs(ttl_secs),
            update_age_on_get: true,
        }
    }
}

// == Search Cache Settings ==
/// Settings for the two-tier search cache.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Maximum number of cached query -> result-set mappings
    pub max_queries: usize,
    /// Maximum number of cached result payloads
    pub max_results: usize,
    /// TTL for query-tier entries
    pub query_ttl: Duration,
    /// TTL for stable result payloads
    pub result_ttl: Duration,
    /// Shorter TTL applied to results flagged as likely to change
    pub volatile_ttl: Duration,
    /// Whether result volatility selects between the two TTLs
    pub adaptive_ttl: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_queries: 500,
            max_results: 200,
            query_ttl: Duration::from_secs(300),
            result_ttl: Duration::from_secs(600),
            volatile_ttl: Duration::from_secs(60),
            adaptive_ttl: true,
        }
    }
}

// == Config ==
/// Top-level configuration for the cache infrastructure server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Channel list/info cache
    pub channels: DomainSettings,
    /// User profile cache
    pub users: DomainSettings,
    /// File metadata cache
    pub files: DomainSettings,
    /// Thread replies cache
    pub threads: DomainSettings,
    /// Two-tier search cache
    pub search: SearchSettings,
    /// Default in-flight ceiling for bulk operations
    pub default_concurrency: usize,
    /// Safety ceiling on pages fetched per paginated walk
    pub max_pages: usize,
    /// Safety ceiling on items collected per paginated walk
    pub max_items: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background stale-purge interval in seconds
    pub purge_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CHANNELS_MAX` / `CHANNELS_TTL` - Channel cache capacity / TTL seconds
    /// - `USERS_MAX` / `USERS_TTL` - User cache capacity / TTL seconds
    /// - `FILES_MAX` / `FILES_TTL` - File cache capacity / TTL seconds
    /// - `THREADS_MAX` / `THREADS_TTL` - Thread cache capacity / TTL seconds
    /// - `DEFAULT_CONCURRENCY` - Bulk operation in-flight ceiling (default: 3)
    /// - `MAX_PAGES` / `MAX_ITEMS` - Pagination safety bounds
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PURGE_INTERVAL` - Stale purge frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            channels: DomainSettings::new(
                env_usize("CHANNELS_MAX", defaults.channels.max_entries),
                env_u64("CHANNELS_TTL", defaults.channels.ttl.as_secs()),
            ),
            users: DomainSettings::new(
                env_usize("USERS_MAX", defaults.users.max_entries),
                env_u64("USERS_TTL", defaults.users.ttl.as_secs()),
            ),
            files: DomainSettings::new(
                env_usize("FILES_MAX", defaults.files.max_entries),
                env_u64("FILES_TTL", defaults.files.ttl.as_secs()),
            ),
            threads: DomainSettings::new(
                env_usize("THREADS_MAX", defaults.threads.max_entries),
                env_u64("THREADS_TTL", defaults.threads.ttl.as_secs()),
            ),
            search: SearchSettings::default(),
            default_concurrency: env_usize("DEFAULT_CONCURRENCY", defaults.default_concurrency),
            max_pages: env_usize("MAX_PAGES", defaults.max_pages),
            max_items: env_usize("MAX_ITEMS", defaults.max_items),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            purge_interval: env_u64("PURGE_INTERVAL", defaults.purge_interval),
        }
    }

    /// Runner options seeded with the configured in-flight ceiling.
    ///
    /// Bulk operations build on these instead of the library default, so
    /// `DEFAULT_CONCURRENCY` in the environment takes effect.
    pub fn runner_options<E>(&self) -> RunnerOptions<E> {
        RunnerOptions::new().with_concurrency(self.default_concurrency)
    }

    /// Pagination safety ceilings for `execute_pagination`.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            max_pages: self.max_pages,
            max_items: self.max_items,
        }
    }

    /// Validates the configuration, failing fast on values the cache
    /// constructors would reject anyway.
    pub fn validate(&self) -> Result<()> {
        for (name, settings) in [
            ("channels", &self.channels),
            ("users", &self.users),
            ("files", &self.files),
            ("threads", &self.threads),
        ] {
            if settings.max_entries == 0 {
                return Err(InfraError::Config(format!(
                    "{} cache capacity must be greater than zero",
                    name
                )));
            }
        }
        if self.search.max_queries == 0 || self.search.max_results == 0 {
            return Err(InfraError::Config(
                "search cache capacities must be greater than zero".to_string(),
            ));
        }
        if self.default_concurrency == 0 {
            return Err(InfraError::Config(
                "default concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_pages == 0 || self.max_items == 0 {
            return Err(InfraError::Config(
                "pagination safety bounds must be greater than zero".to_string(),
            ));
        }
        if self.purge_interval == 0 {
            return Err(InfraError::Config(
                "purge interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channels: DomainSettings::new(1000, 3600),
            users: DomainSettings::new(2000, 1800),
            files: DomainSettings::new(500, 900),
            threads: DomainSettings::new(1000, 300),
            search: SearchSettings::default(),
            default_concurrency: 3,
            max_pages: 100,
            max_items: 10_000,
            server_port: 3000,
            purge_interval: 60,
        }
    }
}

// == Env Helpers ==
fn env_usize(name: &str, default: usize) -> usize {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
