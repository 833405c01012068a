use std::{env, path::PathBuf, time::Duration};

use benson_core::costing::CostingPolicy;

use crate::instrument::Instrumentation;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default cache TTL in minutes (default: 5)
    pub cache_ttl_minutes: u64,
    /// TTL of the active-jobs dashboard in minutes (default: 15)
    pub dashboard_ttl_minutes: u64,
    /// Namespace prefix for cache keys in the key-value medium (default: "benson_cache_")
    pub cache_prefix: String,
    /// File backing the cache. `None` keeps the cache in memory.
    pub cache_file: Option<PathBuf>,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Share of estimate revenue assumed to be cost (default: 0.7)
    pub estimated_cost_ratio: f64,
    /// On-budget tolerance in percent (default: 5)
    pub budget_tolerance_pct: f64,
    /// Log fetch timings (default: on in debug builds)
    pub perf_log: bool,
    /// Fetches slower than this many milliseconds are logged as slow (default: 100)
    pub slow_fetch_ms: u64,
    /// Path to SQLite database file (default: "benson.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
    pub sqlite_path: String,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BENSON_CACHE_TTL_MINUTES` - Cache TTL in minutes (default: 5)
    /// - `BENSON_DASHBOARD_TTL_MINUTES` - Dashboard TTL in minutes (default: 15)
    /// - `BENSON_CACHE_PREFIX` - Cache key prefix (default: "benson_cache_")
    /// - `BENSON_CACHE_FILE` - Persist the cache to this file (default: unset)
    /// - `BENSON_CACHE_MAX_ENTRIES` - Maximum in-memory cache entries (default: 10,000)
    /// - `BENSON_ESTIMATED_COST_RATIO` - Estimated cost ratio (default: 0.7)
    /// - `BENSON_BUDGET_TOLERANCE_PCT` - Budget tolerance percent (default: 5)
    /// - `BENSON_PERF_LOG` - Log fetch timings (default: debug builds only)
    /// - `BENSON_SLOW_FETCH_MS` - Slow fetch threshold (default: 100)
    /// - `BENSON_SQLITE_PATH` - SQLite database path (default: "benson.db")
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let policy = CostingPolicy::default();

        Self {
            cache_ttl_minutes: parse_var("BENSON_CACHE_TTL_MINUTES").unwrap_or(5),
            dashboard_ttl_minutes: parse_var("BENSON_DASHBOARD_TTL_MINUTES").unwrap_or(15),
            cache_prefix: env::var("BENSON_CACHE_PREFIX")
                .unwrap_or_else(|_| "benson_cache_".to_string()),
            cache_file: env::var_os("BENSON_CACHE_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            cache_max_entries: parse_var("BENSON_CACHE_MAX_ENTRIES").unwrap_or(10_000),
            estimated_cost_ratio: parse_var("BENSON_ESTIMATED_COST_RATIO")
                .unwrap_or(policy.estimated_cost_ratio),
            budget_tolerance_pct: parse_var("BENSON_BUDGET_TOLERANCE_PCT")
                .unwrap_or(policy.budget_tolerance_pct),
            perf_log: parse_var("BENSON_PERF_LOG").unwrap_or(cfg!(debug_assertions)),
            slow_fetch_ms: parse_var("BENSON_SLOW_FETCH_MS").unwrap_or(100),
            sqlite_path: env::var("BENSON_SQLITE_PATH")
                .unwrap_or_else(|_| "benson.db".to_string()),
        }
    }

    /// Get the default cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }

    /// Get the dashboard cache TTL as a Duration.
    pub fn dashboard_ttl(&self) -> Duration {
        Duration::from_secs(self.dashboard_ttl_minutes * 60)
    }

    pub fn costing_policy(&self) -> CostingPolicy {
        CostingPolicy {
            estimated_cost_ratio: self.estimated_cost_ratio,
            budget_tolerance_pct: self.budget_tolerance_pct,
        }
    }

    pub fn instrumentation(&self) -> Instrumentation {
        Instrumentation::new(self.perf_log, Duration::from_millis(self.slow_fetch_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
