//! Application configuration loaded from environment variables.

use std::env;

use market_core::resource::UnknownFieldPolicy;
use market_core::service::DEFAULT_PAGE_SIZE;
use market_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub listings: ListingsConfig,
}

/// Settings of the listing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingsConfig {
    pub page_size: u64,
    pub unknown_fields: UnknownFieldPolicy,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            unknown_fields: UnknownFieldPolicy::Ignore,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            listings: ListingsConfig::from_vars(
                env::var("LISTINGS_PAGE_SIZE").ok().as_deref(),
                env::var("STRICT_WRITES").ok().as_deref(),
            ),
        }
    }
}

impl ListingsConfig {
    /// Build from raw `LISTINGS_PAGE_SIZE` / `STRICT_WRITES` values.
    /// Unparseable or zero page sizes fall back to the default.
    fn from_vars(page_size: Option<&str>, strict_writes: Option<&str>) -> Self {
        let page_size = page_size
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let unknown_fields = match strict_writes.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "true" || v == "1" => UnknownFieldPolicy::Reject,
            _ => UnknownFieldPolicy::Ignore,
        };

        Self {
            page_size,
            unknown_fields,
        }
    }
}
