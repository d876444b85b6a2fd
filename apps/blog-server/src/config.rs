//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blog_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; actix picks one per physical core when unset.
    pub workers: Option<usize>,
    pub database_url: String,
    pub test_database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(lookup("PORT")).unwrap_or(8080),
            workers: parse_var(lookup("HTTP_WORKERS")).filter(|&n: &usize| n > 0),
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "memory://".to_string()),
            test_database_url: lookup("TEST_DATABASE_URL")
                .unwrap_or_else(|| "memory://test".to_string()),
            db_max_connections: parse_var(lookup("DB_MAX_CONNECTIONS")).unwrap_or(10),
            db_min_connections: parse_var(lookup("DB_MIN_CONNECTIONS")).unwrap_or(1),
        }
    }

    /// Store configuration for `url` using the configured pool sizes.
    pub fn database_config(&self, url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: self.db_max_connections,
            min_connections: self.db_min_connections,
        }
    }
}

fn parse_var<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}
