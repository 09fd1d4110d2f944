//! PostgreSQL pool construction.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Pool sizing and timeouts, filled in from the host application's config.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl PoolSettings {
    /// Small pool for tests and one-off tooling.
    pub fn minimal(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// Opens the process-wide connection pool. One pool serves every repository;
/// request handlers never open connections of their own.
pub async fn create_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .connect(&settings.url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_settings() {
        let settings = PoolSettings::minimal("postgres://localhost/fleettrack");
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.min_connections, 1);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(10));
        assert_eq!(settings.url, "postgres://localhost/fleettrack");
    }
}
