//! Database pool, migrations, and the readiness ping

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Fail a checkout fast; the request timeout layer sits at 30 seconds and a
/// saturated pool should surface well before that
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
/// The stats summary fans out six queries at once, so a warm floor of
/// connections is kept instead of letting the pool drain to zero
const MIN_CONNECTIONS: u32 = 2;
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Create the PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options =
        PgConnectOptions::from_str(&config.url)?.application_name("health-hub-backend");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(MIN_CONNECTIONS.min(config.max_connections))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        max_connections = config.max_connections,
        "Database pool created"
    );

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}

/// Ping the database, returning the round-trip time
pub async fn ping(pool: &PgPool) -> Result<Duration> {
    let started = Instant::now();
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!("Database ping failed: {}", e);
        e
    })?;
    Ok(started.elapsed())
}
