//! Database connection pool management
//!
//! Provides pool creation, verification and migration for the PostgreSQL-backed
//! stores. Timeouts for the persistent backend are owned here: connection
//! acquisition is bounded by `acquire_timeout_secs` and every statement by the
//! server-side `statement_timeout`.

pub mod env_utils;
mod metrics;

use env_utils::parse_env_with_default;
use metrics::{record_statement_timeout, update_pool_metrics};
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

/// Database connection pool configuration
#[derive(Clone)]
pub struct DbConfig {
    /// Service name for metrics labeling
    pub service_name: String,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection creation timeout (new connection to PostgreSQL)
    pub connect_timeout_secs: u64,
    /// Connection acquisition timeout (get connection from pool)
    pub acquire_timeout_secs: u64,
    /// Connection idle timeout
    pub idle_timeout_secs: u64,
    /// Connection maximum lifetime
    pub max_lifetime_secs: u64,
    /// Server-side per-statement timeout; 0 disables it
    pub statement_timeout_ms: u64,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .field("statement_timeout_ms", &self.statement_timeout_ms)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: String::from("unknown"),
            database_url: String::new(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 5,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            statement_timeout_ms: 5_000,
        }
    }
}

impl DbConfig {
    /// Build a config from `DB_*` environment variables.
    ///
    /// `database_url` is the fallback when `DATABASE_URL` is unset.
    pub fn from_env(service_name: &str, database_url: &str) -> Self {
        let defaults = Self::default();

        Self {
            service_name: service_name.to_string(),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| database_url.to_string()),
            max_connections: parse_env_with_default(
                "DB_MAX_CONNECTIONS",
                defaults.max_connections,
            ),
            min_connections: parse_env_with_default(
                "DB_MIN_CONNECTIONS",
                defaults.min_connections,
            ),
            connect_timeout_secs: parse_env_with_default(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            acquire_timeout_secs: parse_env_with_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            ),
            idle_timeout_secs: parse_env_with_default(
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout_secs,
            ),
            max_lifetime_secs: parse_env_with_default(
                "DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime_secs,
            ),
            statement_timeout_ms: parse_env_with_default(
                "DB_STATEMENT_TIMEOUT_MS",
                defaults.statement_timeout_ms,
            ),
        }
    }

    /// Log pool configuration details
    pub fn log_config(&self) {
        info!(
            service = %self.service_name,
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            connect_timeout_secs = self.connect_timeout_secs,
            acquire_timeout_secs = self.acquire_timeout_secs,
            idle_timeout_secs = self.idle_timeout_secs,
            max_lifetime_secs = self.max_lifetime_secs,
            statement_timeout_ms = self.statement_timeout_ms,
            "Database pool configuration"
        );
    }
}

/// Create a PostgreSQL connection pool with automatic metrics monitoring
pub async fn create_pool(config: DbConfig) -> Result<PgPool, sqlx::Error> {
    debug!(
        service = %config.service_name,
        max = config.max_connections,
        min = config.min_connections,
        "Creating database pool"
    );

    let statement_timeout_ms = config.statement_timeout_ms;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                if statement_timeout_ms > 0 {
                    let sql = format!("SET statement_timeout = {}", statement_timeout_ms);
                    conn.execute(sql.as_str()).await?;
                }
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await?;

    // Verify connection with connect timeout
    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!(
                service = %config.service_name,
                "Database pool created and verified successfully"
            );

            update_pool_metrics(&pool, &config.service_name);
            record_statement_timeout(&config.service_name, config.statement_timeout_ms);

            {
                let pool_clone = pool.clone();
                let service = config.service_name.clone();
                tokio::spawn(async move {
                    let mut interval = tokio::time::interval(Duration::from_secs(30));
                    loop {
                        interval.tick().await;
                        update_pool_metrics(&pool_clone, &service);
                    }
                });
            }

            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(
                service = %config.service_name,
                error = %e,
                "Database connection verification failed"
            );
            Err(e)
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout_secs,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}

/// Apply a service's embedded migrations
pub async fn migrate(pool: &PgPool, migrator: &Migrator) -> Result<(), MigrateError> {
    debug!(
        migrations = migrator.iter().count(),
        "Running database migrations"
    );

    migrator.run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
