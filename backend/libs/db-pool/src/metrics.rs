//! Prometheus metrics for database connection pool
//!
//! Pool occupancy is refreshed periodically by `create_pool`; the configured
//! statement timeout is published once per pool so dashboards can correlate
//! cancelled queries with it.

use prometheus::{register_int_gauge_vec, IntGaugeVec};
use sqlx::PgPool;

lazy_static::lazy_static! {
    /// Connections by state (idle/active/max)
    static ref DB_POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "Database pool connection count by state",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref DB_STATEMENT_TIMEOUT_MS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_statement_timeout_ms",
        "Server-side statement timeout applied to pooled connections (0 = disabled)",
        &["service"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

pub(crate) fn update_pool_metrics(pool: &PgPool, service: &str) {
    let size = i64::from(pool.size());
    let idle = pool.num_idle() as i64;

    for (state, value) in [
        ("idle", idle),
        ("active", size - idle),
        ("max", i64::from(pool.options().get_max_connections())),
    ] {
        DB_POOL_CONNECTIONS
            .with_label_values(&[service, state])
            .set(value);
    }
}

pub(crate) fn record_statement_timeout(service: &str, timeout_ms: u64) {
    DB_STATEMENT_TIMEOUT_MS
        .with_label_values(&[service])
        .set(i64::try_from(timeout_ms).unwrap_or(i64::MAX));
}
