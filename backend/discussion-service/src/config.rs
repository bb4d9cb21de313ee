/// Configuration management for Discussion Service
///
/// All settings come from environment variables (a `.env` file is loaded by
/// the binary before this runs). Pool tuning lives in `db_pool::DbConfig`.
use db_pool::env_utils::{parse_env_bool, parse_env_with_default};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub graphql: GraphqlConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Which store implementation backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(format!(
                "STORE_BACKEND must be 'memory' or 'postgres', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => f.write_str("memory"),
            StoreBackend::Postgres => f.write_str("postgres"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Required for the postgres backend
    pub database_url: Option<String>,
    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// GraphQL page size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let backend = match std::env::var("STORE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StoreBackend::Memory,
        };
        let database_url = std::env::var("DATABASE_URL").ok();
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set when STORE_BACKEND=postgres".to_string());
        }

        let default_page_size: i64 = parse_env_with_default("GRAPHQL_DEFAULT_PAGE_SIZE", 10);
        let max_page_size: i64 = parse_env_with_default("GRAPHQL_MAX_PAGE_SIZE", 100);
        if default_page_size < 1 || max_page_size < default_page_size {
            return Err(format!(
                "invalid page sizes: default {} must be between 1 and max {}",
                default_page_size, max_page_size
            ));
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("DISCUSSION_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_with_default("DISCUSSION_SERVICE_PORT", 8080),
            },
            store: StoreConfig {
                backend,
                database_url,
                run_migrations: parse_env_bool("RUN_MIGRATIONS", false),
            },
            graphql: GraphqlConfig {
                default_page_size,
                max_page_size,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}
