//! Database handle
//!
//! One pool per process, created from configuration and handed to the
//! repository explicitly. Connections are checked out per statement and go
//! back to the pool as soon as the statement finishes.

use crate::error::{CoreError, CoreResult};
use paydesk_config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const SCHEMA: &str = include_str!("schema.sql");

/// Shared connection pool
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool for the configured URL
    pub async fn connect(config: &DatabaseConfig) -> CoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| CoreError::Database {
                message: format!("Invalid database url '{}': {}", config.url, e),
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(30));
        pool_options = if in_memory {
            // Every connection to an in-memory database sees its own copy, so
            // keep exactly one alive for the lifetime of the pool.
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        log::info!("Connected to {}", config.url);

        let db = Self { pool };
        if config.create_schema {
            db.init_schema().await?;
        }
        Ok(db)
    }

    /// Fresh in-memory database with the schema applied
    pub async fn in_memory() -> CoreResult<Self> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            create_schema: true,
        })
        .await
    }

    /// Create the three tables when they do not exist yet
    pub async fn init_schema(&self) -> CoreResult<()> {
        for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        log::debug!("Schema ready");
        Ok(())
    }

    /// Check that a connection can be acquired and used
    pub async fn ping(&self) -> CoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for checked-out connections and close the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
