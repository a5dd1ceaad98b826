use anyhow::{Context, Result};
use hoops_core::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool};
use std::str::FromStr;
use std::time::Duration;

use crate::repositories::Repositories;

/// Connection handle for the warehouse database.
///
/// Constructed once per process from configuration and passed to whatever
/// needs storage. Call [`DatabaseClient::close`] to dispose of the pool.
#[derive(Debug, Clone)]
pub struct DatabaseClient {
    pool: PgPool,
}

/// Snapshot of connection pool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub size: u32,
    pub idle: u32,
    pub in_use: u32,
}

impl DatabaseClient {
    /// Creates a new client connected to the configured `PostgreSQL` database.
    ///
    /// Every new connection has its session timezone set to UTC.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the connection cannot be established.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = PgConnectOptions::from_str(&config.url).context("Invalid database URL")?;

        tracing::info!(
            "Creating database pool for {}:{}/{}",
            options.get_host(),
            options.get_port(),
            options.get_database().unwrap_or_default()
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET TIME ZONE 'UTC'").await?;
                    tracing::debug!("New database connection established");
                    Ok(())
                })
            })
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        tracing::info!("Database pool created");

        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates all repositories sharing this client's pool.
    #[must_use]
    pub fn repositories(&self) -> Repositories {
        Repositories::new(self.pool.clone())
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    /// Returns an error if a migration fails.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    #[must_use]
    pub fn pool_status(&self) -> PoolStatus {
        let size = self.pool.size();
        let idle = u32::try_from(self.pool.num_idle()).unwrap_or(size);
        PoolStatus {
            size,
            idle,
            in_use: size.saturating_sub(idle),
        }
    }

    /// Closes every pooled connection. The client is unusable afterwards.
    pub async fn close(&self) {
        tracing::info!("Disposing database pool");
        self.pool.close().await;
    }
}
