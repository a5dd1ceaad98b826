//! Shared setup for every command: config, database, and API client.

use anyhow::{Context, Result};
use clap::Args;
use hoops_core::{AppConfig, ConfigLoader};
use hoops_data::DatabaseClient;
use hoops_stats_api::{StatsClient, StatsClientConfig};
use std::path::PathBuf;
use std::sync::Arc;

/// Options accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file path (defaults to config/Config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database connection URL (overrides database.url)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl GlobalArgs {
    /// Loads the layered configuration and applies command-line overrides.
    ///
    /// # Errors
    /// Returns an error if the config file or environment cannot be parsed.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from(path)?,
            None => ConfigLoader::load()?,
        };
        if let Some(url) = &self.database_url {
            config.database.url.clone_from(url);
        }
        Ok(config)
    }
}

/// Connects to the warehouse.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub async fn connect(config: &AppConfig) -> Result<DatabaseClient> {
    DatabaseClient::connect(&config.database)
        .await
        .context("Failed to connect to database")
}

/// Builds the rate-limited stats API client.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn stats_client(config: &AppConfig) -> Result<Arc<StatsClient>> {
    let client = StatsClient::new(StatsClientConfig::from(&config.stats_api))
        .context("Failed to build stats API client")?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_overrides_config() {
        let args = GlobalArgs {
            config: Some(PathBuf::from("does/not/exist.toml")),
            database_url: Some("postgresql://example/hoops_test".to_string()),
            log_file: None,
        };

        let config = args.load_config().unwrap();
        assert_eq!(config.database.url, "postgresql://example/hoops_test");
    }
}
