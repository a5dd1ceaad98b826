pub mod config;
pub mod config_loader;
pub mod retry;
pub mod season;

pub use config::{AppConfig, DatabaseConfig, EtlConfig, StatsApiConfig, DEFAULT_LINEUP_TEAM_ID};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use retry::{Backoff, RetryPolicy};
pub use season::{Season, SeasonParseError};
