use crate::retry::RetryPolicy;
use crate::season::{Season, SeasonParseError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minnesota Timberwolves.
pub const DEFAULT_LINEUP_TEAM_ID: i64 = 1_610_612_750;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub stats_api: StatsApiConfig,
    pub etl: EtlConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Pause after every external call, in seconds.
    pub sleep_seconds: f64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Season override (`YYYY-YY`). Auto-detected when unset.
    pub current_season: Option<String>,
    pub lineup_team_ids: Vec<i64>,
    pub group_quantity: u8,
}

impl EtlConfig {
    /// Returns the pacing delay, treating negative or non-finite values as zero.
    #[must_use]
    pub fn sleep_duration(&self) -> Duration {
        if self.sleep_seconds.is_finite() && self.sleep_seconds > 0.0 {
            Duration::from_secs_f64(self.sleep_seconds)
        } else {
            Duration::ZERO
        }
    }

    /// The configured season override, or the season in progress today.
    ///
    /// # Errors
    /// Returns an error if the override is not a valid `YYYY-YY` season.
    pub fn season(&self) -> Result<Season, SeasonParseError> {
        match &self.current_season {
            Some(raw) => raw.parse(),
            None => Ok(Season::current()),
        }
    }

    /// Exponential retry policy for external calls.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.max_retries,
            Duration::from_millis(self.retry_base_delay_ms),
            Duration::from_millis(self.retry_max_delay_ms),
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/hoops".to_string(),
                max_connections: 5,
                min_connections: 0,
                acquire_timeout_secs: 10,
                idle_timeout_secs: 600,
                max_lifetime_secs: 3600,
            },
            stats_api: StatsApiConfig {
                base_url: "https://stats.nba.com/stats".to_string(),
                timeout_secs: 30,
                requests_per_minute: 30,
            },
            etl: EtlConfig {
                sleep_seconds: 1.0,
                max_retries: 3,
                retry_base_delay_ms: 2_000,
                retry_max_delay_ms: 30_000,
                current_season: None,
                lineup_team_ids: vec![DEFAULT_LINEUP_TEAM_ID],
                group_quantity: 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_duration_from_seconds() {
        let mut etl = AppConfig::default().etl;
        etl.sleep_seconds = 1.5;
        assert_eq!(etl.sleep_duration(), Duration::from_millis(1500));
    }

    #[test]
    fn test_sleep_duration_clamps_invalid_values() {
        let mut etl = AppConfig::default().etl;
        etl.sleep_seconds = -3.0;
        assert_eq!(etl.sleep_duration(), Duration::ZERO);

        etl.sleep_seconds = f64::NAN;
        assert_eq!(etl.sleep_duration(), Duration::ZERO);
    }

    #[test]
    fn test_retry_policy_from_config() {
        let etl = AppConfig::default().etl;
        let policy = etl.retry_policy();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(5), Duration::from_secs(30));
    }

    #[test]
    fn test_season_override() {
        let mut etl = AppConfig::default().etl;
        assert_eq!(etl.season().unwrap(), Season::current());

        etl.current_season = Some("2023-24".to_string());
        assert_eq!(etl.season().unwrap(), Season::starting(2023));

        etl.current_season = Some("2023-25".to_string());
        assert!(etl.season().is_err());
    }

    #[test]
    fn test_default_targets_one_team() {
        let config = AppConfig::default();
        assert_eq!(config.etl.lineup_team_ids, vec![DEFAULT_LINEUP_TEAM_ID]);
        assert_eq!(config.etl.group_quantity, 5);
    }
}
