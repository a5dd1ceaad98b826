//! Loads the game spine for a season.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;

use crate::traits::{SpineSource, SpineStore};

/// Counts from one spine load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineLoadReport {
    pub season: String,
    /// Distinct completed games returned by the source.
    pub attempted: usize,
    pub upserted: u64,
}

impl SpineLoadReport {
    /// Formats a summary report.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Season: {}, Games: {}, Upserted: {}",
            self.season, self.attempted, self.upserted
        )
    }
}

/// Fetches completed games and upserts them into the spine.
#[derive(Clone)]
pub struct SpineLoader {
    source: Arc<dyn SpineSource>,
    store: Arc<dyn SpineStore>,
}

impl std::fmt::Debug for SpineLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpineLoader").finish_non_exhaustive()
    }
}

impl SpineLoader {
    #[must_use]
    pub fn new(source: Arc<dyn SpineSource>, store: Arc<dyn SpineStore>) -> Self {
        Self { source, store }
    }

    /// Loads every completed regular-season game of `season`.
    ///
    /// # Errors
    /// Returns an error if the source call or the upsert fails.
    pub async fn load_season(&self, season: &str) -> Result<SpineLoadReport> {
        tracing::info!("Loading game spine for {}", season);

        let games = self
            .source
            .completed_games(season)
            .await
            .with_context(|| format!("Failed to fetch game spine for {season}"))?;

        let attempted = games
            .iter()
            .map(|g| g.game_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let upserted = if games.is_empty() {
            tracing::warn!("No completed games found for {}", season);
            0
        } else {
            self.store
                .upsert_games(&games)
                .await
                .with_context(|| format!("Failed to upsert game spine for {season}"))?
        };

        let report = SpineLoadReport {
            season: season.to_string(),
            attempted,
            upserted,
        };
        tracing::info!("Spine load complete. {}", report.summary());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{date, spine_game, FakeSpine, FakeSpineSource};

    #[tokio::test]
    async fn test_loads_season_games() {
        let source = Arc::new(FakeSpineSource {
            games: Some(vec![
                spine_game("0022400100", date(2024, 11, 1), 1, 2),
                spine_game("0022400200", date(2024, 11, 3), 3, 1),
            ]),
        });
        let store = Arc::new(FakeSpine::default());
        let loader = SpineLoader::new(source, store.clone());

        let report = loader.load_season("2024-25").await.unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.upserted, 2);
        assert_eq!(store.games().len(), 2);
        assert_eq!(report.summary(), "Season: 2024-25, Games: 2, Upserted: 2");
    }

    #[tokio::test]
    async fn test_reload_overwrites_existing_games() {
        let source = Arc::new(FakeSpineSource {
            games: Some(vec![spine_game("0022400100", date(2024, 11, 1), 1, 2)]),
        });
        let store = Arc::new(FakeSpine::with_games(vec![spine_game(
            "0022400100",
            date(2024, 10, 31),
            1,
            2,
        )]));
        let loader = SpineLoader::new(source, store.clone());

        loader.load_season("2024-25").await.unwrap();

        let games = store.games();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_date, date(2024, 11, 1));
    }

    #[tokio::test]
    async fn test_empty_season_is_not_an_error() {
        let source = Arc::new(FakeSpineSource {
            games: Some(Vec::new()),
        });
        let loader = SpineLoader::new(source, Arc::new(FakeSpine::default()));

        let report = loader.load_season("2024-25").await.unwrap();
        assert_eq!(report.attempted, 0);
        assert_eq!(report.upserted, 0);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let loader = SpineLoader::new(
            Arc::new(FakeSpineSource::default()),
            Arc::new(FakeSpine::default()),
        );

        let err = loader.load_season("2024-25").await.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch game spine"));
    }
}
