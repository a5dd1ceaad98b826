//! Game spine repository.
//!
//! The spine (`nba.fact_games`) is the authoritative registry of games.
//! The lineup loader only reads from it; the spine loader writes it.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{GameInfo, SpineGame};

/// Repository for game spine operations.
#[derive(Debug, Clone)]
pub struct GameSpineRepository {
    pool: PgPool,
}

impl GameSpineRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts a batch of spine games in one transaction.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// Returns an error if the database transaction fails.
    pub async fn upsert_batch(&self, games: &[SpineGame]) -> Result<u64> {
        if games.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for game in games {
            let result = sqlx::query(
                r#"
                INSERT INTO nba.fact_games
                    (game_id, season, game_date, home_team_id, away_team_id, last_updated_at)
                VALUES ($1, $2, $3, $4, $5, NOW())
                ON CONFLICT (game_id) DO UPDATE SET
                    season = EXCLUDED.season,
                    game_date = EXCLUDED.game_date,
                    home_team_id = EXCLUDED.home_team_id,
                    away_team_id = EXCLUDED.away_team_id,
                    last_updated_at = NOW()
                "#,
            )
            .bind(&game.game_id)
            .bind(&game.season)
            .bind(game.game_date)
            .bind(game.home_team_id)
            .bind(game.away_team_id)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Distinct dates on which `team_id` played during `season`, oldest first.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn distinct_game_dates(&self, team_id: i64, season: &str) -> Result<Vec<NaiveDate>> {
        let rows: Vec<(NaiveDate,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT game_date
            FROM nba.fact_games
            WHERE (home_team_id = $1 OR away_team_id = $1)
              AND season = $2
            ORDER BY game_date
            "#,
        )
        .bind(team_id)
        .bind(season)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(date,)| date).collect())
    }

    /// Games `team_id` played on `game_date`, ordered by game id.
    ///
    /// At most `limit` rows are returned.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn games_for_team_on(
        &self,
        game_date: NaiveDate,
        team_id: i64,
        limit: i64,
    ) -> Result<Vec<GameInfo>> {
        let games = sqlx::query_as::<_, GameInfo>(
            r#"
            SELECT
                game_id,
                CASE WHEN home_team_id = $2 THEN away_team_id ELSE home_team_id END AS opponent_team_id,
                (home_team_id = $2) AS is_home
            FROM nba.fact_games
            WHERE game_date = $1
              AND (home_team_id = $2 OR away_team_id = $2)
            ORDER BY game_id
            LIMIT $3
            "#,
        )
        .bind(game_date)
        .bind(team_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_new() {
        assert!(std::mem::size_of::<GameSpineRepository>() > 0);
    }
}
