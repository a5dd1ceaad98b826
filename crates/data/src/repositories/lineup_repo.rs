//! Lineup game log repository.
//!
//! Upserts keyed on `(game_id, team_id, group_id)`: a repeat write overwrites
//! every non-key column and refreshes `last_updated_at`.

use anyhow::Result;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{LineupKey, LineupRecord};

const UPSERT_LINEUP_SQL: &str = r#"
INSERT INTO nba.lineup_game_logs (
    game_id, season, team_id, group_quantity,
    group_id, group_name,
    opponent_team_id, is_home, game_date,
    min, plus_minus,
    pts, fgm, fga, fg_pct,
    fg3m, fg3a, fg3_pct,
    ftm, fta, ft_pct,
    reb, ast, tov, stl, blk, pf,
    last_updated_at
)
VALUES (
    $1, $2, $3, $4,
    $5, $6,
    $7, $8, $9,
    $10, $11,
    $12, $13, $14, $15,
    $16, $17, $18,
    $19, $20, $21,
    $22, $23, $24, $25, $26, $27,
    NOW()
)
ON CONFLICT (game_id, team_id, group_id) DO UPDATE SET
    season = EXCLUDED.season,
    group_quantity = EXCLUDED.group_quantity,
    group_name = EXCLUDED.group_name,
    opponent_team_id = EXCLUDED.opponent_team_id,
    is_home = EXCLUDED.is_home,
    game_date = EXCLUDED.game_date,
    min = EXCLUDED.min,
    plus_minus = EXCLUDED.plus_minus,
    pts = EXCLUDED.pts,
    fgm = EXCLUDED.fgm,
    fga = EXCLUDED.fga,
    fg_pct = EXCLUDED.fg_pct,
    fg3m = EXCLUDED.fg3m,
    fg3a = EXCLUDED.fg3a,
    fg3_pct = EXCLUDED.fg3_pct,
    ftm = EXCLUDED.ftm,
    fta = EXCLUDED.fta,
    ft_pct = EXCLUDED.ft_pct,
    reb = EXCLUDED.reb,
    ast = EXCLUDED.ast,
    tov = EXCLUDED.tov,
    stl = EXCLUDED.stl,
    blk = EXCLUDED.blk,
    pf = EXCLUDED.pf,
    last_updated_at = NOW()
"#;

const SELECT_LINEUP_COLUMNS: &str = r#"
SELECT game_id, season, team_id, group_quantity, group_id, group_name,
       opponent_team_id, is_home, game_date,
       min, plus_minus, pts, fgm, fga, fg_pct, fg3m, fg3a, fg3_pct,
       ftm, fta, ft_pct, reb, ast, tov, stl, blk, pf,
       last_updated_at
FROM nba.lineup_game_logs
"#;

/// Repository for lineup game log operations.
#[derive(Debug, Clone)]
pub struct LineupGameLogRepository {
    pool: PgPool,
}

impl LineupGameLogRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts one record inside an open transaction.
    ///
    /// # Errors
    /// Returns an error if the statement fails.
    pub async fn upsert_in(
        tx: &mut Transaction<'_, Postgres>,
        record: &LineupRecord,
    ) -> Result<()> {
        let t = &record.totals;
        sqlx::query(UPSERT_LINEUP_SQL)
            .bind(&record.game_id)
            .bind(&record.season)
            .bind(record.team_id)
            .bind(record.group_quantity)
            .bind(&record.group_id)
            .bind(&record.group_name)
            .bind(record.opponent_team_id)
            .bind(record.is_home)
            .bind(record.game_date)
            .bind(t.min)
            .bind(t.plus_minus)
            .bind(t.pts)
            .bind(t.fgm)
            .bind(t.fga)
            .bind(t.fg_pct)
            .bind(t.fg3m)
            .bind(t.fg3a)
            .bind(t.fg3_pct)
            .bind(t.ftm)
            .bind(t.fta)
            .bind(t.ft_pct)
            .bind(t.reb)
            .bind(t.ast)
            .bind(t.tov)
            .bind(t.stl)
            .bind(t.blk)
            .bind(t.pf)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Upserts a single record in its own transaction.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn upsert(&self, record: &LineupRecord) -> Result<()> {
        self.upsert_batch(std::slice::from_ref(record)).await?;
        Ok(())
    }

    /// Upserts all records in a single transaction.
    ///
    /// Either every record is written or none is: the transaction is only
    /// committed after the last statement succeeds.
    ///
    /// # Errors
    /// Returns an error if any statement or the commit fails.
    pub async fn upsert_batch(&self, records: &[LineupRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for record in records {
            Self::upsert_in(&mut tx, record).await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Fetches one record by key.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get(&self, key: &LineupKey) -> Result<Option<LineupRecord>> {
        let sql = format!(
            "{SELECT_LINEUP_COLUMNS} WHERE game_id = $1 AND team_id = $2 AND group_id = $3"
        );
        let record = sqlx::query_as::<_, LineupRecord>(&sql)
            .bind(&key.game_id)
            .bind(key.team_id)
            .bind(&key.group_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// All records for one team in one game, ordered by group id.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn query_by_game(&self, game_id: &str, team_id: i64) -> Result<Vec<LineupRecord>> {
        let sql = format!(
            "{SELECT_LINEUP_COLUMNS} WHERE game_id = $1 AND team_id = $2 ORDER BY group_id"
        );
        let records = sqlx::query_as::<_, LineupRecord>(&sql)
            .bind(game_id)
            .bind(team_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }
}
