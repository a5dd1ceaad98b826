//! Lineup game log data model.
//!
//! A lineup is a combination of `group_quantity` players fielded together.
//! Rows are keyed by `(game_id, team_id, group_id)`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::GameInfo;

/// Aggregate box-score totals for one lineup in one game.
///
/// Every field is optional: `None` means the source omitted the value or sent
/// something that could not be parsed. It never means zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LineupTotals {
    pub min: Option<f64>,
    pub plus_minus: Option<i32>,
    pub pts: Option<i32>,
    pub fgm: Option<i32>,
    pub fga: Option<i32>,
    pub fg_pct: Option<f64>,
    pub fg3m: Option<i32>,
    pub fg3a: Option<i32>,
    pub fg3_pct: Option<f64>,
    pub ftm: Option<i32>,
    pub fta: Option<i32>,
    pub ft_pct: Option<f64>,
    pub reb: Option<i32>,
    pub ast: Option<i32>,
    pub tov: Option<i32>,
    pub stl: Option<i32>,
    pub blk: Option<i32>,
    pub pf: Option<i32>,
}

/// A lineup extracted from one date's source response, before the game
/// identity has been resolved against the spine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedLineup {
    pub game_date: NaiveDate,
    pub season: String,
    pub team_id: i64,
    pub group_quantity: i16,
    /// Source combination id, or a positional fallback (see [`fallback_group_id`]).
    pub group_id: String,
    /// Surnames joined with `"; "`.
    pub group_name: Option<String>,
    pub totals: LineupTotals,
}

/// A lineup enriched with its game identity, ready to be upserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LineupRecord {
    pub game_id: String,
    pub season: String,
    pub team_id: i64,
    pub group_quantity: i16,
    pub group_id: String,
    pub group_name: Option<String>,
    pub opponent_team_id: Option<i64>,
    pub is_home: Option<bool>,
    pub game_date: NaiveDate,
    #[sqlx(flatten)]
    pub totals: LineupTotals,
    /// Set by the database; `None` until the record has been read back.
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl LineupRecord {
    /// Attaches the resolved game identity to an extracted lineup.
    #[must_use]
    pub fn from_extracted(lineup: ExtractedLineup, game: &GameInfo) -> Self {
        Self {
            game_id: game.game_id.clone(),
            season: lineup.season,
            team_id: lineup.team_id,
            group_quantity: lineup.group_quantity,
            group_id: lineup.group_id,
            group_name: lineup.group_name,
            opponent_team_id: Some(game.opponent_team_id),
            is_home: Some(game.is_home),
            game_date: lineup.game_date,
            totals: lineup.totals,
            last_updated_at: None,
        }
    }

    /// Composite business key.
    #[must_use]
    pub fn key(&self) -> LineupKey {
        LineupKey {
            game_id: self.game_id.clone(),
            team_id: self.team_id,
            group_id: self.group_id.clone(),
        }
    }
}

/// `(game_id, team_id, group_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineupKey {
    pub game_id: String,
    pub team_id: i64,
    pub group_id: String,
}

/// Builds the positional group id used when the source omits one.
///
/// Deterministic for a given `(date, row_index)` and distinct across rows of
/// the same date. It is not stable if the source reorders rows between runs.
#[must_use]
pub fn fallback_group_id(game_date: NaiveDate, row_index: usize) -> String {
    format!("date_{}_lineup_{}", game_date.format("%Y%m%d"), row_index)
}
