//! Game spine data model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format the stats API uses for `DateFrom`/`DateTo`.
pub const API_DATE_FORMAT: &str = "%m/%d/%Y";

/// One row of the game spine (`nba.fact_games`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpineGame {
    pub game_id: String,
    pub season: String,
    pub game_date: NaiveDate,
    pub home_team_id: i64,
    pub away_team_id: i64,
}

impl SpineGame {
    /// Returns true if `team_id` played in this game.
    #[must_use]
    pub fn involves(&self, team_id: i64) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// Game identity from `team_id`'s point of view, if the team played.
    #[must_use]
    pub fn info_for(&self, team_id: i64) -> Option<GameInfo> {
        if self.home_team_id == team_id {
            Some(GameInfo {
                game_id: self.game_id.clone(),
                opponent_team_id: self.away_team_id,
                is_home: true,
            })
        } else if self.away_team_id == team_id {
            Some(GameInfo {
                game_id: self.game_id.clone(),
                opponent_team_id: self.home_team_id,
                is_home: false,
            })
        } else {
            None
        }
    }
}

/// Resolved game identity for one team on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GameInfo {
    pub game_id: String,
    pub opponent_team_id: i64,
    pub is_home: bool,
}

/// A date on which a team played: one work item for the lineup loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GameDateEntry {
    pub game_date: NaiveDate,
    pub team_id: i64,
}

impl GameDateEntry {
    /// Date in the stats API's `MM/DD/YYYY` format.
    #[must_use]
    pub fn api_date(&self) -> String {
        self.game_date.format(API_DATE_FORMAT).to_string()
    }
}
