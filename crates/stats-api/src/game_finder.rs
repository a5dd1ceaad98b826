//! Game spine extraction from `leaguegamefinder` responses.
//!
//! The endpoint returns one row per team per game. Rows are paired by
//! `GAME_ID`, and `MATCHUP` tells the sides apart: `"MIN vs. LAL"` is the
//! home team's row, `"MIN @ LAL"` the away team's.

use chrono::NaiveDate;
use hoops_data::SpineGame;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::result_set::ResultSet;

#[derive(Debug, Default)]
struct PartialGame {
    game_date: Option<NaiveDate>,
    home_team_id: Option<i64>,
    away_team_id: Option<i64>,
}

/// Builds one spine row per completed game in `table`.
///
/// Rows with a null `WL` (games not yet played) are ignored. Games missing
/// either side or a parseable date are skipped. Output is ordered by date,
/// then game id.
///
/// # Errors
/// Returns `MissingColumn` if a non-empty table lacks `GAME_ID`, `TEAM_ID`,
/// `MATCHUP`, or `GAME_DATE`.
pub fn extract_spine_games(table: &ResultSet, season: &str) -> Result<Vec<SpineGame>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    for column in ["GAME_ID", "TEAM_ID", "MATCHUP", "GAME_DATE"] {
        table.require_column(column)?;
    }

    let mut partial: BTreeMap<String, PartialGame> = BTreeMap::new();

    for row in table.rows().filter(|row| !row.is_null("WL")) {
        let Some(game_id) = row.string("GAME_ID") else {
            continue;
        };
        let entry = partial.entry(game_id).or_default();

        if entry.game_date.is_none() {
            entry.game_date = row.string("GAME_DATE").as_deref().and_then(parse_game_date);
        }

        let matchup = row.string("MATCHUP").unwrap_or_default();
        match (row.i64("TEAM_ID"), matchup_side(&matchup)) {
            (Some(team_id), Some(Side::Home)) => entry.home_team_id = Some(team_id),
            (Some(team_id), Some(Side::Away)) => entry.away_team_id = Some(team_id),
            _ => tracing::debug!("Unrecognized matchup '{}' in row {}", matchup, row.index()),
        }
    }

    let mut games: Vec<SpineGame> = partial
        .into_iter()
        .filter_map(|(game_id, p)| match (p.game_date, p.home_team_id, p.away_team_id) {
            (Some(game_date), Some(home_team_id), Some(away_team_id)) => Some(SpineGame {
                game_id,
                season: season.to_string(),
                game_date,
                home_team_id,
                away_team_id,
            }),
            _ => {
                tracing::debug!("Skipping incomplete game {}", game_id);
                None
            }
        })
        .collect();

    games.sort_by(|a, b| (a.game_date, &a.game_id).cmp(&(b.game_date, &b.game_id)));
    Ok(games)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Home,
    Away,
}

fn matchup_side(matchup: &str) -> Option<Side> {
    if matchup.contains(" vs. ") {
        Some(Side::Home)
    } else if matchup.contains(" @ ") {
        Some(Side::Away)
    } else {
        None
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
