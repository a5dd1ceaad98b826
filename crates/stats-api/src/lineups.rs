//! Lineup extraction from `leaguedashlineups` responses.
//!
//! One request covers one team on one calendar date. Each returned row is a
//! player combination with its box-score totals for that game.

use chrono::NaiveDate;
use hoops_data::{fallback_group_id, ExtractedLineup, LineupTotals};

pub use hoops_data::API_DATE_FORMAT;

use crate::error::Result;
use crate::result_set::{ResultSet, Row};

/// Players per combination when not specified.
pub const DEFAULT_GROUP_QUANTITY: i16 = 5;

/// Parameters for a single-date lineup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupQuery {
    pub season: String,
    pub game_date: NaiveDate,
    pub team_id: i64,
    pub group_quantity: i16,
}

impl LineupQuery {
    /// Creates a five-man lineup query.
    #[must_use]
    pub fn new(season: impl Into<String>, game_date: NaiveDate, team_id: i64) -> Self {
        Self {
            season: season.into(),
            game_date,
            team_id,
            group_quantity: DEFAULT_GROUP_QUANTITY,
        }
    }

    #[must_use]
    pub fn with_group_quantity(mut self, group_quantity: i16) -> Self {
        self.group_quantity = group_quantity;
        self
    }

    /// `game_date` as `MM/DD/YYYY`.
    #[must_use]
    pub fn api_date(&self) -> String {
        self.game_date.format(API_DATE_FORMAT).to_string()
    }

    /// Query string for the request: Regular Season, Base measures, Totals.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let date = self.api_date();
        vec![
            ("GroupQuantity", self.group_quantity.to_string()),
            ("Season", self.season.clone()),
            ("SeasonType", "Regular Season".to_string()),
            ("MeasureType", "Base".to_string()),
            ("PerMode", "Totals".to_string()),
            ("DateFrom", date.clone()),
            ("DateTo", date),
            ("TeamID", self.team_id.to_string()),
            ("LeagueID", "00".to_string()),
            ("PlusMinus", "N".to_string()),
            ("PaceAdjust", "N".to_string()),
            ("Rank", "N".to_string()),
            ("Period", "0".to_string()),
            ("LastNGames", "0".to_string()),
            ("Month", "0".to_string()),
            ("OpponentTeamID", "0".to_string()),
            ("Outcome", String::new()),
            ("Location", String::new()),
            ("SeasonSegment", String::new()),
            ("VsConference", String::new()),
            ("VsDivision", String::new()),
            ("GameSegment", String::new()),
            ("Conference", String::new()),
            ("Division", String::new()),
            ("PORound", "0".to_string()),
            ("ShotClockRange", String::new()),
        ]
    }
}

/// Converts one response table into lineups for the queried team.
///
/// Rows for other teams are dropped. A row without a usable `GROUP_ID` gets
/// a positional fallback id built from the date and its index in the full
/// response, so ids stay distinct within the date.
///
/// # Errors
/// Returns `MissingColumn` if a non-empty table has no `TEAM_ID` column.
pub fn extract_lineups(table: &ResultSet, query: &LineupQuery) -> Result<Vec<ExtractedLineup>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    table.require_column("TEAM_ID")?;

    let lineups = table
        .rows()
        .filter(|row| row.i64("TEAM_ID") == Some(query.team_id))
        .map(|row| ExtractedLineup {
            game_date: query.game_date,
            season: query.season.clone(),
            team_id: query.team_id,
            group_quantity: query.group_quantity,
            group_id: row
                .string("GROUP_ID")
                .unwrap_or_else(|| fallback_group_id(query.game_date, row.index())),
            group_name: canonicalize_group_name(row.string("GROUP_NAME").as_deref()),
            totals: totals_from_row(&row),
        })
        .collect();

    Ok(lineups)
}

/// Reduces `"LeBron James - Anthony Davis"` to `"James; Davis"`.
///
/// Returns `None` for absent or empty input.
#[must_use]
pub fn canonicalize_group_name(raw: Option<&str>) -> Option<String> {
    let surnames: Vec<&str> = raw?
        .split(" - ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(surname)
        .collect();

    if surnames.is_empty() {
        None
    } else {
        Some(surnames.join("; "))
    }
}

/// `"A. Edwards"` → `"Edwards"`, `"Rudy Gobert"` → `"Gobert"`, `"Nene"` → `"Nene"`.
fn surname(name: &str) -> &str {
    if let Some((_, rest)) = name.split_once(". ") {
        rest
    } else {
        name.split_whitespace().last().unwrap_or(name)
    }
}

fn totals_from_row(row: &Row<'_>) -> LineupTotals {
    LineupTotals {
        min: row.float("MIN"),
        plus_minus: row.int("PLUS_MINUS"),
        pts: row.int("PTS"),
        fgm: row.int("FGM"),
        fga: row.int("FGA"),
        fg_pct: row.float("FG_PCT"),
        fg3m: row.int("FG3M"),
        fg3a: row.int("FG3A"),
        fg3_pct: row.float("FG3_PCT"),
        ftm: row.int("FTM"),
        fta: row.int("FTA"),
        ft_pct: row.float("FT_PCT"),
        reb: row.int("REB"),
        ast: row.int("AST"),
        tov: row.int("TOV"),
        stl: row.int("STL"),
        blk: row.int("BLK"),
        pf: row.int("PF"),
    }
}
