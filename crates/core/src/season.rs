//! NBA season identifiers (`"YYYY-YY"`).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Month (1-based) in which a new season starts.
const SEASON_START_MONTH: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid season '{input}': {reason}")]
pub struct SeasonParseError {
    input: String,
    reason: &'static str,
}

/// A regular-season identifier such as `2025-26`.
///
/// The suffix must be the two-digit year following the start year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season {
    start_year: i32,
}

impl Season {
    /// Creates the season starting in `start_year`.
    #[must_use]
    pub fn starting(start_year: i32) -> Self {
        Self { start_year }
    }

    /// Returns the season in progress (or about to start) on `today`.
    ///
    /// Seasons roll over in October, so anything before that belongs to the
    /// season that started the previous calendar year.
    #[must_use]
    pub fn containing(today: NaiveDate) -> Self {
        if today.month() < SEASON_START_MONTH {
            Self::starting(today.year() - 1)
        } else {
            Self::starting(today.year())
        }
    }

    /// Returns the season for the current UTC date.
    #[must_use]
    pub fn current() -> Self {
        Self::containing(chrono::Utc::now().date_naive())
    }

    #[must_use]
    pub fn start_year(&self) -> i32 {
        self.start_year
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.start_year, (self.start_year + 1).rem_euclid(100))
    }
}

impl FromStr for Season {
    type Err = SeasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| SeasonParseError {
            input: s.to_string(),
            reason,
        };

        let (start, end) = s.trim().split_once('-').ok_or_else(|| err("expected YYYY-YY"))?;
        if start.len() != 4 || end.len() != 2 {
            return Err(err("expected YYYY-YY"));
        }

        let start_year: i32 = start.parse().map_err(|_| err("start year is not numeric"))?;
        let end_suffix: i32 = end.parse().map_err(|_| err("end year is not numeric"))?;

        if (start_year + 1).rem_euclid(100) != end_suffix {
            return Err(err("end year must follow start year"));
        }

        Ok(Self { start_year })
    }
}

impl TryFrom<String> for Season {
    type Error = SeasonParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        season.to_string()
    }
}
