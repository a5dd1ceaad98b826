//! NBA stats API client.
//!
//! Provides a rate-limited HTTP client for the public stats endpoints and
//! the row extraction that turns their `resultSets` tables into warehouse
//! records.

pub mod client;
pub mod error;
pub mod game_finder;
pub mod lineups;
pub mod parse;
pub mod result_set;

pub use client::{StatsClient, StatsClientConfig, STATS_API_URL};
pub use error::{Result, StatsApiError};
pub use game_finder::extract_spine_games;
pub use lineups::{
    canonicalize_group_name, extract_lineups, LineupQuery, API_DATE_FORMAT,
    DEFAULT_GROUP_QUANTITY,
};
pub use result_set::{ResultSet, Row, StatsResponse};
