//! Data models for the warehouse tables.

pub mod game;
pub mod lineup;

pub use game::{GameDateEntry, GameInfo, SpineGame, API_DATE_FORMAT};
pub use lineup::{fallback_group_id, ExtractedLineup, LineupKey, LineupRecord, LineupTotals};
