//! Loaders that move stats API data into the warehouse.
//!
//! - [`SpineLoader`]: completed games into `nba.fact_games`
//! - [`LineupLoader`]: per-date lineup totals into `nba.lineup_game_logs`
//! - [`DailyPipeline`]: both, for the configured season and teams

pub mod adapters;
pub mod lineup_loader;
pub mod pipeline;
pub mod resolution;
pub mod spine_loader;
pub mod traits;

#[cfg(test)]
mod fakes;

pub use adapters::{StatsLineupSource, StatsSpineSource};
pub use lineup_loader::{
    DateOutcome, LineupLoader, LoadLineupsParams, LoadSummary, NoDataReason, DEFAULT_SLEEP,
};
pub use pipeline::{DailyPipeline, PipelineReport};
pub use resolution::resolve_game;
pub use spine_loader::{SpineLoadReport, SpineLoader};
pub use traits::{GameSpine, LineupSource, LineupStore, SpineSource, SpineStore};
