//! Warehouse storage for the hoops ETL.
//!
//! This crate provides:
//! - A `PostgreSQL` client with pool configuration and migrations
//! - Data models for the game spine and lineup game logs
//! - Repositories for typed database access

pub mod database;
pub mod models;
pub mod repositories;

pub use database::{DatabaseClient, PoolStatus};

pub use models::{
    fallback_group_id, ExtractedLineup, GameDateEntry, GameInfo, LineupKey, LineupRecord,
    LineupTotals, SpineGame, API_DATE_FORMAT,
};

pub use repositories::{GameSpineRepository, LineupGameLogRepository, Repositories};
