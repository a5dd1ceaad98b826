//! Database repositories for the warehouse.
//!
//! Each repository provides typed access to a specific table.

pub mod lineup_repo;
pub mod spine_repo;

pub use lineup_repo::LineupGameLogRepository;
pub use spine_repo::GameSpineRepository;

use sqlx::PgPool;

/// Creates all repositories from a single database pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub spine: GameSpineRepository,
    pub lineups: LineupGameLogRepository,
}

impl Repositories {
    /// Creates a new set of repositories from a database pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            spine: GameSpineRepository::new(pool.clone()),
            lineups: LineupGameLogRepository::new(pool),
        }
    }
}
