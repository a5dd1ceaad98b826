//! In-memory implementations of the loader traits for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use hoops_data::{ExtractedLineup, GameInfo, LineupKey, LineupRecord, SpineGame};
use hoops_stats_api::LineupQuery;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::traits::{GameSpine, LineupSource, LineupStore, SpineSource, SpineStore};

/// Canned lineups keyed by date, filtered to the queried team.
/// Dates listed in `failing` return an error.
#[derive(Debug, Default)]
pub struct FakeLineupSource {
    by_date: HashMap<NaiveDate, Vec<ExtractedLineup>>,
    failing: HashSet<NaiveDate>,
    queries: Mutex<Vec<LineupQuery>>,
}

impl FakeLineupSource {
    pub fn with_lineups(mut self, date: NaiveDate, lineups: Vec<ExtractedLineup>) -> Self {
        self.by_date.insert(date, lineups);
        self
    }

    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.failing.insert(date);
        self
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<LineupQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LineupSource for FakeLineupSource {
    async fn lineups_for_date(&self, query: &LineupQuery) -> Result<Vec<ExtractedLineup>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.failing.contains(&query.game_date) {
            return Err(anyhow!("API error: 500 - upstream unavailable"));
        }
        Ok(self
            .by_date
            .get(&query.game_date)
            .map(|lineups| {
                lineups
                    .iter()
                    .filter(|l| l.team_id == query.team_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Spine backed by a Vec, with optional extra dates that have no game row.
#[derive(Debug, Default)]
pub struct FakeSpine {
    games: Mutex<Vec<SpineGame>>,
    orphan_dates: Vec<NaiveDate>,
    fail_dates: bool,
}

impl FakeSpine {
    pub fn with_games(games: Vec<SpineGame>) -> Self {
        Self {
            games: Mutex::new(games),
            ..Self::default()
        }
    }

    /// A date reported by `game_dates` that `games_on` cannot resolve.
    pub fn with_orphan_date(mut self, date: NaiveDate) -> Self {
        self.orphan_dates.push(date);
        self
    }

    /// Every `game_dates` call fails.
    pub fn unavailable() -> Self {
        Self {
            fail_dates: true,
            ..Self::default()
        }
    }

    pub fn games(&self) -> Vec<SpineGame> {
        self.games.lock().unwrap().clone()
    }
}

#[async_trait]
impl GameSpine for FakeSpine {
    async fn game_dates(&self, team_id: i64, season: &str) -> Result<Vec<NaiveDate>> {
        if self.fail_dates {
            return Err(anyhow!("connection refused"));
        }
        let mut dates: Vec<NaiveDate> = self
            .games
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.season == season && g.involves(team_id))
            .map(|g| g.game_date)
            .chain(self.orphan_dates.iter().copied())
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    async fn games_on(
        &self,
        game_date: NaiveDate,
        team_id: i64,
        limit: i64,
    ) -> Result<Vec<GameInfo>> {
        let mut games: Vec<GameInfo> = self
            .games
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.game_date == game_date)
            .filter_map(|g| g.info_for(team_id))
            .collect();
        games.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        games.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(games)
    }
}

#[async_trait]
impl SpineStore for FakeSpine {
    async fn upsert_games(&self, incoming: &[SpineGame]) -> Result<u64> {
        let mut games = self.games.lock().unwrap();
        for game in incoming {
            games.retain(|g| g.game_id != game.game_id);
            games.push(game.clone());
        }
        Ok(incoming.len() as u64)
    }
}

/// Lineup table keyed on the business key. Writes are all-or-nothing per call.
#[derive(Debug, Default)]
pub struct FakeLineupStore {
    rows: Mutex<BTreeMap<LineupKey, LineupRecord>>,
    failing: HashSet<NaiveDate>,
    calls: AtomicUsize,
}

impl FakeLineupStore {
    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.failing.insert(date);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<LineupRecord> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    pub fn keys(&self) -> Vec<LineupKey> {
        self.rows.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl LineupStore for FakeLineupStore {
    async fn upsert_lineups(&self, records: &[LineupRecord]) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if records.iter().any(|r| self.failing.contains(&r.game_date)) {
            return Err(anyhow!("deadlock detected"));
        }
        let mut rows = self.rows.lock().unwrap();
        for record in records {
            rows.insert(record.key(), record.clone());
        }
        Ok(records.len() as u64)
    }
}

/// Spine source returning a fixed list, or an error when `games` is `None`.
#[derive(Debug, Default)]
pub struct FakeSpineSource {
    pub games: Option<Vec<SpineGame>>,
}

#[async_trait]
impl SpineSource for FakeSpineSource {
    async fn completed_games(&self, season: &str) -> Result<Vec<SpineGame>> {
        self.games
            .clone()
            .map(|games| games.into_iter().filter(|g| g.season == season).collect())
            .ok_or_else(|| anyhow!("rate limit exceeded, retry after 60s"))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn spine_game(game_id: &str, game_date: NaiveDate, home: i64, away: i64) -> SpineGame {
    SpineGame {
        game_id: game_id.to_string(),
        season: "2024-25".to_string(),
        game_date,
        home_team_id: home,
        away_team_id: away,
    }
}

pub fn extracted(game_date: NaiveDate, team_id: i64, group_id: &str, pts: i32) -> ExtractedLineup {
    ExtractedLineup {
        game_date,
        season: "2024-25".to_string(),
        team_id,
        group_quantity: 5,
        group_id: group_id.to_string(),
        group_name: Some("Edwards; Gobert".to_string()),
        totals: hoops_data::LineupTotals {
            pts: Some(pts),
            ..Default::default()
        },
    }
}
