//! Game resolution: which spine game a team played on a given date.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use hoops_data::GameInfo;
use hoops_stats_api::API_DATE_FORMAT;

use crate::traits::GameSpine;

/// Resolves `(api_date, team_id)` to a spine game.
///
/// `api_date` is in the stats API's `MM/DD/YYYY` form. A date that does not
/// parse is logged and treated as unresolvable. When the spine holds more
/// than one game for the team on that date, the lowest game id wins and a
/// warning names both.
///
/// # Errors
/// Returns an error if the spine lookup fails.
pub async fn resolve_game<S>(spine: &S, api_date: &str, team_id: i64) -> Result<Option<GameInfo>>
where
    S: GameSpine + ?Sized,
{
    let game_date = match NaiveDate::parse_from_str(api_date, API_DATE_FORMAT) {
        Ok(date) => date,
        Err(e) => {
            tracing::error!("Invalid game date '{}' for team {}: {}", api_date, team_id, e);
            return Ok(None);
        }
    };

    let mut games = spine
        .games_on(game_date, team_id, 2)
        .await
        .with_context(|| format!("Failed to look up game for team {team_id} on {game_date}"))?
        .into_iter();

    let first = games.next();
    if let (Some(chosen), Some(other)) = (&first, games.next()) {
        tracing::warn!(
            "Team {} has multiple games on {} ({}, {}); using {}",
            team_id,
            game_date,
            chosen.game_id,
            other.game_id,
            chosen.game_id
        );
    }

    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{date, spine_game, FakeSpine};

    const WOLVES: i64 = 1_610_612_750;
    const LAKERS: i64 = 1_610_612_747;

    #[tokio::test]
    async fn test_resolves_home_game() {
        let spine = FakeSpine::with_games(vec![spine_game(
            "0022400555",
            date(2025, 1, 15),
            WOLVES,
            LAKERS,
        )]);

        let game = resolve_game(&spine, "01/15/2025", WOLVES).await.unwrap().unwrap();

        assert_eq!(game.game_id, "0022400555");
        assert_eq!(game.opponent_team_id, LAKERS);
        assert!(game.is_home);
    }

    #[tokio::test]
    async fn test_resolves_away_game() {
        let spine = FakeSpine::with_games(vec![spine_game(
            "0022400555",
            date(2025, 1, 15),
            LAKERS,
            WOLVES,
        )]);

        let game = resolve_game(&spine, "01/15/2025", WOLVES).await.unwrap().unwrap();

        assert_eq!(game.opponent_team_id, LAKERS);
        assert!(!game.is_home);
    }

    #[tokio::test]
    async fn test_no_game_on_date() {
        let spine = FakeSpine::with_games(vec![spine_game(
            "0022400555",
            date(2025, 1, 15),
            WOLVES,
            LAKERS,
        )]);

        assert!(resolve_game(&spine, "01/16/2025", WOLVES).await.unwrap().is_none());
        // Other team on the same date
        assert!(resolve_game(&spine, "01/15/2025", 1_610_612_738).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_date_resolves_to_none() {
        let spine = FakeSpine::with_games(vec![spine_game(
            "0022400555",
            date(2025, 1, 15),
            WOLVES,
            LAKERS,
        )]);

        assert!(resolve_game(&spine, "2025-01-15", WOLVES).await.unwrap().is_none());
        assert!(resolve_game(&spine, "13/45/2025", WOLVES).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_games_use_lowest_id() {
        let spine = FakeSpine::with_games(vec![
            spine_game("0022400777", date(2025, 1, 15), LAKERS, WOLVES),
            spine_game("0022400555", date(2025, 1, 15), WOLVES, LAKERS),
        ]);

        let game = resolve_game(&spine, "01/15/2025", WOLVES).await.unwrap().unwrap();
        assert_eq!(game.game_id, "0022400555");
    }
}
