//! Stateless broadcast scheduler: given a persisted [`Season`] (or none)
//! and the caller-supplied current time, decides the next action and
//! renders a broadcast-facing status snapshot. Neither function reads
//! the wall clock itself — "now" is always a parameter, so both stay
//! pure and total.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::league::{ScheduledGameStatus, Season, SeasonStatus, REGULAR_SEASON_WEEKS};

lazy_static! {
    /// How long the core waits in the offseason before recommending a
    /// new season be created.
    static ref OFFSEASON_DURATION: chrono::Duration = chrono::Duration::hours(2);
}

/// # `Action` enum
///
/// The broadcast scheduler's decision, chosen by a first-match-wins rule
/// list.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Action {
    CreateSeason,
    NoAction { game_id: Option<String> },
    StartGame { game_id: String },
    AdvanceWeek,
    StartPlayoffs,
    AdvancePlayoffs,
    EndSeason,
}

/// # `BroadcastStatus` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastStatus {
    Offseason,
    Live,
    Intermission,
}

/// # `BroadcastState` struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BroadcastState {
    pub status: BroadcastStatus,
    pub current_game_id: Option<String>,
    pub next_game_id: Option<String>,
    pub countdown: Option<i64>,
    pub message: Option<String>,
}

/// Decide the next broadcast action for a persisted season.
///
/// Rule order (first match wins): no season → create one; offseason →
/// create once `offseason_duration` has elapsed since `completed_at`,
/// else wait; a `broadcasting` game in the current week → no-op on it;
/// all non-scheduled games `simulating` → wait; any `scheduled` game →
/// start it (the featured game if present, else the first); every game
/// in the current week `completed` → advance week, start playoffs,
/// advance the playoff bracket, or end the season, depending on status.
///
/// ### Example
/// ```
/// use nflsim_core::broadcast::{determine_next_action, Action};
/// use chrono::Utc;
///
/// assert_eq!(determine_next_action(None, Utc::now()), Action::CreateSeason);
/// ```
pub fn determine_next_action(season: Option<&Season>, now: DateTime<Utc>) -> Action {
    let Some(season) = season else {
        return Action::CreateSeason;
    };

    if season.status() == SeasonStatus::Offseason {
        return match season.completed_at() {
            Some(completed_at) if now - completed_at >= *OFFSEASON_DURATION => Action::CreateSeason,
            _ => Action::NoAction { game_id: None },
        };
    }

    let Some(week) = season.current_week_schedule() else {
        return Action::NoAction { game_id: None };
    };

    if let Some(game) = week.games().iter().find(|g| g.status == ScheduledGameStatus::Broadcasting) {
        return Action::NoAction { game_id: Some(game.id.clone()) };
    }

    let any_scheduled = week.games().iter().any(|g| g.status == ScheduledGameStatus::Scheduled);
    let any_simulating = week.games().iter().any(|g| g.status == ScheduledGameStatus::Simulating);
    if any_simulating && !any_scheduled {
        return Action::NoAction { game_id: None };
    }

    if any_scheduled {
        let featured = week
            .featured_game_id()
            .and_then(|id| week.games().iter().find(|g| g.id == id && g.status == ScheduledGameStatus::Scheduled));
        let next = featured.or_else(|| week.games().iter().find(|g| g.status == ScheduledGameStatus::Scheduled));
        if let Some(game) = next {
            return Action::StartGame { game_id: game.id.clone() };
        }
    }

    if !week.games().is_empty() && week.games().iter().all(|g| g.status == ScheduledGameStatus::Completed) {
        return match season.status() {
            SeasonStatus::RegularSeason if season.current_week() < REGULAR_SEASON_WEEKS => Action::AdvanceWeek,
            SeasonStatus::RegularSeason => Action::StartPlayoffs,
            SeasonStatus::WildCard | SeasonStatus::Divisional | SeasonStatus::ConferenceChampionship => Action::AdvancePlayoffs,
            SeasonStatus::SuperBowl => Action::EndSeason,
            SeasonStatus::Offseason => Action::NoAction { game_id: None },
        };
    }

    Action::NoAction { game_id: None }
}

/// Render a broadcast-facing status snapshot for the same persisted
/// season, following the same inspection rules as
/// [`determine_next_action`].
pub fn get_broadcast_state(season: Option<&Season>, now: DateTime<Utc>) -> BroadcastState {
    let Some(season) = season else {
        return BroadcastState {
            status: BroadcastStatus::Offseason,
            current_game_id: None,
            next_game_id: None,
            countdown: None,
            message: Some(String::from("No season in progress")),
        };
    };

    if season.status() == SeasonStatus::Offseason {
        let countdown = season.completed_at().map(|completed_at| ((completed_at + *OFFSEASON_DURATION) - now).num_seconds());
        return BroadcastState {
            status: BroadcastStatus::Offseason,
            current_game_id: None,
            next_game_id: None,
            countdown,
            message: Some(String::from("Offseason")),
        };
    }

    let Some(week) = season.current_week_schedule() else {
        return BroadcastState { status: BroadcastStatus::Intermission, current_game_id: None, next_game_id: None, countdown: None, message: None };
    };

    let current = week.games().iter().find(|g| matches!(g.status, ScheduledGameStatus::Broadcasting | ScheduledGameStatus::Simulating));
    let next = week.games().iter().find(|g| g.status == ScheduledGameStatus::Scheduled);
    let status = if current.is_some() { BroadcastStatus::Live } else { BroadcastStatus::Intermission };

    BroadcastState {
        status,
        current_game_id: current.map(|g| g.id.clone()),
        next_game_id: next.map(|g| g.id.clone()),
        countdown: None,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::{Conference, Division, Team};

    fn canonical_league() -> Vec<Team> {
        let mut teams = Vec::new();
        let mut id = 1;
        for conference in [Conference::Afc, Conference::Nfc] {
            for division in [Division::North, Division::South, Division::East, Division::West] {
                for n in 0..4 {
                    teams.push(
                        Team::from_properties(id, &format!("Team{}", id), &format!("T{:02}", id), "City", conference, division, "#000", "#fff", n == 0)
                            .unwrap(),
                    );
                    id += 1;
                }
            }
        }
        teams
    }

    #[test]
    fn test_no_season_creates_one() {
        assert_eq!(determine_next_action(None, Utc::now()), Action::CreateSeason);
    }

    #[test]
    fn test_broadcasting_game_blocks_other_actions() {
        let teams = canonical_league();
        let mut season = Season::new("season-1", 1, &teams, "schedule-test-seed-aabbccdd11223344").unwrap();
        let broadcasting_id = {
            let week = season.week(1).unwrap();
            week.games()[0].id.clone()
        };
        {
            let week = season.week_mut(1).unwrap();
            week.games[0].status = ScheduledGameStatus::Broadcasting;
        }
        let action = determine_next_action(Some(&season), Utc::now());
        assert_eq!(action, Action::NoAction { game_id: Some(broadcasting_id) });
    }

    #[test]
    fn test_all_complete_at_week_18_starts_playoffs() {
        let teams = canonical_league();
        let mut season = Season::new("season-1", 1, &teams, "schedule-test-seed-aabbccdd11223344").unwrap();
        season.set_current_week(18);
        {
            let week = season.week_mut(18).unwrap();
            for game in week.games.iter_mut() {
                game.status = ScheduledGameStatus::Completed;
                game.home_score = Some(20);
                game.away_score = Some(10);
            }
        }
        assert_eq!(determine_next_action(Some(&season), Utc::now()), Action::StartPlayoffs);
    }
}
