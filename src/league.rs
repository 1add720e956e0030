//! League season model: the 18-week regular season plus up to four
//! playoff weeks, rolled up into the `Season` record the broadcast
//! scheduler (`crate::broadcast`) inspects.
//!
//! A `Season` is created once by [`Season::new`], mutated only through
//! its `advance_*`-shaped helpers (`set_current_week`, `complete`, game
//! status/score writers on individual `ScheduledGame`s), and never
//! mutated by this crate's read-only query modules
//! ([`standings`], [`playoffs`]).

pub mod playoffs;
pub mod schedule;
pub mod standings;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::config::GameType;
use crate::team::Team;

/// Total weeks a season's schedule carries: 18 regular-season weeks
/// plus 4 playoff weeks (wild card, divisional, conference
/// championship, super bowl).
pub const TOTAL_WEEKS: u32 = 22;

/// Regular-season week count, matching [`schedule::REGULAR_SEASON_WEEKS`].
pub const REGULAR_SEASON_WEEKS: u32 = 18;

/// # `ScheduledGameStatus` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledGameStatus {
    Scheduled,
    Simulating,
    Broadcasting,
    Completed,
}

/// # `ScheduledGame` struct
///
/// One matchup on a season's schedule. Initialized by the scheduler
/// with `status = scheduled`, null scores, and null timestamps; mutated
/// in place by the caller as the broadcast scheduler's chosen actions
/// play out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub id: String,
    pub week: u32,
    pub home_team_id: usize,
    pub away_team_id: usize,
    pub game_type: GameType,
    pub status: ScheduledGameStatus,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub is_featured: bool,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub broadcast_started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScheduledGame {
    /// Construct a freshly scheduled game: `status = scheduled`, scores
    /// and timestamps null, not featured.
    pub fn new(id: String, week: u32, home_team_id: usize, away_team_id: usize, game_type: GameType) -> ScheduledGame {
        ScheduledGame {
            id,
            week,
            home_team_id,
            away_team_id,
            game_type,
            status: ScheduledGameStatus::Scheduled,
            home_score: None,
            away_score: None,
            is_featured: false,
            scheduled_at: None,
            broadcast_started_at: None,
            completed_at: None,
        }
    }

    /// The winning team id, or `None` if incomplete or tied.
    pub fn winner_id(&self) -> Option<usize> {
        if self.status != ScheduledGameStatus::Completed {
            return None;
        }
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) if h > a => Some(self.home_team_id),
            (Some(h), Some(a)) if a > h => Some(self.away_team_id),
            _ => None,
        }
    }
}

/// # `WeekStatus` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStatus {
    Upcoming,
    InProgress,
    Complete,
}

/// # `WeekSchedule` struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeekSchedule {
    pub week: u32,
    pub games: Vec<ScheduledGame>,
    pub featured_game_id: Option<String>,
    pub status: WeekStatus,
}

impl WeekSchedule {
    pub fn games(&self) -> &[ScheduledGame] {
        &self.games
    }

    pub fn featured_game_id(&self) -> Option<&str> {
        self.featured_game_id.as_deref()
    }

    /// Recompute `status` from the games currently on the week, called
    /// by the caller after writing a game's status.
    pub fn recompute_status(&mut self) {
        self.status = if self.games.is_empty() {
            WeekStatus::Complete
        } else if self.games.iter().all(|g| g.status == ScheduledGameStatus::Completed) {
            WeekStatus::Complete
        } else if self.games.iter().any(|g| g.status != ScheduledGameStatus::Scheduled) {
            WeekStatus::InProgress
        } else {
            WeekStatus::Upcoming
        };
    }
}

/// # `SeasonStatus` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStatus {
    RegularSeason,
    WildCard,
    Divisional,
    ConferenceChampionship,
    SuperBowl,
    Offseason,
}

/// # `SeasonRaw` struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeasonRaw {
    pub id: String,
    pub season_number: u32,
    pub status: SeasonStatus,
    pub current_week: u32,
    pub schedule: Vec<WeekSchedule>,
    pub completed_at: Option<DateTime<Utc>>,
    pub champion: Option<usize>,
}

impl SeasonRaw {
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err(String::from("Season id must not be empty"));
        }
        if self.schedule.len() as u32 != TOTAL_WEEKS {
            return Err(format!("Season schedule must have exactly {} weeks, got {}", TOTAL_WEEKS, self.schedule.len()));
        }
        if self.current_week < 1 || self.current_week > TOTAL_WEEKS {
            return Err(format!("current_week must be in [1,{}], got {}", TOTAL_WEEKS, self.current_week));
        }
        Ok(())
    }
}

/// # `Season` struct
///
/// The persisted season record the broadcast scheduler reads. Created
/// once via [`Season::new`] with a freshly generated regular-season
/// schedule; the four playoff weeks start empty and are populated by
/// [`playoffs`] as each round's standings become known.
#[derive(Clone, Debug, Serialize)]
pub struct Season {
    id: String,
    season_number: u32,
    status: SeasonStatus,
    current_week: u32,
    schedule: Vec<WeekSchedule>,
    completed_at: Option<DateTime<Utc>>,
    champion: Option<usize>,
}

impl TryFrom<SeasonRaw> for Season {
    type Error = String;

    fn try_from(item: SeasonRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(Season {
            id: item.id,
            season_number: item.season_number,
            status: item.status,
            current_week: item.current_week,
            schedule: item.schedule,
            completed_at: item.completed_at,
            champion: item.champion,
        })
    }
}

impl<'de> Deserialize<'de> for Season {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = SeasonRaw::deserialize(deserializer)?;
        Season::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Season {
    /// Build a new season: generate the 18-week regular-season schedule
    /// from `teams` and `seed`, then append 4 empty playoff weeks.
    pub fn new(id: &str, season_number: u32, teams: &[Team], seed: &str) -> Result<Season, String> {
        let mut weeks = schedule::generate_season_schedule(teams, seed)?;
        for week in (REGULAR_SEASON_WEEKS + 1)..=TOTAL_WEEKS {
            weeks.push(WeekSchedule {
                week,
                games: Vec::new(),
                featured_game_id: None,
                status: WeekStatus::Upcoming,
            });
        }
        let raw = SeasonRaw {
            id: String::from(id),
            season_number,
            status: SeasonStatus::RegularSeason,
            current_week: 1,
            schedule: weeks,
            completed_at: None,
            champion: None,
        };
        Season::try_from(raw)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn season_number(&self) -> u32 {
        self.season_number
    }

    pub fn status(&self) -> SeasonStatus {
        self.status
    }

    pub fn set_status(&mut self, status: SeasonStatus) {
        self.status = status;
    }

    pub fn current_week(&self) -> u32 {
        self.current_week
    }

    pub fn set_current_week(&mut self, week: u32) {
        self.current_week = week;
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn complete(&mut self, champion: usize, at: DateTime<Utc>) {
        self.status = SeasonStatus::Offseason;
        self.champion = Some(champion);
        self.completed_at = Some(at);
    }

    pub fn champion(&self) -> Option<usize> {
        self.champion
    }

    pub fn schedule(&self) -> &[WeekSchedule] {
        &self.schedule
    }

    pub fn week(&self, week: u32) -> Option<&WeekSchedule> {
        self.schedule.get((week.checked_sub(1)?) as usize)
    }

    pub fn week_mut(&mut self, week: u32) -> Option<&mut WeekSchedule> {
        self.schedule.get_mut((week.checked_sub(1)?) as usize)
    }

    pub fn current_week_schedule(&self) -> Option<&WeekSchedule> {
        self.week(self.current_week)
    }

    /// Replace a playoff week's games (the regular-season weeks are
    /// fixed at construction; only weeks 19-22 are ever rewritten).
    pub fn set_week_games(&mut self, week: u32, games: Vec<ScheduledGame>) {
        if let Some(w) = self.week_mut(week) {
            let featured = games.first().map(|g| g.id.clone());
            w.games = games;
            w.featured_game_id = featured;
            w.recompute_status();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::{Conference, Division};

    fn canonical_league() -> Vec<Team> {
        let mut teams = Vec::new();
        let mut id = 1;
        for conference in [Conference::Afc, Conference::Nfc] {
            for division in [Division::North, Division::South, Division::East, Division::West] {
                for n in 0..4 {
                    teams.push(
                        Team::from_properties(
                            id,
                            &format!("Team{}", id),
                            &format!("T{:02}", id),
                            "City",
                            conference,
                            division,
                            "#000000",
                            "#ffffff",
                            n == 0,
                        )
                        .unwrap(),
                    );
                    id += 1;
                }
            }
        }
        teams
    }

    #[test]
    fn test_new_season_has_22_weeks() {
        let teams = canonical_league();
        let season = Season::new("season-1", 1, &teams, "schedule-test-seed-aabbccdd11223344").unwrap();
        assert_eq!(season.schedule().len(), TOTAL_WEEKS as usize);
        assert_eq!(season.current_week(), 1);
        assert_eq!(season.status(), SeasonStatus::RegularSeason);
    }

    #[test]
    fn test_playoff_weeks_start_empty() {
        let teams = canonical_league();
        let season = Season::new("season-1", 1, &teams, "schedule-test-seed-aabbccdd11223344").unwrap();
        for week in (REGULAR_SEASON_WEEKS + 1)..=TOTAL_WEEKS {
            assert!(season.week(week).unwrap().games().is_empty());
        }
    }
}
