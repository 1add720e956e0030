//! Regular-season standings: win/loss/tie records, point differential,
//! and conference/division filtering over this crate's `Season`/`Team`
//! model.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::league::{ScheduledGameStatus, Season};
use crate::team::{Conference, Division, Team};

/// # `TeamRecord` struct
///
/// Win/loss/tie counts plus points for/against, accumulated from a
/// season's completed games. Ties count as half a win toward
/// [`TeamRecord::win_pct`], the league's conventional tiebreak key.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct TeamRecord {
    wins: u32,
    losses: u32,
    ties: u32,
    points_for: u32,
    points_against: u32,
}

impl TeamRecord {
    pub fn new() -> TeamRecord {
        TeamRecord::default()
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn ties(&self) -> u32 {
        self.ties
    }

    pub fn points_for(&self) -> u32 {
        self.points_for
    }

    pub fn points_against(&self) -> u32 {
        self.points_against
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Win percentage with ties weighted as half a win; `0.0` for a team
    /// that hasn't played.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::league::standings::TeamRecord;
    ///
    /// assert_eq!(TeamRecord::new().win_pct(), 0.0);
    /// ```
    pub fn win_pct(&self) -> f64 {
        let played = self.games_played();
        if played == 0 {
            return 0.0;
        }
        (self.wins as f64 + self.ties as f64 * 0.5) / played as f64
    }

    pub fn point_differential(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }

    fn record_result(&mut self, points_for: u32, points_against: u32) {
        self.points_for += points_for;
        self.points_against += points_against;
        match points_for.cmp(&points_against) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Less => self.losses += 1,
            std::cmp::Ordering::Equal => self.ties += 1,
        }
    }
}

impl fmt::Display for TeamRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
    }
}

/// # `StandingsEntry` struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub team_id: usize,
    pub record: TeamRecord,
}

/// League-wide standings, ranked by win percentage then point
/// differential then team id (for a stable, deterministic order).
pub fn standings(season: &Season, teams: &[Team]) -> Vec<StandingsEntry> {
    let mut records: BTreeMap<usize, TeamRecord> = teams.iter().map(|t| (t.id(), TeamRecord::new())).collect();
    for week in season.schedule() {
        for game in week.games() {
            if game.status != ScheduledGameStatus::Completed {
                continue;
            }
            let (Some(home_score), Some(away_score)) = (game.home_score, game.away_score) else {
                continue;
            };
            if let Some(record) = records.get_mut(&game.home_team_id) {
                record.record_result(home_score, away_score);
            }
            if let Some(record) = records.get_mut(&game.away_team_id) {
                record.record_result(away_score, home_score);
            }
        }
    }

    let mut entries: Vec<StandingsEntry> = records.into_iter().map(|(team_id, record)| StandingsEntry { team_id, record }).collect();
    entries.sort_by(|a, b| {
        b.record
            .win_pct()
            .partial_cmp(&a.record.win_pct())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.record.point_differential().cmp(&a.record.point_differential()))
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
    entries
}

/// Standings restricted to the teams in one division.
pub fn division_standings(season: &Season, teams: &[Team], conference: Conference, division: Division) -> Vec<StandingsEntry> {
    let ids: HashSet<usize> = teams.iter().filter(|t| t.conference() == conference && t.division() == division).map(|t| t.id()).collect();
    standings(season, teams).into_iter().filter(|entry| ids.contains(&entry.team_id)).collect()
}

/// Standings restricted to one conference.
pub fn conference_standings(season: &Season, teams: &[Team], conference: Conference) -> Vec<StandingsEntry> {
    let ids: HashSet<usize> = teams.iter().filter(|t| t.conference() == conference).map(|t| t.id()).collect();
    standings(season, teams).into_iter().filter(|entry| ids.contains(&entry.team_id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameType;
    use crate::league::ScheduledGame;
    use crate::team::Division;

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
    fn test_standings_before_any_completed_games_are_all_winless() {
        let teams = canonical_league();
        let season = Season::new("season-1", 1, &teams, "schedule-test-seed-aabbccdd11223344").unwrap();
        let table = standings(&season, &teams);
        assert_eq!(table.len(), 32);
        assert!(table.iter().all(|entry| entry.record.games_played() == 0));
    }

    #[test]
    fn test_completed_game_updates_both_teams_records() {
        let teams = canonical_league();
        let mut season = Season::new("season-1", 1, &teams, "schedule-test-seed-aabbccdd11223344").unwrap();
        let (home_id, away_id) = {
            let first_week = season.week(1).unwrap();
            let game = &first_week.games()[0];
            (game.home_team_id, game.away_team_id)
        };
        let mut game = ScheduledGame::new(String::from("manual-1"), 1, home_id, away_id, GameType::Regular);
        game.status = ScheduledGameStatus::Completed;
        game.home_score = Some(24);
        game.away_score = Some(10);
        season.set_week_games(1, vec![game]);

        let table = standings(&season, &teams);
        let home_record = table.iter().find(|e| e.team_id == home_id).unwrap();
        let away_record = table.iter().find(|e| e.team_id == away_id).unwrap();
        assert_eq!(home_record.record.wins(), 1);
        assert_eq!(away_record.record.losses(), 1);
    }
}
