//! Playoff seeding and bracket progression.
//!
//! A simplified `PlayoffPicture` concept (clinch/elimination bookkeeping
//! over a conference's standings): a seed-position snapshot rather than
//! full magic-number arithmetic, plus the bracket-advancing functions the
//! broadcast scheduler's `start_playoffs`/`advance_playoffs` actions need
//! a season to have.

use serde::{Deserialize, Serialize};

use crate::game::config::GameType;
use crate::league::standings::conference_standings;
use crate::league::{ScheduledGame, Season};
use crate::team::{Conference, Team};

/// Playoff berths per conference: 4 division leaders plus 2 wild
/// cards, seeded 1-6 by conference standing. Seeds 1 and 2 draw a bye
/// through the wild card round.
pub const PLAYOFF_SEEDS_PER_CONFERENCE: usize = 6;

/// # `PlayoffStatus` enum
///
/// A team's qualification snapshot against its conference's current
/// standings.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoffStatus {
    InPlayoffPosition { seed: usize },
    OnTheOutside,
}

/// # `PlayoffPictureEntry` struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayoffPictureEntry {
    pub team_id: usize,
    pub status: PlayoffStatus,
    pub games_back: f64,
}

/// # `PlayoffPicture` struct
///
/// One entry per team in a conference, ranked by the conference
/// standings, with the top [`PLAYOFF_SEEDS_PER_CONFERENCE`] marked
/// in playoff position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayoffPicture {
    pub conference: Conference,
    pub entries: Vec<PlayoffPictureEntry>,
}

/// Compute the playoff picture for one conference from the season's
/// current standings.
pub fn playoff_picture(season: &Season, teams: &[Team], conference: Conference) -> PlayoffPicture {
    let table = conference_standings(season, teams, conference);
    let leader_pct = table.first().map(|entry| entry.record.win_pct()).unwrap_or(0.0);
    let entries = table
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let status = if index < PLAYOFF_SEEDS_PER_CONFERENCE {
                PlayoffStatus::InPlayoffPosition { seed: index + 1 }
            } else {
                PlayoffStatus::OnTheOutside
            };
            let games_back = ((leader_pct - entry.record.win_pct()) * entry.record.games_played().max(1) as f64).max(0.0);
            PlayoffPictureEntry { team_id: entry.team_id, status, games_back }
        })
        .collect();
    PlayoffPicture { conference, entries }
}

/// Team ids in seed order (1st = best record) for one conference,
/// truncated to [`PLAYOFF_SEEDS_PER_CONFERENCE`].
pub fn seed_order(season: &Season, teams: &[Team], conference: Conference) -> Vec<usize> {
    conference_standings(season, teams, conference)
        .into_iter()
        .take(PLAYOFF_SEEDS_PER_CONFERENCE)
        .map(|entry| entry.team_id)
        .collect()
}

fn seed_rank(seeds: &[usize], team_id: usize) -> usize {
    seeds.iter().position(|&id| id == team_id).unwrap_or(usize::MAX)
}

/// Wild card round: seed 3 hosts seed 6, seed 4 hosts seed 5; seeds 1
/// and 2 sit out with a bye.
pub fn generate_wild_card_round(season: &Season, teams: &[Team], week: u32) -> Vec<ScheduledGame> {
    let mut games = Vec::new();
    let mut counter = 0u64;
    for conference in [Conference::Afc, Conference::Nfc] {
        let seeds = seed_order(season, teams, conference);
        if seeds.len() < PLAYOFF_SEEDS_PER_CONFERENCE {
            continue;
        }
        for (host, visitor) in [(2usize, 5usize), (3usize, 4usize)] {
            counter += 1;
            games.push(ScheduledGame::new(format!("{}-wc-{}", season.id(), counter), week, seeds[host], seeds[visitor], GameType::WildCard));
        }
    }
    games
}

/// Divisional round: the #1 seed hosts the lowest remaining seed among
/// the wild card winners; the #2 seed hosts the other.
pub fn generate_divisional_round(season: &Season, teams: &[Team], wild_card_games: &[ScheduledGame], week: u32) -> Vec<ScheduledGame> {
    let mut games = Vec::new();
    let mut counter = 0u64;
    for conference in [Conference::Afc, Conference::Nfc] {
        let seeds = seed_order(season, teams, conference);
        if seeds.len() < PLAYOFF_SEEDS_PER_CONFERENCE {
            continue;
        }
        let mut winners: Vec<usize> = wild_card_games
            .iter()
            .filter(|g| seeds.contains(&g.home_team_id) && seeds.contains(&g.away_team_id))
            .filter_map(ScheduledGame::winner_id)
            .collect();
        if winners.len() != 2 {
            continue;
        }
        winners.sort_by_key(|&id| seed_rank(&seeds, id));
        let (better_winner, worse_winner) = (winners[0], winners[1]);
        counter += 1;
        games.push(ScheduledGame::new(format!("{}-div-{}", season.id(), counter), week, seeds[0], worse_winner, GameType::Divisional));
        counter += 1;
        games.push(ScheduledGame::new(format!("{}-div-{}", season.id(), counter), week, seeds[1], better_winner, GameType::Divisional));
    }
    games
}

/// Conference championship: the two divisional-round winners per
/// conference play, better remaining seed at home.
pub fn generate_conference_championship(season: &Season, teams: &[Team], divisional_games: &[ScheduledGame], week: u32) -> Vec<ScheduledGame> {
    let mut games = Vec::new();
    for conference in [Conference::Afc, Conference::Nfc] {
        let seeds = seed_order(season, teams, conference);
        let mut winners: Vec<usize> = divisional_games
            .iter()
            .filter(|g| seeds.contains(&g.home_team_id) || seeds.contains(&g.away_team_id))
            .filter_map(ScheduledGame::winner_id)
            .collect();
        if winners.len() != 2 {
            continue;
        }
        winners.sort_by_key(|&id| seed_rank(&seeds, id));
        games.push(ScheduledGame::new(format!("{}-conf-{:?}", season.id(), conference), week, winners[0], winners[1], GameType::ConferenceChampionship));
    }
    games
}

/// Super Bowl: the two conference champions. Home designation is
/// nominal (NFC champion listed home) since the real league rotates it
/// by a convention outside this core's scope.
pub fn generate_super_bowl(season: &Season, conference_championship_games: &[ScheduledGame], week: u32) -> Option<ScheduledGame> {
    let mut champion_ids: Vec<usize> = conference_championship_games.iter().filter_map(ScheduledGame::winner_id).collect();
    if champion_ids.len() != 2 {
        return None;
    }
    champion_ids.sort_unstable();
    let (home, away) = (champion_ids[0], champion_ids[1]);
    Some(ScheduledGame::new(format!("{}-sb", season.id()), week, home, away, GameType::SuperBowl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::ScheduledGameStatus;
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

    fn complete(mut game: ScheduledGame, home_score: u32, away_score: u32) -> ScheduledGame {
        game.status = ScheduledGameStatus::Completed;
        game.home_score = Some(home_score);
        game.away_score = Some(away_score);
        game
    }

    #[test]
    fn test_wild_card_round_has_two_games_per_conference() {
        let teams = canonical_league();
        let season = Season::new("season-1", 1, &teams, "schedule-test-seed-aabbccdd11223344").unwrap();
        let games = generate_wild_card_round(&season, &teams, 19);
        assert_eq!(games.len(), 4);
    }

    #[test]
    fn test_divisional_round_reseeds_against_lowest_surviving_seed() {
        let teams = canonical_league();
        let season = Season::new("season-1", 1, &teams, "schedule-test-seed-aabbccdd11223344").unwrap();
        let wc_games = generate_wild_card_round(&season, &teams, 19);
        let completed: Vec<ScheduledGame> = wc_games.into_iter().map(|g| complete(g, 20, 10)).collect();
        let div_games = generate_divisional_round(&season, &teams, &completed, 20);
        assert_eq!(div_games.len(), 4);
        let seeds_afc = seed_order(&season, &teams, Conference::Afc);
        assert!(div_games.iter().any(|g| g.home_team_id == seeds_afc[0] || g.away_team_id == seeds_afc[0]));
    }
}
