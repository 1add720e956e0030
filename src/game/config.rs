//! Simulation input: two teams, their rosters, a game type, and the
//! provably-fair seed pair.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::player::Roster;
use crate::rng::MIN_SERVER_SEED_HEX_CHARS;
use crate::team::Team;

/// # `GameType` enum
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Regular,
    WildCard,
    Divisional,
    ConferenceChampionship,
    SuperBowl,
}

impl GameType {
    /// Whether this game type is a playoff round, which changes the
    /// overtime period length and timeout allotment per
    /// [`crate::game::state::OvertimeState`].
    pub fn is_playoff(&self) -> bool {
        !matches!(self, GameType::Regular)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            GameType::Regular => "Regular Season",
            GameType::WildCard => "Wild Card",
            GameType::Divisional => "Divisional",
            GameType::ConferenceChampionship => "Conference Championship",
            GameType::SuperBowl => "Super Bowl",
        };
        write!(f, "{}", name)
    }
}

/// # `GameConfigRaw` struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfigRaw {
    pub home_team: Team,
    pub away_team: Team,
    pub home_roster: Roster,
    pub away_roster: Roster,
    pub game_type: GameType,
    pub server_seed: String,
    pub client_seed: String,
}

impl GameConfigRaw {
    pub fn validate(&self) -> Result<(), String> {
        if self.home_team.id() == self.away_team.id() {
            return Err(String::from("Home and away teams must not be the same team"));
        }
        if self.server_seed.len() < MIN_SERVER_SEED_HEX_CHARS {
            return Err(format!(
                "Server seed must be at least {} characters: {}",
                MIN_SERVER_SEED_HEX_CHARS,
                self.server_seed.len()
            ));
        }
        if self.client_seed.is_empty() {
            return Err(String::from("Client seed must not be empty"));
        }
        Ok(())
    }
}

/// # `GameConfig` struct
///
/// The complete, validated input to [`crate::game::sim::simulate_game`].
#[derive(Clone, Debug, Serialize)]
pub struct GameConfig {
    home_team: Team,
    away_team: Team,
    home_roster: Roster,
    away_roster: Roster,
    game_type: GameType,
    server_seed: String,
    client_seed: String,
}

impl TryFrom<GameConfigRaw> for GameConfig {
    type Error = String;

    fn try_from(item: GameConfigRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(GameConfig {
            home_team: item.home_team,
            away_team: item.away_team,
            home_roster: item.home_roster,
            away_roster: item.away_roster,
            game_type: item.game_type,
            server_seed: item.server_seed,
            client_seed: item.client_seed,
        })
    }
}

impl<'de> Deserialize<'de> for GameConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = GameConfigRaw::deserialize(deserializer)?;
        GameConfig::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl GameConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn from_properties(
        home_team: Team,
        away_team: Team,
        home_roster: Roster,
        away_roster: Roster,
        game_type: GameType,
        server_seed: &str,
        client_seed: &str,
    ) -> Result<GameConfig, String> {
        let raw = GameConfigRaw {
            home_team,
            away_team,
            home_roster,
            away_roster,
            game_type,
            server_seed: String::from(server_seed),
            client_seed: String::from(client_seed),
        };
        GameConfig::try_from(raw)
    }

    pub fn home_team(&self) -> &Team {
        &self.home_team
    }

    pub fn away_team(&self) -> &Team {
        &self.away_team
    }

    pub fn home_roster(&self) -> &Roster {
        &self.home_roster
    }

    pub fn away_roster(&self) -> &Roster {
        &self.away_roster
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn server_seed(&self) -> &str {
        &self.server_seed
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }
}

/// # `GameConfigBuilder` struct
#[derive(Clone, Debug, Default)]
pub struct GameConfigBuilder {
    home_team: Option<Team>,
    away_team: Option<Team>,
    home_roster: Option<Roster>,
    away_roster: Option<Roster>,
    game_type: GameType,
    server_seed: String,
    client_seed: String,
}

impl Default for GameType {
    fn default() -> Self {
        GameType::Regular
    }
}

impl GameConfigBuilder {
    pub fn new() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    pub fn home_team(mut self, team: Team) -> Self {
        self.home_team = Some(team);
        self
    }

    pub fn away_team(mut self, team: Team) -> Self {
        self.away_team = Some(team);
        self
    }

    pub fn home_roster(mut self, roster: Roster) -> Self {
        self.home_roster = Some(roster);
        self
    }

    pub fn away_roster(mut self, roster: Roster) -> Self {
        self.away_roster = Some(roster);
        self
    }

    pub fn game_type(mut self, game_type: GameType) -> Self {
        self.game_type = game_type;
        self
    }

    pub fn server_seed(mut self, server_seed: &str) -> Self {
        self.server_seed = String::from(server_seed);
        self
    }

    pub fn client_seed(mut self, client_seed: &str) -> Self {
        self.client_seed = String::from(client_seed);
        self
    }

    pub fn build(self) -> Result<GameConfig, String> {
        let home_team = self.home_team.ok_or_else(|| String::from("home_team is required"))?;
        let away_team = self.away_team.ok_or_else(|| String::from("away_team is required"))?;
        let home_roster = self.home_roster.ok_or_else(|| String::from("home_roster is required"))?;
        let away_roster = self.away_roster.ok_or_else(|| String::from("away_roster is required"))?;
        GameConfig::from_properties(
            home_team,
            away_team,
            home_roster,
            away_roster,
            self.game_type,
            &self.server_seed,
            &self.client_seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Player, PlayerAttributes, Position};

    fn roster() -> Roster {
        let players = (0..22)
            .map(|i| {
                Player::from_properties(
                    i,
                    &format!("Player {}", i),
                    (i % 99) as u32,
                    Position::RunningBack,
                    PlayerAttributes::new(),
                )
                .unwrap()
            })
            .collect();
        Roster::from_players(players).unwrap()
    }

    #[test]
    fn test_rejects_same_team_both_sides() {
        let team = Team::new();
        let result = GameConfig::from_properties(
            team.clone(),
            team,
            roster(),
            roster(),
            GameType::Regular,
            "0123456789abcdef",
            "client",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_short_server_seed() {
        let result = GameConfigBuilder::new()
            .home_team(Team::from_properties(1, "A", "AAA", "A City", crate::team::Conference::Afc, crate::team::Division::East, "#000", "#fff", false).unwrap())
            .away_team(Team::new())
            .home_roster(roster())
            .away_roster(roster())
            .server_seed("short")
            .client_seed("client")
            .build();
        assert!(result.is_err());
    }
}
