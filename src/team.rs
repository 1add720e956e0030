//! Team identity.
//!
//! A [`Team`] is pure identity: who they are, which conference and
//! division they belong to, their colors, and whether they play home
//! games indoors. It carries no ratings and no mutable game state —
//! ratings live on individual [`crate::player::Player`]s, and all mutable
//! state lives on [`crate::game::state::GameState`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// # `Conference` enum
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conference {
    Afc,
    Nfc,
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        };
        write!(f, "{}", name)
    }
}

/// # `Division` enum
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    North,
    South,
    East,
    West,
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Division::North => "North",
            Division::South => "South",
            Division::East => "East",
            Division::West => "West",
        };
        write!(f, "{}", name)
    }
}

/// Default team name, used when a `Team` is default-constructed.
pub const DEFAULT_TEAM_NAME: &str = "Null Island Defaults";

/// Default team abbreviation.
pub const DEFAULT_TEAM_ABBREVIATION: &str = "NULL";

/// # `TeamRaw` struct
///
/// A `TeamRaw` is a [`Team`] before its properties have been validated.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct TeamRaw {
    pub id: usize,
    pub name: String,
    pub abbreviation: String,
    pub city: String,
    pub conference: Conference,
    pub division: Division,
    pub primary_color: String,
    pub secondary_color: String,
    pub dome: bool,
}

impl TeamRaw {
    /// Validate the raw team.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err(String::from("Team name must not be empty"));
        }
        if self.abbreviation.is_empty() || self.abbreviation.len() > 4 {
            return Err(format!(
                "Team abbreviation must be 1-4 characters: {}",
                self.abbreviation
            ));
        }
        if self.city.is_empty() {
            return Err(String::from("Team city must not be empty"));
        }
        Ok(())
    }
}

/// # `Team` struct
///
/// Immutable team identity, read-only once loaded.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Team {
    id: usize,
    name: String,
    abbreviation: String,
    city: String,
    conference: Conference,
    division: Division,
    primary_color: String,
    secondary_color: String,
    dome: bool,
}

impl TryFrom<TeamRaw> for Team {
    type Error = String;

    fn try_from(item: TeamRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(Team {
            id: item.id,
            name: item.name,
            abbreviation: item.abbreviation,
            city: item.city,
            conference: item.conference,
            division: item.division,
            primary_color: item.primary_color,
            secondary_color: item.secondary_color,
            dome: item.dome,
        })
    }
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = TeamRaw::deserialize(deserializer)?;
        Team::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Default for Team {
    /// Default constructor for `Team`, used by callers that only need a
    /// placeholder identity (e.g. in doctests).
    fn default() -> Self {
        Team {
            id: 0,
            name: String::from(DEFAULT_TEAM_NAME),
            abbreviation: String::from(DEFAULT_TEAM_ABBREVIATION),
            city: String::from("Null Island"),
            conference: Conference::Afc,
            division: Division::North,
            primary_color: String::from("#000000"),
            secondary_color: String::from("#ffffff"),
            dome: false,
        }
    }
}

impl Team {
    /// Constructor for the `Team` struct with defaulted properties.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::team::Team;
    ///
    /// let my_team = Team::new();
    /// assert_eq!(my_team.name(), "Null Island Defaults");
    /// ```
    pub fn new() -> Team {
        Team::default()
    }

    /// Constructor for `Team` given its properties.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::team::{Team, Conference, Division};
    ///
    /// let vikings = Team::from_properties(
    ///     1, "Vikings", "MIN", "Minneapolis", Conference::Nfc, Division::North,
    ///     "#4F2683", "#FFC62F", true
    /// );
    /// assert!(vikings.is_ok());
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn from_properties(
        id: usize,
        name: &str,
        abbreviation: &str,
        city: &str,
        conference: Conference,
        division: Division,
        primary_color: &str,
        secondary_color: &str,
        dome: bool,
    ) -> Result<Team, String> {
        let raw = TeamRaw {
            id,
            name: String::from(name),
            abbreviation: String::from(abbreviation),
            city: String::from(city),
            conference,
            division,
            primary_color: String::from(primary_color),
            secondary_color: String::from(secondary_color),
            dome,
        };
        Team::try_from(raw)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn conference(&self) -> Conference {
        self.conference
    }

    pub fn division(&self) -> Division {
        self.division
    }

    pub fn primary_color(&self) -> &str {
        &self.primary_color
    }

    pub fn secondary_color(&self) -> &str {
        &self.secondary_color
    }

    /// Whether the team's home games are played indoors, which forces
    /// clear/neutral weather for every play (see
    /// [`crate::game::weather::Weather::indoor`]).
    pub fn dome(&self) -> bool {
        self.dome
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ({})", self.city, self.name, self.abbreviation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_rejects_empty_name() {
        let result = Team::from_properties(
            1,
            "",
            "ABC",
            "City",
            Conference::Afc,
            Division::East,
            "#000",
            "#fff",
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_team_rejects_long_abbreviation() {
        let result = Team::from_properties(
            1,
            "Name",
            "ABCDE",
            "City",
            Conference::Afc,
            Division::East,
            "#000",
            "#fff",
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_team_default() {
        let team = Team::default();
        assert_eq!(team.name(), DEFAULT_TEAM_NAME);
        assert!(!team.dome());
    }
}
