//! Individual players and rosters.
//!
//! A [`Player`] carries identity plus per-attribute ratings in `[0, 100]`,
//! following the same rating-struct idiom the engine uses for team-level
//! aggregates (see [`crate::team`]). A [`Roster`] is the set of players
//! fielded by one team for one game; it is immutable for the duration of
//! the simulation and exposes starter lookups by [`Position`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// # `Position` enum
///
/// The on-field position a [`Player`] lines up at.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    OffensiveLine,
    DefensiveLine,
    Linebacker,
    Cornerback,
    Safety,
    Kicker,
    Punter,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::OffensiveLine => "OL",
            Position::DefensiveLine => "DL",
            Position::Linebacker => "LB",
            Position::Cornerback => "CB",
            Position::Safety => "S",
            Position::Kicker => "K",
            Position::Punter => "P",
        };
        write!(f, "{}", name)
    }
}

/// # `PlayerAttributesRaw` struct
///
/// Unvalidated per-attribute ratings for a [`Player`], each nominally in
/// `[0, 100]`.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub struct PlayerAttributesRaw {
    pub speed: u32,
    pub strength: u32,
    pub accuracy: u32,
    pub catching: u32,
    pub blocking: u32,
    pub tackling: u32,
    pub coverage: u32,
    pub kick_power: u32,
    pub kick_accuracy: u32,
    pub discipline: u32,
    pub durability: u32,
}

impl PlayerAttributesRaw {
    /// Validate that every attribute is in range `[0, 100]`.
    pub fn validate(&self) -> Result<(), String> {
        let fields: [(&str, u32); 11] = [
            ("speed", self.speed),
            ("strength", self.strength),
            ("accuracy", self.accuracy),
            ("catching", self.catching),
            ("blocking", self.blocking),
            ("tackling", self.tackling),
            ("coverage", self.coverage),
            ("kick_power", self.kick_power),
            ("kick_accuracy", self.kick_accuracy),
            ("discipline", self.discipline),
            ("durability", self.durability),
        ];
        for (name, value) in fields {
            if value > 100 {
                return Err(format!("{} attribute is out of range [0, 100]: {}", name, value));
            }
        }
        Ok(())
    }
}

/// # `PlayerAttributes` struct
///
/// Validated per-attribute ratings for a [`Player`].
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Serialize)]
pub struct PlayerAttributes {
    speed: u32,
    strength: u32,
    accuracy: u32,
    catching: u32,
    blocking: u32,
    tackling: u32,
    coverage: u32,
    kick_power: u32,
    kick_accuracy: u32,
    discipline: u32,
    durability: u32,
}

impl TryFrom<PlayerAttributesRaw> for PlayerAttributes {
    type Error = String;

    fn try_from(item: PlayerAttributesRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(PlayerAttributes {
            speed: item.speed,
            strength: item.strength,
            accuracy: item.accuracy,
            catching: item.catching,
            blocking: item.blocking,
            tackling: item.tackling,
            coverage: item.coverage,
            kick_power: item.kick_power,
            kick_accuracy: item.kick_accuracy,
            discipline: item.discipline,
            durability: item.durability,
        })
    }
}

impl<'de> Deserialize<'de> for PlayerAttributes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = PlayerAttributesRaw::deserialize(deserializer)?;
        PlayerAttributes::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        PlayerAttributes {
            speed: 50,
            strength: 50,
            accuracy: 50,
            catching: 50,
            blocking: 50,
            tackling: 50,
            coverage: 50,
            kick_power: 50,
            kick_accuracy: 50,
            discipline: 50,
            durability: 50,
        }
    }
}

impl PlayerAttributes {
    /// Construct a default (all-50) rating set.
    pub fn new() -> PlayerAttributes {
        PlayerAttributes::default()
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    pub fn catching(&self) -> u32 {
        self.catching
    }

    pub fn blocking(&self) -> u32 {
        self.blocking
    }

    pub fn tackling(&self) -> u32 {
        self.tackling
    }

    pub fn coverage(&self) -> u32 {
        self.coverage
    }

    pub fn kick_power(&self) -> u32 {
        self.kick_power
    }

    pub fn kick_accuracy(&self) -> u32 {
        self.kick_accuracy
    }

    pub fn discipline(&self) -> u32 {
        self.discipline
    }

    pub fn durability(&self) -> u32 {
        self.durability
    }

    /// A single-number overall, averaged across every attribute. Used as
    /// the default starter-ranking key within a position group.
    pub fn overall(&self) -> u32 {
        let sum = self.speed
            + self.strength
            + self.accuracy
            + self.catching
            + self.blocking
            + self.tackling
            + self.coverage
            + self.kick_power
            + self.kick_accuracy
            + self.discipline
            + self.durability;
        sum / 11
    }
}

/// # `PlayerRaw` struct
///
/// Unvalidated construction parameters for a [`Player`].
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct PlayerRaw {
    pub id: usize,
    pub name: String,
    pub jersey_number: u32,
    pub position: Position,
    pub attributes: PlayerAttributesRaw,
}

impl PlayerRaw {
    /// Validate the raw player.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err(String::from("Player name must not be empty"));
        }
        if self.jersey_number > 99 {
            return Err(format!("Jersey number is not in range [0, 99]: {}", self.jersey_number));
        }
        self.attributes.validate()
    }
}

/// # `Player` struct
///
/// Identity plus ratings for one roster member. Immutable for the
/// duration of a simulated game.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Player {
    id: usize,
    name: String,
    jersey_number: u32,
    position: Position,
    attributes: PlayerAttributes,
}

impl TryFrom<PlayerRaw> for Player {
    type Error = String;

    fn try_from(item: PlayerRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(Player {
            id: item.id,
            name: item.name,
            jersey_number: item.jersey_number,
            position: item.position,
            attributes: PlayerAttributes::try_from(item.attributes)?,
        })
    }
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = PlayerRaw::deserialize(deserializer)?;
        Player::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Player {
    /// Construct a player directly from properties, applying validation.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::player::{Player, Position, PlayerAttributes};
    ///
    /// let qb = Player::from_properties(1, "Test QB", 12, Position::Quarterback, PlayerAttributes::new());
    /// assert!(qb.is_ok());
    /// ```
    pub fn from_properties(
        id: usize,
        name: &str,
        jersey_number: u32,
        position: Position,
        attributes: PlayerAttributes,
    ) -> Result<Player, String> {
        if name.is_empty() {
            return Err(String::from("Player name must not be empty"));
        }
        if jersey_number > 99 {
            return Err(format!("Jersey number is not in range [0, 99]: {}", jersey_number));
        }
        Ok(Player {
            id,
            name: String::from(name),
            jersey_number,
            position,
            attributes,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn jersey_number(&self) -> u32 {
        self.jersey_number
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn attributes(&self) -> &PlayerAttributes {
        &self.attributes
    }
}

/// Minimum number of active players a [`Roster`] must carry.
pub const MIN_ROSTER_SIZE: usize = 22;

/// # `Roster` struct
///
/// The set of players associated with a team for one game. Immutable
/// during simulation; exposes starter lookups by [`Position`], where the
/// starter at a position is its highest-`overall` player.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Roster {
    players: BTreeMap<usize, Player>,
}

impl Roster {
    /// Construct a roster from a list of players, requiring at least
    /// [`MIN_ROSTER_SIZE`] and unique player ids.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::player::{Player, Position, PlayerAttributes, Roster};
    ///
    /// let players: Vec<Player> = (0..22).map(|i| {
    ///     Player::from_properties(i, "Player", i as u32, Position::WideReceiver, PlayerAttributes::new()).unwrap()
    /// }).collect();
    /// let roster = Roster::from_players(players);
    /// assert!(roster.is_ok());
    /// ```
    pub fn from_players(players: Vec<Player>) -> Result<Roster, String> {
        if players.len() < MIN_ROSTER_SIZE {
            return Err(format!(
                "Roster must have at least {} players: {}",
                MIN_ROSTER_SIZE,
                players.len()
            ));
        }
        let mut map = BTreeMap::new();
        for player in players {
            if map.insert(player.id(), player).is_some() {
                return Err(String::from("Roster contains duplicate player ids"));
            }
        }
        Ok(Roster { players: map })
    }

    /// Borrow the roster's players, keyed by id.
    pub fn players(&self) -> &BTreeMap<usize, Player> {
        &self.players
    }

    /// Borrow a player by id.
    pub fn player(&self, id: usize) -> Option<&Player> {
        self.players.get(&id)
    }

    /// The highest-`overall` player at `position`, if any are rostered.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::player::{Player, Position, PlayerAttributes, Roster};
    ///
    /// let players: Vec<Player> = (0..22).map(|i| {
    ///     Player::from_properties(i, "Player", i as u32, Position::WideReceiver, PlayerAttributes::new()).unwrap()
    /// }).collect();
    /// let roster = Roster::from_players(players).unwrap();
    /// assert!(roster.starter(Position::WideReceiver).is_some());
    /// assert!(roster.starter(Position::Kicker).is_none());
    /// ```
    pub fn starter(&self, position: Position) -> Option<&Player> {
        self.players
            .values()
            .filter(|p| p.position() == position)
            .max_by_key(|p| (p.attributes().overall(), p.id()))
    }

    /// All players at `position`, in descending `overall` order.
    pub fn depth_chart(&self, position: Position) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().filter(|p| p.position() == position).collect();
        players.sort_by(|a, b| b.attributes().overall().cmp(&a.attributes().overall()));
        players
    }

    /// Number of rostered players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
