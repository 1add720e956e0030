//! The append-only record a simulated game produces: per-play events
//! grouped into drives, rolled up into a final `SimulatedGame` with a
//! box score and MVP selection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::game::play::result::{FormationMetadata, Participants, PlayOutcome};
use crate::game::stat::{DefensiveStats, KickingStats, PassingStats, ReceivingStats, RushingStats};
use crate::game::state::{GameState, Possession};
use crate::team::Team;

/// # `GameEvent` struct
///
/// One resolved play, carrying immutable state snapshots before and
/// after application per the data model's "events carry immutable
/// snapshots" lifecycle rule, plus the resolver's formation/route
/// annotations and the players it credited.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    pub event_number: u32,
    pub state_before: GameState,
    pub play_result: PlayOutcome,
    pub state_after: GameState,
    pub narrative_snapshot: String,
    pub formation_metadata: FormationMetadata,
    pub participants: Participants,
}

/// # `DriveResult` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveResult {
    Touchdown,
    FieldGoal,
    Safety,
    Punt,
    TurnoverInterception,
    TurnoverFumble,
    TurnoverOnDowns,
    EndOfHalf,
    EndOfGame,
}

/// # `Drive` struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Drive {
    pub possession_team: Possession,
    pub start_position: u32,
    pub end_position: u32,
    pub plays: Vec<GameEvent>,
    pub result: DriveResult,
}

/// # `PlayerBoxScoreLine` struct
///
/// Per-player aggregated contribution across every category the
/// resolver can produce for that player; only categories a player
/// actually recorded are populated (the rest stay at zero).
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct PlayerBoxScoreLine {
    pub rushing: RushingStats,
    pub passing: PassingStats,
    pub receiving: ReceivingStats,
    pub defense: DefensiveStats,
    pub kicking: KickingStats,
}

impl PlayerBoxScoreLine {
    /// Total scoring-weighted contribution across every stat category,
    /// used to pick `mvp_player_id` per the driver's finalize step.
    pub fn scoring_weight(&self) -> f64 {
        self.rushing.scoring_weight() + self.passing.scoring_weight() + self.receiving.scoring_weight() + self.defense.scoring_weight() + self.kicking.scoring_weight()
    }
}

/// # `BoxScore` struct
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoxScore {
    pub players: BTreeMap<usize, PlayerBoxScoreLine>,
}

impl BoxScore {
    pub fn new() -> BoxScore {
        BoxScore::default()
    }

    pub fn entry(&mut self, player_id: usize) -> &mut PlayerBoxScoreLine {
        self.players.entry(player_id).or_default()
    }

    /// The player with the single highest scoring-weighted contribution,
    /// breaking ties by lowest player id for determinism.
    pub fn mvp_player_id(&self) -> Option<usize> {
        self.players
            .iter()
            .max_by(|(id_a, a), (id_b, b)| {
                a.scoring_weight()
                    .partial_cmp(&b.scoring_weight())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(id_b.cmp(id_a))
            })
            .map(|(id, _)| *id)
    }
}

/// # `FinalScore` struct
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct FinalScore {
    pub home: u32,
    pub away: u32,
}

/// # `SimulatedGameStatus` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedGameStatus {
    Completed,
    Canceled,
}

/// # `SimulatedGame` struct
///
/// The terminal record a simulation produces: everything a caller needs
/// to render, verify, and score the game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulatedGame {
    pub id: String,
    pub home_team: Team,
    pub away_team: Team,
    pub events: Vec<GameEvent>,
    pub drives: Vec<Drive>,
    pub final_score: FinalScore,
    pub server_seed: String,
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub total_plays: u32,
    pub mvp_player_id: Option<usize>,
    pub box_score: BoxScore,
    pub weather: crate::game::weather::Weather,
    pub status: SimulatedGameStatus,
}
