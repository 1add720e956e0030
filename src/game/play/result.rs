//! The canonical play outcome: a sum type with exhaustive matching,
//! replacing the per-family discriminated-record pattern with optional
//! fields. Every play family's resolver in
//! [`crate::game::play::resolve`] produces exactly one `PlayOutcome`.

use serde::{Deserialize, Serialize};

use crate::game::state::{CoinTossChoice, Possession};

/// # `ScoreType` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    Touchdown,
    DefensiveTouchdown,
    PickSix,
    FumbleRecoveryTd,
    FieldGoal,
    Safety,
    ExtraPoint,
    TwoPointConversion,
    PatSafety,
    None,
}

/// # `ScoreEvent` struct
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub score_type: ScoreType,
    pub team: Possession,
    pub points: u32,
}

/// # `TurnoverType` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnoverType {
    Interception,
    Fumble,
    FumbleRecovery,
    TurnoverOnDowns,
}

/// # `TurnoverEvent` struct
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct TurnoverEvent {
    pub turnover_type: TurnoverType,
    pub return_yards: i32,
}

/// # `TouchbackType` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchbackType {
    Endzone,
    Bounce,
    Short,
}

/// # `Penalty` struct
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Penalty {
    pub description: String,
    pub yards: i32,
    pub declined: bool,
    pub offsetting: bool,
}

/// # `FormationMetadata` struct
///
/// Informational annotations for downstream rendering; per the resolver
/// contract these never alter outcomes.
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct FormationMetadata {
    pub offensive_call: Option<String>,
    pub defensive_call: Option<String>,
    pub protection_scheme: Option<String>,
    pub run_scheme: Option<String>,
    pub motion_type: Option<String>,
    pub formation_variant: Option<String>,
    pub route_concept: Option<String>,
}

/// # `Participants` struct
///
/// Identities of the players involved in a play, used to back per-player
/// stat aggregation and MVP selection.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Participants {
    pub passer_id: Option<usize>,
    pub rusher_id: Option<usize>,
    pub receiver_id: Option<usize>,
    pub defender_id: Option<usize>,
    pub kicker_id: Option<usize>,
}

/// # `PlayOutcome` enum
///
/// One variant per play family named in the data model. Each carries only
/// the fields meaningful for that family.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PlayOutcome {
    Run {
        yards_gained: i32,
        play_duration: u32,
        out_of_bounds: bool,
        fumble: bool,
        touchdown: bool,
        safety: bool,
    },
    PassComplete {
        yards_gained: i32,
        play_duration: u32,
        out_of_bounds: bool,
        fumble: bool,
        touchdown: bool,
        safety: bool,
    },
    PassIncomplete {
        play_duration: u32,
        dropped: bool,
        interception: bool,
        interception_return_yards: i32,
        pick_six: bool,
    },
    Sack {
        yards_lost: u32,
        play_duration: u32,
        fumble: bool,
        safety: bool,
    },
    Scramble {
        yards_gained: i32,
        play_duration: u32,
        out_of_bounds: bool,
        fumble: bool,
        touchdown: bool,
        safety: bool,
    },
    Kickoff {
        return_yards: i32,
        play_duration: u32,
        touchback: bool,
        touchback_type: Option<TouchbackType>,
        catch_spot: u32,
        out_of_bounds: bool,
        fumble: bool,
        return_touchdown: bool,
    },
    Punt {
        net_yards: i32,
        play_duration: u32,
        touchback: bool,
        touchback_type: Option<TouchbackType>,
        catch_spot: u32,
        blocked: bool,
        fair_catch: bool,
        muffed: bool,
        return_touchdown: bool,
        blocked_return_touchdown: bool,
    },
    FieldGoal {
        made: bool,
        blocked: bool,
        distance: u32,
        play_duration: u32,
        return_yards: i32,
        return_touchdown: bool,
    },
    ExtraPoint {
        made: bool,
        blocked: bool,
        play_duration: u32,
    },
    TwoPoint {
        success: bool,
        play_duration: u32,
        turnover_return_touchdown: bool,
    },
    Kneel {
        yards_gained: i32,
        play_duration: u32,
    },
    Spike {
        play_duration: u32,
    },
    PreSnapPenalty {
        penalty: Penalty,
        play_duration: u32,
        offense: bool,
    },
    Pregame,
    CoinToss {
        winner: Possession,
        choice: CoinTossChoice,
    },
}

impl PlayOutcome {
    /// Net yards gained from the offense's perspective; zero for plays
    /// with no field-position effect (pregame, coin toss, kicks that
    /// aren't returned, extra points).
    pub fn yards_gained(&self) -> i32 {
        match self {
            PlayOutcome::Run { yards_gained, .. } => *yards_gained,
            PlayOutcome::PassComplete { yards_gained, .. } => *yards_gained,
            PlayOutcome::PassIncomplete { .. } => 0,
            PlayOutcome::Sack { yards_lost, .. } => -(*yards_lost as i32),
            PlayOutcome::Scramble { yards_gained, .. } => *yards_gained,
            PlayOutcome::Kneel { yards_gained, .. } => *yards_gained,
            _ => 0,
        }
    }

    pub fn play_duration(&self) -> u32 {
        match self {
            PlayOutcome::Run { play_duration, .. }
            | PlayOutcome::PassComplete { play_duration, .. }
            | PlayOutcome::PassIncomplete { play_duration, .. }
            | PlayOutcome::Sack { play_duration, .. }
            | PlayOutcome::Scramble { play_duration, .. }
            | PlayOutcome::Kickoff { play_duration, .. }
            | PlayOutcome::Punt { play_duration, .. }
            | PlayOutcome::FieldGoal { play_duration, .. }
            | PlayOutcome::ExtraPoint { play_duration, .. }
            | PlayOutcome::TwoPoint { play_duration, .. }
            | PlayOutcome::Kneel { play_duration, .. }
            | PlayOutcome::Spike { play_duration }
            | PlayOutcome::PreSnapPenalty { play_duration, .. } => *play_duration,
            PlayOutcome::Pregame | PlayOutcome::CoinToss { .. } => 0,
        }
    }

    /// Whether a turnover occurred on this play and, if so, its shape.
    /// Turnover-on-downs is not represented here: it is a state-machine
    /// conclusion drawn from the down counter, not a resolver output.
    pub fn turnover(&self) -> Option<TurnoverEvent> {
        match self {
            PlayOutcome::Run { fumble: true, .. }
            | PlayOutcome::PassComplete { fumble: true, .. }
            | PlayOutcome::Scramble { fumble: true, .. } => {
                Some(TurnoverEvent { turnover_type: TurnoverType::Fumble, return_yards: 0 })
            }
            PlayOutcome::Sack { fumble: true, .. } => {
                Some(TurnoverEvent { turnover_type: TurnoverType::Fumble, return_yards: 0 })
            }
            PlayOutcome::PassIncomplete { interception: true, interception_return_yards, .. } => {
                Some(TurnoverEvent { turnover_type: TurnoverType::Interception, return_yards: *interception_return_yards })
            }
            PlayOutcome::Punt { muffed: true, .. } => {
                Some(TurnoverEvent { turnover_type: TurnoverType::FumbleRecovery, return_yards: 0 })
            }
            PlayOutcome::Kickoff { fumble: true, .. } => {
                Some(TurnoverEvent { turnover_type: TurnoverType::FumbleRecovery, return_yards: 0 })
            }
            _ => None,
        }
    }

    pub fn is_kickoff(&self) -> bool {
        matches!(self, PlayOutcome::Kickoff { .. })
    }

    pub fn is_punt(&self) -> bool {
        matches!(self, PlayOutcome::Punt { .. })
    }

    pub fn is_extra_point_or_two_point(&self) -> bool {
        matches!(self, PlayOutcome::ExtraPoint { .. } | PlayOutcome::TwoPoint { .. })
    }

    /// A short human-readable description, used for the narrative
    /// snapshot on [`crate::game::event::GameEvent`] and for the seed
    /// sensitivity test (first few event descriptions must differ across
    /// seeds).
    pub fn description(&self) -> String {
        match self {
            PlayOutcome::Run { yards_gained, touchdown, .. } => {
                if *touchdown {
                    format!("Run for {} yards, touchdown", yards_gained)
                } else {
                    format!("Run for {} yards", yards_gained)
                }
            }
            PlayOutcome::PassComplete { yards_gained, touchdown, .. } => {
                if *touchdown {
                    format!("Pass complete for {} yards, touchdown", yards_gained)
                } else {
                    format!("Pass complete for {} yards", yards_gained)
                }
            }
            PlayOutcome::PassIncomplete { dropped, interception, .. } => {
                if *interception {
                    String::from("Pass intercepted")
                } else if *dropped {
                    String::from("Pass incomplete, dropped")
                } else {
                    String::from("Pass incomplete")
                }
            }
            PlayOutcome::Sack { yards_lost, .. } => format!("Sacked for {} yards lost", yards_lost),
            PlayOutcome::Scramble { yards_gained, .. } => format!("Scramble for {} yards", yards_gained),
            PlayOutcome::Kickoff { touchback: true, .. } => String::from("Kickoff, touchback"),
            PlayOutcome::Kickoff { return_yards, .. } => format!("Kickoff returned {} yards", return_yards),
            PlayOutcome::Punt { blocked: true, .. } => String::from("Punt blocked"),
            PlayOutcome::Punt { net_yards, .. } => format!("Punt, net {} yards", net_yards),
            PlayOutcome::FieldGoal { made: true, distance, .. } => format!("{}-yard field goal is good", distance),
            PlayOutcome::FieldGoal { blocked: true, .. } => String::from("Field goal blocked"),
            PlayOutcome::FieldGoal { distance, .. } => format!("{}-yard field goal no good", distance),
            PlayOutcome::ExtraPoint { made: true, .. } => String::from("Extra point is good"),
            PlayOutcome::ExtraPoint { .. } => String::from("Extra point no good"),
            PlayOutcome::TwoPoint { success: true, .. } => String::from("Two-point conversion successful"),
            PlayOutcome::TwoPoint { .. } => String::from("Two-point conversion failed"),
            PlayOutcome::Kneel { .. } => String::from("Quarterback kneels"),
            PlayOutcome::Spike { .. } => String::from("Quarterback spikes the ball"),
            PlayOutcome::PreSnapPenalty { penalty, .. } => penalty.description.clone(),
            PlayOutcome::Pregame => String::from("Pregame"),
            PlayOutcome::CoinToss { .. } => String::from("Coin toss"),
        }
    }
}

/// The scoring event a play produced, if any, framed against `offense`
/// (the team that had the ball at the snap). A kickoff/punt return
/// touchdown, a pick-six, and a blocked-kick return all score for the
/// opposing side; everything else scores for the offense.
pub fn score_event(outcome: &PlayOutcome, offense: Possession) -> Option<ScoreEvent> {
    let defense = offense.flip();
    match outcome {
        PlayOutcome::Run { touchdown: true, .. } | PlayOutcome::PassComplete { touchdown: true, .. } | PlayOutcome::Scramble { touchdown: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::Touchdown, team: offense, points: 6 })
        }
        PlayOutcome::Run { safety: true, .. } | PlayOutcome::PassComplete { safety: true, .. } | PlayOutcome::Scramble { safety: true, .. } | PlayOutcome::Sack { safety: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::Safety, team: defense, points: 2 })
        }
        PlayOutcome::PassIncomplete { interception: true, pick_six: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::PickSix, team: defense, points: 6 })
        }
        PlayOutcome::Kickoff { return_touchdown: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::DefensiveTouchdown, team: defense, points: 6 })
        }
        PlayOutcome::Punt { return_touchdown: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::DefensiveTouchdown, team: defense, points: 6 })
        }
        PlayOutcome::Punt { blocked_return_touchdown: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::DefensiveTouchdown, team: defense, points: 6 })
        }
        PlayOutcome::FieldGoal { made: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::FieldGoal, team: offense, points: 3 })
        }
        PlayOutcome::FieldGoal { return_touchdown: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::DefensiveTouchdown, team: defense, points: 6 })
        }
        PlayOutcome::ExtraPoint { made: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::ExtraPoint, team: offense, points: 1 })
        }
        PlayOutcome::TwoPoint { success: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::TwoPointConversion, team: offense, points: 2 })
        }
        PlayOutcome::TwoPoint { turnover_return_touchdown: true, .. } => {
            Some(ScoreEvent { score_type: ScoreType::DefensiveTouchdown, team: defense, points: 2 })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sack_yards_are_negative() {
        let outcome = PlayOutcome::Sack { yards_lost: 7, play_duration: 30, fumble: false, safety: false };
        assert_eq!(outcome.yards_gained(), -7);
    }

    #[test]
    fn test_interception_is_a_turnover() {
        let outcome = PlayOutcome::PassIncomplete {
            play_duration: 20,
            dropped: false,
            interception: true,
            interception_return_yards: 12,
            pick_six: false,
        };
        let turnover = outcome.turnover().unwrap();
        assert_eq!(turnover.turnover_type, TurnoverType::Interception);
        assert_eq!(turnover.return_yards, 12);
    }

    #[test]
    fn test_description_differs_by_outcome() {
        let run = PlayOutcome::Run { yards_gained: 4, play_duration: 25, out_of_bounds: false, fumble: false, touchdown: false, safety: false };
        let pass = PlayOutcome::PassIncomplete { play_duration: 5, dropped: true, interception: false, interception_return_yards: 0, pick_six: false };
        assert_ne!(run.description(), pass.description());
    }
}
