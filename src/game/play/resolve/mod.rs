//! Family-specific outcome resolvers. Each submodule owns one play
//! family's regression constants and weighted tables; none of them ever
//! fail — penalties, turnovers, and injuries are ordinary outcomes, not
//! errors.

pub mod fieldgoal;
pub mod kickoff;
pub mod pass;
pub mod punt;
pub mod run;
pub mod special;

use rand::Rng;

use crate::game::play::call::{DefensiveCall, OffensiveCall};
use crate::game::play::result::{FormationMetadata, Participants, Penalty, PlayOutcome};
use crate::game::state::GameState;
use crate::player::Roster;

const P_FALSE_START: f64 = 0.012;
const P_OFFSIDE: f64 = 0.008;
const P_DELAY_OF_GAME: f64 = 0.004;

/// Sample a pre-snap penalty before any family resolver runs, per the
/// resolver contract's step 1. Returns `None` on the (overwhelmingly
/// common) no-penalty path.
fn sample_pre_snap_penalty(rng: &mut impl Rng) -> Option<PlayOutcome> {
    let roll: f64 = rng.gen();
    if roll < P_FALSE_START {
        Some(PlayOutcome::PreSnapPenalty {
            penalty: Penalty { description: String::from("False start"), yards: -5, declined: false, offsetting: false },
            play_duration: 5,
            offense: true,
        })
    } else if roll < P_FALSE_START + P_OFFSIDE {
        Some(PlayOutcome::PreSnapPenalty {
            penalty: Penalty { description: String::from("Offside"), yards: 5, declined: false, offsetting: false },
            play_duration: 5,
            offense: false,
        })
    } else if roll < P_FALSE_START + P_OFFSIDE + P_DELAY_OF_GAME {
        Some(PlayOutcome::PreSnapPenalty {
            penalty: Penalty { description: String::from("Delay of game"), yards: -5, declined: false, offsetting: false },
            play_duration: 5,
            offense: true,
        })
    } else {
        None
    }
}

/// Formation metadata presence rates from the resolver contract: on at
/// least 80% of "normal" plays the offensive/defensive call, protection
/// or run scheme, and formation variant are populated; motion on ~45%.
fn sample_formation_metadata(offense: OffensiveCall, defense: DefensiveCall, rng: &mut impl Rng) -> FormationMetadata {
    if rng.gen::<f64>() >= 0.80 {
        return FormationMetadata::default();
    }
    let motion_type = if rng.gen::<f64>() < 0.45 { Some(String::from("jet motion")) } else { None };
    let (protection_scheme, run_scheme) = match offense {
        OffensiveCall::Pass => (Some(String::from("slide protection")), None),
        OffensiveCall::Run => (None, Some(String::from("inside zone"))),
        _ => (None, None),
    };
    FormationMetadata {
        offensive_call: Some(format!("{:?}", offense)),
        defensive_call: Some(format!("{:?}", defense)),
        protection_scheme,
        run_scheme,
        motion_type,
        formation_variant: Some(String::from("11 personnel")),
        route_concept: if matches!(offense, OffensiveCall::Pass) { Some(String::from("caddy")) } else { None },
    }
}

/// Identify the players on each side a resolved play credits, mirroring
/// the starter-by-position lookups the box score rollup uses so the two
/// stay in agreement.
fn sample_participants(offense_call: OffensiveCall, offense: &Roster, defense: &Roster) -> Participants {
    use crate::player::Position;

    let defender_id = defense.starter(Position::Linebacker).map(|p| p.id());
    match offense_call {
        OffensiveCall::Run | OffensiveCall::TwoPoint => Participants {
            rusher_id: offense.starter(Position::RunningBack).map(|p| p.id()),
            defender_id,
            ..Participants::default()
        },
        OffensiveCall::Pass => Participants {
            passer_id: offense.starter(Position::Quarterback).map(|p| p.id()),
            receiver_id: offense.starter(Position::WideReceiver).map(|p| p.id()),
            defender_id,
            ..Participants::default()
        },
        OffensiveCall::FieldGoal | OffensiveCall::ExtraPoint => {
            Participants { kicker_id: offense.starter(Position::Kicker).map(|p| p.id()), ..Participants::default() }
        }
        OffensiveCall::Punt => Participants { kicker_id: offense.starter(Position::Punter).map(|p| p.id()), ..Participants::default() },
        OffensiveCall::Kneel | OffensiveCall::Spike => Participants::default(),
    }
}

/// Resolve one play given the offense/defense calls and the current
/// state. This is the single entry point the driver invokes; it
/// dispatches to the family-specific resolver named by `offense_call`.
#[allow(clippy::too_many_arguments)]
pub fn resolve_play(
    state: &GameState,
    offense_call: OffensiveCall,
    defense_call: DefensiveCall,
    offense_roster: &Roster,
    defense_roster: &Roster,
    rng: &mut impl Rng,
) -> (PlayOutcome, Participants, FormationMetadata) {
    if let Some(penalty) = sample_pre_snap_penalty(rng) {
        return (penalty, Participants::default(), FormationMetadata::default());
    }

    let metadata = if matches!(offense_call, OffensiveCall::Run | OffensiveCall::Pass) {
        sample_formation_metadata(offense_call, defense_call, rng)
    } else {
        FormationMetadata::default()
    };
    let participants = sample_participants(offense_call, offense_roster, defense_roster);

    let outcome = match offense_call {
        OffensiveCall::Run => run::resolve(state, offense_roster, defense_roster, defense_call, rng),
        OffensiveCall::Pass => pass::resolve(state, offense_roster, defense_roster, defense_call, rng),
        OffensiveCall::FieldGoal => fieldgoal::resolve(state, offense_roster, defense_call, rng),
        OffensiveCall::Punt => punt::resolve(state, offense_roster, defense_call, rng),
        OffensiveCall::Kneel => special::resolve_kneel(rng),
        OffensiveCall::Spike => special::resolve_spike(),
        OffensiveCall::ExtraPoint => special::resolve_extra_point(offense_roster, rng),
        OffensiveCall::TwoPoint => special::resolve_two_point(offense_roster, defense_roster, rng),
    };
    (outcome, participants, metadata)
}
