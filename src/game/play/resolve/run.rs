//! Run-play resolution: yardage, fumble, big-play carve-out, and
//! touchdown/safety checks, sampled from logistic-regression constants
//! over rusher/defender ratings and field position.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::game::play::call::DefensiveCall;
use crate::game::state::GameState;
use crate::player::Roster;

const MEAN_YARDS_INTR: f64 = 2.2503791522871384;
const MEAN_YARDS_COEF: f64 = 0.92550597;
const STD_YARDS_INTR: f64 = 4.053915588534795;
const STD_YARDS_COEF_1: f64 = 0.2487578;
const STD_YARDS_COEF_2: f64 = 0.0593874;

const MEAN_BP_YARDS_INTR: f64 = 12.781025340879893;
const MEAN_BP_YARDS_COEF: f64 = 16.32805521;
const STD_BP_YARDS_INTR: f64 = 10.014877063200005;
const STD_BP_YARDS_COEF_1: f64 = -3.82403981;
const STD_BP_YARDS_COEF_2: f64 = 7.60215528;

const MEAN_DURATION_INTR: f64 = 8.32135821;
const MEAN_DURATION_COEF_1: f64 = 0.11343699;
const MEAN_DURATION_COEF_2: f64 = -0.00056798;

const P_BP_TD_INTR: f64 = -3.9968093269427603;
const P_BP_TD_COEF: f64 = 0.39426769;

const P_BP_INTR: f64 = -2.878726031553263;
const P_BP_COEF: f64 = 0.82863208;

const P_FUMBLE_INTR: f64 = 0.04932479844415921;
const P_FUMBLE_COEF: f64 = -0.08432772;

/// Extra defender in the box: shifts effective skill differential
/// against the rusher, mirroring the field goal block boost pattern.
const BLITZ_SKILL_PENALTY: f64 = -1.5;
/// Defense playing back in coverage leaves the box light.
const PREVENT_SKILL_BONUS: f64 = 1.5;
/// Extra strip chance with a blitzing defender closing faster.
const BLITZ_FUMBLE_BOOST: f64 = 0.01;

fn logistic(intr: f64, coef: f64, x: f64) -> f64 {
    let z = (intr + coef * x).exp();
    (z / (1.0 + z)).clamp(0.0, 1.0)
}

fn rusher_strength(roster: &Roster) -> f64 {
    roster
        .starter(crate::player::Position::RunningBack)
        .map(|p| p.attributes().overall() as f64)
        .unwrap_or(70.0)
}

fn defender_strength(roster: &Roster) -> f64 {
    roster
        .starter(crate::player::Position::Linebacker)
        .map(|p| p.attributes().overall() as f64)
        .unwrap_or(70.0)
}

pub fn resolve(state: &GameState, offense: &Roster, defense: &Roster, defense_call: DefensiveCall, rng: &mut impl Rng) -> crate::game::play::result::PlayOutcome {
    use crate::game::play::result::PlayOutcome;

    let call_adjustment = match defense_call {
        DefensiveCall::Blitz => BLITZ_SKILL_PENALTY,
        DefensiveCall::PreventDefense => PREVENT_SKILL_BONUS,
        _ => 0.0,
    };
    let skill_diff = rusher_strength(offense) - defender_strength(defense) + call_adjustment;
    let is_big_play = rng.gen::<f64>() < logistic(P_BP_INTR, P_BP_COEF, skill_diff / 10.0);

    let yards_gained = if is_big_play {
        let mean = MEAN_BP_YARDS_INTR + MEAN_BP_YARDS_COEF * (skill_diff / 10.0);
        let std = (STD_BP_YARDS_INTR + STD_BP_YARDS_COEF_1 + STD_BP_YARDS_COEF_2 * (skill_diff / 10.0)).max(1.0);
        Normal::new(mean, std).unwrap().sample(rng).round() as i32
    } else {
        let mean = MEAN_YARDS_INTR + MEAN_YARDS_COEF * (skill_diff / 10.0);
        let std = (STD_YARDS_INTR + STD_YARDS_COEF_1 + STD_YARDS_COEF_2 * (skill_diff / 10.0)).max(1.0);
        Normal::new(mean, std).unwrap().sample(rng).round() as i32
    };

    let max_gain = (100 - state.ball_position()) as i32;
    let yards_gained = yards_gained.clamp(-15, max_gain);

    let touchdown = yards_gained >= max_gain && yards_gained > 0
        || (is_big_play && rng.gen::<f64>() < logistic(P_BP_TD_INTR, P_BP_TD_COEF, skill_diff / 10.0) && yards_gained >= max_gain);
    let own_goal_distance = state.ball_position() as i32 + yards_gained;
    let safety = own_goal_distance <= 0;

    let fumble_boost = if matches!(defense_call, DefensiveCall::Blitz) { BLITZ_FUMBLE_BOOST } else { 0.0 };
    let fumble = rng.gen::<f64>() < (logistic(P_FUMBLE_INTR, P_FUMBLE_COEF, skill_diff / 10.0) + fumble_boost).clamp(0.0, 1.0);
    let out_of_bounds = rng.gen::<f64>() < 0.12;

    let duration_mean = (MEAN_DURATION_INTR + MEAN_DURATION_COEF_1 * yards_gained as f64 + MEAN_DURATION_COEF_2 * (yards_gained as f64).powi(2)).max(3.0);
    let play_duration = duration_mean.round().max(3.0) as u32;

    PlayOutcome::Run {
        yards_gained: if safety { yards_gained.max(-(state.ball_position() as i32)) } else { yards_gained },
        play_duration,
        out_of_bounds,
        fumble,
        touchdown: touchdown && !safety,
        safety,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameType;
    use crate::game::state::Possession;
    use crate::game::weather::Weather;
    use crate::player::{Player, PlayerAttributes, Position};

    fn roster() -> Roster {
        let players = (0..22)
            .map(|i| Player::from_properties(i, &format!("P{}", i), (i % 99) as u32, Position::RunningBack, PlayerAttributes::new()).unwrap())
            .collect();
        Roster::from_players(players).unwrap()
    }

    #[test]
    fn test_run_never_exceeds_remaining_field() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 95);
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let outcome = resolve(&state, &roster(), &roster(), DefensiveCall::BaseDefense, &mut rng);
            if let crate::game::play::result::PlayOutcome::Run { yards_gained, .. } = outcome {
                assert!(yards_gained <= 5);
            }
        }
    }

    #[test]
    fn test_blitz_suppresses_average_run_yardage() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let mut rng = rand::thread_rng();
        let base_total: i32 = (0..300)
            .filter_map(|_| match resolve(&state, &roster(), &roster(), DefensiveCall::BaseDefense, &mut rng) {
                crate::game::play::result::PlayOutcome::Run { yards_gained, .. } => Some(yards_gained),
                _ => None,
            })
            .sum();
        let blitz_total: i32 = (0..300)
            .filter_map(|_| match resolve(&state, &roster(), &roster(), DefensiveCall::Blitz, &mut rng) {
                crate::game::play::result::PlayOutcome::Run { yards_gained, .. } => Some(yards_gained),
                _ => None,
            })
            .sum();
        assert!(blitz_total < base_total, "expected blitz ({}) to average fewer yards than base defense ({})", blitz_total, base_total);
    }
}
