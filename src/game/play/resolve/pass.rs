//! Pass-play resolution: pressure/sack/scramble branching, short vs deep
//! completion, yards-after-catch, the dropped-pass mechanic, and
//! interception/return sampling.

use rand::Rng;
use rand_distr::{Distribution, Normal, SkewNormal};

use crate::game::play::call::DefensiveCall;
use crate::game::state::GameState;
use crate::player::Roster;

const P_PRESSURE_INTR: f64 = 0.271330308819705;
const P_PRESSURE_COEF: f64 = -0.21949841;

const P_SACK_INTR: f64 = 0.10898853099029118;
const P_SACK_COEF: f64 = -0.08144463;
const MEAN_SACK_YARDS: f64 = 6.703931;
const STD_SACK_YARDS: f64 = 3.640892;

const P_SCRAMBLE_INTR: f64 = 0.004914770911025865;
const P_SCRAMBLE_COEF: f64 = 0.13433329;
const MEAN_SCRAMBLE_YARDS_INTR: f64 = 6.313938741503718;
const MEAN_SCRAMBLE_YARDS_COEF: f64 = 1.61219979;
const STD_SCRAMBLE_YARDS_INTR: f64 = 4.974662775900808;
const STD_SCRAMBLE_YARDS_COEF: f64 = 2.92020782;
const SKEW_SCRAMBLE_YARDS_INTR: f64 = 4.836766323216999;
const SKEW_SCRAMBLE_YARDS_COEF_1: f64 = -12.22272275;
const SKEW_SCRAMBLE_YARDS_COEF_2: f64 = 11.66478691;

const P_SHORT_PASS_INTR: f64 = 0.8410555875020549;
const P_SHORT_PASS_COEF_1: f64 = -0.0054862949;
const P_SHORT_PASS_COEF_2: f64 = 0.000050472999;

const MEAN_SHORT_PASS_DIST_INTR: f64 = 3.4999015440062564;
const MEAN_SHORT_PASS_DIST_COEF_1: f64 = 0.0604532760;
const MEAN_SHORT_PASS_DIST_COEF_2: f64 = -0.00118944537;
const STD_SHORT_PASS_DIST_INTR: f64 = 3.265933454906047;
const STD_SHORT_PASS_DIST_COEF_1: f64 = 0.130891269;

const MEAN_DEEP_PASS_DIST_INTR: f64 = 2.005519456054698;
const MEAN_DEEP_PASS_DIST_COEF_1: f64 = 1.23979494;
const STD_DEEP_PASS_DIST_INTR: f64 = -1.3385882641162565;
const STD_DEEP_PASS_DIST_COEF_1: f64 = 0.277596854;

const P_INTERCEPTION_RETURN: f64 = 0.05;
const P_INTERCEPTION_INTR: f64 = 0.04028420712097409;
const P_INTERCEPTION_COEF: f64 = -0.10021105;
const MEAN_INT_RETURN_YARDS_INTR: f64 = 11.952396063360451;
const STD_INT_RETURN_YARDS_INTR: f64 = 27.359295307597726;
const SKEW_INT_RETURN_YARDS_INTR: f64 = 2.4745876927563324;

const P_COMPLETE_INTR: f64 = 0.6353317321473931;
const P_COMPLETE_COEF: f64 = 0.09651794;

const P_ZERO_YAC_INTR: f64 = 0.4676126560122353;
const P_ZERO_YAC_COEF: f64 = -0.06038915;
const MEAN_YAC_INTR: f64 = 3.744998660966435;
const MEAN_YAC_COEF: f64 = 2.21147177;
const STD_YAC_INTR: f64 = 5.404781207922575;
const STD_YAC_COEF: f64 = 0.28690679;
const SKEW_YAC_INTR: f64 = 3.0784534230008083;

const P_FUMBLE_INTR: f64 = 0.05;
const P_FUMBLE_COEF: f64 = -0.08;

const MEAN_PLAY_DURATION_INTR: f64 = 8.32135821;
const MEAN_PLAY_DURATION_COEF: f64 = 0.11343699;

/// Baseline dropped-pass rate applied to would-be catches, per the
/// resolver contract: ~3.5% of completions are re-classified as drops.
const P_DROPPED_CATCH: f64 = 0.035;

/// Extra rusher coming free on a blitz.
const BLITZ_PRESSURE_BOOST: f64 = 0.12;
/// Prevent defense sits back, conceding short completions to deny the
/// deep ball; biases the short/deep split and caps yards after catch.
const PREVENT_SHORT_BIAS: f64 = 0.15;
const PREVENT_YAC_DAMPEN: f64 = 0.5;
/// Prevent defense plays conservative zone coverage and rarely gambles
/// for the pick.
const PREVENT_INTERCEPTION_DAMPEN: f64 = 0.5;

fn logistic(intr: f64, coef: f64, x: f64) -> f64 {
    let z = (intr + coef * x).exp();
    (z / (1.0 + z)).clamp(0.0, 1.0)
}

fn passer_strength(roster: &Roster) -> f64 {
    roster.starter(crate::player::Position::Quarterback).map(|p| p.attributes().overall() as f64).unwrap_or(70.0)
}

fn pass_rush_strength(roster: &Roster) -> f64 {
    roster.starter(crate::player::Position::DefensiveLine).map(|p| p.attributes().overall() as f64).unwrap_or(70.0)
}

fn coverage_strength(roster: &Roster) -> f64 {
    roster.starter(crate::player::Position::Cornerback).map(|p| p.attributes().overall() as f64).unwrap_or(70.0)
}

pub fn resolve(state: &GameState, offense: &Roster, defense: &Roster, defense_call: DefensiveCall, rng: &mut impl Rng) -> crate::game::play::result::PlayOutcome {
    use crate::game::play::result::PlayOutcome;

    let blitzing = matches!(defense_call, DefensiveCall::Blitz);
    let prevent = matches!(defense_call, DefensiveCall::PreventDefense);

    let pass_block_diff = (pass_rush_strength(defense) - passer_strength(offense)) / 10.0;
    let blitz_boost = if blitzing { BLITZ_PRESSURE_BOOST } else { 0.0 };
    let pressure = rng.gen::<f64>() < (logistic(P_PRESSURE_INTR, P_PRESSURE_COEF, pass_block_diff) + blitz_boost).clamp(0.0, 0.95);

    if pressure {
        let is_sack = rng.gen::<f64>() < logistic(P_SACK_INTR, P_SACK_COEF, pass_block_diff);
        if is_sack {
            let yards_lost = Normal::new(MEAN_SACK_YARDS, STD_SACK_YARDS).unwrap().sample(rng).max(1.0).round() as u32;
            let safety = yards_lost as u32 >= state.ball_position();
            let fumble = rng.gen::<f64>() < logistic(P_FUMBLE_INTR, P_FUMBLE_COEF, pass_block_diff);
            let duration = (MEAN_PLAY_DURATION_INTR + MEAN_PLAY_DURATION_COEF * yards_lost as f64).max(3.0).round() as u32;
            return PlayOutcome::Sack { yards_lost, play_duration: duration, fumble, safety };
        }
        let is_scramble = rng.gen::<f64>() < logistic(P_SCRAMBLE_INTR, P_SCRAMBLE_COEF, -pass_block_diff);
        if is_scramble {
            let mean = MEAN_SCRAMBLE_YARDS_INTR + MEAN_SCRAMBLE_YARDS_COEF * (-pass_block_diff);
            let std = (STD_SCRAMBLE_YARDS_INTR + STD_SCRAMBLE_YARDS_COEF * (-pass_block_diff)).max(1.0);
            let skew = SKEW_SCRAMBLE_YARDS_INTR + SKEW_SCRAMBLE_YARDS_COEF_1 + SKEW_SCRAMBLE_YARDS_COEF_2;
            let yards_gained = SkewNormal::new(mean, std, skew).unwrap().sample(rng).round() as i32;
            let max_gain = (100 - state.ball_position()) as i32;
            let yards_gained = yards_gained.clamp(-10, max_gain);
            let touchdown = yards_gained >= max_gain && yards_gained > 0;
            return PlayOutcome::Scramble {
                yards_gained,
                play_duration: 25,
                out_of_bounds: rng.gen::<f64>() < 0.15,
                fumble: rng.gen::<f64>() < logistic(P_FUMBLE_INTR, P_FUMBLE_COEF, pass_block_diff),
                touchdown,
                safety: false,
            };
        }
    }

    let coverage_diff = (coverage_strength(defense) - passer_strength(offense)) / 10.0;
    let distance = state.yards_to_go() as f64;
    let prevent_short_bias = if prevent { PREVENT_SHORT_BIAS } else { 0.0 };
    let is_short = rng.gen::<f64>()
        < (logistic(P_SHORT_PASS_INTR, P_SHORT_PASS_COEF_1, distance) + P_SHORT_PASS_COEF_2 * distance * distance + prevent_short_bias).clamp(0.0, 1.0);

    let air_yards = if is_short {
        let mean = MEAN_SHORT_PASS_DIST_INTR + MEAN_SHORT_PASS_DIST_COEF_1 * distance + MEAN_SHORT_PASS_DIST_COEF_2 * distance * distance;
        let std = (STD_SHORT_PASS_DIST_INTR + STD_SHORT_PASS_DIST_COEF_1 * distance).max(1.0);
        Normal::new(mean, std).unwrap().sample(rng)
    } else {
        let mean = MEAN_DEEP_PASS_DIST_INTR + MEAN_DEEP_PASS_DIST_COEF_1 * distance;
        let std = (STD_DEEP_PASS_DIST_INTR + STD_DEEP_PASS_DIST_COEF_1 * distance).max(1.0);
        Normal::new(mean, std).unwrap().sample(rng)
    };

    let p_interception = logistic(P_INTERCEPTION_INTR, P_INTERCEPTION_COEF, coverage_diff) * if prevent { PREVENT_INTERCEPTION_DAMPEN } else { 1.0 };
    if rng.gen::<f64>() < p_interception {
        let return_yards = if rng.gen::<f64>() < P_INTERCEPTION_RETURN {
            SkewNormal::new(MEAN_INT_RETURN_YARDS_INTR, STD_INT_RETURN_YARDS_INTR.abs().max(1.0), SKEW_INT_RETURN_YARDS_INTR)
                .unwrap()
                .sample(rng)
                .max(0.0)
                .round() as i32
        } else {
            0
        };
        let defender_goal_distance = (100 - state.ball_position()) as i32 - return_yards;
        let pick_six = defender_goal_distance <= 0;
        return PlayOutcome::PassIncomplete {
            play_duration: 20,
            dropped: false,
            interception: true,
            interception_return_yards: return_yards,
            pick_six,
        };
    }

    let p_complete = logistic(P_COMPLETE_INTR, P_COMPLETE_COEF, coverage_diff);
    let completes = rng.gen::<f64>() < p_complete;
    if !completes {
        return PlayOutcome::PassIncomplete { play_duration: 15, dropped: false, interception: false, interception_return_yards: 0, pick_six: false };
    }

    if rng.gen::<f64>() < P_DROPPED_CATCH {
        return PlayOutcome::PassIncomplete { play_duration: 15, dropped: true, interception: false, interception_return_yards: 0, pick_six: false };
    }

    let zero_yac = rng.gen::<f64>() < logistic(P_ZERO_YAC_INTR, P_ZERO_YAC_COEF, coverage_diff);
    let yac = if zero_yac {
        0.0
    } else {
        let mean = MEAN_YAC_INTR + MEAN_YAC_COEF;
        let std = (STD_YAC_INTR + STD_YAC_COEF).max(1.0);
        let sampled = SkewNormal::new(mean, std, SKEW_YAC_INTR).unwrap().sample(rng).max(0.0);
        if prevent { sampled * PREVENT_YAC_DAMPEN } else { sampled }
    };

    let yards_gained = (air_yards + yac).round() as i32;
    let max_gain = (100 - state.ball_position()) as i32;
    let yards_gained = yards_gained.clamp(-5, max_gain);
    let touchdown = yards_gained >= max_gain && yards_gained > 0;
    let fumble = rng.gen::<f64>() < logistic(P_FUMBLE_INTR, P_FUMBLE_COEF, coverage_diff);
    let duration = (MEAN_PLAY_DURATION_INTR + MEAN_PLAY_DURATION_COEF * yards_gained as f64).max(3.0).round() as u32;

    PlayOutcome::PassComplete {
        yards_gained,
        play_duration: duration,
        out_of_bounds: rng.gen::<f64>() < 0.10,
        fumble,
        touchdown,
        safety: false,
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
            .map(|i| Player::from_properties(i, &format!("P{}", i), (i % 99) as u32, Position::Quarterback, PlayerAttributes::new()).unwrap())
            .collect();
        Roster::from_players(players).unwrap()
    }

    #[test]
    fn test_dropped_passes_occur_over_many_trials() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let mut rng = rand::thread_rng();
        let mut saw_drop = false;
        for _ in 0..500 {
            if let crate::game::play::result::PlayOutcome::PassIncomplete { dropped: true, .. } =
                resolve(&state, &roster(), &roster(), DefensiveCall::BaseDefense, &mut rng)
            {
                saw_drop = true;
                break;
            }
        }
        assert!(saw_drop);
    }

    #[test]
    fn test_blitz_increases_sack_rate() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let mut rng = rand::thread_rng();
        let base_sacks = (0..300)
            .filter(|_| matches!(resolve(&state, &roster(), &roster(), DefensiveCall::BaseDefense, &mut rng), crate::game::play::result::PlayOutcome::Sack { .. }))
            .count();
        let blitz_sacks = (0..300)
            .filter(|_| matches!(resolve(&state, &roster(), &roster(), DefensiveCall::Blitz, &mut rng), crate::game::play::result::PlayOutcome::Sack { .. }))
            .count();
        assert!(blitz_sacks > base_sacks, "expected blitz ({}) to produce more sacks than base defense ({})", blitz_sacks, base_sacks);
    }

    #[test]
    fn test_prevent_defense_dampens_yards_after_catch() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let mut rng = rand::thread_rng();
        let base_yards: i32 = (0..300)
            .filter_map(|_| match resolve(&state, &roster(), &roster(), DefensiveCall::BaseDefense, &mut rng) {
                crate::game::play::result::PlayOutcome::PassComplete { yards_gained, .. } => Some(yards_gained),
                _ => None,
            })
            .sum();
        let prevent_yards: i32 = (0..300)
            .filter_map(|_| match resolve(&state, &roster(), &roster(), DefensiveCall::PreventDefense, &mut rng) {
                crate::game::play::result::PlayOutcome::PassComplete { yards_gained, .. } => Some(yards_gained),
                _ => None,
            })
            .sum();
        assert!(prevent_yards < base_yards, "expected prevent defense ({}) to allow fewer total yards than base defense ({})", prevent_yards, base_yards);
    }
}
