//! Field goal resolution: block check, make probability from kicker
//! skill and distance, and the non-made non-blocked "no good" outcome.

use rand::Rng;
use rand_distr::{Distribution, SkewNormal};

use crate::game::play::call::DefensiveCall;
use crate::game::state::GameState;
use crate::player::Roster;

const P_BLOCKED_SKILL_INTR: f64 = 0.013200206956159479;
const P_BLOCKED_SKILL_COEF: f64 = 0.01919733;
const P_BLOCKED_YARD_LINE_INTR: f64 = -5.320426815163247;
const P_BLOCKED_YARD_LINE_COEF: f64 = 0.05875677;

const P_FIELD_GOAL_MADE_SKILL_INTR: f64 = 0.44298810053776055;
const P_FIELD_GOAL_MADE_SKILL_COEF: f64 = 0.57103524;
const P_FIELD_GOAL_MADE_YARD_LINE_INTR: f64 = 0.9580405463949037;
const P_FIELD_GOAL_MADE_YARD_LINE_COEF_1: f64 = 0.00399668;
const P_FIELD_GOAL_MADE_YARD_LINE_COEF_2: f64 = -0.00035704;

const FIELD_GOAL_BLOCKED_DURATION_MEAN: f64 = 9.843750;
const FIELD_GOAL_BLOCKED_DURATION_STD: f64 = 3.385612;
const FIELD_GOAL_BLOCKED_DURATION_SKEW: f64 = 1.541247;

const FIELD_GOAL_NOT_BLOCKED_DURATION_MEAN: f64 = 7.054470;
const FIELD_GOAL_NOT_BLOCKED_DURATION_STD: f64 = 1.001211;
const FIELD_GOAL_NOT_BLOCKED_DURATION_SKEW: f64 = -0.440028;

fn logistic(intr: f64, coef: f64, x: f64) -> f64 {
    let z = (intr + coef * x).exp();
    (z / (1.0 + z)).clamp(0.0, 1.0)
}

fn kicker_strength(roster: &Roster) -> f64 {
    roster.starter(crate::player::Position::Kicker).map(|p| p.attributes().overall() as f64).unwrap_or(70.0)
}

pub fn resolve(state: &GameState, kicking_team: &Roster, defense_call: DefensiveCall, rng: &mut impl Rng) -> crate::game::play::result::PlayOutcome {
    use crate::game::play::result::PlayOutcome;

    let distance = (100 - state.ball_position()) + 17;
    let skill = kicker_strength(kicking_team) / 10.0;

    let block_boost = if matches!(defense_call, DefensiveCall::FieldGoalBlock) { 0.03 } else { 0.0 };
    let p_blocked = logistic(P_BLOCKED_SKILL_INTR, P_BLOCKED_SKILL_COEF, skill) * 0.3
        + logistic(P_BLOCKED_YARD_LINE_INTR, P_BLOCKED_YARD_LINE_COEF, distance as f64) * 0.7
        + block_boost;

    if rng.gen::<f64>() < p_blocked.clamp(0.0, 0.2) {
        let duration = SkewNormal::new(FIELD_GOAL_BLOCKED_DURATION_MEAN, FIELD_GOAL_BLOCKED_DURATION_STD, FIELD_GOAL_BLOCKED_DURATION_SKEW)
            .unwrap()
            .sample(rng)
            .max(3.0)
            .round() as u32;
        return PlayOutcome::FieldGoal { made: false, blocked: true, distance, play_duration: duration, return_yards: 0, return_touchdown: false };
    }

    let p_made = logistic(P_FIELD_GOAL_MADE_SKILL_INTR, P_FIELD_GOAL_MADE_SKILL_COEF, skill) * 0.5
        + (P_FIELD_GOAL_MADE_YARD_LINE_INTR + P_FIELD_GOAL_MADE_YARD_LINE_COEF_1 * distance as f64 + P_FIELD_GOAL_MADE_YARD_LINE_COEF_2 * (distance as f64).powi(2)) * 0.5;
    let made = rng.gen::<f64>() < p_made.clamp(0.02, 0.99);
    let duration = SkewNormal::new(FIELD_GOAL_NOT_BLOCKED_DURATION_MEAN, FIELD_GOAL_NOT_BLOCKED_DURATION_STD, FIELD_GOAL_NOT_BLOCKED_DURATION_SKEW)
        .unwrap()
        .sample(rng)
        .max(3.0)
        .round() as u32;

    PlayOutcome::FieldGoal { made, blocked: false, distance, play_duration: duration, return_yards: 0, return_touchdown: false }
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
            .map(|i| Player::from_properties(i, &format!("P{}", i), (i % 99) as u32, Position::Kicker, PlayerAttributes::new()).unwrap())
            .collect();
        Roster::from_players(players).unwrap()
    }

    #[test]
    fn test_short_attempts_made_more_often_than_long() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 95);
        let mut rng = rand::thread_rng();
        let mut made = 0;
        for _ in 0..200 {
            if let crate::game::play::result::PlayOutcome::FieldGoal { made: true, .. } = resolve(&state, &roster(), DefensiveCall::BaseDefense, &mut rng) {
                made += 1;
            }
        }
        assert!(made > 100);
    }
}
