//! Pre-snap decision logic: what the offense and defense attempt, given
//! down, distance, field position, clock, and score. These decisions feed
//! the family resolvers in [`crate::game::play::resolve`]; they never
//! themselves sample an outcome.

use crate::game::state::{GameState, Possession, Quarter};

/// # `OffensiveCall` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum OffensiveCall {
    Run,
    Pass,
    FieldGoal,
    Punt,
    Kneel,
    Spike,
    ExtraPoint,
    TwoPoint,
}

/// # `DefensiveCall` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum DefensiveCall {
    BaseDefense,
    Blitz,
    PreventDefense,
    FieldGoalBlock,
    PuntBlock,
}

const P_RUN_FIRST_DOWN_INTR: f64 = 0.41649529080915104_f64;
const P_RUN_FIRST_DOWN_COEF: f64 = 0.2035597_f64;
const P_RUN_SECOND_DOWN_INTR: f64 = 0.3250691394699521_f64;
const P_RUN_SECOND_DOWN_COEF: f64 = 0.19162143_f64;
const P_RUN_THIRD_DOWN_INTR: f64 = 0.1340492470213823_f64;
const P_RUN_THIRD_DOWN_COEF: f64 = 0.22902729_f64;
const P_RUN_DIST_INTR: f64 = 0.30634251685198927_f64;
const P_RUN_DIST_COEF: f64 = -0.00318081_f64;
const P_FIELD_GOAL_RISK_INTR: f64 = 0.7886141537295228_f64;
const P_FIELD_GOAL_RISK_COEF: f64 = -0.26532936_f64;
const P_GO_FOR_IT_INTR: f64 = 0.19565011246401598_f64;
const P_GO_FOR_IT_COEF: f64 = 0.51602604_f64;
const P_RUN_FOURTH_DOWN_INTR: f64 = 0.040592196833718536_f64;
const P_RUN_FOURTH_DOWN_COEF: f64 = 0.05793641_f64;

fn logistic(intr: f64, coef: f64, x: f64) -> f64 {
    (intr + coef * x).exp() / (1.0 + (intr + coef * x).exp())
}

/// Baseline rate at which the offense goes for two outside of a
/// situational chart match, mirroring the modern league's slowly
/// rising voluntary two-point rate.
const P_GO_FOR_TWO_BASELINE: f64 = 0.02;

/// Score deficits (trailing by this many points before the try) where a
/// two-point conversion ties or takes a one-point lead in a single
/// possession, the standard late-game two-point chart.
const GO_FOR_TWO_DEFICITS: [i32; 3] = [2, 5, 10];

/// Decide whether the offense goes for two instead of kicking the extra
/// point: the situational chart in the fourth quarter or overtime, plus
/// a small baseline rate the rest of the time.
fn go_for_two(state: &GameState, rng: &mut impl rand::Rng) -> bool {
    let (own_score, opp_score) = match state.possession() {
        Possession::Home => (state.home_score(), state.away_score()),
        Possession::Away => (state.away_score(), state.home_score()),
    };
    let deficit = opp_score as i32 - own_score as i32;
    let late = matches!(state.quarter(), Quarter::Fourth | Quarter::Overtime);
    if late && GO_FOR_TWO_DEFICITS.contains(&deficit) {
        return true;
    }
    rng.gen::<f64>() < P_GO_FOR_TWO_BASELINE
}

/// Trailing or tied, out of timeouts, with only a handful of seconds
/// left in a half and a down still in hand: spike to stop the clock for
/// one more snap rather than risk a sack or incompletion clock runoff.
fn should_spike(state: &GameState) -> bool {
    let trailing_or_tied = match state.possession() {
        Possession::Home => state.home_score() <= state.away_score(),
        Possession::Away => state.away_score() <= state.home_score(),
    };
    trailing_or_tied
        && matches!(state.quarter(), Quarter::Second | Quarter::Fourth)
        && state.clock_seconds() <= 6
        && state.clock_seconds() > 0
        && state.down() <= 3
        && state.offense_timeouts_remaining() == 0
}

/// Decide the offense's call from down/distance regression tables; there
/// is no per-coach tendency input in this data model, so the situational
/// call is driven entirely by `state`.
pub fn call_offense(state: &GameState, rng: &mut impl rand::Rng) -> OffensiveCall {
    if state.is_pat_attempt() {
        return if go_for_two(state, rng) { OffensiveCall::TwoPoint } else { OffensiveCall::ExtraPoint };
    }
    if state.offense_conserve_clock() && state.down() <= 2 {
        return OffensiveCall::Kneel;
    }
    if should_spike(state) {
        return OffensiveCall::Spike;
    }

    let distance = state.yards_to_go() as f64;
    let yard_line = state.ball_position();

    if state.down() == 4 {
        let p_go = logistic(P_GO_FOR_IT_INTR, P_GO_FOR_IT_COEF, distance.recip().max(0.01));
        let fg_distance = (100 - yard_line) as f64 + 17.0;
        let in_fg_range = fg_distance <= 58.0;
        let p_fg = if in_fg_range {
            logistic(P_FIELD_GOAL_RISK_INTR, P_FIELD_GOAL_RISK_COEF, distance)
        } else {
            0.0
        };
        let roll: f64 = rng.gen();
        if in_fg_range && roll < p_fg {
            return OffensiveCall::FieldGoal;
        }
        if roll < p_fg + p_go || yard_line > 65 {
            let p_run = logistic(P_RUN_FOURTH_DOWN_INTR, P_RUN_FOURTH_DOWN_COEF, distance);
            return if rng.gen::<f64>() < p_run { OffensiveCall::Run } else { OffensiveCall::Pass };
        }
        return OffensiveCall::Punt;
    }

    let p_run = match state.down() {
        1 => logistic(P_RUN_FIRST_DOWN_INTR, P_RUN_FIRST_DOWN_COEF, distance),
        2 => logistic(P_RUN_SECOND_DOWN_INTR, P_RUN_SECOND_DOWN_COEF, distance),
        _ => logistic(P_RUN_THIRD_DOWN_INTR, P_RUN_THIRD_DOWN_COEF, distance),
    };
    let p_run_adjusted = p_run * logistic(P_RUN_DIST_INTR, P_RUN_DIST_COEF, distance) / p_run.max(0.01);
    if rng.gen::<f64>() < p_run_adjusted.clamp(0.05, 0.95) {
        OffensiveCall::Run
    } else {
        OffensiveCall::Pass
    }
}

/// Decide the defensive call. A coarse, context-driven heuristic: blitz
/// more on passing downs, sit in prevent when protecting a late lead.
pub fn call_defense(state: &GameState, offense_call_hint: Option<OffensiveCall>, rng: &mut impl rand::Rng) -> DefensiveCall {
    if matches!(offense_call_hint, Some(OffensiveCall::FieldGoal)) {
        return if rng.gen::<f64>() < 0.03 { DefensiveCall::FieldGoalBlock } else { DefensiveCall::BaseDefense };
    }
    if matches!(offense_call_hint, Some(OffensiveCall::Punt)) {
        return if rng.gen::<f64>() < 0.02 { DefensiveCall::PuntBlock } else { DefensiveCall::BaseDefense };
    }
    let defense_leading = match state.possession() {
        crate::game::state::Possession::Home => state.away_score() > state.home_score(),
        crate::game::state::Possession::Away => state.home_score() > state.away_score(),
    };
    if defense_leading && state.clock_seconds() <= 120 && state.quarter() == crate::game::state::Quarter::Fourth {
        return DefensiveCall::PreventDefense;
    }
    if state.down() == 3 && state.yards_to_go() >= 7 {
        return if rng.gen::<f64>() < 0.35 { DefensiveCall::Blitz } else { DefensiveCall::BaseDefense };
    }
    DefensiveCall::BaseDefense
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameType;
    use crate::game::state::Possession;
    use crate::game::weather::Weather;

    #[test]
    fn test_short_yardage_fourth_down_goes_for_it_near_midfield() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 55);
        let mut rng = rand::thread_rng();
        let mut saw_non_punt = false;
        for _ in 0..20 {
            if !matches!(call_offense(&state, &mut rng), OffensiveCall::Punt) {
                saw_non_punt = true;
            }
        }
        assert!(saw_non_punt);
    }

    #[test]
    fn test_extra_point_called_when_pat_attempt_pending() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let outcome = crate::game::play::result::PlayOutcome::Run {
            yards_gained: 75,
            play_duration: 20,
            out_of_bounds: false,
            fumble: false,
            touchdown: true,
            safety: false,
        };
        state.apply_play(&outcome);
        let mut rng = rand::thread_rng();
        // Q1, tied at 6-0: outside the late-game go-for-two chart, so the
        // kick is the overwhelming majority call (~2% baseline go-for-two).
        let kicks = (0..50).filter(|_| call_offense(&state, &mut rng) == OffensiveCall::ExtraPoint).count();
        assert!(kicks >= 40, "expected the extra point to dominate early-game pat calls, got {} of 50", kicks);
    }

    #[test]
    fn test_spike_with_no_timeouts_and_seconds_left() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        state.end_of_quarter();
        assert_eq!(state.quarter(), Quarter::Second);
        for _ in 0..3 {
            state.call_timeout(Possession::Home);
        }
        assert_eq!(state.offense_timeouts_remaining(), 0);
        state.apply_play(&crate::game::play::result::PlayOutcome::PassIncomplete {
            play_duration: 894,
            dropped: false,
            interception: false,
            interception_return_yards: 0,
            pick_six: false,
        });
        assert_eq!(state.clock_seconds(), 6);
        let mut rng = rand::thread_rng();
        assert_eq!(call_offense(&state, &mut rng), OffensiveCall::Spike);
    }

    #[test]
    fn test_go_for_two_on_fourth_quarter_chart_deficit() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Away);
        state.kickoff_to_receiver(Possession::Away, 25);
        // Away scores a touchdown and converts the two-point try, 8-0.
        state.apply_play(&crate::game::play::result::PlayOutcome::Run {
            yards_gained: 75,
            play_duration: 20,
            out_of_bounds: false,
            fumble: false,
            touchdown: true,
            safety: false,
        });
        state.apply_play(&crate::game::play::result::PlayOutcome::TwoPoint { success: true, play_duration: 20, turnover_return_touchdown: false });
        // Kick off to Home with a touchback to their own 25.
        state.apply_kickoff(
            &crate::game::play::result::PlayOutcome::Kickoff {
                return_yards: 0,
                play_duration: 5,
                touchback: true,
                touchback_type: Some(crate::game::play::result::TouchbackType::Endzone),
                catch_spot: 25,
                out_of_bounds: false,
                fumble: false,
                return_touchdown: false,
            },
            Possession::Away,
        );
        assert_eq!(state.away_score(), 8);
        assert_eq!(state.home_score(), 0);
        // Advance to the fourth quarter (Q1 -> Q2 -> Q3 -> Q4).
        for _ in 0..3 {
            state.end_of_quarter();
        }
        assert_eq!(state.quarter(), Quarter::Fourth);
        // Home scores a touchdown, trailing 8-6: exactly the "down 2" rung
        // of the go-for-two chart, so the try should always go for two.
        state.apply_play(&crate::game::play::result::PlayOutcome::Run {
            yards_gained: 75,
            play_duration: 20,
            out_of_bounds: false,
            fumble: false,
            touchdown: true,
            safety: false,
        });
        assert_eq!(state.home_score(), 6);
        assert_eq!(state.away_score(), 8);
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            assert_eq!(call_offense(&state, &mut rng), OffensiveCall::TwoPoint);
        }
    }
}
