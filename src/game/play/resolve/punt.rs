//! Punt resolution: block, touchback, fair catch, muff, and return
//! yardage, sampled from logistic-regression punt constants.

use rand::Rng;
use rand_distr::{Distribution, SkewNormal};

use crate::game::play::call::DefensiveCall;
use crate::game::play::result::TouchbackType;
use crate::game::state::GameState;
use crate::player::Roster;

const P_BLOCK_INTR: f64 = -0.0010160286505995551;
const P_BLOCK_COEF: f64 = 0.00703673;

const P_PUNT_INSIDE_20_SKILL_COEF: f64 = 0.32878206;

const PUNT_INSIDE_20_MEAN_REL_DIST_INTR: f64 = 0.20907739629135946;
const PUNT_OUTSIDE_20_MEAN_REL_DIST_INTR: f64 = -0.24995460069957565;

const P_FAIR_CATCH_INTR: f64 = 0.47613371173695526;
const P_FAIR_CATCH_COEF: f64 = -0.00141214;

const P_MUFFED_PUNT_INTR: f64 = 0.036855240326056096;
const P_MUFFED_PUNT_COEF: f64 = -0.02771741;

const MEAN_REL_RETURN_YARDS_INTR: f64 = -0.0570321871;
const STD_REL_RETURN_YARDS_INTR: f64 = 0.06751127059206394;
const SKEW_REL_RETURN_YARDS_INTR: f64 = -0.0167472281;

const P_FUMBLE_INTR: f64 = 0.0460047101408259;

/// Punt-rush boost when the defense calls for the block, mirroring the
/// field goal block boost.
const PUNT_BLOCK_BOOST: f64 = 0.02;

fn logistic(intr: f64, coef: f64, x: f64) -> f64 {
    let z = (intr + coef * x).exp();
    (z / (1.0 + z)).clamp(0.0, 1.0)
}

fn punter_strength(roster: &Roster) -> f64 {
    roster.starter(crate::player::Position::Punter).map(|p| p.attributes().overall() as f64).unwrap_or(70.0)
}

pub fn resolve(state: &GameState, punting_team: &Roster, defense_call: DefensiveCall, rng: &mut impl Rng) -> crate::game::play::result::PlayOutcome {
    use crate::game::play::result::PlayOutcome;

    let leg_strength = punter_strength(punting_team) / 10.0;

    let block_boost = if matches!(defense_call, DefensiveCall::PuntBlock) { PUNT_BLOCK_BOOST } else { 0.0 };
    if rng.gen::<f64>() < (logistic(P_BLOCK_INTR, P_BLOCK_COEF, leg_strength) + block_boost).clamp(0.0, 1.0) {
        let return_touchdown = rng.gen::<f64>() < 0.08;
        return PlayOutcome::Punt {
            net_yards: 0,
            play_duration: 5,
            touchback: false,
            touchback_type: None,
            catch_spot: state.ball_position(),
            blocked: true,
            fair_catch: false,
            muffed: false,
            return_touchdown: false,
            blocked_return_touchdown: return_touchdown,
        };
    }

    let inside_20 = state.ball_position() >= 80;
    let skill_term = P_PUNT_INSIDE_20_SKILL_COEF * leg_strength;
    let rel_dist = if inside_20 {
        PUNT_INSIDE_20_MEAN_REL_DIST_INTR + skill_term
    } else {
        PUNT_OUTSIDE_20_MEAN_REL_DIST_INTR + skill_term
    };
    let remaining = (100 - state.ball_position()) as f64;
    let gross_yards = (remaining * (0.5 + rel_dist.abs())).clamp(20.0, remaining.max(20.0));

    let lands_in_endzone = state.ball_position() as f64 + gross_yards >= 100.0;
    if lands_in_endzone {
        return PlayOutcome::Punt {
            net_yards: (100 - state.ball_position()) as i32,
            play_duration: 10,
            touchback: true,
            touchback_type: Some(TouchbackType::Endzone),
            catch_spot: 0,
            blocked: false,
            fair_catch: false,
            muffed: false,
            return_touchdown: false,
            blocked_return_touchdown: false,
        };
    }

    let catch_spot = 100 - (state.ball_position() as f64 + gross_yards).round() as u32;
    let fair_catch = rng.gen::<f64>() < logistic(P_FAIR_CATCH_INTR, P_FAIR_CATCH_COEF, catch_spot as f64);
    if fair_catch {
        return PlayOutcome::Punt {
            net_yards: gross_yards.round() as i32,
            play_duration: 8,
            touchback: false,
            touchback_type: Some(TouchbackType::Short),
            catch_spot,
            blocked: false,
            fair_catch: true,
            muffed: false,
            return_touchdown: false,
            blocked_return_touchdown: false,
        };
    }

    let muffed = rng.gen::<f64>() < logistic(P_MUFFED_PUNT_INTR, P_MUFFED_PUNT_COEF, catch_spot as f64);
    let return_yards = if muffed {
        0.0
    } else {
        let mean = MEAN_REL_RETURN_YARDS_INTR * catch_spot as f64;
        let std = (STD_REL_RETURN_YARDS_INTR * catch_spot as f64).abs().max(1.0);
        SkewNormal::new(mean, std, SKEW_REL_RETURN_YARDS_INTR).unwrap().sample(rng).max(0.0)
    };
    let return_touchdown = !muffed && (catch_spot as f64 + return_yards) >= 100.0;
    let net_yards = gross_yards.round() as i32 - return_yards.round() as i32;
    let fumble = !muffed && rng.gen::<f64>() < logistic(P_FUMBLE_INTR, 0.0, catch_spot as f64);

    PlayOutcome::Punt {
        net_yards,
        play_duration: (10.0 + return_yards * 0.3).round() as u32,
        touchback: false,
        touchback_type: Some(TouchbackType::Short),
        catch_spot,
        blocked: false,
        fair_catch: false,
        muffed: muffed || fumble,
        return_touchdown,
        blocked_return_touchdown: false,
    }
}
