//! Kickoff resolution: touchback vs return, always annotated with a
//! `touchback_type` and catch spot per the resolver contract.

use rand::Rng;
use rand_distr::{Distribution, SkewNormal};

use crate::game::play::result::TouchbackType;
use crate::game::state::GameState;
use crate::player::Roster;

const P_TOUCHBACK_INTR: f64 = 0.2528877428268531;
const P_TOUCHBACK_COEF: f64 = 0.62457076;

const P_OOB_INTR: f64 = 0.013879833381776598;
const P_OOB_COEF: f64 = -0.01063523;

const MEAN_KICKOFF_RETURN_YARDS_INTR: f64 = -0.6236115656913945;
const MEAN_KICKOFF_RETURN_YARDS_COEF: f64 = 20.05077203;
const STD_KICKOFF_RETURN_YARDS_INTR: f64 = 6.421970424325094;
const STD_KICKOFF_RETURN_YARDS_COEF: f64 = 12.34550665;
const SKEW_KICKOFF_RETURN_YARDS_INTR: f64 = 3.62041405111988;
const SKEW_KICKOFF_RETURN_YARDS_COEF: f64 = -2.65709746;

const P_KICKOFF_RETURN_FUMBLE: f64 = 0.007;

fn logistic(intr: f64, coef: f64, x: f64) -> f64 {
    let z = (intr + coef * x).exp();
    (z / (1.0 + z)).clamp(0.0, 1.0)
}

fn kicker_strength(roster: &Roster) -> f64 {
    roster.starter(crate::player::Position::Kicker).map(|p| p.attributes().overall() as f64).unwrap_or(70.0)
}

pub fn resolve(_state: &GameState, kicking_team: &Roster, rng: &mut impl Rng) -> crate::game::play::result::PlayOutcome {
    use crate::game::play::result::PlayOutcome;

    let leg_strength = kicker_strength(kicking_team) / 10.0;
    let touchback = rng.gen::<f64>() < logistic(P_TOUCHBACK_INTR, P_TOUCHBACK_COEF, leg_strength);

    if touchback {
        return PlayOutcome::Kickoff {
            return_yards: 0,
            play_duration: 6,
            touchback: true,
            touchback_type: Some(TouchbackType::Endzone),
            catch_spot: 0,
            out_of_bounds: false,
            fumble: false,
            return_touchdown: false,
        };
    }

    let out_of_bounds = rng.gen::<f64>() < logistic(P_OOB_INTR, P_OOB_COEF, leg_strength);
    if out_of_bounds {
        return PlayOutcome::Kickoff {
            return_yards: 0,
            play_duration: 6,
            touchback: true,
            touchback_type: Some(TouchbackType::Bounce),
            catch_spot: 35,
            out_of_bounds: true,
            fumble: false,
            return_touchdown: false,
        };
    }

    let catch_spot = 8u32;
    let mean = MEAN_KICKOFF_RETURN_YARDS_INTR + MEAN_KICKOFF_RETURN_YARDS_COEF;
    let std = (STD_KICKOFF_RETURN_YARDS_INTR + STD_KICKOFF_RETURN_YARDS_COEF).max(1.0);
    let skew = SKEW_KICKOFF_RETURN_YARDS_INTR + SKEW_KICKOFF_RETURN_YARDS_COEF;
    let return_yards = SkewNormal::new(mean, std, skew).unwrap().sample(rng).max(0.0).round() as i32;
    let fumble = rng.gen::<f64>() < P_KICKOFF_RETURN_FUMBLE;
    let return_touchdown = (catch_spot as i32 + return_yards) >= 100 && !fumble;

    PlayOutcome::Kickoff {
        return_yards,
        play_duration: (10.0 + return_yards as f64 * 0.3).round() as u32,
        touchback: false,
        touchback_type: Some(TouchbackType::Short),
        catch_spot,
        out_of_bounds: false,
        fumble,
        return_touchdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameType;
    use crate::game::state::Possession;
    use crate::game::weather::Weather;
    use crate::player::{Player, PlayerAttributes, PlayerAttributesRaw, Position, Roster};

    fn roster(kicker_rating: u32) -> Roster {
        let mut players: Vec<Player> = (0..21)
            .map(|i| Player::from_properties(i, &format!("P{}", i), (i % 99) as u32, Position::WideReceiver, PlayerAttributes::new()).unwrap())
            .collect();
        let raw = PlayerAttributesRaw {
            speed: kicker_rating,
            strength: kicker_rating,
            accuracy: kicker_rating,
            catching: kicker_rating,
            blocking: kicker_rating,
            tackling: kicker_rating,
            coverage: kicker_rating,
            kick_power: kicker_rating,
            kick_accuracy: kicker_rating,
            discipline: kicker_rating,
            durability: kicker_rating,
        };
        players.push(Player::from_properties(21, "Kicker", 4, Position::Kicker, PlayerAttributes::try_from(raw).unwrap()).unwrap());
        Roster::from_players(players).unwrap()
    }

    #[test]
    fn test_kickoff_always_reports_a_touchback_type() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let team = roster(70);
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let outcome = resolve(&state, &team, &mut rng);
            if let PlayOutcome::Kickoff { touchback_type, .. } = outcome {
                assert!(touchback_type.is_some());
            } else {
                panic!("kickoff resolver produced a non-kickoff outcome");
            }
        }
    }

    #[test]
    fn test_strong_leg_touches_back_more_often_than_weak_leg() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let mut rng = rand::thread_rng();
        let weak_touchbacks = (0..400)
            .filter(|_| matches!(resolve(&state, &roster(30), &mut rng), PlayOutcome::Kickoff { touchback: true, .. }))
            .count();
        let strong_touchbacks = (0..400)
            .filter(|_| matches!(resolve(&state, &roster(99), &mut rng), PlayOutcome::Kickoff { touchback: true, .. }))
            .count();
        assert!(
            strong_touchbacks > weak_touchbacks,
            "expected a strong leg ({}) to touch back more often than a weak leg ({})",
            strong_touchbacks,
            weak_touchbacks
        );
    }

    #[test]
    fn test_non_touchback_return_never_negative() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let team = roster(30);
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            if let PlayOutcome::Kickoff { touchback: false, return_yards, .. } = resolve(&state, &team, &mut rng) {
                assert!(return_yards >= 0);
            }
        }
    }
}
