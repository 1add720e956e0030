//! Kneel-downs, spikes, extra-point, and two-point-conversion attempts:
//! the remaining play families not covered by run/pass/kickoff/punt/fg.

use rand::Rng;

use crate::player::Roster;

pub fn resolve_kneel(rng: &mut impl Rng) -> crate::game::play::result::PlayOutcome {
    use crate::game::play::result::PlayOutcome;
    let yards_gained = -(1 + rng.gen_range(0..2));
    PlayOutcome::Kneel { yards_gained, play_duration: 40 }
}

pub fn resolve_spike() -> crate::game::play::result::PlayOutcome {
    crate::game::play::result::PlayOutcome::Spike { play_duration: 3 }
}

fn kicker_strength(roster: &Roster) -> f64 {
    roster.starter(crate::player::Position::Kicker).map(|p| p.attributes().overall() as f64).unwrap_or(70.0)
}

/// Extra points are nearly automatic in the modern game; the make rate
/// scales gently with kicker skill around a 94% baseline.
pub fn resolve_extra_point(kicking_team: &Roster, rng: &mut impl Rng) -> crate::game::play::result::PlayOutcome {
    use crate::game::play::result::PlayOutcome;
    let skill = kicker_strength(kicking_team);
    let p_made = (0.80 + skill / 500.0).clamp(0.85, 0.99);
    let blocked = rng.gen::<f64>() < 0.01;
    let made = !blocked && rng.gen::<f64>() < p_made;
    PlayOutcome::ExtraPoint { made, blocked, play_duration: 5 }
}

pub fn resolve_two_point(offense: &Roster, defense: &Roster, rng: &mut impl Rng) -> crate::game::play::result::PlayOutcome {
    use crate::game::play::result::PlayOutcome;
    let offense_strength = offense.starter(crate::player::Position::RunningBack).map(|p| p.attributes().overall() as f64).unwrap_or(70.0);
    let defense_strength = defense.starter(crate::player::Position::Linebacker).map(|p| p.attributes().overall() as f64).unwrap_or(70.0);
    let p_success = (0.45 + (offense_strength - defense_strength) / 200.0).clamp(0.2, 0.7);
    let success = rng.gen::<f64>() < p_success;
    let turnover_return_touchdown = !success && rng.gen::<f64>() < 0.02;
    PlayOutcome::TwoPoint { success, play_duration: 20, turnover_return_touchdown }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play::result::PlayOutcome;
    use crate::player::{Player, PlayerAttributes, Position};

    fn roster(position: Position) -> Roster {
        let players = (0..22).map(|i| Player::from_properties(i, &format!("P{}", i), (i % 99) as u32, position, PlayerAttributes::new()).unwrap()).collect();
        Roster::from_players(players).unwrap()
    }

    #[test]
    fn test_extra_point_is_made_the_overwhelming_majority_of_the_time() {
        let kicking_team = roster(Position::Kicker);
        let mut rng = rand::thread_rng();
        let made = (0..200)
            .filter(|_| matches!(resolve_extra_point(&kicking_team, &mut rng), PlayOutcome::ExtraPoint { made: true, .. }))
            .count();
        assert!(made >= 150, "expected extra points to be made nearly every time, got {} of 200", made);
    }

    #[test]
    fn test_extra_point_is_never_made_and_blocked_at_once() {
        let kicking_team = roster(Position::Kicker);
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            if let PlayOutcome::ExtraPoint { made, blocked, .. } = resolve_extra_point(&kicking_team, &mut rng) {
                assert!(!(made && blocked));
            }
        }
    }

    #[test]
    fn test_two_point_conversion_has_both_outcomes_over_many_tries() {
        let offense = roster(Position::RunningBack);
        let defense = roster(Position::Linebacker);
        let mut rng = rand::thread_rng();
        let mut saw_success = false;
        let mut saw_failure = false;
        for _ in 0..200 {
            match resolve_two_point(&offense, &defense, &mut rng) {
                PlayOutcome::TwoPoint { success: true, .. } => saw_success = true,
                PlayOutcome::TwoPoint { success: false, .. } => saw_failure = true,
                _ => panic!("resolve_two_point produced a non-two-point outcome"),
            }
        }
        assert!(saw_success && saw_failure, "expected both a successful and a failed two-point try over 200 attempts");
    }
}
