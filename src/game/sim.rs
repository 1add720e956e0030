//! The simulation driver: the loop that ties the RNG, play caller,
//! resolver, and state machine together into a complete `SimulatedGame`.

use crate::game::config::{GameConfig, GameType};
use crate::game::event::{BoxScore, Drive, DriveResult, FinalScore, GameEvent, SimulatedGame, SimulatedGameStatus};
use crate::game::play::call::{call_defense, call_offense, OffensiveCall};
use crate::game::play::resolve::{self, resolve_play};
use crate::game::play::result::{score_event, FormationMetadata, Participants, PlayOutcome};
use crate::game::state::{CoinTossChoice, GameState, Possession, Quarter, MAX_TOTAL_PLAYS};
use crate::game::weather::{Weather, WeatherType};
use crate::player::{Position, Roster};
use crate::rng::FairRng;

/// # `SimulationError` enum
///
/// The three error kinds: bad input (no partial emission),
/// hitting the play-count cap without terminating (a defect, not a
/// normal outcome), and caller-requested cancellation (partial record).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SimulationError {
    Validation(String),
    ExhaustedBudget(String),
    Canceled,
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SimulationError::Validation(msg) => write!(f, "validation error: {}", msg),
            SimulationError::ExhaustedBudget(msg) => write!(f, "exhausted play budget: {}", msg),
            SimulationError::Canceled => write!(f, "simulation canceled"),
        }
    }
}

impl std::error::Error for SimulationError {}

fn roster_for(possession: Possession, config: &GameConfig) -> &Roster {
    match possession {
        Possession::Home => config.home_roster(),
        Possession::Away => config.away_roster(),
    }
}

fn sample_weather(config: &GameConfig, rng: &mut FairRng) -> Weather {
    if config.home_team().dome() {
        return Weather::indoor();
    }
    let temperature = rng.next_int(15, 85) as i32;
    let wind_speed = rng.next_int(0, 20) as u32;
    let precipitation = rng.next_int(0, 30) as u32;
    let weather_type = if precipitation > 15 {
        if temperature < 35 { WeatherType::Snow } else { WeatherType::Rain }
    } else if wind_speed > 12 {
        WeatherType::Wind
    } else if rng.next_uniform() < 0.3 {
        WeatherType::Cloudy
    } else {
        WeatherType::Clear
    };
    Weather::from_properties(weather_type, temperature, wind_speed, precipitation, "Outdoor").unwrap_or_else(|_| Weather::indoor())
}

fn narrative(outcome: &PlayOutcome, state: &GameState) -> String {
    format!("Q{:?} {}:{:02} - {}", state.quarter(), state.clock_seconds() / 60, state.clock_seconds() % 60, outcome.description())
}

/// Roll a resolved play into the box score, crediting the players
/// `participants` names rather than re-deriving starters from the
/// rosters — this is the only consumer of [`Participants`], so it stays
/// in lockstep with whatever the resolver actually credited.
fn record_participant_stats(box_score: &mut BoxScore, participants: &Participants, outcome: &PlayOutcome, score: bool) {
    match outcome {
        PlayOutcome::Run { yards_gained, touchdown, fumble, .. } => {
            if let Some(id) = participants.rusher_id {
                box_score.entry(id).rushing.record_rush(*yards_gained, *touchdown, *fumble);
            }
        }
        PlayOutcome::PassComplete { yards_gained, touchdown, fumble, .. } => {
            if let Some(id) = participants.passer_id {
                box_score.entry(id).passing.record_attempt(true, *yards_gained, *touchdown, false);
            }
            if let Some(id) = participants.receiver_id {
                box_score.entry(id).receiving.record_target(true, *yards_gained, *touchdown, *fumble);
            }
        }
        PlayOutcome::PassIncomplete { interception, .. } => {
            if let Some(id) = participants.passer_id {
                box_score.entry(id).passing.record_attempt(false, 0, false, *interception);
            }
            if let Some(id) = participants.receiver_id {
                box_score.entry(id).receiving.record_target(false, 0, false, false);
            }
            if *interception {
                if let Some(id) = participants.defender_id {
                    box_score.entry(id).defense.record_turnover(true, score);
                }
            }
        }
        PlayOutcome::Sack { .. } => {
            if let Some(id) = participants.passer_id {
                box_score.entry(id).passing.record_sack();
            }
            if let Some(id) = participants.defender_id {
                box_score.entry(id).defense.record_sack();
            }
        }
        PlayOutcome::Scramble { yards_gained, touchdown, fumble, .. } => {
            if let Some(id) = participants.passer_id {
                box_score.entry(id).rushing.record_rush(*yards_gained, *touchdown, *fumble);
            }
        }
        PlayOutcome::FieldGoal { made, .. } => {
            if let Some(id) = participants.kicker_id {
                box_score.entry(id).kicking.record_field_goal(*made);
            }
        }
        PlayOutcome::ExtraPoint { made, .. } => {
            if let Some(id) = participants.kicker_id {
                box_score.entry(id).kicking.record_extra_point(*made);
            }
        }
        _ => {}
    }
}

/// Flush whatever plays have accumulated on the current drive into `drives`
/// with `result`, even if no scoring/turnover/punt terminated it (used at
/// halftime and end-of-regulation boundaries, where a drive is cut off mid-
/// possession).
fn flush_drive(drives: &mut Vec<Drive>, plays: &mut Vec<GameEvent>, possession: Possession, start: u32, end: u32, result: DriveResult) {
    if plays.is_empty() {
        return;
    }
    drives.push(Drive {
        possession_team: possession,
        start_position: start,
        end_position: end,
        plays: std::mem::take(plays),
        result,
    });
}

fn drive_result_for(outcome: &PlayOutcome, offense_scored: bool, turnover: bool, turnover_on_downs: bool) -> Option<DriveResult> {
    if matches!(outcome, PlayOutcome::Punt { return_touchdown: true, .. } | PlayOutcome::Punt { blocked_return_touchdown: true, .. }) {
        return Some(DriveResult::Touchdown);
    }
    if offense_scored {
        return Some(if matches!(outcome, PlayOutcome::FieldGoal { made: true, .. }) {
            DriveResult::FieldGoal
        } else {
            DriveResult::Touchdown
        });
    }
    if matches!(outcome, PlayOutcome::Run { safety: true, .. } | PlayOutcome::PassComplete { safety: true, .. } | PlayOutcome::Sack { safety: true, .. }) {
        return Some(DriveResult::Safety);
    }
    if outcome.is_punt() {
        return Some(DriveResult::Punt);
    }
    if turnover_on_downs {
        return Some(DriveResult::TurnoverOnDowns);
    }
    if turnover {
        return Some(match outcome {
            PlayOutcome::PassIncomplete { interception: true, .. } => DriveResult::TurnoverInterception,
            _ => DriveResult::TurnoverFumble,
        });
    }
    None
}

/// Resolve and apply a free kick: `kicking_team` is the team putting the
/// ball in play (the team that just scored, or lost the prior coin
/// toss); the receiving team and resulting field position come out of
/// [`GameState::apply_kickoff`].
fn handle_kickoff(
    state: &mut GameState,
    config: &GameConfig,
    kicking_team: Possession,
    rng: &mut FairRng,
    events: &mut Vec<GameEvent>,
    event_number: &mut u32,
) {
    let kicking_roster = roster_for(kicking_team, config);
    let outcome = resolve::kickoff::resolve(state, kicking_roster, rng);
    let before_state = state.clone();
    state.apply_kickoff(&outcome, kicking_team);
    let narrative_snapshot = narrative(&outcome, &before_state);
    let participants = Participants { kicker_id: kicking_roster.starter(Position::Kicker).map(|p| p.id()), ..Participants::default() };
    events.push(GameEvent {
        event_number: *event_number,
        state_before: before_state,
        play_result: outcome,
        state_after: state.clone(),
        narrative_snapshot,
        formation_metadata: FormationMetadata::default(),
        participants,
    });
    *event_number += 1;
}

/// Simulate one complete game per the driver algorithm: pregame/coin
/// toss, opening kickoff, play loop until terminal, halftime and
/// overtime handling, finalize with box score and MVP.
///
/// `should_cancel` is consulted at the top of every play; if it ever
/// returns `true` the driver stops and returns a partial record with
/// `status = canceled`, per the cooperative-cancellation contract.
pub fn simulate_game(config: &GameConfig, mut should_cancel: impl FnMut() -> bool) -> Result<SimulatedGame, SimulationError> {
    let mut rng = FairRng::new(config.server_seed(), config.client_seed());
    let weather = sample_weather(config, &mut rng);

    let coin_toss_winner = if rng.next_uniform() < 0.5 { Possession::Home } else { Possession::Away };
    let coin_toss_choice = if rng.next_uniform() < 0.5 { CoinTossChoice::Receive } else { CoinTossChoice::Defer };
    let receiving_team = match coin_toss_choice {
        CoinTossChoice::Receive => coin_toss_winner,
        CoinTossChoice::Defer => coin_toss_winner.flip(),
    };

    let mut state = GameState::new(config.game_type(), weather.clone(), receiving_team);
    let mut events = Vec::new();
    let mut drives = Vec::new();
    let mut box_score = BoxScore::new();

    let pregame_outcome = PlayOutcome::Pregame;
    let before = state.clone();
    events.push(GameEvent {
        event_number: 0,
        state_before: before.clone(),
        play_result: pregame_outcome.clone(),
        state_after: before.clone(),
        narrative_snapshot: String::from("Pregame"),
        formation_metadata: FormationMetadata::default(),
        participants: Participants::default(),
    });
    let coin_toss_outcome = PlayOutcome::CoinToss { winner: coin_toss_winner, choice: coin_toss_choice };
    events.push(GameEvent {
        event_number: 1,
        state_before: before.clone(),
        play_result: coin_toss_outcome,
        state_after: before,
        narrative_snapshot: format!("Coin toss: {:?} wins and elects to {:?}", coin_toss_winner, coin_toss_choice),
        formation_metadata: FormationMetadata::default(),
        participants: Participants::default(),
    });

    let mut event_number = 2u32;
    handle_kickoff(&mut state, config, receiving_team.flip(), &mut rng, &mut events, &mut event_number);

    let mut current_drive_plays: Vec<GameEvent> = Vec::new();
    let mut current_drive_start = state.ball_position();
    let mut current_drive_possession = state.possession();

    while !state.is_game_over() {
        if should_cancel() {
            return Ok(finalize(config, state, events, drives, box_score, &weather, SimulatedGameStatus::Canceled, &rng));
        }
        if state.total_plays() >= MAX_TOTAL_PLAYS {
            return Err(SimulationError::ExhaustedBudget(format!("reached {} plays without terminating", MAX_TOTAL_PLAYS)));
        }

        if state.clock_seconds() == 0 && !state.is_halftime() && state.overtime().is_none() {
            match state.quarter() {
                Quarter::Second => {
                    flush_drive(&mut drives, &mut current_drive_plays, current_drive_possession, current_drive_start, state.ball_position(), DriveResult::EndOfHalf);
                    state.halftime();
                    continue;
                }
                Quarter::First | Quarter::Third => {
                    state.end_of_quarter();
                    continue;
                }
                Quarter::Fourth => {
                    if state.home_score() == state.away_score() {
                        flush_drive(&mut drives, &mut current_drive_plays, current_drive_possession, current_drive_start, state.ball_position(), DriveResult::EndOfHalf);
                        let ot_winner = if rng.next_uniform() < 0.5 { Possession::Home } else { Possession::Away };
                        let ot_choice = if rng.next_uniform() < 0.5 { CoinTossChoice::Receive } else { CoinTossChoice::Defer };
                        state.begin_overtime(ot_winner, ot_choice);
                        let kicking_team = state.possession().flip();
                        handle_kickoff(&mut state, config, kicking_team, &mut rng, &mut events, &mut event_number);
                        current_drive_start = state.ball_position();
                        current_drive_possession = state.possession();
                        continue;
                    }
                    break;
                }
                Quarter::Overtime => unreachable!("overtime is handled below, guarded on state.overtime().is_none()"),
            }
        }
        if state.is_halftime() {
            state.resume_from_halftime();
            let kicking_team = state.possession().flip();
            handle_kickoff(&mut state, config, kicking_team, &mut rng, &mut events, &mut event_number);
            current_drive_start = state.ball_position();
            current_drive_possession = state.possession();
            continue;
        }
        if let Some(ot) = state.overtime() {
            if ot.is_complete() {
                break;
            }
            if state.clock_seconds() == 0 {
                let (is_over, _winner) = ot.check_overtime_end(state.home_score(), state.away_score(), true, config.game_type());
                if is_over {
                    state.mark_overtime_complete();
                    break;
                }
                if config.game_type().is_playoff() {
                    flush_drive(&mut drives, &mut current_drive_plays, current_drive_possession, current_drive_start, state.ball_position(), DriveResult::EndOfHalf);
                    let ot_winner = if rng.next_uniform() < 0.5 { Possession::Home } else { Possession::Away };
                    let ot_choice = if rng.next_uniform() < 0.5 { CoinTossChoice::Receive } else { CoinTossChoice::Defer };
                    state.begin_next_overtime_period(ot_winner, ot_choice);
                    let kicking_team = state.possession().flip();
                    handle_kickoff(&mut state, config, kicking_team, &mut rng, &mut events, &mut event_number);
                    current_drive_start = state.ball_position();
                    current_drive_possession = state.possession();
                    continue;
                }
                break;
            }
        }

        if let Some(kicking_team) = state.pending_kickoff() {
            handle_kickoff(&mut state, config, kicking_team, &mut rng, &mut events, &mut event_number);
            current_drive_start = state.ball_position();
            current_drive_possession = state.possession();
            continue;
        }

        let offense_roster = roster_for(state.possession(), config);
        let defense_roster = roster_for(state.possession().flip(), config);

        let offense_call = call_offense(&state, &mut rng);
        let defense_call = call_defense(&state, Some(offense_call), &mut rng);

        let (outcome, participants, formation_metadata) = resolve_play(&state, offense_call, defense_call, offense_roster, defense_roster, &mut rng);

        let before_state = state.clone();
        let offense_scored = score_event(&outcome, state.possession()).map(|s| s.team) == Some(state.possession());
        let turnover = outcome.turnover().is_some();
        let was_fourth_down = state.down() == 4;
        let yards_needed = state.yards_to_go() as i32;
        let offense = state.possession();

        record_participant_stats(&mut box_score, &participants, &outcome, offense_scored);
        if matches!(outcome, PlayOutcome::Punt { .. }) {
            state.apply_punt(&outcome, offense);
        } else {
            state.apply_play(&outcome);
        }

        let turnover_on_downs = was_fourth_down && !turnover && !offense_scored && outcome.yards_gained() < yards_needed && !matches!(offense_call, OffensiveCall::Punt | OffensiveCall::FieldGoal);

        let narrative_snapshot = narrative(&outcome, &before_state);
        let event = GameEvent {
            event_number,
            state_before: before_state,
            play_result: outcome.clone(),
            state_after: state.clone(),
            narrative_snapshot,
            formation_metadata,
            participants,
        };
        event_number += 1;
        current_drive_plays.push(event.clone());
        events.push(event);

        if let Some(result) = drive_result_for(&outcome, offense_scored, turnover, turnover_on_downs) {
            drives.push(Drive {
                possession_team: current_drive_possession,
                start_position: current_drive_start,
                end_position: state.ball_position(),
                plays: std::mem::take(&mut current_drive_plays),
                result,
            });
            current_drive_start = state.ball_position();
            current_drive_possession = state.possession();
        }
    }

    if !current_drive_plays.is_empty() {
        drives.push(Drive {
            possession_team: current_drive_possession,
            start_position: current_drive_start,
            end_position: state.ball_position(),
            plays: current_drive_plays,
            result: DriveResult::EndOfGame,
        });
    }

    Ok(finalize(config, state, events, drives, box_score, &weather, SimulatedGameStatus::Completed, &rng))
}

fn finalize(
    config: &GameConfig,
    state: GameState,
    events: Vec<GameEvent>,
    drives: Vec<Drive>,
    box_score: BoxScore,
    weather: &Weather,
    status: SimulatedGameStatus,
    rng: &FairRng,
) -> SimulatedGame {
    SimulatedGame {
        id: format!("{}-{}", config.home_team().id(), rng.server_seed_hash().chars().take(12).collect::<String>()),
        home_team: config.home_team().clone(),
        away_team: config.away_team().clone(),
        total_plays: state.total_plays(),
        final_score: FinalScore { home: state.home_score(), away: state.away_score() },
        mvp_player_id: box_score.mvp_player_id(),
        events,
        drives,
        server_seed: rng.server_seed().to_string(),
        server_seed_hash: rng.server_seed_hash().to_string(),
        client_seed: rng.client_seed().to_string(),
        nonce: rng.nonce(),
        box_score,
        weather: weather.clone(),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Player, PlayerAttributes, Position};
    use crate::team::{Conference, Division, Team};

    fn roster() -> Roster {
        let positions = [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::OffensiveLine,
            Position::DefensiveLine,
            Position::Linebacker,
            Position::Cornerback,
            Position::Safety,
            Position::Kicker,
            Position::Punter,
        ];
        let players = (0..22)
            .map(|i| {
                Player::from_properties(i, &format!("Player {}", i), (i % 99) as u32, positions[i % positions.len()], PlayerAttributes::new()).unwrap()
            })
            .collect();
        Roster::from_players(players).unwrap()
    }

    fn config() -> GameConfig {
        let home = Team::from_properties(1, "Home", "HOM", "Home City", Conference::Afc, Division::East, "#000", "#fff", false).unwrap();
        let away = Team::from_properties(2, "Away", "AWY", "Away City", Conference::Nfc, Division::West, "#111", "#eee", false).unwrap();
        GameConfig::from_properties(home, away, roster(), roster(), GameType::Regular, "test-server-seed-aabbccdd11223344", "test-client-seed").unwrap()
    }

    #[test]
    fn test_simulated_game_has_at_least_one_event_and_valid_hash() {
        let cfg = config();
        let result = simulate_game(&cfg, || false).unwrap();
        assert!(!result.events.is_empty());
        assert_eq!(result.server_seed_hash.len(), 64);
    }

    #[test]
    fn test_identical_config_is_deterministic() {
        let cfg = config();
        let a = simulate_game(&cfg, || false).unwrap();
        let b = simulate_game(&cfg, || false).unwrap();
        assert_eq!(a.final_score.home, b.final_score.home);
        assert_eq!(a.final_score.away, b.final_score.away);
        assert_eq!(a.nonce, b.nonce);
        assert_eq!(a.total_plays, b.total_plays);
    }

    #[test]
    fn test_cancellation_returns_partial_canceled_record() {
        let cfg = config();
        let mut calls = 0;
        let result = simulate_game(&cfg, || {
            calls += 1;
            calls > 3
        })
        .unwrap();
        assert_eq!(result.status, SimulatedGameStatus::Canceled);
    }
}
