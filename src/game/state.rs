//! The central mutable entity of a simulated game: clock, downs,
//! possession, field position, timeouts, scoring, and overtime.
//!
//! `GameState` is owned exclusively by [`crate::game::sim::simulate_game`]'s
//! driver loop; every other component (resolver, play caller) only reads
//! it. Transitions are exposed as explicit methods that mutate `self` in
//! place rather than a fluent shallow-copy update chain.

use serde::{Deserialize, Serialize};

use crate::game::config::GameType;
use crate::game::play::result::{score_event, PlayOutcome, ScoreType, TouchbackType};
use crate::game::weather::Weather;

/// # `Quarter` enum
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quarter {
    First,
    Second,
    Third,
    Fourth,
    Overtime,
}

impl Quarter {
    pub fn next(&self) -> Quarter {
        match self {
            Quarter::First => Quarter::Second,
            Quarter::Second => Quarter::Third,
            Quarter::Third => Quarter::Fourth,
            Quarter::Fourth => Quarter::Overtime,
            Quarter::Overtime => Quarter::Overtime,
        }
    }
}

/// # `Possession` enum
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Possession {
    Home,
    Away,
}

impl Possession {
    pub fn flip(&self) -> Possession {
        match self {
            Possession::Home => Possession::Away,
            Possession::Away => Possession::Home,
        }
    }
}

/// # `CoinTossChoice` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinTossChoice {
    Receive,
    Defer,
}

/// # `OvertimeResult` enum
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeResult {
    Touchdown,
    FieldGoal,
    Safety,
    Turnover,
    None,
}

/// # `OvertimeState` struct
///
/// Tracks the coin toss and possession count needed to apply the 4.3.1
/// sub-machine rules: both teams guaranteed a possession, then sudden
/// death.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct OvertimeState {
    coin_toss_winner: Possession,
    coin_toss_choice: CoinTossChoice,
    home_possessed: bool,
    away_possessed: bool,
    first_possession_result: OvertimeResult,
    is_sudden_death: bool,
    is_complete: bool,
}

impl OvertimeState {
    pub fn new(coin_toss_winner: Possession, coin_toss_choice: CoinTossChoice) -> OvertimeState {
        OvertimeState {
            coin_toss_winner,
            coin_toss_choice,
            home_possessed: false,
            away_possessed: false,
            first_possession_result: OvertimeResult::None,
            is_sudden_death: false,
            is_complete: false,
        }
    }

    pub fn coin_toss_winner(&self) -> Possession {
        self.coin_toss_winner
    }

    pub fn coin_toss_choice(&self) -> CoinTossChoice {
        self.coin_toss_choice
    }

    pub fn home_possessed(&self) -> bool {
        self.home_possessed
    }

    pub fn away_possessed(&self) -> bool {
        self.away_possessed
    }

    pub fn first_possession_result(&self) -> OvertimeResult {
        self.first_possession_result
    }

    pub fn is_sudden_death(&self) -> bool {
        self.is_sudden_death
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Record that `team` has had (at least) one possession this overtime
    /// period, transitioning into sudden death once both sides have.
    pub fn record_possession(&mut self, team: Possession, result: OvertimeResult) {
        if self.first_possession_result == OvertimeResult::None {
            self.first_possession_result = result;
        }
        match team {
            Possession::Home => self.home_possessed = true,
            Possession::Away => self.away_possessed = true,
        }
        if self.home_possessed && self.away_possessed {
            self.is_sudden_death = true;
        }
    }

    /// Per §8's overtime-termination property: returns `(is_over, winner)`
    /// given the current score differential and whether the clock has
    /// expired. `None` for `winner` with `is_over=true` denotes a
    /// regular-season tie.
    pub fn check_overtime_end(
        &self,
        home_score: u32,
        away_score: u32,
        clock_expired: bool,
        game_type: GameType,
    ) -> (bool, Option<Possession>) {
        if home_score != away_score {
            if self.is_sudden_death || (self.home_possessed && self.away_possessed) {
                return (
                    true,
                    Some(if home_score > away_score { Possession::Home } else { Possession::Away }),
                );
            }
            return (false, None);
        }
        if clock_expired && self.home_possessed && self.away_possessed {
            if game_type.is_playoff() {
                return (false, None);
            }
            return (true, None);
        }
        (false, None)
    }

    pub fn mark_complete(&mut self) {
        self.is_complete = true;
    }
}

/// Regular-season overtime period length, in seconds.
pub const OT_PERIOD_REGULAR_SECONDS: u32 = 600;
/// Playoff overtime period length, in seconds.
pub const OT_PERIOD_PLAYOFF_SECONDS: u32 = 900;
/// Quarter length, in seconds.
pub const QUARTER_SECONDS: u32 = 900;
/// Hard cap on total plays a single game may run, per the driver's
/// termination guarantee.
pub const MAX_TOTAL_PLAYS: u32 = 450;

/// # `GameState` struct
///
/// The complete mutable scenario for one simulated game. All invariants
/// in the data model are re-checked by [`GameState::apply_play`] at every
/// transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    game_type: GameType,
    home_score: u32,
    away_score: u32,
    quarter: Quarter,
    clock_seconds: u32,
    is_clock_running: bool,
    two_minute_warning_fired_q2: bool,
    two_minute_warning_fired_q4: bool,
    is_halftime: bool,
    possession: Possession,
    ball_position: u32,
    down: u32,
    yards_to_go: u32,
    drive_start_position: u32,
    home_timeouts: u32,
    away_timeouts: u32,
    kickoff: bool,
    pat_attempt: bool,
    overtime: Option<OvertimeState>,
    weather: Weather,
    home_opening_kickoff: bool,
    total_plays: u32,
    pending_kickoff: Option<Possession>,
}

impl GameState {
    /// Construct the initial pre-kickoff state for a game, per the
    /// driver's canonical kickoff defaults: Q1, full clock, 3 timeouts
    /// per side (2 in playoff OT is handled separately), kicking team
    /// determined by the coin toss outcome passed in.
    pub fn new(game_type: GameType, weather: Weather, receiving_team: Possession) -> GameState {
        GameState {
            game_type,
            home_score: 0,
            away_score: 0,
            quarter: Quarter::First,
            clock_seconds: QUARTER_SECONDS,
            is_clock_running: false,
            two_minute_warning_fired_q2: false,
            two_minute_warning_fired_q4: false,
            is_halftime: false,
            possession: receiving_team,
            ball_position: 25,
            down: 0,
            yards_to_go: 10,
            drive_start_position: 25,
            home_timeouts: 3,
            away_timeouts: 3,
            kickoff: true,
            pat_attempt: false,
            overtime: None,
            weather,
            home_opening_kickoff: receiving_team == Possession::Home,
            total_plays: 0,
            pending_kickoff: None,
        }
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    pub fn quarter(&self) -> Quarter {
        self.quarter
    }

    pub fn clock_seconds(&self) -> u32 {
        self.clock_seconds
    }

    pub fn is_clock_running(&self) -> bool {
        self.is_clock_running
    }

    pub fn is_halftime(&self) -> bool {
        self.is_halftime
    }

    pub fn possession(&self) -> Possession {
        self.possession
    }

    pub fn ball_position(&self) -> u32 {
        self.ball_position
    }

    pub fn down(&self) -> u32 {
        self.down
    }

    pub fn yards_to_go(&self) -> u32 {
        self.yards_to_go
    }

    pub fn drive_start_position(&self) -> u32 {
        self.drive_start_position
    }

    pub fn home_timeouts(&self) -> u32 {
        self.home_timeouts
    }

    pub fn away_timeouts(&self) -> u32 {
        self.away_timeouts
    }

    pub fn is_kickoff(&self) -> bool {
        self.kickoff
    }

    pub fn is_pat_attempt(&self) -> bool {
        self.pat_attempt
    }

    pub fn overtime(&self) -> Option<&OvertimeState> {
        self.overtime.as_ref()
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    pub fn total_plays(&self) -> u32 {
        self.total_plays
    }

    /// The team owed a free kick before the next down can be played, set
    /// by [`GameState::apply_play`] after a made field goal, a resolved
    /// PAT, or a safety. Consumed by the driver via
    /// [`GameState::apply_kickoff`].
    pub fn pending_kickoff(&self) -> Option<Possession> {
        self.pending_kickoff
    }

    /// Total elapsed game time, used to check invariant 5 of the data
    /// model at `game_over`.
    pub fn elapsed_seconds(&self) -> u32 {
        let regulation = 4 * QUARTER_SECONDS;
        match &self.overtime {
            Some(_) if self.game_type.is_playoff() => regulation + OT_PERIOD_PLAYOFF_SECONDS,
            Some(_) => regulation + OT_PERIOD_REGULAR_SECONDS,
            None => regulation,
        }
    }

    /// Whether the game has reached a terminal state: regulation ended
    /// untied, or overtime is marked complete.
    pub fn is_game_over(&self) -> bool {
        if let Some(ot) = &self.overtime {
            return ot.is_complete();
        }
        self.quarter == Quarter::Fourth && self.clock_seconds == 0 && self.home_score != self.away_score
    }

    fn offense_timeouts(&self) -> u32 {
        match self.possession {
            Possession::Home => self.home_timeouts,
            Possession::Away => self.away_timeouts,
        }
    }

    /// Seed a new possession at the returned spot, flipping possession to
    /// the receiving team.
    pub fn kickoff_to_receiver(&mut self, receiving_team: Possession, spot: u32) {
        self.possession = receiving_team;
        self.ball_position = spot.min(100);
        self.drive_start_position = self.ball_position;
        self.down = 1;
        self.yards_to_go = 10;
        self.kickoff = false;
        self.pat_attempt = false;
        self.pending_kickoff = None;
        self.is_clock_running = true;
    }

    fn credit_touchdown(&mut self, team: Possession) {
        match team {
            Possession::Home => self.home_score += 6,
            Possession::Away => self.away_score += 6,
        }
        self.possession = team;
        self.pat_attempt = true;
        self.down = 0;
        self.ball_position = 98;
    }

    fn return_yards_for(outcome: &PlayOutcome) -> i32 {
        match outcome {
            PlayOutcome::FieldGoal { return_yards, .. } => *return_yards,
            _ => outcome.turnover().map(|t| t.return_yards).unwrap_or(0),
        }
    }

    /// Decrement a team's timeouts, stopping the clock. Fails softly (no
    /// state change) if the team has none remaining.
    pub fn call_timeout(&mut self, team: Possession) {
        let timeouts = match team {
            Possession::Home => &mut self.home_timeouts,
            Possession::Away => &mut self.away_timeouts,
        };
        if *timeouts == 0 {
            return;
        }
        *timeouts -= 1;
        self.is_clock_running = false;
    }

    /// Advance quarter/clock bookkeeping and two-minute-warning state.
    /// Called when the clock reaches zero in Q1-Q3.
    pub fn end_of_quarter(&mut self) {
        self.quarter = self.quarter.next();
        self.clock_seconds = QUARTER_SECONDS;
        if self.quarter == Quarter::Third {
            self.two_minute_warning_fired_q2 = false;
            self.two_minute_warning_fired_q4 = false;
        }
    }

    /// Freeze the clock at 0 in Q2, mark halftime. On resume, the team
    /// that did not receive the opening kickoff gets the second-half
    /// kickoff (handled by the caller via `home_opening_kickoff`).
    pub fn halftime(&mut self) {
        self.clock_seconds = 0;
        self.is_clock_running = false;
        self.is_halftime = true;
        self.home_timeouts = 3;
        self.away_timeouts = 3;
    }

    /// Resume from halftime: Q3 kickoff goes to whichever team did not
    /// receive the opening kickoff.
    pub fn resume_from_halftime(&mut self) {
        self.is_halftime = false;
        self.quarter = Quarter::Third;
        self.clock_seconds = QUARTER_SECONDS;
        self.kickoff = true;
        let second_half_receiver = if self.home_opening_kickoff {
            Possession::Away
        } else {
            Possession::Home
        };
        self.possession = second_half_receiver;
    }

    /// Initialize overtime after a coin toss sampled by the caller.
    pub fn begin_overtime(&mut self, coin_toss_winner: Possession, coin_toss_choice: CoinTossChoice) {
        self.quarter = Quarter::Overtime;
        self.clock_seconds = if self.game_type.is_playoff() {
            OT_PERIOD_PLAYOFF_SECONDS
        } else {
            OT_PERIOD_REGULAR_SECONDS
        };
        self.home_timeouts = if self.game_type.is_playoff() { 3 } else { 2 };
        self.away_timeouts = if self.game_type.is_playoff() { 3 } else { 2 };
        self.overtime = Some(OvertimeState::new(coin_toss_winner, coin_toss_choice));
        self.kickoff = true;
        let receiver = match (coin_toss_winner, coin_toss_choice) {
            (winner, CoinTossChoice::Receive) => winner,
            (winner, CoinTossChoice::Defer) => winner.flip(),
        };
        self.possession = receiver;
    }

    /// Begin a fresh overtime period after a playoff tie at `clock=0`.
    pub fn begin_next_overtime_period(&mut self, coin_toss_winner: Possession, coin_toss_choice: CoinTossChoice) {
        self.begin_overtime(coin_toss_winner, coin_toss_choice);
    }

    /// Mark overtime terminal once the driver has decided the game is over
    /// (sudden-death score, or a regular-season tie at `clock=0`).
    pub fn mark_overtime_complete(&mut self) {
        if let Some(ot) = &mut self.overtime {
            ot.mark_complete();
        }
    }

    fn stops_clock(outcome: &PlayOutcome) -> bool {
        !matches!(
            outcome,
            PlayOutcome::Run { out_of_bounds: false, fumble: false, touchdown: false, safety: false, .. }
                | PlayOutcome::PassComplete { out_of_bounds: false, fumble: false, touchdown: false, safety: false, .. }
                | PlayOutcome::Scramble { out_of_bounds: false, fumble: false, touchdown: false, safety: false, .. }
        )
    }

    /// Apply one resolved "normal-down" play to the state: decrement
    /// clock, advance downs, update field position, flip possession on
    /// turnover/score, record scoring. Kickoffs and punts are not applied
    /// here — the driver seeds their resulting drive directly via
    /// [`GameState::kickoff_to_receiver`], since both start a fresh
    /// possession rather than advance the current one.
    pub fn apply_play(&mut self, outcome: &PlayOutcome) {
        self.total_plays += 1;
        let duration = outcome.play_duration().min(self.clock_seconds);
        let net_yards = outcome.yards_gained();
        let turnover = outcome.turnover().is_some();
        let pre_snap_offense = self.possession;
        let score = score_event(outcome, self.possession);
        let offense_scored = score.map(|s| s.team) == Some(self.possession);
        let defense_scored = score.map(|s| s.team) == Some(self.possession.flip());
        let any_touchdown = matches!(
            score.map(|s| s.score_type),
            Some(ScoreType::Touchdown) | Some(ScoreType::DefensiveTouchdown) | Some(ScoreType::PickSix) | Some(ScoreType::FumbleRecoveryTd)
        );
        let is_safety = matches!(score.map(|s| s.score_type), Some(ScoreType::Safety) | Some(ScoreType::PatSafety));
        let field_goal_made = matches!(outcome, PlayOutcome::FieldGoal { made: true, .. });
        let field_goal_missed = matches!(outcome, PlayOutcome::FieldGoal { made: false, blocked: false, .. });
        let is_pat_play = matches!(outcome, PlayOutcome::ExtraPoint { .. } | PlayOutcome::TwoPoint { .. });

        if let Some(s) = score {
            match s.team {
                Possession::Home => self.home_score += s.points,
                Possession::Away => self.away_score += s.points,
            }
            if let Some(ot) = &mut self.overtime {
                if !matches!(s.score_type, ScoreType::ExtraPoint | ScoreType::TwoPointConversion) {
                    let offense_result = if s.team == pre_snap_offense {
                        match s.score_type {
                            ScoreType::Touchdown => OvertimeResult::Touchdown,
                            ScoreType::FieldGoal => OvertimeResult::FieldGoal,
                            ScoreType::Safety | ScoreType::PatSafety => OvertimeResult::Safety,
                            _ => OvertimeResult::None,
                        }
                    } else {
                        OvertimeResult::Turnover
                    };
                    ot.record_possession(pre_snap_offense, offense_result);
                    if s.team != pre_snap_offense {
                        ot.record_possession(s.team, OvertimeResult::Touchdown);
                    }
                }
            }
        }
        if turnover && score.is_none() {
            if let Some(ot) = &mut self.overtime {
                ot.record_possession(pre_snap_offense, OvertimeResult::Turnover);
            }
        }

        self.is_clock_running = !Self::stops_clock(outcome);
        self.clock_seconds = self.clock_seconds.saturating_sub(duration);

        let turnover_on_downs = !is_pat_play && !offense_scored && !defense_scored && !turnover && self.down == 4 && net_yards < self.yards_to_go as i32;

        if (turnover_on_downs || field_goal_missed) && score.is_none() {
            if let Some(ot) = &mut self.overtime {
                ot.record_possession(pre_snap_offense, OvertimeResult::None);
            }
        }

        let possession_changes = turnover || turnover_on_downs || field_goal_missed || field_goal_made || defense_scored;

        // Field position: expressed from the possessing team's
        // perspective (invariant 3); any change of possession flips the
        // coordinate system and folds in the actual return yardage.
        if is_pat_play {
            // field position is irrelevant once the try is over; the
            // ensuing kickoff re-seeds it.
        } else if any_touchdown {
            self.ball_position = 98;
        } else if possession_changes {
            let spot = (self.ball_position as i32 + net_yards).clamp(0, 100);
            let flipped = 100 - spot;
            self.ball_position = (flipped + Self::return_yards_for(outcome)).clamp(0, 100) as u32;
        } else {
            let raw = self.ball_position as i32 + net_yards;
            self.ball_position = raw.clamp(0, 100) as u32;
        }

        // Down & distance.
        if is_pat_play || field_goal_made || any_touchdown || is_safety {
            self.down = 0;
        } else if turnover || turnover_on_downs || field_goal_missed {
            self.down = 1;
            self.yards_to_go = 10.min(100u32.saturating_sub(self.ball_position)).max(1);
        } else if net_yards >= self.yards_to_go as i32 {
            self.down = 1;
            self.yards_to_go = 10.min(100u32.saturating_sub(self.ball_position)).max(1);
        } else if self.down > 0 {
            self.down += 1;
            self.yards_to_go = (self.yards_to_go as i32 - net_yards).max(1) as u32;
        }
        self.yards_to_go = self.yards_to_go.min(100u32.saturating_sub(self.ball_position)).max(1);

        // Possession flips on turnovers, turnover-on-downs, missed or
        // made field goals (the other side gets the ensuing kickoff),
        // and defensive scores; otherwise stays with the offense.
        if possession_changes {
            self.possession = self.possession.flip();
        }

        // A failed two-point try can itself end in a defensive return
        // touchdown (any_touchdown=true) without opening a new try.
        self.pat_attempt = any_touchdown && !is_pat_play;
        if self.pat_attempt {
            self.down = 0;
            self.ball_position = 98;
        }

        self.pending_kickoff = if is_pat_play || field_goal_made || is_safety {
            Some(pre_snap_offense)
        } else {
            self.pending_kickoff
        };

        self.fire_two_minute_warning();
    }

    /// Apply a resolved kickoff: seed the receiving team's drive at the
    /// returned spot, hand the kicking team a fresh drive on a muffed
    /// return, or credit an immediate return touchdown. Always clears
    /// [`GameState::pending_kickoff`].
    pub fn apply_kickoff(&mut self, outcome: &PlayOutcome, kicking_team: Possession) {
        let (return_yards, touchback, touchback_type, catch_spot, fumble, return_touchdown, play_duration) = match outcome {
            PlayOutcome::Kickoff { return_yards, touchback, touchback_type, catch_spot, fumble, return_touchdown, play_duration, .. } => {
                (*return_yards, *touchback, *touchback_type, *catch_spot, *fumble, *return_touchdown, *play_duration)
            }
            _ => return,
        };
        self.total_plays += 1;
        let receiving_team = kicking_team.flip();
        self.pending_kickoff = None;
        self.kickoff = false;
        self.pat_attempt = false;
        self.is_clock_running = true;
        self.clock_seconds = self.clock_seconds.saturating_sub(play_duration.min(self.clock_seconds));

        if return_touchdown {
            self.credit_touchdown(receiving_team);
            if let Some(ot) = &mut self.overtime {
                ot.record_possession(receiving_team, OvertimeResult::Touchdown);
            }
            self.fire_two_minute_warning();
            return;
        }

        if fumble {
            let landing = (catch_spot as i32 + return_yards).clamp(0, 100) as u32;
            self.possession = kicking_team;
            self.ball_position = 100u32.saturating_sub(landing);
            self.drive_start_position = self.ball_position;
            self.down = 1;
            self.yards_to_go = 10.min(100u32.saturating_sub(self.ball_position)).max(1);
            if let Some(ot) = &mut self.overtime {
                ot.record_possession(receiving_team, OvertimeResult::Turnover);
            }
            self.fire_two_minute_warning();
            return;
        }

        let spot = if touchback {
            match touchback_type {
                Some(TouchbackType::Endzone) => 25,
                _ => catch_spot,
            }
        } else {
            (catch_spot as i32 + return_yards).clamp(0, 100) as u32
        };
        self.possession = receiving_team;
        self.ball_position = spot.min(100);
        self.drive_start_position = self.ball_position;
        self.down = 1;
        self.yards_to_go = 10.min(100u32.saturating_sub(self.ball_position)).max(1);
        self.fire_two_minute_warning();
    }

    /// Apply a resolved punt: seed the receiving team's drive, hand the
    /// kicking team the ball back on a muffed return, or credit an
    /// immediate return/blocked-return touchdown.
    pub fn apply_punt(&mut self, outcome: &PlayOutcome, punting_team: Possession) {
        let (net_yards, touchback, touchback_type, catch_spot, muffed, return_touchdown, blocked_return_touchdown, play_duration) = match outcome {
            PlayOutcome::Punt { net_yards, touchback, touchback_type, catch_spot, muffed, return_touchdown, blocked_return_touchdown, play_duration, .. } => {
                (*net_yards, *touchback, *touchback_type, *catch_spot, *muffed, *return_touchdown, *blocked_return_touchdown, *play_duration)
            }
            _ => return,
        };
        self.total_plays += 1;
        let receiving_team = punting_team.flip();
        let pre_spot = self.ball_position;
        self.pat_attempt = false;
        self.is_clock_running = true;
        self.clock_seconds = self.clock_seconds.saturating_sub(play_duration.min(self.clock_seconds));

        if return_touchdown || blocked_return_touchdown {
            self.credit_touchdown(receiving_team);
            if let Some(ot) = &mut self.overtime {
                ot.record_possession(receiving_team, OvertimeResult::Touchdown);
            }
            self.fire_two_minute_warning();
            return;
        }

        if muffed {
            self.possession = punting_team;
            self.ball_position = 100u32.saturating_sub(catch_spot).min(100);
            self.drive_start_position = self.ball_position;
            self.down = 1;
            self.yards_to_go = 10.min(100u32.saturating_sub(self.ball_position)).max(1);
            if let Some(ot) = &mut self.overtime {
                ot.record_possession(receiving_team, OvertimeResult::Turnover);
            }
            self.fire_two_minute_warning();
            return;
        }

        self.possession = receiving_team;
        self.ball_position = if touchback && matches!(touchback_type, Some(TouchbackType::Endzone)) {
            25
        } else {
            let spot = (pre_spot as i32 + net_yards).clamp(0, 100) as u32;
            100u32.saturating_sub(spot)
        };
        self.drive_start_position = self.ball_position;
        self.down = 1;
        self.yards_to_go = 10.min(100u32.saturating_sub(self.ball_position)).max(1);
        if let Some(ot) = &mut self.overtime {
            ot.record_possession(punting_team, OvertimeResult::None);
        }
        self.fire_two_minute_warning();
    }

    fn fire_two_minute_warning(&mut self) {
        if self.clock_seconds <= 120 {
            match self.quarter {
                Quarter::Second => self.two_minute_warning_fired_q2 = true,
                Quarter::Fourth => self.two_minute_warning_fired_q4 = true,
                _ => {}
            }
        }
    }

    pub fn two_minute_warning_fired(&self, quarter: Quarter) -> bool {
        match quarter {
            Quarter::Second => self.two_minute_warning_fired_q2,
            Quarter::Fourth => self.two_minute_warning_fired_q4,
            _ => false,
        }
    }

    /// Whether the offense should consider conserving clock (winning,
    /// late in a half, clock running).
    pub fn offense_conserve_clock(&self) -> bool {
        let leading = match self.possession {
            Possession::Home => self.home_score > self.away_score,
            Possession::Away => self.away_score > self.home_score,
        };
        leading && self.clock_seconds <= 120 && (self.quarter == Quarter::Second || self.quarter == Quarter::Fourth)
    }

    pub fn offense_timeouts_remaining(&self) -> u32 {
        self.offense_timeouts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play::result::{PlayOutcome, TouchbackType};

    #[test]
    fn test_new_state_is_pre_kickoff() {
        let state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Away);
        assert!(state.is_kickoff());
        assert_eq!(state.quarter(), Quarter::First);
        assert_eq!(state.clock_seconds(), QUARTER_SECONDS);
    }

    #[test]
    fn test_apply_play_advances_first_down() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let outcome = PlayOutcome::Run {
            yards_gained: 12,
            play_duration: 30,
            out_of_bounds: false,
            fumble: false,
            touchdown: false,
            safety: false,
        };
        state.apply_play(&outcome);
        assert_eq!(state.down(), 1);
        assert_eq!(state.ball_position(), 37);
    }

    #[test]
    fn test_turnover_flips_possession_and_field() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let outcome = PlayOutcome::PassIncomplete {
            play_duration: 20,
            dropped: false,
            interception: true,
            interception_return_yards: 5,
            pick_six: false,
        };
        state.apply_play(&outcome);
        assert_eq!(state.possession(), Possession::Away);
        // Home was at their own 25; the pick flips the frame to Away's
        // (100 - 25 = 75) before folding in the 5 return yards.
        assert_eq!(state.ball_position(), 80);
        assert_eq!(state.down(), 1);
    }

    #[test]
    fn test_defensive_touchdown_triggers_pat_attempt() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let outcome = PlayOutcome::PassIncomplete {
            play_duration: 15,
            dropped: false,
            interception: true,
            interception_return_yards: 30,
            pick_six: true,
        };
        state.apply_play(&outcome);
        assert_eq!(state.possession(), Possession::Away);
        assert!(state.is_pat_attempt());
        assert_eq!(state.down(), 0);
        assert_eq!(state.ball_position(), 98);
    }

    #[test]
    fn test_made_field_goal_flips_possession_and_queues_kickoff() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let outcome = PlayOutcome::FieldGoal { made: true, blocked: false, distance: 40, play_duration: 6, return_yards: 0, return_touchdown: false };
        state.apply_play(&outcome);
        assert_eq!(state.possession(), Possession::Away);
        assert_eq!(state.down(), 0);
        assert_eq!(state.pending_kickoff(), Some(Possession::Home));
    }

    #[test]
    fn test_apply_kickoff_seeds_receiving_drive() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let fg = PlayOutcome::FieldGoal { made: true, blocked: false, distance: 40, play_duration: 6, return_yards: 0, return_touchdown: false };
        state.apply_play(&fg);
        let kickoff_outcome = PlayOutcome::Kickoff {
            return_yards: 12,
            play_duration: 10,
            touchback: false,
            touchback_type: Some(TouchbackType::Short),
            catch_spot: 8,
            out_of_bounds: false,
            fumble: false,
            return_touchdown: false,
        };
        state.apply_kickoff(&kickoff_outcome, Possession::Home);
        assert_eq!(state.possession(), Possession::Away);
        assert_eq!(state.ball_position(), 20);
        assert_eq!(state.down(), 1);
        assert!(state.pending_kickoff().is_none());
    }

    #[test]
    fn test_apply_punt_flips_field_position() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let punt = PlayOutcome::Punt {
            net_yards: 40,
            play_duration: 10,
            touchback: false,
            touchback_type: Some(TouchbackType::Short),
            catch_spot: 35,
            blocked: false,
            fair_catch: false,
            muffed: false,
            return_touchdown: false,
            blocked_return_touchdown: false,
        };
        state.apply_punt(&punt, Possession::Home);
        assert_eq!(state.possession(), Possession::Away);
        assert_eq!(state.ball_position(), 35);
        assert_eq!(state.down(), 1);
    }

    #[test]
    fn test_failed_two_point_return_touchdown_does_not_reopen_pat_attempt() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        state.kickoff_to_receiver(Possession::Home, 25);
        let two_point = PlayOutcome::TwoPoint { success: false, play_duration: 20, turnover_return_touchdown: true };
        state.apply_play(&two_point);
        assert!(!state.is_pat_attempt());
        assert_eq!(state.possession(), Possession::Away);
        assert_eq!(state.home_score(), 0);
        assert_eq!(state.away_score(), 2);
        assert_eq!(state.pending_kickoff(), Some(Possession::Home));
    }

    #[test]
    fn test_timeout_fails_softly_with_none_remaining() {
        let mut state = GameState::new(GameType::Regular, Weather::indoor(), Possession::Home);
        for _ in 0..5 {
            state.call_timeout(Possession::Home);
        }
        assert_eq!(state.home_timeouts(), 0);
    }

    #[test]
    fn test_overtime_requires_both_possessions_before_tie_ends_it() {
        let ot = OvertimeState::new(Possession::Home, CoinTossChoice::Receive);
        let (is_over, _) = ot.check_overtime_end(7, 7, true, GameType::Regular);
        assert!(!is_over);
    }
}
