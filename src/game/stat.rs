//! Per-player aggregated statistics, accumulated by the simulation driver
//! as it walks the event stream and used to compute `box_score` and MVP
//! selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// # `RushingStats` struct
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub struct RushingStats {
    rushes: u32,
    fumbles: u32,
    touchdowns: u32,
    yards: i32,
}

impl RushingStats {
    pub fn new() -> RushingStats {
        RushingStats::default()
    }

    pub fn rushes(&self) -> u32 {
        self.rushes
    }

    pub fn fumbles(&self) -> u32 {
        self.fumbles
    }

    pub fn touchdowns(&self) -> u32 {
        self.touchdowns
    }

    pub fn yards(&self) -> i32 {
        self.yards
    }

    pub fn record_rush(&mut self, yards: i32, touchdown: bool, fumble: bool) {
        self.rushes += 1;
        self.yards += yards;
        if touchdown {
            self.touchdowns += 1;
        }
        if fumble {
            self.fumbles += 1;
        }
    }

    /// Scoring-weighted contribution used by MVP selection: six points a
    /// rushing touchdown, one point per ten net yards.
    pub fn scoring_weight(&self) -> f64 {
        (self.touchdowns as f64 * 6.0) + (self.yards.max(0) as f64 / 10.0)
    }
}

impl fmt::Display for RushingStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} car, {} yds, {} TD, {} FUM", self.rushes, self.yards, self.touchdowns, self.fumbles)
    }
}

/// # `PassingStats` struct
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub struct PassingStats {
    attempts: u32,
    completions: u32,
    touchdowns: u32,
    interceptions: u32,
    sacks_taken: u32,
    yards: i32,
}

impl PassingStats {
    pub fn new() -> PassingStats {
        PassingStats::default()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn completions(&self) -> u32 {
        self.completions
    }

    pub fn touchdowns(&self) -> u32 {
        self.touchdowns
    }

    pub fn interceptions(&self) -> u32 {
        self.interceptions
    }

    pub fn sacks_taken(&self) -> u32 {
        self.sacks_taken
    }

    pub fn yards(&self) -> i32 {
        self.yards
    }

    pub fn record_attempt(&mut self, complete: bool, yards: i32, touchdown: bool, interception: bool) {
        self.attempts += 1;
        if complete {
            self.completions += 1;
        }
        self.yards += yards;
        if touchdown {
            self.touchdowns += 1;
        }
        if interception {
            self.interceptions += 1;
        }
    }

    pub fn record_sack(&mut self) {
        self.sacks_taken += 1;
    }

    /// Scoring-weighted contribution: six points a passing touchdown,
    /// one point per twenty net yards, minus one point per interception.
    pub fn scoring_weight(&self) -> f64 {
        (self.touchdowns as f64 * 6.0) + (self.yards.max(0) as f64 / 20.0) - (self.interceptions as f64)
    }
}

impl fmt::Display for PassingStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}, {} yds, {} TD, {} INT",
            self.completions, self.attempts, self.yards, self.touchdowns, self.interceptions
        )
    }
}

/// # `ReceivingStats` struct
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub struct ReceivingStats {
    targets: u32,
    receptions: u32,
    touchdowns: u32,
    fumbles: u32,
    yards: i32,
}

impl ReceivingStats {
    pub fn new() -> ReceivingStats {
        ReceivingStats::default()
    }

    pub fn targets(&self) -> u32 {
        self.targets
    }

    pub fn receptions(&self) -> u32 {
        self.receptions
    }

    pub fn touchdowns(&self) -> u32 {
        self.touchdowns
    }

    pub fn fumbles(&self) -> u32 {
        self.fumbles
    }

    pub fn yards(&self) -> i32 {
        self.yards
    }

    pub fn record_target(&mut self, caught: bool, yards: i32, touchdown: bool, fumble: bool) {
        self.targets += 1;
        if caught {
            self.receptions += 1;
            self.yards += yards;
        }
        if touchdown {
            self.touchdowns += 1;
        }
        if fumble {
            self.fumbles += 1;
        }
    }

    pub fn scoring_weight(&self) -> f64 {
        (self.touchdowns as f64 * 6.0) + (self.yards.max(0) as f64 / 10.0)
    }
}

impl fmt::Display for ReceivingStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} rec, {} yds, {} TD", self.receptions, self.yards, self.touchdowns)
    }
}

/// # `DefensiveStats` struct
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub struct DefensiveStats {
    tackles: u32,
    sacks: u32,
    interceptions: u32,
    fumble_recoveries: u32,
    defensive_touchdowns: u32,
}

impl DefensiveStats {
    pub fn new() -> DefensiveStats {
        DefensiveStats::default()
    }

    pub fn tackles(&self) -> u32 {
        self.tackles
    }

    pub fn sacks(&self) -> u32 {
        self.sacks
    }

    pub fn interceptions(&self) -> u32 {
        self.interceptions
    }

    pub fn fumble_recoveries(&self) -> u32 {
        self.fumble_recoveries
    }

    pub fn defensive_touchdowns(&self) -> u32 {
        self.defensive_touchdowns
    }

    pub fn record_tackle(&mut self) {
        self.tackles += 1;
    }

    pub fn record_sack(&mut self) {
        self.sacks += 1;
    }

    pub fn record_turnover(&mut self, interception: bool, touchdown: bool) {
        if interception {
            self.interceptions += 1;
        } else {
            self.fumble_recoveries += 1;
        }
        if touchdown {
            self.defensive_touchdowns += 1;
        }
    }

    /// Scoring-weighted contribution: six points a defensive touchdown,
    /// two per takeaway, half a point per sack.
    pub fn scoring_weight(&self) -> f64 {
        (self.defensive_touchdowns as f64 * 6.0)
            + ((self.interceptions + self.fumble_recoveries) as f64 * 2.0)
            + (self.sacks as f64 * 0.5)
    }
}

impl fmt::Display for DefensiveStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} tkl, {} sack, {} INT, {} FR",
            self.tackles, self.sacks, self.interceptions, self.fumble_recoveries
        )
    }
}

/// # `KickingStats` struct
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Serialize, Deserialize)]
pub struct KickingStats {
    field_goals_made: u32,
    field_goals_attempted: u32,
    extra_points_made: u32,
    extra_points_attempted: u32,
}

impl KickingStats {
    pub fn new() -> KickingStats {
        KickingStats::default()
    }

    pub fn field_goals_made(&self) -> u32 {
        self.field_goals_made
    }

    pub fn field_goals_attempted(&self) -> u32 {
        self.field_goals_attempted
    }

    pub fn extra_points_made(&self) -> u32 {
        self.extra_points_made
    }

    pub fn extra_points_attempted(&self) -> u32 {
        self.extra_points_attempted
    }

    pub fn record_field_goal(&mut self, made: bool) {
        self.field_goals_attempted += 1;
        if made {
            self.field_goals_made += 1;
        }
    }

    pub fn record_extra_point(&mut self, made: bool) {
        self.extra_points_attempted += 1;
        if made {
            self.extra_points_made += 1;
        }
    }

    pub fn scoring_weight(&self) -> f64 {
        (self.field_goals_made as f64 * 3.0) + (self.extra_points_made as f64 * 1.0)
    }
}

impl fmt::Display for KickingStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{} FG, {}/{} XP",
            self.field_goals_made, self.field_goals_attempted, self.extra_points_made, self.extra_points_attempted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rushing_scoring_weight() {
        let mut stats = RushingStats::new();
        stats.record_rush(10, false, false);
        stats.record_rush(5, true, false);
        assert_eq!(stats.touchdowns(), 1);
        assert!(stats.scoring_weight() > 6.0);
    }

    #[test]
    fn test_passing_interception_penalizes_weight() {
        let mut clean = PassingStats::new();
        clean.record_attempt(true, 20, false, false);
        let mut picked = PassingStats::new();
        picked.record_attempt(false, 0, false, true);
        assert!(clean.scoring_weight() > picked.scoring_weight());
    }

    #[test]
    fn test_defensive_touchdown_weight() {
        let mut stats = DefensiveStats::new();
        stats.record_turnover(true, true);
        assert_eq!(stats.scoring_weight(), 8.0);
    }
}
