// Input records handed to the engine by the data collaborator.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::level::Level;

// ---------------------------------------------------------------------------
// Rate line
// ---------------------------------------------------------------------------

/// The rate-stat bundle carried by a season and by projections.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateLine {
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
    pub avg: f64,
}

impl RateLine {
    /// Multiply every rate by `factor`.
    pub fn scaled(&self, factor: f64) -> RateLine {
        RateLine {
            obp: self.obp * factor,
            slg: self.slg * factor,
            ops: self.ops * factor,
            avg: self.avg * factor,
        }
    }
}

// ---------------------------------------------------------------------------
// Season record
// ---------------------------------------------------------------------------

/// One player-season at one competition level.
///
/// A player who moved between levels mid-season has one record per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub season: i32,
    pub level: Level,
    pub pa: u32,
    pub hr: u32,
    pub sb: u32,
    pub rates: RateLine,
}

// ---------------------------------------------------------------------------
// Optional per-player priors
// ---------------------------------------------------------------------------

/// Lowest grade on the future-value scale.
pub const FV_MIN: i32 = 35;
/// Highest grade on the future-value scale.
pub const FV_MAX: i32 = 65;

/// A scouting future-value grade, always within [35, 65].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct FutureValue(u8);

impl FutureValue {
    /// Build a grade, clamping out-of-scale values to the nearest bound.
    pub fn new(grade: i32) -> Self {
        let clamped = grade.clamp(FV_MIN, FV_MAX);
        if clamped != grade {
            warn!("future value grade {} outside [{}, {}], clamped to {}", grade, FV_MIN, FV_MAX, clamped);
        }
        FutureValue(clamped as u8)
    }

    pub fn grade(&self) -> u8 {
        self.0
    }
}

impl From<i32> for FutureValue {
    fn from(grade: i32) -> Self {
        FutureValue::new(grade)
    }
}

impl From<FutureValue> for i32 {
    fn from(fv: FutureValue) -> Self {
        i32::from(fv.0)
    }
}

/// Batted-ball quality measurements for a hitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattedBallProfile {
    /// Average exit velocity, mph.
    pub avg_ev: f64,
    /// Maximum exit velocity, mph.
    pub max_ev: f64,
    /// Barrels per batted-ball event, percent.
    pub barrel_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_value_in_range_is_kept() {
        assert_eq!(FutureValue::new(55).grade(), 55);
        assert_eq!(FutureValue::new(35).grade(), 35);
        assert_eq!(FutureValue::new(65).grade(), 65);
    }

    #[test]
    fn future_value_out_of_range_is_clamped() {
        assert_eq!(FutureValue::new(80).grade(), 65);
        assert_eq!(FutureValue::new(20).grade(), 35);
        assert_eq!(FutureValue::new(-5).grade(), 35);
    }

    #[test]
    fn deserialized_future_value_is_clamped() {
        let fv: FutureValue = serde_json::from_str("99").unwrap();
        assert_eq!(fv.grade(), 65);
        let fv: FutureValue = serde_json::from_str("10").unwrap();
        assert_eq!(fv.grade(), 35);
        assert_eq!(serde_json::to_string(&FutureValue::new(55)).unwrap(), "55");
    }

    #[test]
    fn scaled_touches_every_rate() {
        let line = RateLine {
            obp: 0.400,
            slg: 0.500,
            ops: 0.900,
            avg: 0.300,
        };
        let half = line.scaled(0.5);
        assert!((half.obp - 0.200).abs() < 1e-12);
        assert!((half.slg - 0.250).abs() < 1e-12);
        assert!((half.ops - 0.450).abs() < 1e-12);
        assert!((half.avg - 0.150).abs() < 1e-12);
    }
}
