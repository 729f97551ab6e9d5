// Adjustment stack: multiplicative corrections applied before blending.

use crate::level::Level;
use crate::projection::recency::WeightedLine;
use crate::record::BattedBallProfile;
use crate::tables::{LevelTranslation, ReferenceTables};
use crate::tuning::{AgeBoostTuning, BattedBallTuning, PerformanceTuning, Tuning};

/// The three boosts, each already clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustments {
    /// Years younger than the average player at the highest level reached.
    /// Negative when older.
    pub age_advantage: f64,
    pub age_boost: f64,
    pub performance_boost: f64,
    pub batted_ball_boost: f64,
}

impl Adjustments {
    /// Product of all three boosts.
    pub fn combined(&self) -> f64 {
        self.age_boost * self.performance_boost * self.batted_ball_boost
    }
}

/// Compute every adjustment for a weighted line.
pub fn compute(
    weighted: &WeightedLine,
    batted_ball: Option<&BattedBallProfile>,
    tables: &ReferenceTables,
    tuning: &Tuning,
) -> Adjustments {
    let level = weighted.highest_level;
    let age_advantage = age_advantage(level, weighted.age_at_highest as f64, tables, &tuning.age_boost);
    Adjustments {
        age_advantage,
        age_boost: 1.0 + age_for_level_delta(age_advantage, &tuning.age_boost),
        performance_boost: performance_boost(
            weighted.rates.ops,
            level,
            tables.translation(level),
            &tuning.performance,
        ),
        batted_ball_boost: batted_ball_boost(batted_ball, &tuning.batted_ball),
    }
}

// ---------------------------------------------------------------------------
// Age for level
// ---------------------------------------------------------------------------

/// Average age at `level` minus the player's age there.
pub fn age_advantage(level: Level, age_at_level: f64, tables: &ReferenceTables, tuning: &AgeBoostTuning) -> f64 {
    let avg_age = tables.avg_age_at_level(level).unwrap_or(tuning.fallback_avg_age);
    avg_age - age_at_level
}

/// Fractional boost for being young at a level, clamped to [min, max].
pub fn age_for_level_delta(age_advantage: f64, tuning: &AgeBoostTuning) -> f64 {
    (age_advantage * tuning.per_year).clamp(tuning.min, tuning.max)
}

// ---------------------------------------------------------------------------
// Performance tier
// ---------------------------------------------------------------------------

/// Boost for dominant performers, so they are regressed less.
///
/// `translated_ops` is the weighted MLB-equivalent OPS; it is un-translated
/// with the highest level's factor before comparing to the elite threshold.
pub fn performance_boost(
    translated_ops: f64,
    level: Level,
    translation: &LevelTranslation,
    tuning: &PerformanceTuning,
) -> f64 {
    let factor = if translation.factor > 0.0 { translation.factor } else { 1.0 };
    let raw_ops = translated_ops / factor;
    let threshold = if level.is_mlb() {
        tuning.elite_ops_mlb
    } else {
        tuning.elite_ops_minors
    };
    if raw_ops > threshold {
        1.0 + ((raw_ops - threshold) * tuning.slope).min(tuning.max_boost)
    } else {
        1.0
    }
}

// ---------------------------------------------------------------------------
// Batted-ball quality
// ---------------------------------------------------------------------------

/// Quality-of-contact boost. No profile means no adjustment.
pub fn batted_ball_boost(profile: Option<&BattedBallProfile>, tuning: &BattedBallTuning) -> f64 {
    let Some(bb) = profile else {
        return 1.0;
    };
    let ev = ((bb.avg_ev - tuning.avg_ev_baseline) / tuning.avg_ev_scale).max(0.0);
    let max = ((bb.max_ev - tuning.max_ev_baseline) / tuning.max_ev_scale).max(0.0);
    let barrel = ((bb.barrel_pct - tuning.barrel_baseline) / tuning.barrel_scale).max(0.0);
    1.0 + ev * tuning.avg_ev_weight + max * tuning.max_ev_weight + barrel * tuning.barrel_weight
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
