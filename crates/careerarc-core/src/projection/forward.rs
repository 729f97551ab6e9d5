// Forward projector: age a current-talent projection across future seasons.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::projection::{round_half_up, Projection};
use crate::tables::AgingProfile;
use crate::tuning::AgingTuning;

/// One projected future season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub age: u32,
    pub season: i32,
    pub war: f64,
    pub rci: i32,
    pub ops: f64,
}

/// One point of the short-horizon OPS trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatePoint {
    pub age: u32,
    pub season: i32,
    pub ops: f64,
}

/// One point of a positional aging curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgingCurvePoint {
    pub age: u32,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Age factor
// ---------------------------------------------------------------------------

/// Multiplier on current talent at `age`.
///
/// Pre-peak players grow toward their peak, discounted for development risk
/// the further out they are. Past peak, talent decays linearly at the
/// position's decline rate down to a floor.
pub fn age_factor(age: u32, profile: &AgingProfile, tuning: &AgingTuning) -> f64 {
    if age <= profile.peak {
        let years_to_go = (profile.peak - age) as f64;
        let growth = 1.0 + (years_to_go * tuning.growth_per_year).min(tuning.growth_cap);
        let discounted = growth * (1.0 - years_to_go * tuning.uncertainty_per_year);
        discounted.clamp(tuning.pre_peak_min, tuning.pre_peak_max)
    } else {
        let past = (age - profile.peak) as f64;
        (1.0 - profile.decline_rate * past).max(tuning.post_peak_floor)
    }
}

/// Apply an age factor to a win value.
///
/// A factor below 1 always lowers the value: a negative WAR gets more
/// negative instead of shrinking toward zero.
fn aged_war(war: f64, factor: f64) -> f64 {
    if war >= 0.0 {
        war * factor
    } else {
        war * (2.0 - factor)
    }
}

// ---------------------------------------------------------------------------
// Trajectories
// ---------------------------------------------------------------------------

/// Year-by-year trajectory starting with the coming season.
///
/// `season` is the last completed season; the first point is `season + 1` at
/// the player's current age. Stops after `tuning.horizon` seasons or once
/// the player would be older than `tuning.max_age`.
pub fn project_forward(
    projection: &Projection,
    age: u32,
    profile: &AgingProfile,
    season: i32,
    tuning: &AgingTuning,
) -> Vec<TrajectoryPoint> {
    (0..tuning.horizon)
        .map(|offset| (offset, age.saturating_add(offset)))
        .take_while(|&(_, a)| a <= tuning.max_age)
        .map(|(offset, a)| {
            let f = age_factor(a, profile, tuning);
            let rci = round_half_up(100.0 + (projection.rci as f64 - 100.0) * f) as i32;
            TrajectoryPoint {
                age: a,
                season: season + 1 + offset as i32,
                war: aged_war(projection.war, f).max(tuning.war_floor),
                rci: rci.max(tuning.rci_floor),
                ops: (projection.ops * (0.5 + 0.5 * f)).max(tuning.ops_floor),
            }
        })
        .collect()
}

/// Lighter OPS-only trajectory over the next few seasons.
///
/// Same aging formula, plus the batted-ball boost; no prior blending and no
/// age cap.
pub fn project_rate_trajectory(
    projection: &Projection,
    age: u32,
    profile: &AgingProfile,
    batted_ball_boost: f64,
    season: i32,
    tuning: &AgingTuning,
) -> Vec<RatePoint> {
    (0..tuning.rate_horizon)
        .map(|offset| {
            let a = age.saturating_add(offset);
            let f = age_factor(a, profile, tuning);
            RatePoint {
                age: a,
                season: season + 1 + offset as i32,
                ops: (projection.ops * (0.5 + 0.5 * f) * batted_ball_boost).max(tuning.ops_floor),
            }
        })
        .collect()
}

/// Positional aging curve for a baseline WAR over `ages`.
///
/// Offense follows a quadratic curve around peak; defense declines linearly
/// after peak and scales the positional credit.
pub fn aging_curve(profile: &AgingProfile, baseline_war: f64, ages: RangeInclusive<u32>) -> Vec<AgingCurvePoint> {
    ages.map(|age| {
        let d = age as f64 - profile.peak as f64;
        let offense = if d <= 0.0 {
            1.0 - 0.015 * d * d * 0.3
        } else {
            1.0 - profile.decline_rate * d * d * 0.25
        };
        let defense = if age <= profile.peak {
            1.0
        } else {
            1.0 - profile.defensive_decline_rate * d
        };
        let value = baseline_war * offense * defense.max(0.4) + profile.positional_runs / 10.0 * defense.max(0.3);
        AgingCurvePoint {
            age,
            value: value.max(-0.5),
        }
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
