// Blender: regress the adjusted line, anchor it to a scouting prior, and
// convert the result into a win value.

use tracing::debug;

use crate::level::Level;
use crate::projection::adjust::Adjustments;
use crate::projection::round_half_up;
use crate::record::RateLine;
use crate::tables::{AgingProfile, FvBenchmark, LevelTranslation};
use crate::tuning::{BlendTuning, WarTuning};

/// Result of blending the stats estimate with the prior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    /// Final OPS, clamped.
    pub ops: f64,
    /// Run-creation index (100 = league average), clamped.
    pub rci: i32,
    /// Share of the final OPS taken from the stats estimate when a prior was
    /// used; `None` when the stats-only path ran.
    pub stat_trust: Option<f64>,
}

// ---------------------------------------------------------------------------
// Reliability
// ---------------------------------------------------------------------------

/// Playing-time reliability: more PA and more advanced levels earn more trust.
pub fn reliability(weighted_pa: f64, translation: &LevelTranslation, mlb_reliability: f64, tuning: &BlendTuning) -> f64 {
    let volume = (weighted_pa.max(0.0) / tuning.full_reliability_pa).min(tuning.max_pa_reliability);
    let level_ratio = if mlb_reliability > 0.0 {
        translation.reliability / mlb_reliability
    } else {
        0.0
    };
    volume * level_ratio
}

/// Weight given to the stats estimate over the prior benchmark.
pub fn stat_trust(reliability: f64, tuning: &BlendTuning) -> f64 {
    (reliability * tuning.stat_trust_slope).min(tuning.stat_trust_cap)
}

// ---------------------------------------------------------------------------
// Blending
// ---------------------------------------------------------------------------

/// Blend the adjusted OPS into a final OPS and run-creation index.
///
/// The prior only anchors players who have not reached MLB; once a player is
/// in the majors the stats-only regression runs even when a grade exists.
pub fn blend(
    adjusted_ops: f64,
    reliability: f64,
    level: Level,
    translation: &LevelTranslation,
    prior: Option<&FvBenchmark>,
    tuning: &BlendTuning,
) -> Blend {
    let league = tuning.league_ops;

    let (ops, rci, trust) = match prior {
        Some(bench) if !level.is_mlb() => {
            let trust = stat_trust(reliability, tuning);
            let stats_weight = (reliability + tuning.prior_regression_bonus).min(tuning.prior_regression_cap);
            let league_weight = (1.0 - reliability - tuning.prior_regression_bonus).max(tuning.prior_regression_floor);
            let stats_ops = adjusted_ops * stats_weight + league * league_weight;
            let ops = stats_ops * trust + bench.ops * (1.0 - trust);
            let rci = round_half_up(ops / league * 100.0) as i32;
            (ops, rci, Some(trust))
        }
        _ => {
            let bonus = if level.is_mlb() { tuning.mlb_reliability_bonus } else { 0.0 };
            let rel = (reliability + bonus).min(tuning.regression_cap);
            let ops = adjusted_ops * rel + league * (1.0 - rel);
            let rci = round_half_up(ops / league * 100.0) as i32
                + round_half_up(translation.rci_offset * (1.0 - rel)) as i32;
            (ops, rci, None)
        }
    };

    let clamped_ops = ops.clamp(tuning.ops_min, tuning.ops_max);
    let clamped_rci = rci.clamp(tuning.rci_min, tuning.rci_max);
    if clamped_ops != ops || clamped_rci != rci {
        debug!(
            "blend clamped: ops {:.3} -> {:.3}, rci {} -> {}",
            ops, clamped_ops, rci, clamped_rci
        );
    }

    Blend {
        ops: clamped_ops,
        rci: clamped_rci,
        stat_trust: trust,
    }
}

/// OBP, SLG and AVG regressed toward league averages by `reliability`.
///
/// The batted-ball boost only feeds OPS; AVG also ignores the performance
/// boost. `ops` is carried through unchanged from the blend.
pub fn component_line(weighted: &RateLine, adjustments: &Adjustments, reliability: f64, ops: f64, tuning: &BlendTuning) -> RateLine {
    let boost = adjustments.age_boost * adjustments.performance_boost;
    let regress = |value: f64, league: f64| value * reliability + league * (1.0 - reliability);
    RateLine {
        obp: regress(weighted.obp * boost, tuning.league_obp).clamp(tuning.obp_min, tuning.obp_max),
        slg: regress(weighted.slg * boost, tuning.league_slg).clamp(tuning.slg_min, tuning.slg_max),
        ops,
        avg: regress(weighted.avg * adjustments.age_boost, tuning.league_avg).clamp(tuning.avg_min, tuning.avg_max),
    }
}

// ---------------------------------------------------------------------------
// Workload and win value
// ---------------------------------------------------------------------------

/// Expected plate appearances next season.
pub fn estimated_pa(weighted_pa: f64, level: Level, tuning: &WarTuning) -> f64 {
    let pa = weighted_pa.max(0.0);
    if level.is_mlb() {
        (pa * tuning.mlb_pa_share).min(tuning.mlb_pa_cap)
    } else {
        (pa * tuning.minors_pa_share).min(tuning.minors_pa_cap)
    }
}

/// Wins above replacement from the run-creation index and workload.
///
/// With a prior, the result is held inside the tier's plausible band.
pub fn win_value(rci: i32, est_pa: f64, profile: &AgingProfile, prior: Option<&FvBenchmark>, tuning: &WarTuning) -> f64 {
    let season_share = est_pa / tuning.full_season_pa;
    let batting_runs = (rci as f64 - 100.0) / 100.0 * est_pa * tuning.runs_per_pa;
    let positional_runs = profile.positional_runs * season_share;
    let replacement_runs = tuning.replacement_runs * season_share;
    let war = (batting_runs + positional_runs + replacement_runs) / tuning.runs_per_win;

    match prior {
        Some(bench) => war.clamp(bench.war * tuning.prior_floor, bench.war * tuning.prior_ceiling),
        None => war,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
