// Hand-calibrated engine constants.
//
// Defaults reproduce the calibrated model exactly. Every section deserializes
// with `#[serde(default)]`, so a config file only needs the fields it changes.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub recency: RecencyTuning,
    pub age_boost: AgeBoostTuning,
    pub performance: PerformanceTuning,
    pub batted_ball: BattedBallTuning,
    pub blend: BlendTuning,
    pub war: WarTuning,
    pub aging: AgingTuning,
}

/// Season selection and recency weights.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecencyTuning {
    /// Records below this many plate appearances carry no signal.
    pub min_pa: u32,
    pub max_seasons: usize,
    /// Weights for the most recent, second, third... kept record.
    pub weights: Vec<f64>,
    /// Weight for any kept record past the end of `weights`.
    pub overflow_weight: f64,
}

impl Default for RecencyTuning {
    fn default() -> Self {
        RecencyTuning {
            min_pa: 30,
            max_seasons: 3,
            weights: vec![5.0, 4.0, 3.0],
            overflow_weight: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgeBoostTuning {
    pub per_year: f64,
    pub min: f64,
    pub max: f64,
    /// Average age assumed for a level missing from the age table.
    pub fallback_avg_age: f64,
}

impl Default for AgeBoostTuning {
    fn default() -> Self {
        AgeBoostTuning {
            per_year: 0.08,
            min: -0.10,
            max: 0.25,
            fallback_avg_age: 23.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PerformanceTuning {
    pub elite_ops_mlb: f64,
    pub elite_ops_minors: f64,
    pub slope: f64,
    pub max_boost: f64,
}

impl Default for PerformanceTuning {
    fn default() -> Self {
        PerformanceTuning {
            elite_ops_mlb: 0.800,
            elite_ops_minors: 0.850,
            slope: 0.8,
            max_boost: 0.15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BattedBallTuning {
    pub avg_ev_baseline: f64,
    pub avg_ev_scale: f64,
    pub avg_ev_weight: f64,
    pub max_ev_baseline: f64,
    pub max_ev_scale: f64,
    pub max_ev_weight: f64,
    pub barrel_baseline: f64,
    pub barrel_scale: f64,
    pub barrel_weight: f64,
}

impl Default for BattedBallTuning {
    fn default() -> Self {
        BattedBallTuning {
            avg_ev_baseline: 86.0,
            avg_ev_scale: 8.0,
            avg_ev_weight: 0.04,
            max_ev_baseline: 104.0,
            max_ev_scale: 8.0,
            max_ev_weight: 0.03,
            barrel_baseline: 6.0,
            barrel_scale: 10.0,
            barrel_weight: 0.05,
        }
    }
}

/// Reliability, prior blending, regression targets and output clamps.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlendTuning {
    pub league_ops: f64,
    pub league_obp: f64,
    pub league_slg: f64,
    pub league_avg: f64,
    /// Weighted PA at which playing time stops adding reliability.
    pub full_reliability_pa: f64,
    pub max_pa_reliability: f64,
    pub stat_trust_cap: f64,
    pub stat_trust_slope: f64,
    pub prior_regression_bonus: f64,
    pub prior_regression_cap: f64,
    pub prior_regression_floor: f64,
    pub mlb_reliability_bonus: f64,
    pub regression_cap: f64,
    pub ops_min: f64,
    pub ops_max: f64,
    pub rci_min: i32,
    pub rci_max: i32,
    pub obp_min: f64,
    pub obp_max: f64,
    pub slg_min: f64,
    pub slg_max: f64,
    pub avg_min: f64,
    pub avg_max: f64,
}

impl Default for BlendTuning {
    fn default() -> Self {
        BlendTuning {
            league_ops: 0.720,
            league_obp: 0.315,
            league_slg: 0.405,
            league_avg: 0.248,
            full_reliability_pa: 700.0,
            max_pa_reliability: 0.85,
            stat_trust_cap: 0.6,
            stat_trust_slope: 0.8,
            prior_regression_bonus: 0.15,
            prior_regression_cap: 0.9,
            prior_regression_floor: 0.1,
            mlb_reliability_bonus: 0.05,
            regression_cap: 0.90,
            ops_min: 0.580,
            ops_max: 1.050,
            rci_min: 70,
            rci_max: 170,
            obp_min: 0.280,
            obp_max: 0.420,
            slg_min: 0.320,
            slg_max: 0.580,
            avg_min: 0.220,
            avg_max: 0.320,
        }
    }
}

/// Workload and win-value conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WarTuning {
    pub mlb_pa_cap: f64,
    pub mlb_pa_share: f64,
    pub minors_pa_cap: f64,
    pub minors_pa_share: f64,
    pub runs_per_pa: f64,
    pub replacement_runs: f64,
    pub full_season_pa: f64,
    pub runs_per_win: f64,
    pub prior_floor: f64,
    pub prior_ceiling: f64,
}

impl Default for WarTuning {
    fn default() -> Self {
        WarTuning {
            mlb_pa_cap: 680.0,
            mlb_pa_share: 0.95,
            minors_pa_cap: 620.0,
            minors_pa_share: 0.90,
            runs_per_pa: 0.12,
            replacement_runs: 20.0,
            full_season_pa: 600.0,
            runs_per_win: 10.0,
            prior_floor: 0.3,
            prior_ceiling: 1.3,
        }
    }
}

/// Aging curve and forward-projection horizon.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgingTuning {
    pub horizon: u32,
    pub rate_horizon: u32,
    pub max_age: u32,
    pub growth_per_year: f64,
    pub growth_cap: f64,
    pub uncertainty_per_year: f64,
    pub pre_peak_min: f64,
    pub pre_peak_max: f64,
    pub post_peak_floor: f64,
    pub war_floor: f64,
    pub rci_floor: i32,
    pub ops_floor: f64,
}

impl Default for AgingTuning {
    fn default() -> Self {
        AgingTuning {
            horizon: 10,
            rate_horizon: 3,
            max_age: 42,
            growth_per_year: 0.025,
            growth_cap: 0.15,
            uncertainty_per_year: 0.015,
            pre_peak_min: 0.85,
            pre_peak_max: 1.15,
            post_peak_floor: 0.25,
            war_floor: -1.0,
            rci_floor: 60,
            ops_floor: 0.500,
        }
    }
}
