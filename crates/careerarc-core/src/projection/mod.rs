// Projection engine: normalize, weight, adjust, blend, then age forward.

pub mod adjust;
pub mod blend;
pub mod forward;
pub mod normalize;
pub mod recency;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::level::Level;
use crate::position::Position;
use crate::record::{BattedBallProfile, FutureValue, SeasonRecord};
use crate::tables::ReferenceTables;
use crate::tuning::Tuning;

pub use forward::{AgingCurvePoint, RatePoint, TrajectoryPoint};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Everything the engine needs to know about one hitter.
#[derive(Debug, Clone, Copy)]
pub struct HitterInput<'a> {
    pub records: &'a [SeasonRecord],
    pub age: u32,
    /// Primary position; `None` when the upstream code is not a known
    /// hitting position.
    pub position: Option<Position>,
    pub future_value: Option<FutureValue>,
    pub batted_ball: Option<BattedBallProfile>,
}

/// Current-talent projection for one hitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub ops: f64,
    pub obp: f64,
    pub slg: f64,
    pub avg: f64,
    /// Run-creation index, 100 = league average.
    pub rci: i32,
    pub war: f64,
    pub est_pa: u32,
    pub hr: u32,
    /// Playing-time reliability as a whole percentage.
    pub reliability_pct: u32,
    pub highest_level: Level,
    /// Years younger than average at the highest level reached.
    pub age_for_level: f64,
    pub future_value: Option<FutureValue>,
}

/// Round half away from negative infinity, e.g. 2.5 -> 3 and -2.5 -> -2.
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The projection engine. Cheap to clone; tables and tuning are shared.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    tables: Arc<ReferenceTables>,
    tuning: Arc<Tuning>,
    season: i32,
}

impl ProjectionEngine {
    /// `season` is the last completed season, used as "now" when working out
    /// how old a player was in each record.
    pub fn new(tables: Arc<ReferenceTables>, tuning: Arc<Tuning>, season: i32) -> Self {
        ProjectionEngine {
            tables,
            tuning,
            season,
        }
    }

    /// Engine with the standard tables and default tuning.
    pub fn standard(season: i32) -> Self {
        Self::new(Arc::new(ReferenceTables::standard()), Arc::new(Tuning::default()), season)
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Project current talent. `None` means there is not enough data: no
    /// record cleared the plate-appearance floor.
    pub fn project(&self, input: &HitterInput<'_>) -> Option<Projection> {
        let Some(weighted) =
            recency::weight_seasons(input.records, input.age, self.season, &self.tables, &self.tuning.recency)
        else {
            debug!(
                "no projection: none of {} records reach {} PA",
                input.records.len(),
                self.tuning.recency.min_pa
            );
            return None;
        };

        let level = weighted.highest_level;
        let translation = self.tables.translation(level);
        let adjustments = adjust::compute(&weighted, input.batted_ball.as_ref(), &self.tables, &self.tuning);
        let adjusted_ops = weighted.rates.ops * adjustments.combined();

        let reliability = blend::reliability(weighted.pa, translation, self.tables.mlb_reliability(), &self.tuning.blend);
        let benchmark = input.future_value.map(|fv| self.tables.benchmark(fv));
        let blended = blend::blend(adjusted_ops, reliability, level, translation, benchmark, &self.tuning.blend);

        let profile = self.tables.aging_profile(input.position);
        let est_pa = blend::estimated_pa(weighted.pa, level, &self.tuning.war);
        let war = blend::win_value(blended.rci, est_pa, profile, benchmark, &self.tuning.war);
        let line = blend::component_line(&weighted.rates, &adjustments, reliability, blended.ops, &self.tuning.blend);
        let hr = weighted.hr * (est_pa / weighted.pa.max(1.0)) * adjustments.age_boost;

        Some(Projection {
            ops: line.ops,
            obp: line.obp,
            slg: line.slg,
            avg: line.avg,
            rci: blended.rci,
            war,
            est_pa: round_half_up(est_pa) as u32,
            hr: round_half_up(hr).max(0.0) as u32,
            reliability_pct: round_half_up(reliability * 100.0) as u32,
            highest_level: level,
            age_for_level: adjustments.age_advantage,
            future_value: input.future_value,
        })
    }

    /// Year-by-year trajectory from a projection.
    pub fn project_forward(&self, projection: &Projection, age: u32, position: Option<Position>) -> Vec<TrajectoryPoint> {
        let profile = self.tables.aging_profile(position);
        forward::project_forward(projection, age, profile, self.season, &self.tuning.aging)
    }

    /// Short OPS-only trajectory including the batted-ball boost.
    pub fn project_rate_trajectory(
        &self,
        projection: &Projection,
        age: u32,
        position: Option<Position>,
        batted_ball: Option<&BattedBallProfile>,
    ) -> Vec<RatePoint> {
        let profile = self.tables.aging_profile(position);
        let boost = adjust::batted_ball_boost(batted_ball, &self.tuning.batted_ball);
        forward::project_rate_trajectory(projection, age, profile, boost, self.season, &self.tuning.aging)
    }

    /// Aging curve for a position between ages 20 and 40.
    pub fn aging_curve(&self, position: Option<Position>, baseline_war: f64) -> Vec<AgingCurvePoint> {
        forward::aging_curve(self.tables.aging_profile(position), baseline_war, 20..=40)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
