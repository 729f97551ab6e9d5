// Static reference tables: level translation, positional aging, FV benchmarks.
//
// Built once at startup (optionally patched from config), validated, and then
// shared read-only with the engine.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::level::Level;
use crate::position::Position;
use crate::record::FutureValue;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TableError {
    #[error("level table is missing the MLB entry")]
    MissingMlb,

    #[error("invalid entry for level {level}: {message}")]
    InvalidLevel { level: Level, message: String },

    #[error("translation factors must strictly increase with level: {lower} ({lower_factor}) >= {upper} ({upper_factor})")]
    NonIncreasingFactors {
        lower: Level,
        lower_factor: f64,
        upper: Level,
        upper_factor: f64,
    },

    #[error("invalid aging profile for {position}: {message}")]
    InvalidAging { position: String, message: String },

    #[error("future-value benchmark table is missing the FV {0} fallback tier")]
    MissingBenchmarkFallback(u8),
}

// ---------------------------------------------------------------------------
// Table entry types
// ---------------------------------------------------------------------------

/// How stats at one level translate to MLB-equivalent terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelTranslation {
    /// Multiplier on rate stats, in (0, 1].
    pub factor: f64,
    /// How much playing time at this level counts toward confidence, in [0, 1].
    pub reliability: f64,
    /// Run-creation-index offset applied in proportion to the unreliable share.
    pub rci_offset: f64,
}

/// Position-specific aging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgingProfile {
    pub peak: u32,
    /// Fractional performance lost per year past peak.
    pub decline_rate: f64,
    /// Positional adjustment in runs per 600 PA.
    pub positional_runs: f64,
    pub defensive_decline_rate: f64,
}

/// Expected peak outcome for a future-value tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FvBenchmark {
    pub ops: f64,
    pub war: f64,
    pub rci: f64,
    pub floor_ops: f64,
    pub ceiling_ops: f64,
}

/// Lowest tier with a benchmark line; lower grades borrow it.
pub const BENCHMARK_MIN_GRADE: u8 = 40;
/// Highest tier with a benchmark line.
pub const BENCHMARK_MAX_GRADE: u8 = 65;
/// Tier used when a grade falls between the 5-point steps.
pub const BENCHMARK_FALLBACK_GRADE: u8 = 50;

const IDENTITY_TRANSLATION: LevelTranslation = LevelTranslation {
    factor: 1.0,
    reliability: 0.80,
    rci_offset: 0.0,
};

const FALLBACK_BENCHMARK: FvBenchmark = FvBenchmark {
    ops: 0.740,
    war: 1.8,
    rci: 105.0,
    floor_ops: 0.660,
    ceiling_ops: 0.820,
};

// ---------------------------------------------------------------------------
// ReferenceTables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReferenceTables {
    levels: HashMap<Level, LevelTranslation>,
    avg_age_at_level: HashMap<Level, f64>,
    aging: HashMap<Position, AgingProfile>,
    default_aging: AgingProfile,
    benchmarks: BTreeMap<u8, FvBenchmark>,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReferenceTables {
    /// The calibrated tables.
    pub fn standard() -> Self {
        let levels = HashMap::from([
            (Level::Rookie, translation(0.40, 0.15, -35.0)),
            (Level::SingleA, translation(0.50, 0.25, -25.0)),
            (Level::HighA, translation(0.58, 0.35, -18.0)),
            (Level::DoubleA, translation(0.68, 0.50, -10.0)),
            (Level::TripleA, translation(0.82, 0.62, -4.0)),
            (Level::Mlb, translation(1.00, 0.80, 0.0)),
        ]);

        let avg_age_at_level = HashMap::from([
            (Level::Rookie, 19.0),
            (Level::SingleA, 21.0),
            (Level::HighA, 22.0),
            (Level::DoubleA, 23.0),
            (Level::TripleA, 24.5),
            (Level::Mlb, 26.0),
        ]);

        let profiles = HashMap::from([
            (Position::Catcher, aging(27, 0.042, -12.5, 0.06)),
            (Position::FirstBase, aging(28, 0.032, -12.5, 0.02)),
            (Position::SecondBase, aging(27, 0.038, 2.5, 0.05)),
            (Position::ThirdBase, aging(27, 0.035, 2.5, 0.04)),
            (Position::ShortStop, aging(26, 0.040, 7.5, 0.055)),
            (Position::LeftField, aging(28, 0.033, -7.5, 0.035)),
            (Position::CenterField, aging(27, 0.037, 2.5, 0.05)),
            (Position::RightField, aging(28, 0.034, -7.5, 0.04)),
            (Position::DesignatedHitter, aging(29, 0.030, -17.5, 0.0)),
        ]);

        let benchmarks = BTreeMap::from([
            (65, benchmark(0.870, 5.0, 135.0, 0.780, 0.950)),
            (60, benchmark(0.820, 3.5, 125.0, 0.720, 0.900)),
            (55, benchmark(0.780, 2.5, 115.0, 0.690, 0.860)),
            (50, FALLBACK_BENCHMARK),
            (45, benchmark(0.710, 1.0, 98.0, 0.640, 0.780)),
            (40, benchmark(0.680, 0.5, 90.0, 0.620, 0.750)),
        ]);

        ReferenceTables {
            levels,
            avg_age_at_level,
            aging: profiles,
            default_aging: aging(28, 0.035, 0.0, 0.03),
            benchmarks,
        }
    }

    // -- Lookups --

    /// Translation entry for `level`, falling back to MLB (no discount) when
    /// the table has no entry.
    pub fn translation(&self, level: Level) -> &LevelTranslation {
        if let Some(t) = self.levels.get(&level) {
            return t;
        }
        warn!("no translation entry for level {}, treating as MLB", level);
        self.levels.get(&Level::Mlb).unwrap_or(&IDENTITY_TRANSLATION)
    }

    /// Reliability of MLB playing time; the denominator of every level's
    /// reliability ratio.
    pub fn mlb_reliability(&self) -> f64 {
        self.translation(Level::Mlb).reliability
    }

    pub fn avg_age_at_level(&self, level: Level) -> Option<f64> {
        self.avg_age_at_level.get(&level).copied()
    }

    /// Aging profile for a position; unknown positions get the league default.
    pub fn aging_profile(&self, position: Option<Position>) -> &AgingProfile {
        match position {
            Some(pos) => self.aging.get(&pos).unwrap_or_else(|| {
                debug!("no aging profile for {}, using default", pos);
                &self.default_aging
            }),
            None => &self.default_aging,
        }
    }

    pub fn default_aging_profile(&self) -> &AgingProfile {
        &self.default_aging
    }

    /// Outcome benchmark for a future-value grade.
    ///
    /// Grades are clamped into [40, 65]; grades that miss the 5-point scale
    /// use the FV 50 tier.
    pub fn benchmark(&self, fv: FutureValue) -> &FvBenchmark {
        let grade = fv.grade().clamp(BENCHMARK_MIN_GRADE, BENCHMARK_MAX_GRADE);
        if let Some(b) = self.benchmarks.get(&grade) {
            return b;
        }
        debug!("no benchmark tier for FV {}, using FV {}", grade, BENCHMARK_FALLBACK_GRADE);
        self.benchmarks
            .get(&BENCHMARK_FALLBACK_GRADE)
            .unwrap_or(&FALLBACK_BENCHMARK)
    }

    // -- Overrides --

    pub fn set_translation(&mut self, level: Level, entry: LevelTranslation) {
        self.levels.insert(level, entry);
    }

    pub fn remove_translation(&mut self, level: Level) -> Option<LevelTranslation> {
        self.levels.remove(&level)
    }

    pub fn set_aging_profile(&mut self, position: Position, profile: AgingProfile) {
        self.aging.insert(position, profile);
    }

    pub fn set_default_aging_profile(&mut self, profile: AgingProfile) {
        self.default_aging = profile;
    }

    // -- Validation --

    /// Check the table invariants. Run after applying config overrides.
    pub fn validate(&self) -> Result<(), TableError> {
        let mlb = self.levels.get(&Level::Mlb).ok_or(TableError::MissingMlb)?;
        if mlb.factor != 1.0 || mlb.rci_offset != 0.0 {
            return Err(TableError::InvalidLevel {
                level: Level::Mlb,
                message: format!(
                    "MLB must have factor 1.0 and offset 0, got factor {} and offset {}",
                    mlb.factor, mlb.rci_offset
                ),
            });
        }
        if mlb.reliability <= 0.0 {
            return Err(TableError::InvalidLevel {
                level: Level::Mlb,
                message: format!("MLB reliability must be > 0, got {}", mlb.reliability),
            });
        }

        let mut previous: Option<(Level, f64)> = None;
        for level in Level::ALL {
            let Some(entry) = self.levels.get(&level) else {
                continue;
            };
            if !(entry.factor > 0.0 && entry.factor <= 1.0) {
                return Err(TableError::InvalidLevel {
                    level,
                    message: format!("factor must be in (0, 1], got {}", entry.factor),
                });
            }
            if !(0.0..=1.0).contains(&entry.reliability) {
                return Err(TableError::InvalidLevel {
                    level,
                    message: format!("reliability must be in [0, 1], got {}", entry.reliability),
                });
            }
            if let Some((lower, lower_factor)) = previous {
                if lower_factor >= entry.factor {
                    return Err(TableError::NonIncreasingFactors {
                        lower,
                        lower_factor,
                        upper: level,
                        upper_factor: entry.factor,
                    });
                }
            }
            previous = Some((level, entry.factor));
        }

        let profiles = self
            .aging
            .iter()
            .map(|(pos, p)| (pos.to_string(), p))
            .chain(std::iter::once(("default".to_string(), &self.default_aging)));
        for (position, profile) in profiles {
            if profile.peak == 0 {
                return Err(TableError::InvalidAging {
                    position,
                    message: "peak age must be > 0".into(),
                });
            }
            if profile.decline_rate < 0.0 || profile.defensive_decline_rate < 0.0 {
                return Err(TableError::InvalidAging {
                    position,
                    message: "decline rates must be >= 0".into(),
                });
            }
        }

        if !self.benchmarks.contains_key(&BENCHMARK_FALLBACK_GRADE) {
            return Err(TableError::MissingBenchmarkFallback(BENCHMARK_FALLBACK_GRADE));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn translation(factor: f64, reliability: f64, rci_offset: f64) -> LevelTranslation {
    LevelTranslation {
        factor,
        reliability,
        rci_offset,
    }
}

fn aging(peak: u32, decline_rate: f64, positional_runs: f64, defensive_decline_rate: f64) -> AgingProfile {
    AgingProfile {
        peak,
        decline_rate,
        positional_runs,
        defensive_decline_rate,
    }
}

fn benchmark(ops: f64, war: f64, rci: f64, floor_ops: f64, ceiling_ops: f64) -> FvBenchmark {
    FvBenchmark {
        ops,
        war,
        rci,
        floor_ops,
        ceiling_ops,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
