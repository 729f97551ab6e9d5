// Recency weighter: collapse recent seasons into one aggregate line.
//
// Marcel-style: the newest qualifying seasons count most, every season is
// translated to MLB terms before it is averaged, and counting volume (PA, HR)
// is averaged raw.

use crate::level::Level;
use crate::projection::normalize::translate_record;
use crate::record::{RateLine, SeasonRecord};
use crate::tables::ReferenceTables;
use crate::tuning::RecencyTuning;

/// Weighted aggregate of a player's recent seasons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedLine {
    /// Weighted average of translated rate stats.
    pub rates: RateLine,
    /// Weighted average of raw home runs.
    pub hr: f64,
    /// Weighted average of raw plate appearances.
    pub pa: f64,
    /// Most advanced level among the kept seasons.
    pub highest_level: Level,
    /// Player's age in the most recent kept season at `highest_level`.
    pub age_at_highest: i32,
    pub seasons_used: usize,
}

/// Aggregate a player's season records.
///
/// `age` is the player's current age and `season` the calendar year treated
/// as "now". Returns `None` when no record clears the plate-appearance floor.
pub fn weight_seasons(
    records: &[SeasonRecord],
    age: u32,
    season: i32,
    tables: &ReferenceTables,
    tuning: &RecencyTuning,
) -> Option<WeightedLine> {
    let mut kept: Vec<&SeasonRecord> = records.iter().filter(|r| r.pa >= tuning.min_pa).collect();
    // Stable sort: same-season splits keep their input order.
    kept.sort_by(|a, b| b.season.cmp(&a.season));
    kept.truncate(tuning.max_seasons);
    if kept.is_empty() {
        return None;
    }

    let mut total_weight = 0.0;
    let mut ops = 0.0;
    let mut obp = 0.0;
    let mut slg = 0.0;
    let mut avg = 0.0;
    let mut hr = 0.0;
    let mut pa = 0.0;
    let mut highest: Option<(Level, i32)> = None;

    for (i, record) in kept.iter().enumerate() {
        let weight = tuning.weights.get(i).copied().unwrap_or(tuning.overflow_weight);

        if highest.map_or(true, |(level, _)| record.level > level) {
            let age_then = i32::try_from(age)
                .unwrap_or(i32::MAX)
                .saturating_sub(season.saturating_sub(record.season));
            highest = Some((record.level, age_then));
        }

        let translated = translate_record(record, tables);
        total_weight += weight;
        ops += translated.ops * weight;
        obp += translated.obp * weight;
        slg += translated.slg * weight;
        avg += translated.avg * weight;
        hr += record.hr as f64 * weight;
        pa += record.pa as f64 * weight;
    }

    if total_weight <= 0.0 {
        return None;
    }
    let (highest_level, age_at_highest) = highest?;

    Some(WeightedLine {
        rates: RateLine {
            obp: obp / total_weight,
            slg: slg / total_weight,
            ops: ops / total_weight,
            avg: avg / total_weight,
        },
        hr: hr / total_weight,
        pa: pa / total_weight,
        highest_level,
        age_at_highest,
        seasons_used: kept.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn season(year: i32, level: Level, pa: u32, ops: f64) -> SeasonRecord {
        SeasonRecord {
            season: year,
            level,
            pa,
            hr: pa / 30,
            sb: 0,
            rates: RateLine {
                obp: ops * 0.45,
                slg: ops * 0.55,
                ops,
                avg: ops * 0.33,
            },
        }
    }

    fn weigh(records: &[SeasonRecord], age: u32) -> Option<WeightedLine> {
        weight_seasons(records, age, 2025, &ReferenceTables::standard(), &RecencyTuning::default())
    }

    #[test]
    fn empty_history_is_insufficient() {
        assert!(weigh(&[], 25).is_none());
    }

    #[test]
    fn records_below_pa_floor_are_dropped() {
        let records = vec![season(2025, Level::Mlb, 29, 0.900), season(2024, Level::Mlb, 12, 0.800)];
        assert!(weigh(&records, 25).is_none());
    }

    #[test]
    fn record_at_pa_floor_counts() {
        let records = vec![season(2025, Level::Mlb, 30, 0.750)];
        let w = weigh(&records, 25).expect("30 PA qualifies");
        assert!(approx_eq(w.rates.ops, 0.750, 1e-12));
        assert!(approx_eq(w.pa, 30.0, 1e-12));
    }

    #[test]
    fn weights_favor_recent_seasons() {
        let records = vec![
            season(2023, Level::Mlb, 600, 0.700),
            season(2025, Level::Mlb, 600, 0.900),
            season(2024, Level::Mlb, 600, 0.800),
        ];
        let w = weigh(&records, 28).unwrap();
        // (0.9*5 + 0.8*4 + 0.7*3) / 12
        assert!(approx_eq(w.rates.ops, 9.8 / 12.0, 1e-12));
        assert_eq!(w.seasons_used, 3);
    }

    #[test]
    fn only_three_most_recent_are_kept() {
        let records = vec![
            season(2025, Level::Mlb, 500, 0.800),
            season(2024, Level::Mlb, 500, 0.800),
            season(2023, Level::Mlb, 500, 0.800),
            season(2022, Level::Mlb, 500, 2.000),
        ];
        let w = weigh(&records, 30).unwrap();
        assert_eq!(w.seasons_used, 3);
        assert!(approx_eq(w.rates.ops, 0.800, 1e-12));
    }

    #[test]
    fn rates_are_translated_but_volume_is_raw() {
        let records = vec![season(2025, Level::DoubleA, 400, 0.850)];
        let w = weigh(&records, 19).unwrap();
        assert!(approx_eq(w.rates.ops, 0.850 * 0.68, 1e-12));
        assert!(approx_eq(w.pa, 400.0, 1e-12));
        assert!(approx_eq(w.hr, 13.0, 1e-12));
    }

    #[test]
    fn tracks_highest_level_and_age_there() {
        let records = vec![
            season(2025, Level::DoubleA, 300, 0.800),
            season(2024, Level::TripleA, 200, 0.780),
            season(2023, Level::HighA, 450, 0.900),
        ];
        let w = weigh(&records, 22).unwrap();
        assert_eq!(w.highest_level, Level::TripleA);
        assert_eq!(w.age_at_highest, 21);
    }

    #[test]
    fn rookie_only_history_still_reports_age() {
        let records = vec![season(2025, Level::Rookie, 150, 0.850), season(2024, Level::Rookie, 90, 0.700)];
        let w = weigh(&records, 18).unwrap();
        assert_eq!(w.highest_level, Level::Rookie);
        assert_eq!(w.age_at_highest, 18);
    }

    #[test]
    fn same_season_splits_are_separate_records() {
        let records = vec![
            season(2025, Level::TripleA, 250, 0.800),
            season(2025, Level::Mlb, 150, 0.700),
            season(2024, Level::TripleA, 500, 0.820),
        ];
        let w = weigh(&records, 24).unwrap();
        assert_eq!(w.seasons_used, 3);
        assert_eq!(w.highest_level, Level::Mlb);
        assert_eq!(w.age_at_highest, 24);
    }

    #[test]
    fn overflow_weight_applies_past_weight_table() {
        let tuning = RecencyTuning {
            max_seasons: 4,
            ..RecencyTuning::default()
        };
        let records = vec![
            season(2025, Level::Mlb, 500, 0.800),
            season(2024, Level::Mlb, 500, 0.800),
            season(2023, Level::Mlb, 500, 0.800),
            season(2022, Level::Mlb, 500, 1.000),
        ];
        let w = weight_seasons(&records, 30, 2025, &ReferenceTables::standard(), &tuning).unwrap();
        // (0.8*12 + 1.0*2) / 14
        assert!(approx_eq(w.rates.ops, 11.6 / 14.0, 1e-12));
    }
}
