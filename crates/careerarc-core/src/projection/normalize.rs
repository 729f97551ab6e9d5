// Level normalizer: express minor-league rate stats in MLB-equivalent terms.

use crate::record::{RateLine, SeasonRecord};
use crate::tables::{LevelTranslation, ReferenceTables};

/// Discount a rate line by a level's translation factor.
///
/// Counting stats are not part of `RateLine` and are never rescaled.
pub fn translate(rates: &RateLine, translation: &LevelTranslation) -> RateLine {
    rates.scaled(translation.factor)
}

/// MLB-equivalent rate line for a season record, using the record's level.
pub fn translate_record(record: &SeasonRecord, tables: &ReferenceTables) -> RateLine {
    translate(&record.rates, tables.translation(record.level))
}
