// Competition levels of the minor/major league hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Upstream sport id constants (MLB Stats API `sportId`)
// ---------------------------------------------------------------------------

pub const SPORT_ID_MLB: u16 = 1;
pub const SPORT_ID_AAA: u16 = 11;
pub const SPORT_ID_AA: u16 = 12;
pub const SPORT_ID_HIGH_A: u16 = 13;
pub const SPORT_ID_SINGLE_A: u16 = 14;
pub const SPORT_ID_ROOKIE: u16 = 16;

/// A competition level, ordered from least to most advanced.
///
/// The derived `Ord` follows declaration order, so `Level::Mlb` is the
/// maximum and comparisons like `level < Level::Mlb` read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "ROK")]
    Rookie,
    #[serde(rename = "A")]
    SingleA,
    #[serde(rename = "A+")]
    HighA,
    #[serde(rename = "AA")]
    DoubleA,
    #[serde(rename = "AAA")]
    TripleA,
    #[serde(rename = "MLB")]
    Mlb,
}

impl Level {
    /// All levels, lowest first.
    pub const ALL: [Level; 6] = [
        Level::Rookie,
        Level::SingleA,
        Level::HighA,
        Level::DoubleA,
        Level::TripleA,
        Level::Mlb,
    ];

    /// Parse a level code ("ROK", "A", "A+", "AA", "AAA", "MLB").
    ///
    /// Also accepts a few spellings seen in exported data ("RK", "HIGH-A",
    /// "LOW-A"). Returns `None` for anything else.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ROK" | "RK" | "ROOKIE" => Some(Level::Rookie),
            "A" | "A-" | "LOW-A" => Some(Level::SingleA),
            "A+" | "HIGH-A" => Some(Level::HighA),
            "AA" => Some(Level::DoubleA),
            "AAA" => Some(Level::TripleA),
            "MLB" => Some(Level::Mlb),
            _ => None,
        }
    }

    /// Map an upstream sport id to a level.
    pub fn from_sport_id(id: u16) -> Option<Self> {
        match id {
            SPORT_ID_MLB => Some(Level::Mlb),
            SPORT_ID_AAA => Some(Level::TripleA),
            SPORT_ID_AA => Some(Level::DoubleA),
            SPORT_ID_HIGH_A => Some(Level::HighA),
            SPORT_ID_SINGLE_A => Some(Level::SingleA),
            SPORT_ID_ROOKIE => Some(Level::Rookie),
            _ => None,
        }
    }

    /// Short code used in data files and config keys.
    pub fn code(&self) -> &'static str {
        match self {
            Level::Rookie => "ROK",
            Level::SingleA => "A",
            Level::HighA => "A+",
            Level::DoubleA => "AA",
            Level::TripleA => "AAA",
            Level::Mlb => "MLB",
        }
    }

    pub fn is_mlb(&self) -> bool {
        matches!(self, Level::Mlb)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_lowest_first() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should rank below {}", pair[0], pair[1]);
        }
        assert_eq!(Level::ALL.iter().max(), Some(&Level::Mlb));
    }

    #[test]
    fn code_roundtrips_through_from_code() {
        for level in Level::ALL {
            assert_eq!(Level::from_code(level.code()), Some(level));
        }
    }

    #[test]
    fn from_code_is_case_insensitive_and_trims() {
        assert_eq!(Level::from_code(" aaa "), Some(Level::TripleA));
        assert_eq!(Level::from_code("rk"), Some(Level::Rookie));
        assert_eq!(Level::from_code("High-A"), Some(Level::HighA));
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(Level::from_code("DSL"), None);
        assert_eq!(Level::from_code(""), None);
    }

    #[test]
    fn sport_ids_map_to_levels() {
        assert_eq!(Level::from_sport_id(1), Some(Level::Mlb));
        assert_eq!(Level::from_sport_id(11), Some(Level::TripleA));
        assert_eq!(Level::from_sport_id(12), Some(Level::DoubleA));
        assert_eq!(Level::from_sport_id(13), Some(Level::HighA));
        assert_eq!(Level::from_sport_id(14), Some(Level::SingleA));
        assert_eq!(Level::from_sport_id(16), Some(Level::Rookie));
        assert_eq!(Level::from_sport_id(17), None);
    }
}
