// Primary fielding positions for hitters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A hitter's primary position. Drives the aging profile lookup.
///
/// Pitchers and the upstream "two-way"/generic codes are deliberately absent;
/// they parse to `None` and resolve to the default aging profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "C")]
    Catcher,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    #[serde(rename = "SS")]
    ShortStop,
    #[serde(rename = "LF")]
    LeftField,
    #[serde(rename = "CF")]
    CenterField,
    #[serde(rename = "RF")]
    RightField,
    #[serde(rename = "DH")]
    DesignatedHitter,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::ShortStop,
        Position::LeftField,
        Position::CenterField,
        Position::RightField,
        Position::DesignatedHitter,
    ];

    /// Parse a position code.
    ///
    /// Accepts both abbreviations ("SS", "1B") and the numeric scorekeeping
    /// codes the upstream catalog uses ("6" for shortstop, "10" for DH).
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" | "2" => Some(Position::Catcher),
            "1B" | "3" => Some(Position::FirstBase),
            "2B" | "4" => Some(Position::SecondBase),
            "3B" | "5" => Some(Position::ThirdBase),
            "SS" | "6" => Some(Position::ShortStop),
            "LF" | "7" => Some(Position::LeftField),
            "CF" | "8" => Some(Position::CenterField),
            "RF" | "9" => Some(Position::RightField),
            "DH" | "10" => Some(Position::DesignatedHitter),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}
