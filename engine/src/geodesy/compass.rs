//! Compass labels and the 8-point direction set used by the field forms.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// One of the 16 points of the compass rose, clockwise from north.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassLabel {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassLabel {
    /// All labels in sector order, sector 0 being north.
    pub const ALL: [CompassLabel; 16] = [
        CompassLabel::N,
        CompassLabel::NNE,
        CompassLabel::NE,
        CompassLabel::ENE,
        CompassLabel::E,
        CompassLabel::ESE,
        CompassLabel::SE,
        CompassLabel::SSE,
        CompassLabel::S,
        CompassLabel::SSW,
        CompassLabel::SW,
        CompassLabel::WSW,
        CompassLabel::W,
        CompassLabel::WNW,
        CompassLabel::NW,
        CompassLabel::NNW,
    ];

    /// Symbol as printed in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompassLabel::N => "N",
            CompassLabel::NNE => "NNE",
            CompassLabel::NE => "NE",
            CompassLabel::ENE => "ENE",
            CompassLabel::E => "E",
            CompassLabel::ESE => "ESE",
            CompassLabel::SE => "SE",
            CompassLabel::SSE => "SSE",
            CompassLabel::S => "S",
            CompassLabel::SSW => "SSW",
            CompassLabel::SW => "SW",
            CompassLabel::WSW => "WSW",
            CompassLabel::W => "W",
            CompassLabel::WNW => "WNW",
            CompassLabel::NW => "NW",
            CompassLabel::NNW => "NNW",
        }
    }

    /// Nominal heading at the center of the sector.
    pub fn heading_degrees(&self) -> f64 {
        let index = CompassLabel::ALL
            .iter()
            .position(|label| label == self)
            .unwrap_or(0);

        index as f64 * super::SECTOR_WIDTH_DEGREES
    }
}

impl Display for CompassLabel {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned for an unknown direction string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(String);

impl Display for ParseDirectionError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "invalid direction [{}], expected one of N, NE, E, SE, S, SW, W, NW",
            self.0
        )
    }
}

impl std::error::Error for ParseDirectionError {}

/// The 8-point direction set offered by the forms: wind-from, direction
/// from a landmark, corners (diagonals) and edges (cardinals).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalDirection {
    /// Fixed bearing for each direction.
    pub fn bearing_degrees(&self) -> f64 {
        match self {
            CardinalDirection::N => 0.0,
            CardinalDirection::NE => 45.0,
            CardinalDirection::E => 90.0,
            CardinalDirection::SE => 135.0,
            CardinalDirection::S => 180.0,
            CardinalDirection::SW => 225.0,
            CardinalDirection::W => 270.0,
            CardinalDirection::NW => 315.0,
        }
    }

    /// NE, SE, SW and NW. Corners are named by these.
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            CardinalDirection::NE
                | CardinalDirection::SE
                | CardinalDirection::SW
                | CardinalDirection::NW
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SW => "SW",
            CardinalDirection::W => "W",
            CardinalDirection::NW => "NW",
        }
    }
}

impl Display for CardinalDirection {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CardinalDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(CardinalDirection::N),
            "NE" => Ok(CardinalDirection::NE),
            "E" => Ok(CardinalDirection::E),
            "SE" => Ok(CardinalDirection::SE),
            "S" => Ok(CardinalDirection::S),
            "SW" => Ok(CardinalDirection::SW),
            "W" => Ok(CardinalDirection::W),
            "NW" => Ok(CardinalDirection::NW),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}
