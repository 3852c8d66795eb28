//! Struct definitions and implementations for [`Coordinate`] and
//! [`PositionSample`].

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A [`Coordinate`] is a geographic position as read from a location
/// sensor, a map pick, or a stored landmark.
///
/// Values are never mutated after they are read; anything derived from a
/// coordinate produces a new value.
#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Coordinate {
    /// The latitude in degrees.
    pub latitude: f64,

    /// The longitude in degrees.
    pub longitude: f64,

    /// Horizontal accuracy radius in meters, if the source reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl Coordinate {
    /// Create a coordinate without an accuracy estimate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
            accuracy: None,
        }
    }

    /// Attach a horizontal accuracy radius (meters).
    pub fn with_accuracy(mut self, accuracy_meters: f64) -> Self {
        self.accuracy = Some(accuracy_meters);
        self
    }

    /// True if the coordinate reports an accuracy at or below `meters`.
    pub fn meets_accuracy(&self, meters: f64) -> bool {
        matches!(self.accuracy, Some(accuracy) if accuracy <= meters)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)?;
        if let Some(accuracy) = self.accuracy {
            write!(f, " (±{:.0} m)", accuracy)?;
        }
        Ok(())
    }
}

/// Error returned when a `"lat,lon[,accuracy]"` string can't be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseCoordinateError(String);

impl Display for ParseCoordinateError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "invalid coordinate [{}], expected lat,lon[,accuracy]", self.0)
    }
}

impl std::error::Error for ParseCoordinateError {}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_string());
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|_| err())?;

        let coordinate = match parts[..] {
            [latitude, longitude] => Coordinate::new(latitude, longitude),
            [latitude, longitude, accuracy] => {
                Coordinate::new(latitude, longitude).with_accuracy(accuracy)
            }
            _ => return Err(err()),
        };

        if !(-90.0..=90.0).contains(&coordinate.latitude)
            || !(-180.0..=180.0).contains(&coordinate.longitude)
        {
            return Err(err());
        }

        Ok(coordinate)
    }
}

/// A [`Coordinate`] captured by the sensor at a point in time.
///
/// Samples are ranked only by accuracy: a smaller radius is better and a
/// missing radius ranks last.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSample {
    /// The reported position.
    pub coordinate: Coordinate,

    /// When the sample was received.
    pub captured_at: DateTime<Utc>,
}

impl PositionSample {
    /// Wrap a coordinate received now.
    pub fn new(coordinate: Coordinate) -> Self {
        PositionSample {
            coordinate,
            captured_at: Utc::now(),
        }
    }

    /// Ranking key, lower is better.
    pub fn rank(&self) -> OrderedFloat<f64> {
        OrderedFloat(self.coordinate.accuracy.unwrap_or(f64::INFINITY))
    }

    /// Strictly better than `other`. Equal accuracy is not better, so the
    /// earlier sample survives a tie.
    pub fn is_better_than(&self, other: &PositionSample) -> bool {
        self.rank() < other.rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let coordinate: Coordinate = "43.6150, -116.2023".parse().unwrap();
        assert_eq!(coordinate, Coordinate::new(43.615, -116.2023));

        let coordinate: Coordinate = "-33.8688,151.2093,12".parse().unwrap();
        assert_eq!(coordinate.accuracy, Some(12.0));

        assert!("43.6".parse::<Coordinate>().is_err());
        assert!("north,west".parse::<Coordinate>().is_err());
        assert!("91.0,0.0".parse::<Coordinate>().is_err());
        assert!("0.0,181.0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_sample_ranking() {
        let precise = PositionSample::new(Coordinate::new(0.0, 0.0).with_accuracy(5.0));
        let coarse = PositionSample::new(Coordinate::new(0.0, 0.0).with_accuracy(50.0));
        let unknown = PositionSample::new(Coordinate::new(0.0, 0.0));

        assert!(precise.is_better_than(&coarse));
        assert!(!coarse.is_better_than(&precise));
        assert!(coarse.is_better_than(&unknown));
        assert!(!precise.is_better_than(&precise.clone()));
    }

    #[test]
    fn test_sample_captured_now() {
        let before = Utc::now();
        let sample = PositionSample::new(Coordinate::new(0.0, 0.0));

        assert!(sample.captured_at >= before);
        assert!(sample.captured_at <= Utc::now());
    }

    #[test]
    fn test_meets_accuracy() {
        let coordinate = Coordinate::new(1.0, 2.0).with_accuracy(20.0);
        assert!(coordinate.meets_accuracy(20.0));
        assert!(!coordinate.meets_accuracy(19.9));
        assert!(!Coordinate::new(1.0, 2.0).meets_accuracy(1000.0));
    }
}
