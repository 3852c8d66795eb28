//! Sentences describing where the user stands relative to a target.
//!
//! The bearing is always taken from the target toward the user, so
//! `"~120 ft NW of incident site"` reads as "the user is north-west of the
//! incident site".

#[macro_use]
pub mod macros;
pub mod wind;

pub use wind::{wind_relative_report, WindRelation};

use crate::geodesy::{self, Coordinate};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Label used for the incident site in generated sentences.
pub const INCIDENT_SITE_LABEL: &str = "incident site";

/// A named reference point supplied by the landmark provider or the map
/// picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Human readable name, e.g. "Utility pole 79557B".
    pub description: String,

    /// The latitude in degrees.
    pub latitude: f64,

    /// The longitude in degrees.
    pub longitude: f64,
}

impl Landmark {
    pub fn new(description: impl Into<String>, coordinate: Coordinate) -> Self {
        Landmark {
            description: description.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Errors raised when a report can't be built from the given inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReportError {
    /// Nearest-landmark lookup over an empty set.
    NoLandmarks,
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ReportError::NoLandmarks => write!(f, "No landmarks to compare against."),
        }
    }
}

impl std::error::Error for ReportError {}

/// `"~{distance} {compass} of {target_label}"` for the user at `origin`.
pub fn relative_report(origin: &Coordinate, target: &Coordinate, target_label: &str) -> String {
    let distance = geodesy::distance_meters(origin, target);
    let bearing = geodesy::initial_bearing_degrees(target, origin);
    let report = format!(
        "~{} {} of {}",
        geodesy::format_distance(distance),
        geodesy::compass_label(bearing),
        target_label
    );

    report_debug!(
        "(relative_report) {:.1} m at {:.1} deg: {}",
        distance,
        bearing,
        report
    );
    report
}

/// Position of the user relative to the incident site.
pub fn incident_site_report(origin: &Coordinate, site: &Coordinate) -> String {
    relative_report(origin, site, INCIDENT_SITE_LABEL)
}

/// The landmark closest to `origin` and its distance in meters.
///
/// Ties keep the landmark listed first.
pub fn nearest_landmark<'a>(
    origin: &Coordinate,
    landmarks: &'a [Landmark],
) -> Result<(&'a Landmark, f64), ReportError> {
    landmarks
        .iter()
        .map(|landmark| {
            (
                landmark,
                geodesy::distance_meters(origin, &landmark.coordinate()),
            )
        })
        .min_by_key(|(_, distance)| OrderedFloat(*distance))
        .ok_or_else(|| {
            report_warn!("(nearest_landmark) Called with an empty landmark set.");
            ReportError::NoLandmarks
        })
}

/// Position of the user relative to the nearest landmark.
pub fn nearest_landmark_report(
    origin: &Coordinate,
    landmarks: &[Landmark],
) -> Result<String, ReportError> {
    let (landmark, _) = nearest_landmark(origin, landmarks)?;
    Ok(relative_report(
        origin,
        &landmark.coordinate(),
        &landmark.description,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Coordinate {
        Coordinate::new(43.6150, -116.2023)
    }

    #[test]
    fn test_relative_report_north_west() {
        // ~0.00025 deg lat / lon north-west of the site
        let origin = Coordinate::new(43.61525, -116.20265);
        let report = incident_site_report(&origin, &site());

        assert!(report.starts_with('~'));
        assert!(report.ends_with(" NW of incident site"), "{report}");
    }

    #[test]
    fn test_relative_report_distance() {
        // 0.001 deg north ~ 111 m ~ 364.8 ft, rounded up
        let origin = Coordinate::new(43.6160, -116.2023);
        assert_eq!(
            incident_site_report(&origin, &site()),
            "~370 ft N of incident site"
        );
    }

    #[test]
    fn test_nearest_landmark() {
        let origin = site();
        let landmarks = vec![
            Landmark::new("Gate marker 3A", Coordinate::new(43.6200, -116.2023)),
            Landmark::new("Utility pole 79557B", Coordinate::new(43.6151, -116.2023)),
            Landmark::new("Sign: No Trespassing", Coordinate::new(43.6100, -116.2023)),
        ];

        let (landmark, distance) = nearest_landmark(&origin, &landmarks).unwrap();
        assert_eq!(landmark.description, "Utility pole 79557B");
        assert!(distance < 12.0);

        assert_eq!(
            nearest_landmark_report(&origin, &landmarks).unwrap(),
            "~40 ft S of Utility pole 79557B"
        );
    }

    #[test]
    fn test_nearest_landmark_tie_keeps_first() {
        let origin = site();
        let landmarks = vec![
            Landmark::new("north", Coordinate::new(43.6160, -116.2023)),
            Landmark::new("north again", Coordinate::new(43.6160, -116.2023)),
        ];

        let (landmark, _) = nearest_landmark(&origin, &landmarks).unwrap();
        assert_eq!(landmark.description, "north");
    }

    #[test]
    fn test_nearest_landmark_empty() {
        assert_eq!(
            nearest_landmark(&site(), &[]).map(|(l, _)| l.description.clone()),
            Err(ReportError::NoLandmarks)
        );
        assert_eq!(
            nearest_landmark_report(&site(), &[]),
            Err(ReportError::NoLandmarks)
        );
    }
}
