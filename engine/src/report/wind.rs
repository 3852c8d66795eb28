//! Where the user stands relative to the incident site and the wind.

use crate::geodesy::{self, CardinalDirection, Coordinate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Half-width of the upwind and downwind sectors.
pub const WIND_SECTOR_HALF_WIDTH_DEGREES: f64 = 22.5;

/// Position relative to the wind as seen from the incident site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindRelation {
    /// On the side the wind blows from.
    Upwind,

    /// On the side the wind blows toward.
    Downwind,

    /// Neither.
    Crosswind,
}

impl WindRelation {
    /// Classify `bearing_from_site` (site toward user) against the
    /// direction the wind blows from.
    pub fn classify(bearing_from_site: f64, wind_from: CardinalDirection) -> Self {
        let wind_bearing = wind_from.bearing_degrees();

        if geodesy::angle_difference(bearing_from_site, wind_bearing)
            <= WIND_SECTOR_HALF_WIDTH_DEGREES
        {
            WindRelation::Upwind
        } else if geodesy::angle_difference(bearing_from_site, wind_bearing + 180.0)
            <= WIND_SECTOR_HALF_WIDTH_DEGREES
        {
            WindRelation::Downwind
        } else {
            WindRelation::Crosswind
        }
    }
}

impl Display for WindRelation {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            WindRelation::Upwind => write!(f, "upwind"),
            WindRelation::Downwind => write!(f, "downwind"),
            WindRelation::Crosswind => write!(f, "crosswind"),
        }
    }
}

/// `"~{distance} {compass} and {relation} of incident site"`.
pub fn wind_relative_report(
    site: &Coordinate,
    position: &Coordinate,
    wind_from: CardinalDirection,
) -> String {
    let distance = geodesy::distance_meters(site, position);
    let bearing = geodesy::initial_bearing_degrees(site, position);
    let relation = WindRelation::classify(bearing, wind_from);

    report_debug!(
        "(wind_relative_report) bearing {:.1} deg, wind from {} -> {}",
        bearing,
        wind_from,
        relation
    );

    format!(
        "~{} {} and {} of {}",
        geodesy::format_distance(distance),
        geodesy::compass_label(bearing),
        relation,
        super::INCIDENT_SITE_LABEL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Coordinate {
        Coordinate::new(43.6150, -116.2023)
    }

    #[test]
    fn test_due_north_with_north_wind_is_upwind() {
        let position = Coordinate::new(43.6160, -116.2023);
        let report = wind_relative_report(&site(), &position, CardinalDirection::N);

        assert!(report.contains("upwind"), "{report}");
        assert_eq!(report, "~370 ft N and upwind of incident site");
    }

    #[test]
    fn test_downwind_and_crosswind() {
        let south = Coordinate::new(43.6140, -116.2023);
        let report = wind_relative_report(&site(), &south, CardinalDirection::N);
        assert_eq!(report, "~370 ft S and downwind of incident site");

        let east = Coordinate::new(43.6150, -116.2003);
        let report = wind_relative_report(&site(), &east, CardinalDirection::N);
        assert!(report.ends_with("E and crosswind of incident site"), "{report}");
    }

    #[test]
    fn test_classify_sector_edges() {
        use CardinalDirection::*;

        assert_eq!(WindRelation::classify(22.5, N), WindRelation::Upwind);
        assert_eq!(WindRelation::classify(337.5, N), WindRelation::Upwind);
        assert_eq!(WindRelation::classify(22.6, N), WindRelation::Crosswind);
        assert_eq!(WindRelation::classify(45.0, SW), WindRelation::Downwind);
        assert_eq!(WindRelation::classify(210.0, SW), WindRelation::Upwind);
        assert_eq!(WindRelation::classify(90.0, W), WindRelation::Downwind);
    }
}
