//! Great-circle distance, initial bearing and compass helpers.
//!
//! See [Wikipedia](https://en.wikipedia.org/wiki/Haversine_formula) for
//! the distance formula. The Earth is treated as a sphere.
//!
//! **Distance is returned in meters**.

pub mod compass;
pub mod coordinate;

pub use compass::{CardinalDirection, CompassLabel, ParseDirectionError};
pub use coordinate::{Coordinate, ParseCoordinateError, PositionSample};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Conversion factor from meters to international feet.
pub const FEET_PER_METER: f64 = 3.28084;

/// Feet in a statute mile. Distances at or above this print in miles.
pub const FEET_PER_MILE: f64 = 5280.0;

/// Width of one of the 16 compass sectors.
pub const SECTOR_WIDTH_DEGREES: f64 = 22.5;

/// Normalize any angle into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);

    // rem_euclid rounds tiny negative values up to 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Calculate the distance between two points on a sphere.
///
/// # Notes
/// The formula does ***not*** take altitude into account. It is valid
/// across the antimeridian and near the poles without special cases.
pub fn distance_meters(start: &Coordinate, end: &Coordinate) -> f64 {
    let d_lat = (end.latitude - start.latitude).to_radians();
    let d_lon = (end.longitude - start.longitude).to_radians();
    let lat1 = start.latitude.to_radians();
    let lat2 = end.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // rounding can push `a` a hair outside [0, 1] for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Forward azimuth from `start` toward `end`, in [0, 360).
pub fn initial_bearing_degrees(start: &Coordinate, end: &Coordinate) -> f64 {
    let lat1 = start.latitude.to_radians();
    let lat2 = end.latitude.to_radians();
    let d_lon = (end.longitude - start.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Bucket a bearing into one of 16 compass sectors.
///
/// Each label is centered on its nominal heading: north covers
/// [348.75, 11.25), north-north-east covers [11.25, 33.75), and so on.
pub fn compass_label(bearing_degrees: f64) -> CompassLabel {
    let shifted = (normalize_degrees(bearing_degrees) + SECTOR_WIDTH_DEGREES / 2.0) % 360.0;
    let index = (shifted / SECTOR_WIDTH_DEGREES).floor() as usize;

    CompassLabel::ALL[index % CompassLabel::ALL.len()]
}

/// Human-friendly distance.
///
/// Feet are rounded **up** to the next multiple of 10 so that the reported
/// standoff never understates the real one. From one mile on, miles with a
/// single decimal are printed instead.
pub fn format_distance(meters: f64) -> String {
    let feet = meters.max(0.0) * FEET_PER_METER;

    if feet >= FEET_PER_MILE {
        format!("{:.1} mi", feet / FEET_PER_MILE)
    } else {
        let rounded = (feet / 10.0).ceil() * 10.0;
        format!("{} ft", rounded as u64)
    }
}

/// Smallest absolute difference between two bearings, in [0, 180].
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let difference = normalize_degrees(a - b);

    if difference > 180.0 {
        360.0 - difference
    } else {
        difference
    }
}
