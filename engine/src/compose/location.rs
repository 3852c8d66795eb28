//! Structured landmark description built up by the location form.

use crate::geodesy::CardinalDirection;
use serde::{Deserialize, Serialize};

/// Increments offered by the distance buttons. Presses accumulate.
pub const DISTANCE_STEPS_FEET: [u32; 5] = [5, 10, 20, 50, 100];

/// What the user's position is described against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    /// A corner of a lot, park or building, named by a diagonal.
    Corner,

    /// An edge of a lot, park or building, named by a cardinal.
    Edge,

    /// Where two roads or features meet.
    Intersection,

    /// A single object such as a pole or sign.
    Landmark,
}

/// Form state for the location description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFragment {
    /// Estimated distance from the landmark, accumulated from button presses.
    pub distance_feet: u32,

    /// Direction of the user from the landmark.
    pub direction: Option<CardinalDirection>,

    pub kind: Option<LandmarkKind>,

    /// Which corner, for [`LandmarkKind::Corner`].
    pub corner: Option<CardinalDirection>,

    /// Which edge, for [`LandmarkKind::Edge`].
    pub edge: Option<CardinalDirection>,

    /// Landmark name, or the first road of an intersection.
    pub landmark: Option<String>,

    /// Second road of an intersection.
    pub second_landmark: Option<String>,

    /// Short place phrase from reverse geocoding, appended after the
    /// structured phrase.
    pub address_phrase: Option<String>,
}

fn named(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

impl LocationFragment {
    /// Add a button press to the running distance.
    pub fn add_distance(&mut self, feet: u32) {
        self.distance_feet = self.distance_feet.saturating_add(feet);
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        *self = LocationFragment::default();
    }

    /// The structured phrase, e.g. `"~35 feet NE of SW corner of Ivy Green Park"`.
    ///
    /// `None` until a distance, a direction, a kind and the names that kind
    /// needs have all been chosen. A corner must be a diagonal and an edge
    /// a cardinal.
    pub fn phrase(&self) -> Option<String> {
        if self.distance_feet == 0 {
            return None;
        }
        let direction = self.direction?;
        let lead = format!("~{} feet {} of", self.distance_feet, direction);

        match self.kind? {
            LandmarkKind::Corner => {
                let corner = self.corner.filter(CardinalDirection::is_diagonal)?;
                let landmark = named(&self.landmark)?;
                Some(format!("{} {} corner of {}", lead, corner, landmark))
            }
            LandmarkKind::Edge => {
                let edge = self.edge.filter(|edge| !edge.is_diagonal())?;
                let landmark = named(&self.landmark)?;
                Some(format!("{} {} edge of {}", lead, edge, landmark))
            }
            LandmarkKind::Intersection => {
                let first = named(&self.landmark)?;
                let second = named(&self.second_landmark)?;
                Some(format!("{} intersection of {} and {}", lead, first, second))
            }
            LandmarkKind::Landmark => {
                let landmark = named(&self.landmark)?;
                Some(format!("{} {}", lead, landmark))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(kind: LandmarkKind) -> LocationFragment {
        let mut fragment = LocationFragment {
            direction: Some(CardinalDirection::NE),
            kind: Some(kind),
            landmark: Some(String::from("Ivy Green Park")),
            ..Default::default()
        };
        fragment.add_distance(DISTANCE_STEPS_FEET[1]);
        fragment.add_distance(DISTANCE_STEPS_FEET[2]);
        fragment.add_distance(DISTANCE_STEPS_FEET[0]);
        fragment
    }

    #[test]
    fn test_distance_accumulates() {
        let fragment = fragment(LandmarkKind::Landmark);
        assert_eq!(fragment.distance_feet, 35);
        assert_eq!(
            fragment.phrase().as_deref(),
            Some("~35 feet NE of Ivy Green Park")
        );
    }

    #[test]
    fn test_corner_phrase() {
        let mut fragment = fragment(LandmarkKind::Corner);
        assert_eq!(fragment.phrase(), None);

        fragment.corner = Some(CardinalDirection::N);
        assert_eq!(fragment.phrase(), None);

        fragment.corner = Some(CardinalDirection::SW);
        assert_eq!(
            fragment.phrase().as_deref(),
            Some("~35 feet NE of SW corner of Ivy Green Park")
        );
    }

    #[test]
    fn test_edge_phrase() {
        let mut fragment = fragment(LandmarkKind::Edge);
        fragment.edge = Some(CardinalDirection::NW);
        assert_eq!(fragment.phrase(), None);

        fragment.edge = Some(CardinalDirection::S);
        assert_eq!(
            fragment.phrase().as_deref(),
            Some("~35 feet NE of S edge of Ivy Green Park")
        );
    }

    #[test]
    fn test_intersection_phrase() {
        let mut fragment = fragment(LandmarkKind::Intersection);
        fragment.landmark = Some(String::from("Vista Ave"));
        assert_eq!(fragment.phrase(), None);

        fragment.second_landmark = Some(String::from("  Overland Rd "));
        assert_eq!(
            fragment.phrase().as_deref(),
            Some("~35 feet NE of intersection of Vista Ave and Overland Rd")
        );
    }

    #[test]
    fn test_phrase_suppressed_without_distance_or_direction() {
        let mut fragment = fragment(LandmarkKind::Landmark);
        fragment.direction = None;
        assert_eq!(fragment.phrase(), None);

        let mut fragment = self::fragment(LandmarkKind::Landmark);
        fragment.distance_feet = 0;
        assert_eq!(fragment.phrase(), None);

        let mut fragment = self::fragment(LandmarkKind::Landmark);
        fragment.landmark = Some(String::from("   "));
        assert_eq!(fragment.phrase(), None);
    }

    #[test]
    fn test_clear() {
        let mut fragment = fragment(LandmarkKind::Landmark);
        fragment.clear();
        assert_eq!(fragment, LocationFragment::default());
    }
}
