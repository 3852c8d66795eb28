//! The whole report form, from raw inputs to the two final strings.

use super::{compose, CommentFragments, FieldReport, LocationFragment, PositionReports};
use crate::geodesy::Coordinate;
use crate::report::{self, Landmark};
use serde::{Deserialize, Serialize};

/// Everything the user has filled in or picked so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldForm {
    pub location: LocationFragment,

    pub comments: CommentFragments,

    /// Best fix from acquisition, if any.
    pub position: Option<Coordinate>,

    /// Incident site set on the map.
    pub incident_site: Option<Coordinate>,

    /// Landmarks near the user.
    pub landmarks: Vec<Landmark>,
}

impl FieldForm {
    /// Reports that need a position. Empty without one.
    pub fn position_reports(&self) -> PositionReports {
        let Some(position) = self.position else {
            return PositionReports::default();
        };

        let nearest_landmark = if self.landmarks.is_empty() {
            None
        } else {
            report::nearest_landmark_report(&position, &self.landmarks).ok()
        };

        PositionReports {
            incident_site: self
                .incident_site
                .map(|site| report::incident_site_report(&position, &site)),
            nearest_landmark,
        }
    }

    /// Wind-relative phrase, when a position, a site and a non-calm wind
    /// direction are all known.
    pub fn wind_relative(&self) -> Option<String> {
        let position = self.position?;
        let site = self.incident_site?;
        let wind_from = self.comments.wind.blowing_from()?;

        Some(report::wind_relative_report(&site, &position, wind_from))
    }

    /// Compose both strings. A wind-relative phrase already in the
    /// comments wins over the computed one.
    pub fn report(&self) -> FieldReport {
        let mut comments = self.comments.clone();
        if comments.wind_relative.is_none() {
            comments.wind_relative = self.wind_relative();
        }

        compose(&self.location, &self.position_reports(), &comments)
    }

    /// Reset the form.
    pub fn clear(&mut self) {
        *self = FieldForm::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Wind;
    use crate::geodesy::CardinalDirection;

    fn form() -> FieldForm {
        FieldForm {
            position: Some(Coordinate::new(43.6160, -116.2023)),
            incident_site: Some(Coordinate::new(43.6150, -116.2023)),
            landmarks: vec![Landmark::new(
                "Utility pole 79557B",
                Coordinate::new(43.6161, -116.2023),
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_position_reports() {
        let reports = form().position_reports();
        assert_eq!(
            reports.incident_site.as_deref(),
            Some("~370 ft N of incident site")
        );
        assert_eq!(
            reports.nearest_landmark.as_deref(),
            Some("~40 ft S of Utility pole 79557B")
        );
    }

    #[test]
    fn test_no_position_no_reports() {
        let mut form = form();
        form.position = None;
        assert_eq!(form.position_reports(), PositionReports::default());
        assert_eq!(form.wind_relative(), None);
    }

    #[test]
    fn test_report_with_wind() {
        let mut form = form();
        form.comments.wind = Wind::new("light", CardinalDirection::N);

        let report = form.report();
        assert_eq!(
            report.location_text,
            "~370 ft N of incident site. ~40 ft S of Utility pole 79557B"
        );
        assert_eq!(
            report.comments_text,
            "Light wind from N. ~370 ft N and upwind of incident site"
        );
    }

    #[test]
    fn test_calm_wind_has_no_relative_phrase() {
        let mut form = form();
        form.comments.wind = Wind::calm();

        assert_eq!(form.wind_relative(), None);
        assert_eq!(form.report().comments_text, "No wind");
    }

    #[test]
    fn test_clear() {
        let mut form = form();
        form.comments.manual_note = Some(String::from("Crew on site"));

        form.clear();
        assert_eq!(form, FieldForm::default());
        assert_eq!(form.report(), FieldReport::default());
    }

    #[test]
    fn test_form_from_json() {
        let form: FieldForm = serde_json::from_str(
            r#"{
                "location": {
                    "distance_feet": 50,
                    "direction": "S",
                    "kind": "landmark",
                    "landmark": "Utility pole 79557B"
                },
                "comments": {
                    "quick_phrases": ["Drift observed"],
                    "weather": "rain"
                }
            }"#,
        )
        .unwrap();

        let report = form.report();
        assert_eq!(report.location_text, "~50 feet S of Utility pole 79557B");
        assert_eq!(report.comments_text, "Drift observed. Rainy");
    }
}
