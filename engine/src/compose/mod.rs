//! Assembly of the two report strings.
//!
//! Every fragment is optional. Present fragments are trimmed, lose any
//! trailing periods and are joined with `". "`, so the output never shows
//! double periods no matter which fragments were filled in. Composition is
//! a pure function of its inputs.

#[macro_use]
pub mod macros;
pub mod comments;
pub mod form;
pub mod location;

pub use comments::{weather_phrase, CommentFragments, PhraseSelection, Wind, NO_WIND};
pub use form::FieldForm;
pub use location::{LandmarkKind, LocationFragment, DISTANCE_STEPS_FEET};

use serde::{Deserialize, Serialize};

/// Separator between fragments.
pub const FRAGMENT_SEPARATOR: &str = ". ";

/// Sentences locating the user against known points, produced by
/// [`crate::report`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionReports {
    /// Position relative to the incident site.
    pub incident_site: Option<String>,

    /// Position relative to the nearest landmark.
    pub nearest_landmark: Option<String>,
}

/// The two strings handed to the incident report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    /// Where the user is.
    pub location_text: String,

    /// What the user observes.
    pub comments_text: String,
}

/// Trim a fragment and strip its trailing periods. `None` if nothing is
/// left.
pub fn normalize_fragment(fragment: &str) -> Option<&str> {
    let normalized = fragment
        .trim()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Normalize and join fragments, skipping empty ones.
pub fn join_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fragments
        .into_iter()
        .filter_map(normalize_fragment)
        .collect::<Vec<&str>>()
        .join(FRAGMENT_SEPARATOR)
}

/// Structured phrase, then the incident-site report, then the
/// nearest-landmark report, then the address phrase.
pub fn location_text(location: &LocationFragment, reports: &PositionReports) -> String {
    let phrase = location.phrase();

    join_fragments(
        [
            phrase.as_deref(),
            reports.incident_site.as_deref(),
            reports.nearest_landmark.as_deref(),
            location.address_phrase.as_deref(),
        ]
        .into_iter()
        .flatten(),
    )
}

/// Instrument note on its own line, then quick phrases, manual note,
/// weather, AI scene text, wind and the wind-relative phrase.
pub fn comments_text(comments: &CommentFragments) -> String {
    let weather = comments.weather.as_deref().map(weather_phrase);
    let wind = comments.wind.phrase();

    let body = join_fragments(
        comments
            .quick_phrases
            .as_slice()
            .iter()
            .map(String::as_str)
            .chain(
                [
                    comments.manual_note.as_deref(),
                    weather.as_deref(),
                    comments.ai_scene.as_deref(),
                    wind.as_deref(),
                    comments.wind_relative.as_deref(),
                ]
                .into_iter()
                .flatten(),
            ),
    );

    match comments.instrument_note.as_deref().and_then(normalize_fragment) {
        Some(note) if body.is_empty() => note.to_string(),
        Some(note) => format!("{}\n{}", note, body),
        None => body,
    }
}

/// Build both strings.
pub fn compose(
    location: &LocationFragment,
    reports: &PositionReports,
    comments: &CommentFragments,
) -> FieldReport {
    let report = FieldReport {
        location_text: location_text(location, reports),
        comments_text: comments_text(comments),
    };

    compose_debug!("(compose) {:?}", report);
    report
}
