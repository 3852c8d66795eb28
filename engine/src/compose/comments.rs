//! Observational comment fragments.

use crate::geodesy::CardinalDirection;
use serde::{Deserialize, Serialize};

/// Intensity value meaning "no wind". The direction is ignored with it.
pub const NO_WIND: &str = "no-wind";

/// Quick phrases picked from the phrase library, in the order the user
/// picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhraseSelection(Vec<String>);

impl PhraseSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the phrase if absent, remove it if present.
    pub fn toggle(&mut self, content: &str) {
        match self.0.iter().position(|phrase| phrase == content) {
            Some(index) => {
                self.0.remove(index);
            }
            None => self.0.push(content.to_string()),
        }
    }

    pub fn contains(&self, content: &str) -> bool {
        self.0.iter().any(|phrase| phrase == content)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for PhraseSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PhraseSelection(iter.into_iter().map(Into::into).collect())
    }
}

/// Wind observation from the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wind {
    /// `light`, `moderate`, `strong`, or [`NO_WIND`].
    pub intensity: Option<String>,

    /// Direction the wind blows from.
    pub direction: Option<CardinalDirection>,
}

impl Wind {
    pub fn new(intensity: &str, direction: CardinalDirection) -> Self {
        Wind {
            intensity: Some(intensity.to_string()),
            direction: Some(direction),
        }
    }

    pub fn calm() -> Self {
        Wind {
            intensity: Some(NO_WIND.to_string()),
            direction: None,
        }
    }

    /// True for the [`NO_WIND`] sentinel.
    pub fn is_calm(&self) -> bool {
        self.intensity
            .as_deref()
            .map_or(false, |intensity| intensity.trim().eq_ignore_ascii_case(NO_WIND))
    }

    /// Direction to use for wind-relative positioning, never for calm air.
    pub fn blowing_from(&self) -> Option<CardinalDirection> {
        if self.is_calm() {
            return None;
        }

        self.direction
    }

    /// `"Light wind from NW"`, `"No wind"`, or `None` when incomplete.
    pub fn phrase(&self) -> Option<String> {
        if self.is_calm() {
            return Some(String::from("No wind"));
        }

        let intensity = self.intensity.as_deref().map(str::trim)?;
        if intensity.is_empty() {
            return None;
        }
        let direction = self.direction?;

        Some(format!("{} wind from {}", capitalize(intensity), direction))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Weather choice rendered as a phrase. Unknown values pass through.
pub fn weather_phrase(value: &str) -> String {
    match value.trim().to_lowercase().as_str() {
        "clear" => String::from("Clear skies"),
        "rain" => String::from("Rainy"),
        "fog" => String::from("Foggy"),
        "snow" => String::from("Snowy"),
        "dust" => String::from("Dusty"),
        _ => value.to_string(),
    }
}

/// All comment fragments. Any subset may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentFragments {
    /// Instrument reading or model note, printed on its own first line.
    pub instrument_note: Option<String>,

    pub quick_phrases: PhraseSelection,

    /// Free text typed by the user.
    pub manual_note: Option<String>,

    /// Weather choice, see [`weather_phrase`].
    pub weather: Option<String>,

    /// Scene description returned by the vision service.
    pub ai_scene: Option<String>,

    pub wind: Wind,

    /// Position relative to the incident site and the wind.
    pub wind_relative: Option<String>,
}

impl CommentFragments {
    /// Reset every field.
    pub fn clear(&mut self) {
        *self = CommentFragments::default();
    }
}
