//! Enriched place content produced by the AI enhancement pipeline.
//!
//! Only `enhanced_description` and `detailed_scent_profile` are required;
//! model replies routinely omit the remaining sections, so they default.

use serde::{Deserialize, Deserializer, Serialize};

use crate::places::null_as_default;

/// Intensity used when the model returns something that is not a number.
pub const DEFAULT_SCENT_INTENSITY: u8 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedPlaceData {
    pub enhanced_description: String,
    pub detailed_scent_profile: DetailedScentProfile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub atmosphere_details: AtmosphereDetails,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visit_experience: VisitExperience,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scent_journey_story: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nearby_recommendations: Vec<NearbyRecommendation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pairing_recommendations: PairingRecommendations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedScentProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_notes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub middle_notes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_notes: Vec<String>,
    /// 1–10. Accepts a JSON number or a numeric string.
    #[serde(
        default = "default_intensity",
        deserialize_with = "deserialize_intensity"
    )]
    pub scent_intensity: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scent_duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seasonal_recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtmosphereDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub visual_elements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub soundscape: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tactile_elements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_mood: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitExperience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub best_time_to_visit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_stay_duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crowd_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo_spots: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub insider_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRecommendation {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub walking_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairingRecommendations {
    #[serde(default, deserialize_with = "null_as_default")]
    pub perfumes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub candles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub music: Vec<String>,
}

fn default_intensity() -> u8 {
    DEFAULT_SCENT_INTENSITY
}

fn deserialize_intensity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_intensity(&raw))
}

/// Coerce a loosely-typed intensity into `1..=10`.
///
/// Numbers are rounded and clamped; strings use their leading integer
/// (`"7"`, `"8/10"`); anything else yields [`DEFAULT_SCENT_INTENSITY`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn coerce_intensity(raw: &serde_json::Value) -> u8 {
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse::<f64>().ok()
        }
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v.round().clamp(1.0, 10.0) as u8,
        _ => DEFAULT_SCENT_INTENSITY,
    }
}
