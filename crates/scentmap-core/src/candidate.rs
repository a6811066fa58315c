//! Structural validation of machine-generated place candidates.
//!
//! Conversion output is untrusted JSON. Each candidate is checked for every
//! field a catalog entry carries before it is decoded, and candidates that
//! fail are reported with a reason rather than dropped.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::places::HotplaceDestination;

const REQUIRED_FIELDS: [&str; 12] = [
    "name",
    "category",
    "location",
    "description",
    "specialFeature",
    "atmosphere",
    "signatureScent",
    "visitInfo",
    "transportation",
    "images",
    "tags",
    "featured",
];

const LOCATION_FIELDS: [&str; 3] = ["region", "address", "coordinates"];
const COORDINATE_FIELDS: [&str; 2] = ["lat", "lng"];
const SCENT_FIELDS: [&str; 3] = ["name", "notes", "experience"];
const VISIT_FIELDS: [&str; 3] = ["openingHours", "bestTime", "tips"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("{0} is not a JSON object")]
    NotAnObject(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid field value: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedCandidate {
    /// Position in the converted array, starting at 0.
    pub index: usize,
    pub name: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for RejectedCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "candidate {} ({}): {}",
            self.index + 1,
            self.name.as_deref().unwrap_or("unnamed"),
            self.reason
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateReport {
    pub accepted: Vec<HotplaceDestination>,
    pub rejected: Vec<RejectedCandidate>,
}

impl CandidateReport {
    /// Rejections rendered as human-readable lines.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.rejected.iter().map(ToString::to_string).collect()
    }
}

/// Validate every candidate and split them into accepted drafts and rejects.
///
/// Accepted entries always have an empty `id`; the store assigns one on add.
#[must_use]
pub fn validate_candidates(candidates: Vec<Value>) -> CandidateReport {
    let mut report = CandidateReport::default();

    for (index, candidate) in candidates.into_iter().enumerate() {
        let name = candidate
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);

        match validate_candidate(candidate) {
            Ok(place) => report.accepted.push(place),
            Err(e) => report.rejected.push(RejectedCandidate {
                index,
                name,
                reason: e.to_string(),
            }),
        }
    }

    report
}

/// Check one candidate's shape, then decode it.
///
/// # Errors
///
/// Returns the first structural problem found, or a decode error when the
/// shape is complete but a value has the wrong type.
pub fn validate_candidate(candidate: Value) -> Result<HotplaceDestination, CandidateError> {
    let root = as_object(&candidate, "candidate")?;
    require_fields(root, &REQUIRED_FIELDS, "")?;

    let location = as_object(&root["location"], "location")?;
    require_fields(location, &LOCATION_FIELDS, "location.")?;

    let coordinates = as_object(&location["coordinates"], "location.coordinates")?;
    require_fields(coordinates, &COORDINATE_FIELDS, "location.coordinates.")?;

    let scent = as_object(&root["signatureScent"], "signatureScent")?;
    require_fields(scent, &SCENT_FIELDS, "signatureScent.")?;

    let visit = as_object(&root["visitInfo"], "visitInfo")?;
    require_fields(visit, &VISIT_FIELDS, "visitInfo.")?;

    let mut place: HotplaceDestination =
        serde_json::from_value(candidate).map_err(|e| CandidateError::Decode(e.to_string()))?;
    place.id.clear();
    Ok(place)
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, CandidateError> {
    value
        .as_object()
        .ok_or_else(|| CandidateError::NotAnObject(path.to_string()))
}

fn require_fields(
    object: &Map<String, Value>,
    fields: &[&str],
    prefix: &str,
) -> Result<(), CandidateError> {
    match fields.iter().find(|f| !object.contains_key(**f)) {
        Some(missing) => Err(CandidateError::MissingField(format!("{prefix}{missing}"))),
        None => Ok(()),
    }
}
