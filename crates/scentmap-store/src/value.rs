//! Firestore typed-value codec.
//!
//! The REST API wraps every field in a one-key object naming its type
//! (`{"stringValue": "..."}`, `{"mapValue": {"fields": {...}}}`). These
//! helpers translate between that encoding and plain `serde_json::Value`,
//! which the domain types already know how to (de)serialize.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number};

/// One Firestore field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue(()),
    BooleanValue(bool),
    /// Firestore sends 64-bit integers as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

pub type Fields = BTreeMap<String, FirestoreValue>;

/// A stored document as returned by `GET`, `POST`, `PATCH`, and list calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name; the document id is its last path segment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Fields as a plain JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        fields_to_json(&self.fields)
    }
}

/// Timestamp in the RFC 3339 form Firestore expects.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> FirestoreValue {
    FirestoreValue::TimestampValue(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

#[must_use]
pub fn fields_to_json(fields: &Fields) -> serde_json::Value {
    let object: Map<String, serde_json::Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), to_json(v)))
        .collect();
    serde_json::Value::Object(object)
}

/// Decode one typed value.
///
/// Integers that do not fit `i64` and timestamps come back as strings.
#[must_use]
pub fn to_json(value: &FirestoreValue) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        FirestoreValue::NullValue(()) => Json::Null,
        FirestoreValue::BooleanValue(b) => Json::Bool(*b),
        FirestoreValue::IntegerValue(raw) => raw
            .parse::<i64>()
            .map_or_else(|_| Json::String(raw.clone()), |n| Json::Number(n.into())),
        FirestoreValue::DoubleValue(d) => Number::from_f64(*d).map_or(Json::Null, Json::Number),
        FirestoreValue::TimestampValue(s)
        | FirestoreValue::StringValue(s)
        | FirestoreValue::BytesValue(s)
        | FirestoreValue::ReferenceValue(s) => Json::String(s.clone()),
        FirestoreValue::GeoPointValue(point) => serde_json::json!({
            "latitude": point.latitude,
            "longitude": point.longitude,
        }),
        FirestoreValue::ArrayValue(array) => {
            Json::Array(array.values.iter().map(to_json).collect())
        }
        FirestoreValue::MapValue(map) => fields_to_json(&map.fields),
    }
}

/// Encode a plain JSON value. Whole numbers become `integerValue`, the rest
/// `doubleValue`.
#[must_use]
pub fn from_json(value: &serde_json::Value) -> FirestoreValue {
    use serde_json::Value as Json;

    match value {
        Json::Null => FirestoreValue::NullValue(()),
        Json::Bool(b) => FirestoreValue::BooleanValue(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                FirestoreValue::IntegerValue(i.to_string())
            } else if let Some(u) = n.as_u64() {
                FirestoreValue::IntegerValue(u.to_string())
            } else {
                FirestoreValue::DoubleValue(n.as_f64().unwrap_or_default())
            }
        }
        Json::String(s) => FirestoreValue::StringValue(s.clone()),
        Json::Array(items) => FirestoreValue::ArrayValue(ArrayValue {
            values: items.iter().map(from_json).collect(),
        }),
        Json::Object(object) => FirestoreValue::MapValue(MapValue {
            fields: object_to_fields(object),
        }),
    }
}

#[must_use]
pub fn object_to_fields(object: &Map<String, serde_json::Value>) -> Fields {
    object
        .iter()
        .map(|(k, v)| (k.clone(), from_json(v)))
        .collect()
}
