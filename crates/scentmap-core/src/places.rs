use serde::{Deserialize, Deserializer, Serialize};

use crate::enhanced::EnhancedPlaceData;
use crate::images;

/// Reads an explicit `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Closed set of place categories. Serialized lowercase, matching the
/// values stored in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cafe,
    Culture,
    Nature,
    Coastal,
    Urban,
    Traditional,
    Festival,
    Gallery,
    Mountain,
    Unique,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Cafe,
        Category::Culture,
        Category::Nature,
        Category::Coastal,
        Category::Urban,
        Category::Traditional,
        Category::Festival,
        Category::Gallery,
        Category::Mountain,
        Category::Unique,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Cafe => "cafe",
            Category::Culture => "culture",
            Category::Nature => "nature",
            Category::Coastal => "coastal",
            Category::Urban => "urban",
            Category::Traditional => "traditional",
            Category::Festival => "festival",
            Category::Gallery => "gallery",
            Category::Mountain => "mountain",
            Category::Unique => "unique",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Short region name such as `"서울"` or `"제주"`; matched exactly by the
    /// province filter.
    pub region: String,
    /// Full street address; city and district filters match substrings of it.
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureScent {
    pub name: String,
    /// Notes in authoring order (top notes first by convention).
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub opening_hours: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub best_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tips: String,
}

/// A curated catalog entry.
///
/// Optional collections (`tags`, `images`) default to empty rather than being
/// nullable, so read sites never need to special-case their absence. A stored
/// `null` decodes the same as a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotplaceDestination {
    /// Store document id. Empty for drafts that have not been persisted yet.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: Category,
    pub location: Location,
    pub description: String,
    pub special_feature: String,
    pub atmosphere: String,
    pub signature_scent: SignatureScent,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visit_info: VisitInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transportation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_fragrance: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_data: Option<EnhancedPlaceData>,
}

impl HotplaceDestination {
    /// Generate a URL-safe slug from the place name.
    ///
    /// Non-ASCII characters are dropped, so a purely Korean name yields an
    /// empty slug; image file names come from
    /// [`HotplaceDestination::image_stem`] instead.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// File stem used for auto-assigned images; see [`images::image_file_stem`].
    #[must_use]
    pub fn image_stem(&self) -> String {
        images::image_file_stem(&self.name)
    }

    #[must_use]
    pub fn is_enhanced(&self) -> bool {
        self.enhanced_data.is_some()
    }
}
