use serde::{Deserialize, Serialize};

use crate::places::Category;

/// Query selector applied by [`crate::filter::filter_hotplaces`].
///
/// Every dimension is opt-in: the `Default` value selects the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScentMapFilters {
    pub region: RegionFilter,
    pub categories: Vec<Category>,
    pub scent_notes: ScentNoteFilter,
    pub atmosphere: Vec<String>,
    pub tags: Vec<String>,
    pub features: FeatureFilter,
}

/// Province → city → district drill-down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionFilter {
    /// Compared for equality with `location.region`.
    pub province: Option<String>,
    /// Substring of `location.address`.
    pub city: Option<String>,
    /// Substring of `location.address`.
    pub district: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScentNoteFilter {
    pub top_notes: Vec<String>,
    pub middle_notes: Vec<String>,
    pub base_notes: Vec<String>,
}

impl ScentNoteFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top_notes.is_empty() && self.middle_notes.is_empty() && self.base_notes.is_empty()
    }

    /// All selected notes, top then middle then base.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.top_notes
            .iter()
            .chain(&self.middle_notes)
            .chain(&self.base_notes)
            .map(String::as_str)
    }
}

/// Boolean toggles. Only `featured` is backed by catalog data today; the rest
/// count towards [`crate::filter::has_active_filters`] but never exclude.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFilter {
    pub featured: bool,
    pub has_parking: bool,
    pub has_wifi: bool,
    pub pet_friendly: bool,
    pub wheelchair: bool,
    pub reservation: bool,
}

impl FeatureFilter {
    #[must_use]
    pub fn any(&self) -> bool {
        self.featured
            || self.has_parking
            || self.has_wifi
            || self.pet_friendly
            || self.wheelchair
            || self.reservation
    }
}

impl RegionFilter {
    /// Province, ignoring empty strings.
    #[must_use]
    pub fn province(&self) -> Option<&str> {
        non_empty(self.province.as_deref())
    }

    #[must_use]
    pub fn city(&self) -> Option<&str> {
        non_empty(self.city.as_deref())
    }

    #[must_use]
    pub fn district(&self) -> Option<&str> {
        non_empty(self.district.as_deref())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.province().is_none() && self.city().is_none() && self.district().is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
