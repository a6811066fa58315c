//! Catalog filter, statistics, and free-text search.
//!
//! Every function here is pure: inputs are borrowed, never mutated, and the
//! output preserves catalog order. Matching is substring based and favours
//! recall over precision, so short notes or tags can match unrelated longer
//! strings (e.g. a one-syllable note inside a compound word).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::filters::ScentMapFilters;
use crate::places::{Category, HotplaceDestination};

/// Aggregate counts over a (usually already filtered) sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub total: usize,
    pub by_category: HashMap<Category, usize>,
    pub by_region: HashMap<String, usize>,
    pub featured: usize,
}

/// Return the entries of `catalog` that pass every active filter dimension,
/// in their original order.
#[must_use]
pub fn filter_hotplaces(
    catalog: &[HotplaceDestination],
    filters: &ScentMapFilters,
) -> Vec<HotplaceDestination> {
    catalog
        .iter()
        .filter(|place| matches_filters(place, filters))
        .cloned()
        .collect()
}

/// `true` when `place` passes every active dimension of `filters`.
///
/// Dimensions are checked in a fixed order and the first failure wins.
#[must_use]
pub fn matches_filters(place: &HotplaceDestination, filters: &ScentMapFilters) -> bool {
    matches_region(place, filters)
        && matches_category(place, filters)
        && matches_scent_notes(place, filters)
        && matches_atmosphere(place, filters)
        && matches_tags(place, filters)
        && matches_features(place, filters)
}

fn matches_region(place: &HotplaceDestination, filters: &ScentMapFilters) -> bool {
    let region = &filters.region;
    if let Some(province) = region.province() {
        if place.location.region != province {
            return false;
        }
    }
    if let Some(city) = region.city() {
        if !place.location.address.contains(city) {
            return false;
        }
    }
    if let Some(district) = region.district() {
        if !place.location.address.contains(district) {
            return false;
        }
    }
    true
}

fn matches_category(place: &HotplaceDestination, filters: &ScentMapFilters) -> bool {
    filters.categories.is_empty() || filters.categories.contains(&place.category)
}

fn matches_scent_notes(place: &HotplaceDestination, filters: &ScentMapFilters) -> bool {
    if filters.scent_notes.is_empty() {
        return true;
    }

    let place_notes: Vec<String> = place
        .signature_scent
        .notes
        .iter()
        .map(|n| n.to_lowercase())
        .collect();

    filters.scent_notes.selected().any(|selected| {
        let selected = selected.to_lowercase();
        place_notes.iter().any(|note| contains_either_way(note, &selected))
    })
}

fn matches_atmosphere(place: &HotplaceDestination, filters: &ScentMapFilters) -> bool {
    if filters.atmosphere.is_empty() {
        return true;
    }

    filters.atmosphere.iter().any(|term| {
        place.atmosphere.contains(term.as_str())
            || place.description.contains(term.as_str())
            || place.special_feature.contains(term.as_str())
    })
}

fn matches_tags(place: &HotplaceDestination, filters: &ScentMapFilters) -> bool {
    if filters.tags.is_empty() {
        return true;
    }

    let place_tags: Vec<String> = place.tags.iter().map(|t| t.to_lowercase()).collect();
    let name = place.name.to_lowercase();
    let description = place.description.to_lowercase();
    let special_feature = place.special_feature.to_lowercase();

    filters.tags.iter().any(|selected| {
        let selected = selected.to_lowercase();
        place_tags.iter().any(|tag| contains_either_way(tag, &selected))
            || name.contains(&selected)
            || description.contains(&selected)
            || special_feature.contains(&selected)
    })
}

fn matches_features(place: &HotplaceDestination, filters: &ScentMapFilters) -> bool {
    !filters.features.featured || place.featured
}

/// Bidirectional containment, so `"우디"` and `"우디향"` match each other.
/// Both sides must already be lowercased.
fn contains_either_way(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Count entries in total, per category, per region, and featured.
#[must_use]
pub fn filter_stats(entries: &[HotplaceDestination]) -> FilterStats {
    let mut stats = FilterStats {
        total: entries.len(),
        ..FilterStats::default()
    };

    for place in entries {
        *stats.by_category.entry(place.category).or_insert(0) += 1;
        *stats
            .by_region
            .entry(place.location.region.clone())
            .or_insert(0) += 1;
        if place.featured {
            stats.featured += 1;
        }
    }

    stats
}

/// `true` when at least one dimension of `filters` would restrict results.
///
/// Advisory only: callers use it to decide whether to offer a "clear filters"
/// action.
#[must_use]
pub fn has_active_filters(filters: &ScentMapFilters) -> bool {
    !filters.region.is_empty()
        || !filters.categories.is_empty()
        || !filters.scent_notes.is_empty()
        || !filters.atmosphere.is_empty()
        || !filters.tags.is_empty()
        || filters.features.any()
}

/// Case-insensitive keyword search across the text fields of each entry.
///
/// An empty or whitespace-only term returns `entries` unchanged. The term is
/// matched as given (lowercased, not trimmed).
#[must_use]
pub fn search_places(entries: &[HotplaceDestination], term: &str) -> Vec<HotplaceDestination> {
    if term.trim().is_empty() {
        return entries.to_vec();
    }

    let term = term.to_lowercase();
    entries
        .iter()
        .filter(|place| matches_search(place, &term))
        .cloned()
        .collect()
}

fn matches_search(place: &HotplaceDestination, term: &str) -> bool {
    [
        place.name.as_str(),
        place.description.as_str(),
        place.location.address.as_str(),
        place.signature_scent.name.as_str(),
        place.atmosphere.as_str(),
        place.special_feature.as_str(),
    ]
    .into_iter()
    .chain(place.tags.iter().map(String::as_str))
    .any(|field| field.to_lowercase().contains(term))
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
