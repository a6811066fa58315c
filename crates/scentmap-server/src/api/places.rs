use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use scentmap_core::{
    filter_hotplaces, filter_stats, has_active_filters, search_places, Category, FilterStats,
    HotplaceDestination, ScentMapFilters,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// Query string for `GET /api/v1/places`. List values are comma-separated.
#[derive(Debug, Default, Deserialize)]
pub(super) struct PlacesQuery {
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub categories: Option<String>,
    pub top_notes: Option<String>,
    pub middle_notes: Option<String>,
    pub base_notes: Option<String>,
    pub atmosphere: Option<String>,
    pub tags: Option<String>,
    pub featured: Option<bool>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SearchRequest {
    pub filters: ScentMapFilters,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PlaceListing {
    places: Vec<HotplaceDestination>,
    stats: FilterStats,
    has_active_filters: bool,
}

impl PlacesQuery {
    fn to_filters(&self, req_id: &str) -> Result<ScentMapFilters, ApiError> {
        let categories = split_list(self.categories.as_deref())
            .into_iter()
            .map(|raw| {
                raw.parse::<Category>()
                    .map_err(|e| ApiError::new(req_id, "validation_error", e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut filters = ScentMapFilters {
            categories,
            atmosphere: split_list(self.atmosphere.as_deref()),
            tags: split_list(self.tags.as_deref()),
            ..ScentMapFilters::default()
        };
        filters.region.province.clone_from(&self.province);
        filters.region.city.clone_from(&self.city);
        filters.region.district.clone_from(&self.district);
        filters.scent_notes.top_notes = split_list(self.top_notes.as_deref());
        filters.scent_notes.middle_notes = split_list(self.middle_notes.as_deref());
        filters.scent_notes.base_notes = split_list(self.base_notes.as_deref());
        filters.features.featured = self.featured.unwrap_or(false);
        Ok(filters)
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Filters first, then narrows by keyword.
fn listing(
    catalog: &[HotplaceDestination],
    filters: &ScentMapFilters,
    q: Option<&str>,
) -> PlaceListing {
    let filtered = filter_hotplaces(catalog, filters);
    let places = match q {
        Some(term) => search_places(&filtered, term),
        None => filtered,
    };
    PlaceListing {
        stats: filter_stats(&places),
        has_active_filters: has_active_filters(filters),
        places,
    }
}

/// GET /api/v1/places
pub(super) async fn list_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<PlacesQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<PlaceListing>>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::new(&req_id.0, "validation_error", e.body_text()))?;
    let filters = query.to_filters(&req_id.0)?;

    let catalog = state.catalog.places().await;
    let data = listing(&catalog, &filters, query.q.as_deref());
    Ok(ApiResponse::ok(req_id.0, data))
}

/// POST /api/v1/places/search
pub(super) async fn search_places_handler(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PlaceListing>>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::new(&req_id.0, "validation_error", e.body_text()))?;

    let catalog = state.catalog.places().await;
    let data = listing(&catalog, &body.filters, body.q.as_deref());
    Ok(ApiResponse::ok(req_id.0, data))
}

/// GET /api/v1/places/{id}
pub(super) async fn get_place(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<HotplaceDestination>>, ApiError> {
    match state.catalog.find(&id).await {
        Some(place) => Ok(ApiResponse::ok(req_id.0, place)),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("place '{id}' not found"),
        )),
    }
}
