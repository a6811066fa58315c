use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use scentmap_core::{EnhancedPlaceData, HotplaceDestination};
use scentmap_curator::{
    batch_enhance as run_batch, convert_and_validate, enhance_by_id, BatchReport, GeminiClient,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_curator_error, not_configured, ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct ConvertRequest {
    pub natural_language_data: Option<String>,
    pub import: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ConvertResponse {
    places: Vec<HotplaceDestination>,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    imported_ids: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct EnhanceRequest {
    pub place_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EnhanceResponse {
    original_data: HotplaceDestination,
    enhanced_data: EnhancedPlaceData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct BatchRequest {
    pub only_failed: bool,
    pub check_only: bool,
}

fn gemini<'a>(state: &'a AppState, req_id: &str) -> Result<&'a GeminiClient, ApiError> {
    state
        .gemini
        .as_ref()
        .ok_or_else(|| not_configured(req_id.to_owned(), "Gemini API key is not configured"))
}

fn required(value: Option<&str>, field: &str, req_id: &str) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} is required"),
        )),
    }
}

/// POST /api/v1/convert
pub(super) async fn convert(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ConvertResponse>>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::new(&req_id.0, "validation_error", e.body_text()))?;
    let text = required(
        body.natural_language_data.as_deref(),
        "naturalLanguageData",
        &req_id.0,
    )?;
    let client = gemini(&state, &req_id.0)?;

    let report = convert_and_validate(client, &text)
        .await
        .map_err(|e| map_curator_error(req_id.0.clone(), &e))?;
    let mut warnings = report.warnings();

    if report.accepted.is_empty() {
        let details = serde_json::to_value(&report.rejected).unwrap_or_default();
        return Err(ApiError::new(
            req_id.0,
            "unprocessable",
            "no valid places could be extracted",
        )
        .with_details(details));
    }

    let imported_ids = if body.import {
        let mut ids = Vec::with_capacity(report.accepted.len());
        for place in &report.accepted {
            match state.store.add(place).await {
                Ok(id) => ids.push(id),
                Err(e) => {
                    tracing::warn!(name = %place.name, error = %e, "failed to import converted place");
                    warnings.push(format!("import failed for {}: {e}", place.name));
                }
            }
        }
        state.catalog.invalidate().await;
        tracing::info!(
            imported = ids.len(),
            accepted = report.accepted.len(),
            "imported converted places"
        );
        Some(ids)
    } else {
        None
    };

    Ok(ApiResponse::ok(
        req_id.0,
        ConvertResponse {
            places: report.accepted,
            warnings,
            imported_ids,
        },
    ))
}

/// POST /api/v1/enhance-place
pub(super) async fn enhance_place(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<EnhanceResponse>>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::new(&req_id.0, "validation_error", e.body_text()))?;
    let place_id = required(body.place_id.as_deref(), "placeId", &req_id.0)?;
    let client = gemini(&state, &req_id.0)?;

    let (original_data, enhanced_data) = enhance_by_id(client, &state.store, &place_id)
        .await
        .map_err(|e| map_curator_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::ok(
        req_id.0,
        EnhanceResponse {
            original_data,
            enhanced_data,
        },
    ))
}

/// POST /api/v1/batch-enhance
pub(super) async fn batch_enhance(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BatchReport>>, ApiError> {
    // An empty POST runs with the default flags.
    let body = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => BatchRequest::default(),
        Err(e) => return Err(ApiError::new(&req_id.0, "validation_error", e.body_text())),
    };
    let client = gemini(&state, &req_id.0)?;

    let mut options = state.batch;
    options.only_failed = body.only_failed;
    options.check_only = body.check_only;

    let report = run_batch(client, &state.store, options)
        .await
        .map_err(|e| map_curator_error(req_id.0.clone(), &e))?;
    if !options.check_only {
        state.catalog.invalidate().await;
    }

    Ok(ApiResponse::ok(req_id.0, report))
}
