use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use scentmap_core::{PaymentConfirmRequest, PaymentSummary};
use scentmap_payments::{confirm_and_record, PaymentError};

use crate::middleware::RequestId;

use super::{map_payment_error, not_configured, ApiError, ApiResponse, AppState};

/// POST /api/v1/payments/confirm
pub(super) async fn confirm_payment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<PaymentConfirmRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PaymentSummary>>, ApiError> {
    let Json(request) =
        body.map_err(|e| ApiError::new(&req_id.0, "validation_error", e.body_text()))?;

    if let Some(field) = request.missing_field() {
        return Err(map_payment_error(
            req_id.0,
            &PaymentError::InvalidRequest(field),
        ));
    }

    let Some(toss) = state.toss.as_ref() else {
        tracing::error!("payment confirmation attempted without a gateway secret key");
        return Err(not_configured(req_id.0, "payment gateway is not configured"));
    };

    let summary = confirm_and_record(toss, &state.store, &request)
        .await
        .map_err(|e| map_payment_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::ok(req_id.0, summary))
}
