use chrono::Utc;

use scentmap_core::payments::{PaymentConfirmRequest, PaymentRecord, PaymentSummary};
use scentmap_store::FirestoreClient;

use crate::client::TossClient;
use crate::error::PaymentError;

/// Validates, confirms with the gateway, and writes an audit record.
///
/// The audit write is best-effort: a store failure is logged and the
/// confirmed summary is still returned.
///
/// # Errors
///
/// - [`PaymentError::InvalidRequest`] naming the first bad field.
/// - Any error from [`TossClient::confirm`].
pub async fn confirm_and_record(
    toss: &TossClient,
    store: &FirestoreClient,
    request: &PaymentConfirmRequest,
) -> Result<PaymentSummary, PaymentError> {
    if let Some(field) = request.missing_field() {
        return Err(PaymentError::InvalidRequest(field));
    }

    let confirmed = toss.confirm(request).await?;
    tracing::info!(
        order_id = %confirmed.order_id,
        amount = confirmed.total_amount,
        status = %confirmed.status,
        "payment confirmed"
    );

    let record = PaymentRecord::from_confirmed(&confirmed, Utc::now());
    match store.add_payment_record(&record).await {
        Ok(id) => tracing::debug!(id = %id, order_id = %record.order_id, "payment record stored"),
        Err(e) => tracing::error!(
            order_id = %record.order_id,
            error = %e,
            "failed to store payment record"
        ),
    }

    Ok(PaymentSummary::from(&confirmed))
}
