use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client request to confirm a payment the widget has authorized.
///
/// Fields default so that a partial payload decodes and is then rejected by
/// [`PaymentConfirmRequest::missing_field`] with a precise message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentConfirmRequest {
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
}

impl PaymentConfirmRequest {
    /// First field that is blank or non-positive, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.payment_key.trim().is_empty() {
            Some("paymentKey")
        } else if self.order_id.trim().is_empty() {
            Some("orderId")
        } else if self.amount <= 0 {
            Some("amount")
        } else {
            None
        }
    }
}

/// The parts of the gateway's confirmed-payment object this system uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedPayment {
    pub payment_key: String,
    pub order_id: String,
    #[serde(default)]
    pub order_name: String,
    pub total_amount: i64,
    #[serde(default)]
    pub method: Option<String>,
    pub status: String,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub card: Option<serde_json::Value>,
    #[serde(default)]
    pub virtual_account: Option<serde_json::Value>,
    #[serde(default)]
    pub transfer: Option<serde_json::Value>,
    #[serde(default)]
    pub receipt: Option<serde_json::Value>,
}

/// Audit document written to the `payments` collection after confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub payment_key: String,
    pub order_id: String,
    pub order_name: String,
    pub amount: i64,
    pub method: Option<String>,
    pub status: String,
    pub requested_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub customer_name: String,
    pub customer_email: String,
    pub card: Option<serde_json::Value>,
    pub virtual_account: Option<serde_json::Value>,
    pub transfer: Option<serde_json::Value>,
    pub receipt: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Build the audit record, filling absent customer fields with `""`.
    #[must_use]
    pub fn from_confirmed(payment: &ConfirmedPayment, now: DateTime<Utc>) -> Self {
        Self {
            payment_key: payment.payment_key.clone(),
            order_id: payment.order_id.clone(),
            order_name: payment.order_name.clone(),
            amount: payment.total_amount,
            method: payment.method.clone(),
            status: payment.status.clone(),
            requested_at: payment.requested_at,
            approved_at: payment.approved_at,
            customer_name: payment.customer_name.clone().unwrap_or_default(),
            customer_email: payment.customer_email.clone().unwrap_or_default(),
            card: payment.card.clone(),
            virtual_account: payment.virtual_account.clone(),
            transfer: payment.transfer.clone(),
            receipt: payment.receipt.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// What the client gets back after a successful confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub payment_key: String,
    pub order_id: String,
    pub order_name: String,
    pub amount: i64,
    pub method: Option<String>,
    pub status: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl From<&ConfirmedPayment> for PaymentSummary {
    fn from(payment: &ConfirmedPayment) -> Self {
        Self {
            payment_key: payment.payment_key.clone(),
            order_id: payment.order_id.clone(),
            order_name: payment.order_name.clone(),
            amount: payment.total_amount,
            method: payment.method.clone(),
            status: payment.status.clone(),
            customer_name: payment.customer_name.clone(),
            customer_email: payment.customer_email.clone(),
            approved_at: payment.approved_at,
        }
    }
}
