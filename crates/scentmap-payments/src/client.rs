//! HTTP client for the Toss Payments confirmation endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use scentmap_core::app_config::TossSettings;
use scentmap_core::payments::{ConfirmedPayment, PaymentConfirmRequest};

use crate::error::PaymentError;

const CONFIRM_PATH: &str = "v1/payments/confirm";

/// Client for the payment gateway.
///
/// Use [`TossClient::new`] with loaded settings, or
/// [`TossClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct TossClient {
    client: Client,
    secret_key: String,
    confirm_url: Url,
}

impl std::fmt::Debug for TossClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TossClient")
            .field("secret_key", &"[redacted]")
            .field("confirm_url", &self.confirm_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Deserialize)]
struct GatewayError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl TossClient {
    /// Creates a client from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::NotConfigured`] when no secret key is set,
    /// [`PaymentError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`PaymentError::InvalidBaseUrl`] for a malformed base URL.
    pub fn new(settings: &TossSettings, timeout_secs: u64) -> Result<Self, PaymentError> {
        let secret = settings
            .secret_key
            .as_deref()
            .ok_or(PaymentError::NotConfigured)?;
        Self::with_base_url(secret, timeout_secs, &settings.base_url)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`PaymentError::InvalidBaseUrl`] if the URL is invalid.
    pub fn with_base_url(
        secret_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("scentmap/0.1 (payments)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let confirm_url = Url::parse(&normalised)
            .and_then(|base| base.join(CONFIRM_PATH))
            .map_err(|e| PaymentError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            secret_key: secret_key.to_owned(),
            confirm_url,
        })
    }

    /// Confirms a widget-authorized payment with the gateway.
    ///
    /// Authenticates with HTTP Basic using the secret key and an empty
    /// password.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::Rejected`] for any non-2xx reply, carrying the
    ///   gateway's status, code and message.
    /// - [`PaymentError::Http`] on network failure.
    /// - [`PaymentError::Deserialize`] if the confirmed payment is malformed.
    pub async fn confirm(
        &self,
        request: &PaymentConfirmRequest,
    ) -> Result<ConfirmedPayment, PaymentError> {
        let response = self
            .client
            .post(self.confirm_url.clone())
            .basic_auth(&self.secret_key, Some(""))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let gateway: GatewayError = serde_json::from_str(&body).unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                code = %gateway.code,
                order_id = %request.order_id,
                "payment confirmation rejected"
            );
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                code: gateway.code,
                message: gateway.message,
            });
        }

        serde_json::from_str(&body).map_err(|e| PaymentError::Deserialize {
            context: format!("confirmed payment for order {}", request.order_id),
            source: e,
        })
    }
}
