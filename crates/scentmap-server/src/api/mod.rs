mod curation;
mod payments;
mod places;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use scentmap_curator::{BatchOptions, CuratorError, GeminiClient};
use scentmap_payments::{PaymentError, TossClient};
use scentmap_store::FirestoreClient;
use serde::Serialize;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::catalog_cache::CatalogCache;
use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogCache,
    pub store: FirestoreClient,
    /// `None` when no Gemini key is configured.
    pub gemini: Option<GeminiClient>,
    /// `None` when no gateway secret is configured.
    pub toss: Option<TossClient>,
    /// Batch size and delay for `/batch-enhance`; per-request flags override
    /// the rest.
    pub batch: BatchOptions,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: ErrorBody,
    pub meta: ResponseMeta,
    /// Overrides the status derived from `error.code`.
    #[serde(skip)]
    status: Option<StatusCode>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn ok(request_id: String, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
            meta: ResponseMeta::new(request_id.into()),
            status: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    fn status(&self) -> StatusCode {
        if let Some(status) = self.status {
            return status;
        }
        match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "unprocessable" => StatusCode::UNPROCESSABLE_ENTITY,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

pub(super) fn map_curator_error(request_id: String, error: &CuratorError) -> ApiError {
    match error {
        CuratorError::NotConfigured => not_configured(request_id, "Gemini API key is not configured"),
        CuratorError::PlaceNotFound(id) => {
            ApiError::new(request_id, "not_found", format!("place '{id}' not found"))
        }
        CuratorError::EmptyCatalog => {
            ApiError::new(request_id, "unprocessable", "the catalog has no places to enhance")
        }
        CuratorError::QuotaExceeded(_) | CuratorError::RateLimited(_) => {
            tracing::warn!(error = %error, "Gemini throttled the request");
            ApiError::new(request_id, "rate_limited", error.to_string())
        }
        CuratorError::Http(_)
        | CuratorError::UnexpectedStatus { .. }
        | CuratorError::EmptyResponse
        | CuratorError::Truncated { .. }
        | CuratorError::MalformedJson { .. }
        | CuratorError::MissingField(_) => {
            tracing::error!(error = %error, "Gemini request failed");
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
        CuratorError::Store(e) => map_store_error(request_id, e),
        CuratorError::InvalidBaseUrl(_) => {
            tracing::error!(error = %error, "Gemini client misconfigured");
            ApiError::new(request_id, "internal_error", "AI service is misconfigured")
        }
    }
}

pub(super) fn map_store_error(request_id: String, error: &scentmap_store::StoreError) -> ApiError {
    tracing::error!(error = %error, "catalog store request failed");
    ApiError::new(request_id, "upstream_error", "catalog store request failed")
}

pub(super) fn map_payment_error(request_id: String, error: &PaymentError) -> ApiError {
    match error {
        PaymentError::NotConfigured => {
            tracing::error!("payment confirmation attempted without a gateway secret key");
            not_configured(request_id, "payment gateway is not configured")
        }
        PaymentError::InvalidRequest(field) => ApiError::new(
            request_id,
            "validation_error",
            format!("missing or invalid parameter: {field}"),
        ),
        PaymentError::Rejected {
            status,
            code,
            message,
        } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            let code = if code.is_empty() {
                "payment_rejected"
            } else {
                code.as_str()
            };
            let message = if message.is_empty() {
                "payment confirmation failed"
            } else {
                message.as_str()
            };
            ApiError::new(request_id, code, message).with_status(status)
        }
        PaymentError::Http(_) | PaymentError::Deserialize { .. } => {
            tracing::error!(error = %error, "payment gateway request failed");
            ApiError::new(request_id, "upstream_error", "payment gateway request failed")
        }
        PaymentError::InvalidBaseUrl(_) => {
            tracing::error!(error = %error, "payment client misconfigured");
            ApiError::new(request_id, "internal_error", "payment gateway is misconfigured")
        }
    }
}

fn not_configured(request_id: String, message: &str) -> ApiError {
    ApiError::new(request_id, "not_configured", message)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn admin_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/convert", post(curation::convert))
        .route("/api/v1/enhance-place", post(curation::enhance_place))
        .route("/api/v1/batch-enhance", post(curation::batch_enhance))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/places", get(places::list_places))
        .route("/api/v1/places/search", post(places::search_places_handler))
        .route("/api/v1/places/{id}", get(places::get_place))
        .route("/api/v1/payments/confirm", post(payments::confirm_payment));

    Router::new()
        .merge(public_routes)
        .merge(admin_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            ApiResponse::ok(
                req_id.0,
                HealthData {
                    status: "ok",
                    store: "ok",
                },
            ),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiResponse::ok(
                    req_id.0,
                    HealthData {
                        status: "degraded",
                        store: "unavailable",
                    },
                ),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(30, Duration::from_secs(60))
}

#[cfg(test)]
mod tests;
