use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;
const API_KEYS_VAR: &str = "SCENTMAP_API_KEYS";

/// Request correlation id, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer keys accepted on the admin routes.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<HashSet<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Reads comma-separated keys from `SCENTMAP_API_KEYS`.
    ///
    /// With no keys, development runs unauthenticated and every other
    /// environment refuses to start.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        Self::from_raw(std::env::var(API_KEYS_VAR).ok().as_deref(), is_development)
    }

    fn from_raw(raw: Option<&str>, is_development: bool) -> anyhow::Result<Self> {
        let keys = parse_keys(raw.unwrap_or_default());
        match (keys.is_empty(), is_development) {
            (false, _) => Ok(Self::with_keys(keys)),
            (true, true) => {
                tracing::warn!("{API_KEYS_VAR} is empty; admin routes are open in development");
                Ok(Self::disabled())
            }
            (true, false) => anyhow::bail!(
                "{API_KEYS_VAR} must list at least one bearer key outside development"
            ),
        }
    }

    pub fn with_keys(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            api_keys: Arc::new(keys.into_iter().collect()),
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            api_keys: Arc::new(HashSet::new()),
            enabled: false,
        }
    }

    fn allows(&self, token: &str) -> bool {
        self.api_keys
            .iter()
            .any(|key| bool::from(key.as_bytes().ct_eq(token.as_bytes())))
    }
}

fn parse_keys(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: usize,
}

/// One fixed window shared by every admin request.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    /// Takes one slot, or returns how long until the window reopens.
    async fn try_acquire(&self) -> Result<(), Duration> {
        let mut current = self.current.lock().await;
        let elapsed = current.opened_at.elapsed();
        if elapsed >= self.window {
            current.opened_at = Instant::now();
            current.used = 0;
        } else if current.used >= self.max_requests {
            return Err(self.window - elapsed);
        }
        current.used += 1;
        Ok(())
    }
}

/// Uses the caller's `x-request-id` when it is short printable ASCII,
/// otherwise a fresh UUID, and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_acceptable_request_id(v))
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

fn is_acceptable_request_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic())
}

pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    let token = bearer_token(req.headers().get(header::AUTHORIZATION));
    match token {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => {
            tracing::debug!(path = %req.uri().path(), "rejected admin request without a valid key");
            ApiError::new(
                request_id_of(&req),
                "unauthorized",
                "missing or invalid bearer token",
            )
            .into_response()
        }
    }
}

/// Answers 429 with `retry-after` once the window is used up.
pub async fn enforce_rate_limit(
    State(limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    match limit.try_acquire().await {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let mut res = ApiError::new(request_id_of(&req), "rate_limited", "rate limit exceeded")
                .into_response();
            let secs = wait.as_secs().max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                res.headers_mut().insert(header::RETRY_AFTER, value);
            }
            res
        }
    }
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
