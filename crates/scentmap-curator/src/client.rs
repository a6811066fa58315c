//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One call sends one user prompt and returns the concatenated text of the
//! first candidate. Retries wrap the call and the parse of its reply
//! together, in [`crate::convert`] and [`crate::enhance`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use scentmap_core::app_config::GeminiSettings;

use crate::error::CuratorError;

const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 2_000;

/// Sampling parameters for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Near-deterministic output for structured extraction.
    pub const EXTRACTION: Self = Self {
        temperature: 0.1,
        top_p: 0.9,
        top_k: 40,
        max_output_tokens: 16_384,
    };

    /// Warmer sampling for descriptive writing.
    pub const CREATIVE: Self = Self {
        temperature: 0.7,
        top_p: 0.9,
        top_k: 40,
        max_output_tokens: 4_096,
    };

    /// Smallest possible request, used to probe quota.
    pub const PROBE: Self = Self {
        temperature: 0.0,
        top_p: 0.9,
        top_k: 40,
        max_output_tokens: 8,
    };
}

/// Client for one Gemini model.
///
/// Use [`GeminiClient::new`] with loaded settings, or
/// [`GeminiClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    model: String,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[redacted]")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiClient {
    /// Creates a client from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::NotConfigured`] when no API key is set,
    /// [`CuratorError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`CuratorError::InvalidBaseUrl`] for a malformed base URL.
    pub fn new(settings: &GeminiSettings) -> Result<Self, CuratorError> {
        let api_key = settings
            .api_key
            .as_deref()
            .ok_or(CuratorError::NotConfigured)?;
        Ok(Self::with_base_url(
            api_key,
            &settings.model,
            settings.timeout_secs,
            &settings.base_url,
        )?
        .with_retry(settings.max_retries, settings.retry_backoff_ms))
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CuratorError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`CuratorError::InvalidBaseUrl`] if the URL is invalid.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, CuratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("scentmap/0.1 (curator)")
            .build()?;

        let raw = format!(
            "{}/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        );
        let endpoint =
            Url::parse(&raw).map_err(|e| CuratorError::InvalidBaseUrl(format!("'{raw}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            model: model.to_owned(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        })
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, retry_backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub(crate) fn retry_backoff_ms(&self) -> u64 {
        self.retry_backoff_ms
    }

    /// Sends one prompt and returns the reply text. Makes a single attempt.
    ///
    /// # Errors
    ///
    /// - [`CuratorError::QuotaExceeded`] for a 429 whose message mentions quota.
    /// - [`CuratorError::RateLimited`] for any other 429.
    /// - [`CuratorError::UnexpectedStatus`] for other non-2xx replies.
    /// - [`CuratorError::EmptyResponse`] when no candidate carries text.
    /// - [`CuratorError::Http`] on network failure.
    pub async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, CuratorError> {
        let request = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: config,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), body));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| CuratorError::MalformedJson {
                context: "generateContent envelope".to_owned(),
                source: e,
            })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(CuratorError::EmptyResponse);
        }
        tracing::debug!(model = %self.model, chars = text.len(), "Gemini reply received");
        Ok(text)
    }
}

/// Maps a non-2xx reply onto the error taxonomy. Quota exhaustion and
/// short-term throttling share HTTP 429 and differ only in the message.
fn classify_failure(status: u16, body: String) -> CuratorError {
    if status != 429 {
        return CuratorError::UnexpectedStatus { status, body };
    }
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|env| {
            if env.error.message.is_empty() {
                env.error.status
            } else {
                env.error.message
            }
        })
        .unwrap_or(body);
    if message.to_lowercase().contains("quota") {
        CuratorError::QuotaExceeded(message)
    } else {
        CuratorError::RateLimited(message)
    }
}
