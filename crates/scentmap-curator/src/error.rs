use thiserror::Error;

/// Errors returned by the generative-text client and the curation flows
/// built on it.
#[derive(Debug, Error)]
pub enum CuratorError {
    /// No API key was configured, so AI features are disabled.
    #[error("Gemini API key is not configured")]
    NotConfigured,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The account's quota is exhausted. Retrying cannot help until it resets.
    #[error("Gemini quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Short-term rate limit; worth retrying after a pause.
    #[error("Gemini rate limited: {0}")]
    RateLimited(String),

    #[error("Gemini returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The reply contained no candidate text.
    #[error("Gemini returned an empty response")]
    EmptyResponse,

    /// The reply was cut off before the JSON closed.
    #[error("Gemini response was truncated (ends with {tail:?})")]
    Truncated { tail: String },

    #[error("Gemini response is not valid JSON for {context}: {source}")]
    MalformedJson {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Gemini response is missing required field: {0}")]
    MissingField(String),

    #[error("invalid Gemini base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("place not found: {0}")]
    PlaceNotFound(String),

    #[error("catalog is empty; nothing to enhance")]
    EmptyCatalog,

    #[error("store error: {0}")]
    Store(#[from] scentmap_store::StoreError),
}
