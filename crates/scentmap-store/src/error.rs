use thiserror::Error;

/// Errors returned by the Firestore REST client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Firestore answered with a non-2xx status.
    #[error("Firestore returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// A response body or document did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be turned into a Firestore document.
    #[error("cannot encode {context}: {reason}")]
    Encode { context: String, reason: String },

    #[error("invalid Firestore base URL: {0}")]
    InvalidBaseUrl(String),
}

impl StoreError {
    /// `true` for a 404 from Firestore.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::UnexpectedStatus { status: 404, .. })
    }
}
