use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// No gateway secret key was configured.
    #[error("payment gateway secret key is not configured")]
    NotConfigured,

    /// A required request field is blank or the amount is not positive.
    #[error("missing or invalid payment parameter: {0}")]
    InvalidRequest(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway refused the confirmation. `status` is passed through to
    /// the caller unchanged.
    #[error("payment gateway rejected confirmation ({status} {code}): {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid payment gateway base URL: {0}")]
    InvalidBaseUrl(String),
}
