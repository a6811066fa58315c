use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Firestore project settings. `api_key` and `auth_token` are both optional:
/// public rules need neither, locked-down projects need one or the other.
#[derive(Clone)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
    pub base_url: String,
}

#[derive(Clone)]
pub struct GeminiSettings {
    /// `None` disables every AI feature.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
}

#[derive(Clone)]
pub struct TossSettings {
    pub secret_key: Option<String>,
    pub base_url: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub http_timeout_secs: u64,
    pub firestore: FirestoreSettings,
    pub gemini: GeminiSettings,
    pub toss: TossSettings,
}

fn redact(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "[redacted]")
}

impl std::fmt::Debug for FirestoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreSettings")
            .field("project_id", &self.project_id)
            .field("api_key", &redact(self.api_key.as_ref()))
            .field("auth_token", &redact(self.auth_token.as_ref()))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &redact(self.api_key.as_ref()))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("batch_size", &self.batch_size)
            .field("batch_delay_ms", &self.batch_delay_ms)
            .finish()
    }
}

impl std::fmt::Debug for TossSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TossSettings")
            .field("secret_key", &redact(self.secret_key.as_ref()))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("firestore", &self.firestore)
            .field("gemini", &self.gemini)
            .field("toss", &self.toss)
            .finish()
    }
}
