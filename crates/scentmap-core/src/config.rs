use crate::app_config::{AppConfig, Environment, FirestoreSettings, GeminiSettings, TossSettings};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration from an env-var lookup function, so tests
/// can feed a plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("SCENTMAP_ENV", "development"))?;

    let bind_addr = or_default("SCENTMAP_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SCENTMAP_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("SCENTMAP_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "SCENTMAP_CATALOG_PATH",
        "./config/hotplaces.yaml",
    ));
    let http_timeout_secs = parse_u64("SCENTMAP_HTTP_TIMEOUT_SECS", "30")?;

    let firestore = FirestoreSettings {
        project_id: require("FIREBASE_PROJECT_ID")?,
        api_key: optional("FIREBASE_API_KEY"),
        auth_token: optional("FIREBASE_AUTH_TOKEN"),
        base_url: or_default("FIRESTORE_BASE_URL", "https://firestore.googleapis.com/v1"),
    };

    let batch_size = or_default("SCENTMAP_ENHANCE_BATCH_SIZE", "3")
        .parse::<usize>()
        .map_err(|e| invalid("SCENTMAP_ENHANCE_BATCH_SIZE", e.to_string()))?;
    if batch_size == 0 {
        return Err(invalid(
            "SCENTMAP_ENHANCE_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }

    let gemini = GeminiSettings {
        api_key: optional("GEMINI_API_KEY"),
        model: or_default("GEMINI_MODEL", "gemini-2.0-flash-exp"),
        base_url: or_default(
            "GEMINI_BASE_URL",
            "https://generativelanguage.googleapis.com/v1beta",
        ),
        timeout_secs: parse_u64("SCENTMAP_AI_TIMEOUT_SECS", "120")?,
        max_retries: parse_u32("SCENTMAP_AI_MAX_RETRIES", "2")?,
        retry_backoff_ms: parse_u64("SCENTMAP_AI_RETRY_BACKOFF_MS", "2000")?,
        batch_size,
        batch_delay_ms: parse_u64("SCENTMAP_ENHANCE_BATCH_DELAY_MS", "5000")?,
    };

    let toss = TossSettings {
        secret_key: optional("TOSS_PAYMENTS_SECRET_KEY"),
        base_url: or_default("TOSS_PAYMENTS_BASE_URL", "https://api.tosspayments.com"),
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_path,
        http_timeout_secs,
        firestore,
        gemini,
        toss,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SCENTMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
