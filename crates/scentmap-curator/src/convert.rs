//! Free-form text to catalog candidates.

use serde::Deserialize;
use serde_json::{Map, Value};

use scentmap_core::{validate_candidates, CandidateReport};

use crate::clean::{ensure_complete, strip_code_fences};
use crate::client::{GeminiClient, GenerationConfig};
use crate::error::CuratorError;
use crate::prompts::conversion_prompt;
use crate::retry::retry_with_backoff;

#[derive(Deserialize)]
#[serde(untagged)]
enum ConversionReply {
    Many(Vec<Value>),
    One(Map<String, Value>),
}

/// Asks the model to turn `text` into raw place candidates.
///
/// The candidates are not validated; see [`convert_and_validate`].
///
/// # Errors
///
/// - [`CuratorError::Truncated`] when the reply is cut off mid-JSON.
/// - [`CuratorError::MalformedJson`] when the reply is neither an array nor an
///   object, after retries.
/// - Any error from [`GeminiClient::generate`] that outlasts the retry policy.
pub async fn convert_natural_language(
    client: &GeminiClient,
    text: &str,
) -> Result<Vec<Value>, CuratorError> {
    let prompt = conversion_prompt(text);
    tracing::info!(input_chars = text.chars().count(), "converting natural-language input");

    let candidates = retry_with_backoff(client.max_retries(), client.retry_backoff_ms(), || {
        let prompt = &prompt;
        async move {
            let reply = client
                .generate(prompt, &GenerationConfig::EXTRACTION)
                .await?;
            parse_candidates(&reply)
        }
    })
    .await?;

    tracing::info!(count = candidates.len(), "conversion produced candidates");
    Ok(candidates)
}

/// Converts `text` and validates every candidate.
///
/// Rejected candidates are kept in the report; deciding whether a report with
/// no accepted entries is an error is left to the caller.
///
/// # Errors
///
/// Propagates failures from [`convert_natural_language`].
pub async fn convert_and_validate(
    client: &GeminiClient,
    text: &str,
) -> Result<CandidateReport, CuratorError> {
    let candidates = convert_natural_language(client, text).await?;
    let report = validate_candidates(candidates);
    for rejected in &report.rejected {
        tracing::warn!(
            index = rejected.index,
            name = rejected.name.as_deref().unwrap_or(""),
            reason = %rejected.reason,
            "rejected converted candidate"
        );
    }
    Ok(report)
}

/// Cleans a conversion reply and decodes it into candidate values. A single
/// object becomes a one-element list.
pub(crate) fn parse_candidates(reply: &str) -> Result<Vec<Value>, CuratorError> {
    let cleaned = strip_code_fences(reply);
    ensure_complete(cleaned)?;
    let parsed: ConversionReply =
        serde_json::from_str(cleaned).map_err(|e| CuratorError::MalformedJson {
            context: "conversion reply".to_owned(),
            source: e,
        })?;
    Ok(match parsed {
        ConversionReply::Many(values) => values,
        ConversionReply::One(object) => vec![Value::Object(object)],
    })
}
