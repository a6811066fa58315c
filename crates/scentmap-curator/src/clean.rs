//! Reply cleanup before JSON parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CuratorError;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json|JSON)?[ \t]*\r?\n?").expect("valid regex"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```$").expect("valid regex"));

/// Trims the reply and strips a surrounding Markdown code fence.
#[must_use]
pub fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let start = LEADING_FENCE.find(trimmed).map_or(0, |m| m.end());
    let rest = &trimmed[start..];
    let end = TRAILING_FENCE.find(rest).map_or(rest.len(), |m| m.start());
    rest[..end].trim()
}

/// Fails with [`CuratorError::Truncated`] unless `cleaned` closes a JSON
/// array or object.
pub(crate) fn ensure_complete(cleaned: &str) -> Result<(), CuratorError> {
    if cleaned.ends_with(']') || cleaned.ends_with('}') {
        return Ok(());
    }
    let tail: String = {
        let chars: Vec<char> = cleaned.chars().collect();
        let from = chars.len().saturating_sub(40);
        chars[from..].iter().collect()
    };
    Err(CuratorError::Truncated { tail })
}
