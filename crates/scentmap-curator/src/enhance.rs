//! Single-place enhancement.

use scentmap_core::{EnhancedPlaceData, HotplaceDestination};
use scentmap_store::FirestoreClient;

use crate::clean::strip_code_fences;
use crate::client::{GeminiClient, GenerationConfig};
use crate::error::CuratorError;
use crate::prompts::enhancement_prompt;
use crate::retry::retry_with_backoff;

/// Generates enriched content for `place`. Nothing is persisted.
///
/// # Errors
///
/// - [`CuratorError::MalformedJson`] or [`CuratorError::MissingField`] when
///   every attempt produced unusable JSON.
/// - Any error from [`GeminiClient::generate`] that outlasts the retry policy.
pub async fn enhance_place(
    client: &GeminiClient,
    place: &HotplaceDestination,
) -> Result<EnhancedPlaceData, CuratorError> {
    let prompt = enhancement_prompt(place);
    retry_with_backoff(client.max_retries(), client.retry_backoff_ms(), || {
        let prompt = &prompt;
        async move {
            let reply = client.generate(prompt, &GenerationConfig::CREATIVE).await?;
            parse_enhancement(&reply, &place.name)
        }
    })
    .await
}

/// Looks a place up by id and enhances it.
///
/// Returns the stored place alongside the generated data so callers can show
/// both.
///
/// # Errors
///
/// Returns [`CuratorError::PlaceNotFound`] for an unknown id, a store error
/// when the lookup fails, or any error from [`enhance_place`].
pub async fn enhance_by_id(
    client: &GeminiClient,
    store: &FirestoreClient,
    place_id: &str,
) -> Result<(HotplaceDestination, EnhancedPlaceData), CuratorError> {
    let place = store
        .get(place_id)
        .await?
        .ok_or_else(|| CuratorError::PlaceNotFound(place_id.to_owned()))?;
    tracing::info!(id = place_id, name = %place.name, "enhancing place");
    let data = enhance_place(client, &place).await?;
    Ok((place, data))
}

/// Cleans and decodes an enhancement reply. An empty `enhancedDescription`
/// counts as missing.
pub(crate) fn parse_enhancement(
    reply: &str,
    place_name: &str,
) -> Result<EnhancedPlaceData, CuratorError> {
    let cleaned = strip_code_fences(reply);
    let data: EnhancedPlaceData =
        serde_json::from_str(cleaned).map_err(|e| CuratorError::MalformedJson {
            context: format!("enhancement of {place_name}"),
            source: e,
        })?;
    if data.enhanced_description.trim().is_empty() {
        return Err(CuratorError::MissingField("enhancedDescription".to_owned()));
    }
    Ok(data)
}
