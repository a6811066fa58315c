//! Catalog-wide enhancement in bounded concurrent batches.

use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;

use scentmap_core::app_config::GeminiSettings;
use scentmap_core::HotplaceDestination;
use scentmap_store::FirestoreClient;

use crate::client::{GeminiClient, GenerationConfig};
use crate::enhance::enhance_place;
use crate::error::CuratorError;
use crate::prompts::PROBE_PROMPT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Only process places that have no enhanced data yet.
    pub only_failed: bool,
    /// Count the places that would be processed and stop.
    pub check_only: bool,
    /// Places enhanced concurrently per batch. Zero is treated as one.
    pub batch_size: usize,
    /// Pause between consecutive batches.
    pub batch_delay: Duration,
}

impl BatchOptions {
    #[must_use]
    pub fn from_settings(settings: &GeminiSettings) -> Self {
        Self {
            only_failed: false,
            check_only: false,
            batch_size: settings.batch_size,
            batch_delay: Duration::from_millis(settings.batch_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedPlace {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total_to_process: usize,
    pub total_processed: usize,
    pub total_successful: usize,
    pub total_failed: usize,
    /// Whole-number percentage of processed places that succeeded.
    pub success_rate: u32,
    pub failed_places: Vec<FailedPlace>,
}

impl BatchReport {
    fn nothing_to_do() -> Self {
        Self {
            success_rate: 100,
            ..Self::default()
        }
    }

    fn check_only(total_to_process: usize) -> Self {
        Self {
            total_to_process,
            ..Self::default()
        }
    }
}

/// Enhances catalog places and writes the results back to the store.
///
/// Each batch of `batch_size` places runs concurrently; batches run one after
/// another with `batch_delay` in between. A failure on one place is recorded
/// in the report and does not stop the run.
///
/// # Errors
///
/// - [`CuratorError::EmptyCatalog`] when the store holds no places.
/// - [`CuratorError::QuotaExceeded`] when the pre-flight probe hits the quota.
/// - A store error if the catalog cannot be listed.
pub async fn batch_enhance(
    client: &GeminiClient,
    store: &FirestoreClient,
    options: BatchOptions,
) -> Result<BatchReport, CuratorError> {
    let places = store.get_all().await?;
    if places.is_empty() {
        return Err(CuratorError::EmptyCatalog);
    }

    let targets: Vec<HotplaceDestination> = if options.only_failed {
        places.into_iter().filter(|p| !p.is_enhanced()).collect()
    } else {
        places
    };

    if targets.is_empty() {
        tracing::info!("every place is already enhanced");
        return Ok(BatchReport::nothing_to_do());
    }
    if options.check_only {
        tracing::info!(count = targets.len(), "places awaiting enhancement");
        return Ok(BatchReport::check_only(targets.len()));
    }

    probe_quota(client).await?;

    let batch_size = options.batch_size.max(1);
    let batch_count = targets.len().div_ceil(batch_size);
    let mut report = BatchReport {
        total_to_process: targets.len(),
        ..BatchReport::default()
    };

    tracing::info!(
        total = targets.len(),
        batch_size,
        batch_count,
        "starting batch enhancement"
    );

    for (index, chunk) in targets.chunks(batch_size).enumerate() {
        let outcomes = join_all(
            chunk
                .iter()
                .map(|place| enhance_and_store(client, store, place)),
        )
        .await;

        for outcome in outcomes {
            report.total_processed += 1;
            match outcome {
                Ok(()) => report.total_successful += 1,
                Err(failed) => {
                    report.total_failed += 1;
                    report.failed_places.push(failed);
                }
            }
        }

        tracing::info!(
            batch = index + 1,
            batch_count,
            processed = report.total_processed,
            failed = report.total_failed,
            "batch finished"
        );

        if index + 1 < batch_count && !options.batch_delay.is_zero() {
            tokio::time::sleep(options.batch_delay).await;
        }
    }

    report.success_rate = success_rate(report.total_successful, report.total_processed);
    tracing::info!(
        successful = report.total_successful,
        failed = report.total_failed,
        success_rate = report.success_rate,
        "batch enhancement complete"
    );
    Ok(report)
}

/// One tiny generation before the run. Only quota exhaustion aborts; other
/// probe failures are logged and the run proceeds.
async fn probe_quota(client: &GeminiClient) -> Result<(), CuratorError> {
    match client.generate(PROBE_PROMPT, &GenerationConfig::PROBE).await {
        Ok(_) => Ok(()),
        Err(e @ CuratorError::QuotaExceeded(_)) => {
            tracing::error!(error = %e, "quota exhausted; aborting batch");
            Err(e)
        }
        Err(e) => {
            tracing::warn!(error = %e, "quota probe failed; continuing");
            Ok(())
        }
    }
}

async fn enhance_and_store(
    client: &GeminiClient,
    store: &FirestoreClient,
    place: &HotplaceDestination,
) -> Result<(), FailedPlace> {
    let result = match enhance_place(client, place).await {
        Ok(data) => store
            .update_enhanced_data(&place.id, &data)
            .await
            .map_err(CuratorError::from),
        Err(e) => Err(e),
    };

    result.map_err(|e| {
        tracing::warn!(id = %place.id, name = %place.name, error = %e, "enhancement failed");
        FailedPlace {
            name: place.name.clone(),
            error: e.to_string(),
        }
    })
}

fn success_rate(successful: usize, processed: usize) -> u32 {
    if processed == 0 {
        return 0;
    }
    let rounded = (successful * 200 + processed) / (2 * processed);
    u32::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_rounds_to_nearest() {
        assert_eq!(success_rate(2, 3), 67);
        assert_eq!(success_rate(1, 3), 33);
        assert_eq!(success_rate(1, 2), 50);
        assert_eq!(success_rate(5, 5), 100);
        assert_eq!(success_rate(0, 0), 0);
    }

    #[test]
    fn nothing_to_do_reports_full_success() {
        let report = BatchReport::nothing_to_do();
        assert_eq!(report.success_rate, 100);
        assert_eq!(report.total_to_process, 0);
    }

    #[test]
    fn report_serializes_camel_case() {
        let json = serde_json::to_value(BatchReport::check_only(4)).unwrap();
        assert_eq!(json["totalToProcess"], 4);
        assert_eq!(json["successRate"], 0);
        assert!(json["failedPlaces"].as_array().unwrap().is_empty());
    }

    #[test]
    fn options_follow_settings() {
        let settings = GeminiSettings {
            api_key: None,
            model: "m".to_owned(),
            base_url: "http://localhost".to_owned(),
            timeout_secs: 1,
            max_retries: 0,
            retry_backoff_ms: 0,
            batch_size: 4,
            batch_delay_ms: 250,
        };
        let options = BatchOptions::from_settings(&settings);
        assert_eq!(options.batch_size, 4);
        assert_eq!(options.batch_delay, Duration::from_millis(250));
        assert!(!options.only_failed && !options.check_only);
    }
}
