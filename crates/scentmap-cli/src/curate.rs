//! Gemini-backed curation commands: conversion and enhancement.

use std::path::Path;

use anyhow::Context;
use scentmap_curator::{
    batch_enhance, convert_and_validate, enhance_by_id, BatchOptions, GeminiClient,
};
use serde_json::json;

fn gemini_client(config: &scentmap_core::AppConfig) -> anyhow::Result<GeminiClient> {
    GeminiClient::new(&config.gemini).context("GEMINI_API_KEY is required for curation commands")
}

/// Convert a free-text file into validated places and optionally import them.
///
/// # Errors
///
/// Returns an error if the file is unreadable or empty, Gemini is not
/// configured or fails, or no candidate passes validation.
pub(crate) async fn run_convert(input: &Path, import: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    if text.trim().is_empty() {
        anyhow::bail!("{} is empty", input.display());
    }

    let config = crate::load_config()?;
    let client = gemini_client(&config)?;
    let report = convert_and_validate(&client, &text).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "accepted": report.accepted,
            "rejected": report.rejected,
        }))?
    );

    if report.accepted.is_empty() {
        anyhow::bail!(
            "no valid places could be extracted ({} rejected)",
            report.rejected.len()
        );
    }
    if !import {
        return Ok(());
    }

    let store = crate::store_client(&config)?;
    let mut failed = 0_usize;
    for place in &report.accepted {
        match store.add(place).await {
            Ok(id) => println!("imported {} ({id})", place.name),
            Err(e) => {
                failed += 1;
                tracing::error!(name = %place.name, error = %e, "failed to import place");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} places could not be imported", report.accepted.len());
    }
    Ok(())
}

/// Enhance one place and print the original next to the generated data.
///
/// # Errors
///
/// Returns an error for an unknown id or any curator failure.
pub(crate) async fn run_enhance_one(place_id: &str) -> anyhow::Result<()> {
    let config = crate::load_config()?;
    let client = gemini_client(&config)?;
    let store = crate::store_client(&config)?;

    let (original, enhanced) = enhance_by_id(&client, &store, place_id).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "originalData": original,
            "enhancedData": enhanced,
        }))?
    );
    Ok(())
}

/// Enhance the catalog in batches and print the run report.
///
/// # Errors
///
/// Returns an error if the catalog is empty, the quota probe fails, or the
/// catalog cannot be listed.
pub(crate) async fn run_enhance_all(only_failed: bool, check_only: bool) -> anyhow::Result<()> {
    let config = crate::load_config()?;
    let client = gemini_client(&config)?;
    let store = crate::store_client(&config)?;

    let options = BatchOptions {
        only_failed,
        check_only,
        ..BatchOptions::from_settings(&config.gemini)
    };
    let report = batch_enhance(&client, &store, options).await?;

    if check_only {
        println!("{} places awaiting enhancement", report.total_to_process);
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    for failure in &report.failed_places {
        tracing::warn!(name = %failure.name, error = %failure.error, "enhancement failed");
    }
    Ok(())
}
