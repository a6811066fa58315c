use std::path::Path;
use std::time::Duration;

use scentmap_core::load_catalog;

/// Pause between consecutive store writes.
const WRITE_PAUSE: Duration = Duration::from_millis(100);

/// Load the seed catalog and add every place to the store.
///
/// The environment config is only loaded when it is needed: to find the
/// default seed path, or to write. A failed write is logged and counted;
/// the run continues with the next place and fails at the end if anything
/// was not written.
///
/// # Errors
///
/// Returns an error if the seed file is invalid, the store cannot be
/// configured, or at least one write failed.
pub(crate) async fn run_seed(path: Option<&Path>, dry_run: bool) -> anyhow::Result<()> {
    let mut config = None;
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config.insert(crate::load_config()?).catalog_path.clone(),
    };
    let catalog = load_catalog(&path)?;
    tracing::info!(path = %path.display(), count = catalog.places.len(), "seed catalog validated");

    if dry_run {
        for place in &catalog.places {
            println!(
                "{:<10}{:<8}{}",
                place.category.as_str(),
                place.location.region,
                place.name
            );
        }
        println!("dry run: {} places would be written", catalog.places.len());
        return Ok(());
    }

    let config = match config {
        Some(config) => config,
        None => crate::load_config()?,
    };
    let store = crate::store_client(&config)?;
    let mut written = 0_usize;
    let mut failed = 0_usize;

    for (index, place) in catalog.places.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(WRITE_PAUSE).await;
        }
        match store.add(place).await {
            Ok(id) => {
                written += 1;
                println!("added {} ({id})", place.name);
            }
            Err(e) => {
                failed += 1;
                tracing::error!(name = %place.name, error = %e, "failed to add place");
            }
        }
    }

    println!("seeded {written} places, {failed} failed");
    if failed > 0 {
        anyhow::bail!("{failed} of {} places could not be written", catalog.places.len());
    }
    Ok(())
}
