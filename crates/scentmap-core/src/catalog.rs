use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::places::HotplaceDestination;
use crate::ConfigError;

/// On-disk seed catalog: a YAML document with a top-level `places` list.
///
/// Field names follow the store's camelCase document shape so a seed file can
/// be copied straight from an exported catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub places: Vec<HotplaceDestination>,
}

/// Load and validate a seed catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_ids = HashSet::new();

    for place in &catalog.places {
        if place.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "place name must be non-empty".to_string(),
            ));
        }

        if place.location.region.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "place '{}' has an empty location.region",
                place.name
            )));
        }

        if !seen_names.insert(place.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate place name: '{}'",
                place.name
            )));
        }

        if !place.id.is_empty() && !seen_ids.insert(place.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate place id: '{}' (from place '{}')",
                place.id, place.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
