//! Read-only catalog queries.
//!
//! Places come from a seed file when `--catalog` is given, otherwise from the
//! store configured in the environment.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use scentmap_core::{
    filter_hotplaces, filter_stats, has_active_filters, load_catalog, search_places, Category,
    FilterStats, HotplaceDestination, ScentMapFilters,
};
use serde::Serialize;

/// Sub-commands available under `places`.
#[derive(Debug, Subcommand)]
pub enum PlacesCommands {
    /// Print the places matching the given filters, with stats
    Filter {
        #[command(flatten)]
        source: CatalogSource,
        #[command(flatten)]
        filters: FilterArgs,
        /// Free-text keyword applied after the filters
        #[arg(long)]
        query: Option<String>,
    },
    /// Print per-category and per-region counts for the whole catalog
    Stats {
        #[command(flatten)]
        source: CatalogSource,
    },
}

#[derive(Debug, Args)]
pub struct CatalogSource {
    /// Seed catalog file to read instead of the store
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Province, compared exactly (e.g. 서울)
    #[arg(long)]
    pub province: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub district: Option<String>,
    /// Repeat to allow several categories
    #[arg(long = "category")]
    pub categories: Vec<Category>,
    /// Scent note; repeat for several. Note tiers are matched together.
    #[arg(long = "note")]
    pub notes: Vec<String>,
    #[arg(long)]
    pub atmosphere: Vec<String>,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Only featured places
    #[arg(long)]
    pub featured: bool,
}

impl FilterArgs {
    pub(crate) fn to_filters(&self) -> ScentMapFilters {
        let mut filters = ScentMapFilters {
            categories: self.categories.clone(),
            atmosphere: self.atmosphere.clone(),
            tags: self.tags.clone(),
            ..ScentMapFilters::default()
        };
        filters.region.province.clone_from(&self.province);
        filters.region.city.clone_from(&self.city);
        filters.region.district.clone_from(&self.district);
        filters.scent_notes.top_notes.clone_from(&self.notes);
        filters.features.featured = self.featured;
        filters
    }
}

#[derive(Debug, Serialize)]
struct FilterOutput<'a> {
    places: &'a [HotplaceDestination],
    stats: FilterStats,
    has_active_filters: bool,
}

pub(crate) async fn run_places(command: PlacesCommands) -> anyhow::Result<()> {
    match command {
        PlacesCommands::Filter {
            source,
            filters,
            query,
        } => {
            let catalog = load_places(source.catalog.as_deref()).await?;
            let filters = filters.to_filters();
            let matches = select(&catalog, &filters, query.as_deref());
            let output = FilterOutput {
                places: &matches,
                stats: filter_stats(&matches),
                has_active_filters: has_active_filters(&filters),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        PlacesCommands::Stats { source } => {
            let catalog = load_places(source.catalog.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&filter_stats(&catalog))?);
        }
    }
    Ok(())
}

pub(crate) fn select(
    catalog: &[HotplaceDestination],
    filters: &ScentMapFilters,
    query: Option<&str>,
) -> Vec<HotplaceDestination> {
    let filtered = filter_hotplaces(catalog, filters);
    match query {
        Some(term) => search_places(&filtered, term),
        None => filtered,
    }
}

async fn load_places(catalog: Option<&Path>) -> anyhow::Result<Vec<HotplaceDestination>> {
    if let Some(path) = catalog {
        let file = load_catalog(path)?;
        tracing::debug!(path = %path.display(), count = file.places.len(), "loaded seed catalog");
        return Ok(file.places);
    }

    let config = crate::load_config()?;
    let store = crate::store_client(&config)?;
    Ok(store.get_all().await?)
}
