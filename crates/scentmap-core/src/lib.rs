pub mod app_config;
pub mod candidate;
pub mod catalog;
pub mod config;
pub mod enhanced;
pub mod filter;
pub mod filters;
pub mod images;
pub mod payments;
pub mod places;

pub use app_config::{AppConfig, Environment};
pub use candidate::{validate_candidates, CandidateReport, RejectedCandidate};
pub use catalog::{load_catalog, CatalogFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use enhanced::EnhancedPlaceData;
pub use filter::{filter_hotplaces, filter_stats, has_active_filters, search_places, FilterStats};
pub use filters::{FeatureFilter, RegionFilter, ScentMapFilters, ScentNoteFilter};
pub use images::{assign_images, image_file_stem, image_paths};
pub use payments::{PaymentConfirmRequest, PaymentRecord, PaymentSummary};
pub use places::{Category, HotplaceDestination};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file '{path}': {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
