pub mod app_config;
pub mod category;
pub mod colors;
pub mod config;
pub mod location;
pub mod sources;

pub use app_config::{AppConfig, Environment};
pub use category::{classify, display_label, UNLABELED_CATEGORY};
pub use colors::{assign_colors, assign_colors_with, is_reserved_color, CategoryColorMap};
pub use config::{load_app_config, load_app_config_from_env};
pub use location::{sort_by_priority, valid_coordinates, LngLat, LocationRecord, LocationType};
pub use sources::{load_sources, parse_sources, SourceConfig, SourceKind, SourceLocation, SourcesFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown location type: {0}")]
    UnknownLocationType(String),
}
