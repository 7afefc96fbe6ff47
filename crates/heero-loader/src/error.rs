use thiserror::Error;

/// One source that contributed nothing to a load, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source_name: String,
    pub reason: String,
    /// The payload arrived but was malformed, as opposed to a fetch failure.
    pub parse_error: bool,
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error in source {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("JSON parse error in source {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid GeoJSON in source {source_name}: {reason}")]
    InvalidGeoJson { source_name: String, reason: String },

    #[error("source {source_name} has neither url nor path")]
    MissingLocation { source_name: String },

    #[error("all {} sources failed: {}", .failures.len(), summarize(.failures))]
    AllSourcesFailed { failures: Vec<SourceFailure> },
}

impl LoaderError {
    /// `true` for malformed payloads, as opposed to transport failures.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            LoaderError::Csv { .. } | LoaderError::Json { .. } | LoaderError::InvalidGeoJson { .. }
        )
    }
}

fn summarize(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.source_name, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}
