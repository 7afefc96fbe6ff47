use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::location::LocationType;
use crate::ConfigError;

/// Wire format of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Spreadsheet export with a header row; columns located by header name.
    SheetCsv,
    /// Positional CSV layout; the header row is skipped.
    EmbeddedCsv,
    /// `FeatureCollection` of point features.
    Geojson,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::SheetCsv => write!(f, "sheet_csv"),
            SourceKind::EmbeddedCsv => write!(f, "embedded_csv"),
            SourceKind::Geojson => write!(f, "geojson"),
        }
    }
}

/// Where a source's bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLocation<'a> {
    Url(&'a str),
    Path(&'a Path),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub url: Option<String>,
    pub path: Option<PathBuf>,
    /// Fixed type for every row of this source. When absent, rows are
    /// classified from their own category label.
    pub category: Option<LocationType>,
    /// Prefix for generated record ids.
    pub id_prefix: Option<String>,
}

impl SourceConfig {
    /// Precedence rank used to order sources before concatenation.
    #[must_use]
    pub fn precedence(&self) -> u8 {
        self.category.unwrap_or(LocationType::Other).priority()
    }

    /// Record id prefix: explicit, `<type>-location` for fixed-category
    /// sources, or `location`.
    #[must_use]
    pub fn id_prefix(&self) -> String {
        if let Some(prefix) = self.id_prefix.as_deref().map(str::trim) {
            if !prefix.is_empty() {
                return prefix.to_string();
            }
        }
        match self.category {
            Some(t) => format!("{t}-location"),
            None => "location".to_string(),
        }
    }

    /// Returns `None` when neither `url` nor `path` is set; validation rejects
    /// such configs.
    #[must_use]
    pub fn location(&self) -> Option<SourceLocation<'_>> {
        match (&self.url, &self.path) {
            (Some(url), _) => Some(SourceLocation::Url(url)),
            (None, Some(path)) => Some(SourceLocation::Path(path)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

/// Load and validate the data-source configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_sources(&content)
}

/// Parse and validate data-source configuration from a YAML string.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_sources(content: &str) -> Result<SourcesFile, ConfigError> {
    let sources_file: SourcesFile = serde_yaml::from_str(content)?;
    validate_sources(&sources_file)?;
    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    if sources_file.sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source must be configured".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_prefixes = HashSet::new();

    for source in &sources_file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }

        if source.url.is_some() == source.path.is_some() {
            return Err(ConfigError::Validation(format!(
                "source '{}' must set exactly one of url or path",
                source.name
            )));
        }

        if source.category == Some(LocationType::Other) {
            return Err(ConfigError::Validation(format!(
                "source '{}' cannot pin category 'other'; omit it to classify rows",
                source.name
            )));
        }

        if !seen_names.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }

        let prefix = source.id_prefix();
        if !seen_prefixes.insert(prefix.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate id prefix: '{}' (from source '{}')",
                prefix, source.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
