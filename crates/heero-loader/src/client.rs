//! Concurrent loader over every configured source.
//!
//! Sources are ordered by precedence (HEERO first, then Bosch, Mercedes and
//! unpinned sheets), fetched concurrently and concatenated in that order. A
//! failing source is logged and skipped; only a load where every source fails
//! is an error.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures::future::join_all;
use heero_core::{sort_by_priority, AppConfig, LocationRecord, SourceConfig, SourceLocation};
use reqwest::Client;

use crate::error::{LoaderError, SourceFailure};
use crate::fetch::{fetch_text, read_file};
use crate::formats::parse_rows;
use crate::normalize::normalize_rows;

pub struct SourceLoader {
    client: Client,
    sources: Vec<SourceConfig>,
    base_dir: Option<PathBuf>,
}

impl SourceLoader {
    /// Build a loader for `sources`. The order given here does not matter;
    /// [`SourceLoader::load_all`] sorts by precedence.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        sources: Vec<SourceConfig>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, LoaderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            sources,
            base_dir: None,
        })
    }

    /// Build a loader from the process config. Relative source paths resolve
    /// against the directory holding the sources file.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig, sources: Vec<SourceConfig>) -> Result<Self, LoaderError> {
        let loader = Self::new(sources, config.request_timeout_secs, &config.user_agent)?;
        Ok(match config.sources_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => loader.with_base_dir(dir),
            _ => loader,
        })
    }

    #[must_use]
    pub fn with_base_dir(mut self, dir: &Path) -> Self {
        self.base_dir = Some(dir.to_path_buf());
        self
    }

    #[must_use]
    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Fetch, parse and normalize a single source.
    ///
    /// # Errors
    ///
    /// Returns a transport, I/O or parse error for this source only.
    pub async fn load_source(&self, source: &SourceConfig) -> Result<Vec<LocationRecord>, LoaderError> {
        let body = match source.location() {
            Some(SourceLocation::Url(url)) => fetch_text(&self.client, url).await?,
            Some(SourceLocation::Path(path)) => read_file(&self.resolve(path)).await?,
            None => {
                return Err(LoaderError::MissingLocation {
                    source_name: source.name.clone(),
                })
            }
        };

        let rows = parse_rows(source.kind, &source.name, &body)?;
        Ok(normalize_rows(rows, source))
    }

    /// Load every source and return the combined, priority-ordered list.
    ///
    /// Records keep source order within a type; the final stable sort by
    /// priority only moves records across types.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::AllSourcesFailed`] when no source succeeded.
    /// An empty but successful source counts as a success.
    pub async fn load_all(&self) -> Result<Vec<LocationRecord>, LoaderError> {
        let started = Instant::now();

        let mut ordered: Vec<&SourceConfig> = self.sources.iter().collect();
        ordered.sort_by_key(|s| s.precedence());

        let results = join_all(ordered.iter().map(|s| self.load_source(s))).await;

        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut succeeded = 0usize;
        for (source, result) in ordered.iter().zip(results) {
            match result {
                Ok(mut batch) => {
                    tracing::debug!(source = %source.name, kind = %source.kind, count = batch.len(), "source loaded");
                    succeeded += 1;
                    records.append(&mut batch);
                }
                Err(e) => {
                    let parse_error = e.is_parse_error();
                    tracing::warn!(
                        source = %source.name,
                        kind = %source.kind,
                        parse_error,
                        error = %e,
                        "source failed; skipping"
                    );
                    failures.push(SourceFailure {
                        source_name: source.name.clone(),
                        reason: e.to_string(),
                        parse_error,
                    });
                }
            }
        }

        if succeeded == 0 {
            return Err(LoaderError::AllSourcesFailed { failures });
        }

        sort_by_priority(&mut records);
        tracing::info!(
            records = records.len(),
            sources_ok = succeeded,
            sources_failed = failures.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "locations loaded"
        );
        Ok(records)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use heero_core::SourceKind;

    use super::*;

    fn file_source(name: &str, path: &str) -> SourceConfig {
        SourceConfig {
            name: name.to_owned(),
            kind: SourceKind::EmbeddedCsv,
            url: None,
            path: Some(PathBuf::from(path)),
            category: None,
            id_prefix: None,
        }
    }

    #[test]
    fn relative_paths_resolve_against_base_dir() {
        let loader = SourceLoader::new(vec![], 5, "heero-test/0.1")
            .unwrap()
            .with_base_dir(Path::new("/etc/heero"));
        assert_eq!(
            loader.resolve(Path::new("data/a.csv")),
            PathBuf::from("/etc/heero/data/a.csv")
        );
        assert_eq!(
            loader.resolve(Path::new("/abs/a.csv")),
            PathBuf::from("/abs/a.csv")
        );
    }

    #[test]
    fn paths_unchanged_without_base_dir() {
        let loader = SourceLoader::new(vec![file_source("a", "a.csv")], 5, "heero-test/0.1").unwrap();
        assert_eq!(loader.resolve(Path::new("a.csv")), PathBuf::from("a.csv"));
        assert_eq!(loader.sources().len(), 1);
    }

    #[tokio::test]
    async fn missing_location_is_reported() {
        let mut source = file_source("nowhere", "x.csv");
        source.path = None;
        let loader = SourceLoader::new(vec![], 5, "heero-test/0.1").unwrap();
        let err = loader.load_source(&source).await.unwrap_err();
        assert!(matches!(err, LoaderError::MissingLocation { .. }));
    }
}
