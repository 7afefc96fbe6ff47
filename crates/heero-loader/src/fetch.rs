//! Low-level I/O helpers for the source pipeline.

use std::path::Path;

use crate::error::LoaderError;

/// Fetch a text body, treating any non-2xx status as an error.
pub(crate) async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, LoaderError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/csv,application/geo+json,application/json,*/*")
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(LoaderError::HttpStatus {
            status: response.status().as_u16(),
            url: url.to_owned(),
        });
    }
    Ok(response.text().await?)
}

/// Read a static source file.
pub(crate) async fn read_file(path: &Path) -> Result<String, LoaderError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoaderError::Io {
            path: path.display().to_string(),
            source: e,
        })
}
