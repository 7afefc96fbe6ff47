//! Per-format parsers. Each turns a source body into [`RawRow`]s and leaves
//! validation to [`crate::normalize`].
//!
//! [`RawRow`]: crate::types::RawRow

mod embedded_csv;
mod geojson;
mod sheet_csv;

pub use embedded_csv::parse_embedded_csv;
pub use geojson::parse_geojson;
pub use sheet_csv::parse_sheet_csv;

use heero_core::SourceKind;

use crate::error::LoaderError;
use crate::types::RawRow;

/// Dispatch on the configured kind.
///
/// # Errors
///
/// Returns the parse error of the selected format.
pub fn parse_rows(kind: SourceKind, source_name: &str, body: &str) -> Result<Vec<RawRow>, LoaderError> {
    match kind {
        SourceKind::SheetCsv => parse_sheet_csv(source_name, body),
        SourceKind::EmbeddedCsv => parse_embedded_csv(source_name, body),
        SourceKind::Geojson => parse_geojson(source_name, body),
    }
}

pub(crate) fn csv_reader(body: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes())
}
