//! Positional CSV bundled with the app. The first line is a header and is
//! skipped; cells are read by position.

use crate::error::LoaderError;
use crate::types::{cell, RawRow};

use super::csv_reader;

const CITY: usize = 0;
const WEBSITE: usize = 1;
const ADDRESS: usize = 2;
const LATITUDE: usize = 3;
const LONGITUDE: usize = 4;
const RATING: usize = 5;
const REVIEW_COUNT: usize = 6;
const CATEGORY: usize = 7;
const SUBCATEGORIES: usize = 8;
const NAME: usize = 9;
const PHONE: usize = 10;

/// Parse the positional layout
/// `City, Website, Address, Latitude, Longitude, Rating, Review Count,
/// Category, Subcategories, Name, Phone Number`.
///
/// Trailing cells may be omitted.
///
/// # Errors
///
/// Returns [`LoaderError::Csv`] when the body is not valid CSV.
pub fn parse_embedded_csv(source_name: &str, body: &str) -> Result<Vec<RawRow>, LoaderError> {
    let mut rows = Vec::new();
    for result in csv_reader(body).records() {
        let record = result.map_err(|source| LoaderError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;
        let col = |i: usize| record.get(i).and_then(cell);

        let row = RawRow {
            category: col(CATEGORY),
            name: col(NAME),
            address: col(ADDRESS),
            city: col(CITY),
            phone: col(PHONE),
            website: col(WEBSITE),
            latitude: col(LATITUDE),
            longitude: col(LONGITUDE),
            rating: col(RATING),
            review_count: col(REVIEW_COUNT),
            subcategories: col(SUBCATEGORIES),
            search_query: None,
        };
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}
