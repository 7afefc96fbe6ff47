//! Spreadsheet export: header row, columns located by name.

use std::collections::HashMap;

use crate::error::LoaderError;
use crate::types::{cell, RawRow};

use super::csv_reader;

/// Parse a sheet export whose header names the columns
/// (`Category, Name, Address, Latitude, Longitude, Website, Rating,
/// Review Count, Subcategories, Phone Number, City`).
///
/// Header matching ignores case and surrounding whitespace. Columns missing
/// from the header read as empty; blank lines are skipped.
///
/// # Errors
///
/// Returns [`LoaderError::Csv`] when the body is not valid CSV.
pub fn parse_sheet_csv(source_name: &str, body: &str) -> Result<Vec<RawRow>, LoaderError> {
    let csv_err = |source| LoaderError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut reader = csv_reader(body);
    let columns: HashMap<String, usize> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_lowercase(), i))
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let col = |name: &str| {
            columns
                .get(name)
                .and_then(|&i| record.get(i))
                .and_then(cell)
        };

        let row = RawRow {
            category: col("category"),
            name: col("name"),
            address: col("address"),
            city: col("city"),
            phone: col("phone number"),
            website: col("website"),
            latitude: col("latitude"),
            longitude: col("longitude"),
            rating: col("rating"),
            review_count: col("review count"),
            subcategories: col("subcategories"),
            search_query: None,
        };
        if !row.is_blank() {
            rows.push(row);
        }
    }

    tracing::debug!(source = source_name, rows = rows.len(), "parsed sheet CSV");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "Category,Name,Address,Latitude,Longitude,Website,Rating,Review Count,Subcategories,Phone Number,City\n\
Bosch Car Service,Garage Muster,\"Bahnhofstrasse 1, 8001\",47.3769,8.5417,https://muster.ch,4.6,120,\"Brakes, Tyres\",044 123 45 67,Zurich\n\
,,,,,,,,,,\n\
Tyre Shop,Reifen AG,Hauptstrasse 5,,,,,,,,Bern\n";

    #[test]
    fn maps_columns_by_header_name() {
        let rows = parse_sheet_csv("sheet", SHEET).unwrap();
        assert_eq!(rows.len(), 2, "blank line is skipped");
        let first = &rows[0];
        assert_eq!(first.category.as_deref(), Some("Bosch Car Service"));
        assert_eq!(first.name.as_deref(), Some("Garage Muster"));
        assert_eq!(first.address.as_deref(), Some("Bahnhofstrasse 1, 8001"));
        assert_eq!(first.latitude.as_deref(), Some("47.3769"));
        assert_eq!(first.longitude.as_deref(), Some("8.5417"));
        assert_eq!(first.website.as_deref(), Some("https://muster.ch"));
        assert_eq!(first.rating.as_deref(), Some("4.6"));
        assert_eq!(first.review_count.as_deref(), Some("120"));
        assert_eq!(first.subcategories.as_deref(), Some("Brakes, Tyres"));
        assert_eq!(first.phone.as_deref(), Some("044 123 45 67"));
        assert_eq!(first.city.as_deref(), Some("Zurich"));
    }

    #[test]
    fn missing_cells_are_none() {
        let rows = parse_sheet_csv("sheet", SHEET).unwrap();
        let second = &rows[1];
        assert!(second.latitude.is_none());
        assert!(second.website.is_none());
        assert_eq!(second.city.as_deref(), Some("Bern"));
    }

    #[test]
    fn header_order_and_case_do_not_matter() {
        let body = "city, LATITUDE ,longitude,name\nBasel,47.5596,7.5886,Rhein Garage\n";
        let rows = parse_sheet_csv("sheet", body).unwrap();
        assert_eq!(rows[0].city.as_deref(), Some("Basel"));
        assert_eq!(rows[0].latitude.as_deref(), Some("47.5596"));
        assert!(rows[0].category.is_none());
    }

    #[test]
    fn short_rows_read_as_empty() {
        let body = "Category,Name,Address,Latitude,Longitude\nBosch,Short Row\n";
        let rows = parse_sheet_csv("sheet", body).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].latitude.is_none());
    }

    #[test]
    fn strips_byte_order_mark_from_header() {
        let body = "\u{feff}Category,Latitude,Longitude\nBosch,47.1,8.1\n";
        let rows = parse_sheet_csv("sheet", body).unwrap();
        assert_eq!(rows[0].category.as_deref(), Some("Bosch"));
    }
}
