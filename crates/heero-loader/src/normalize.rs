//! Conversion from [`RawRow`] to [`LocationRecord`].
//!
//! Classification is delegated to [`heero_core::classify`]; this module
//! handles coordinate validation, id assignment and field cleanup.

use heero_core::{classify, display_label, valid_coordinates, LocationRecord, SourceConfig};

use crate::types::RawRow;

/// Normalize the rows of one source.
///
/// Rows without both coordinate cells are dropped before ids are assigned, so
/// `<prefix>-<n>` counts rows that carried coordinates. Rows whose coordinates
/// then fail to parse or validate are dropped as well. Row order is kept.
#[must_use]
pub fn normalize_rows(rows: Vec<RawRow>, source: &SourceConfig) -> Vec<LocationRecord> {
    let prefix = source.id_prefix();
    let total = rows.len();

    let records: Vec<LocationRecord> = rows
        .into_iter()
        .filter(RawRow::has_coordinates)
        .enumerate()
        .filter_map(|(index, row)| normalize_row(row, index, &prefix, source))
        .collect();

    if records.len() < total {
        tracing::debug!(
            source = %source.name,
            kept = records.len(),
            dropped = total - records.len(),
            "dropped rows without usable coordinates"
        );
    }
    records
}

fn normalize_row(
    row: RawRow,
    index: usize,
    prefix: &str,
    source: &SourceConfig,
) -> Option<LocationRecord> {
    let lat = parse_coordinate(row.latitude.as_deref()?)?;
    let lng = parse_coordinate(row.longitude.as_deref()?)?;
    if !valid_coordinates(lat, lng) {
        return None;
    }

    let label = row
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let (location_type, category) = match source.category {
        Some(fixed) => (
            fixed,
            label
                .or_else(|| fixed.display_name())
                .unwrap_or_default()
                .to_string(),
        ),
        None => {
            // Rows with an empty category are classified by company name.
            let (location_type, _) = classify(label.or(row.name.as_deref()).unwrap_or(""));
            let category = match (label, location_type.display_name()) {
                (Some(raw), _) => display_label(raw),
                (None, Some(name)) => name.to_string(),
                (None, None) => display_label(""),
            };
            (location_type, category)
        }
    };

    Some(LocationRecord {
        id: format!("{prefix}-{index}"),
        category,
        location_type,
        company_name: row.name,
        address: row.address,
        city: row.city,
        phone_number: row.phone,
        url1: row.website,
        lat,
        lng,
        rating: row.rating.as_deref().and_then(parse_rating),
        review_count: row.review_count.as_deref().and_then(parse_count),
        subcategories: row
            .subcategories
            .as_deref()
            .map(parse_subcategories)
            .unwrap_or_default(),
        search_query: row.search_query,
    })
}

/// Parse a decimal-degree cell. Accepts a decimal comma when no dot is present.
pub(crate) fn parse_coordinate(text: &str) -> Option<f64> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .or_else(|| {
            if text.contains('.') {
                None
            } else {
                text.replacen(',', ".", 1).parse::<f64>().ok()
            }
        })
        .filter(|v| v.is_finite())
}

fn parse_rating(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Leading integer of a cell, ignoring thousands separators (`,`, `.` or
/// `'` followed by a three-digit group): `"1,234 reviews"` and `"1.234"` read
/// as 1234, `"4.5"` reads as 4.
fn parse_count(text: &str) -> Option<u32> {
    let is_separator = |c: char| matches!(c, ',' | '.' | '\'');
    let text = text.trim();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || is_separator(c)))
        .unwrap_or(text.len());

    let mut digits = String::new();
    for (i, group) in text[..end].split(is_separator).enumerate() {
        if i > 0 && group.len() != 3 {
            break;
        }
        digits.push_str(group);
    }
    digits.parse().ok()
}

fn parse_subcategories(text: &str) -> Vec<String> {
    text.replace('"', "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
