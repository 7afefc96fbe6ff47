//! Static point-feature files, one per category.

use serde_json::Value;

use crate::error::LoaderError;
use crate::types::{cell, RawRow};

/// Parse a `FeatureCollection` into rows.
///
/// Only `Point` features with a coordinate array are kept. Property names
/// follow the exported files (`Company_Name` or `Company Name`, `Address` or
/// the misspelt `Adress`, `URL1`, `PhoneNumber`, `Review_Count`, ...).
/// Numeric properties are turned into text so every format reaches the
/// normalizer in the same shape.
///
/// # Errors
///
/// Returns [`LoaderError::Json`] for malformed JSON and
/// [`LoaderError::InvalidGeoJson`] when there is no `features` array.
pub fn parse_geojson(source_name: &str, body: &str) -> Result<Vec<RawRow>, LoaderError> {
    let doc: Value = serde_json::from_str(body).map_err(|source| LoaderError::Json {
        source_name: source_name.to_string(),
        source,
    })?;

    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| LoaderError::InvalidGeoJson {
            source_name: source_name.to_string(),
            reason: "missing features array".to_string(),
        })?;

    let rows: Vec<RawRow> = features.iter().filter_map(feature_to_row).collect();

    let skipped = features.len() - rows.len();
    if skipped > 0 {
        tracing::debug!(
            source = source_name,
            skipped,
            "skipped non-point GeoJSON features"
        );
    }
    Ok(rows)
}

fn feature_to_row(feature: &Value) -> Option<RawRow> {
    let geometry = feature.get("geometry")?;
    if geometry.get("type").and_then(Value::as_str) != Some("Point") {
        return None;
    }
    let coords = geometry.get("coordinates")?.as_array()?;
    let lng = coords.first().and_then(value_text);
    let lat = coords.get(1).and_then(value_text);

    let empty = serde_json::Map::new();
    let props = feature
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let prop = |keys: &[&str]| keys.iter().find_map(|k| props.get(*k).and_then(value_text));

    Some(RawRow {
        category: prop(&["Category", "category"]),
        name: prop(&["Company_Name", "Company Name", "Name"]),
        address: prop(&["Address", "Adress"]),
        city: prop(&["City"]),
        phone: prop(&["PhoneNumber", "Phone Number"]),
        website: prop(&["URL1", "Website"]),
        latitude: lat,
        longitude: lng,
        rating: prop(&["Rating"]),
        review_count: prop(&["Review_Count", "Review Count"]),
        subcategories: prop(&["Subcategories"]),
        search_query: prop(&["Search_Query"]),
    })
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => cell(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
