//! Free-text category label to canonical [`LocationType`] mapping.

use crate::location::LocationType;

/// Label kept on `Other` records whose source row carried no category text.
pub const UNLABELED_CATEGORY: &str = "Other";

/// Ordered keyword sets; the first set with a matching keyword wins.
const KEYWORDS: [(LocationType, &[&str]); 4] = [
    (LocationType::Bosch, &["bosch"]),
    (LocationType::Mercedes, &["mercedes"]),
    (
        LocationType::ServiceExcellence,
        &["service excellence", "heero motors excellence center"],
    ),
    (
        LocationType::CertifiedHub,
        &["certified heero hub", "heero hub"],
    ),
];

/// Classify a raw category label into a canonical type and its priority rank.
///
/// Matching is a case-insensitive substring test. Labels that match nothing
/// resolve to [`LocationType::Other`]; callers keep the trimmed label for
/// display and color assignment.
#[must_use]
pub fn classify(label: &str) -> (LocationType, u8) {
    let lowered = label.to_lowercase();
    let location_type = KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map_or(LocationType::Other, |(t, _)| *t);
    (location_type, location_type.priority())
}

/// The label an `Other` record keeps: the trimmed input, or
/// [`UNLABELED_CATEGORY`] when nothing is left.
#[must_use]
pub fn display_label(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        UNLABELED_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}
