//! Format-independent row shape produced by every source parser.

/// One row as read from a source, before validation and classification.
///
/// Every field is the trimmed source text; empty cells are `None`.
/// Coordinates stay textual so the normalizer can tell "missing" apart from
/// "present but unparsable".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub category: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub subcategories: Option<String>,
    pub search_query: Option<String>,
}

impl RawRow {
    /// `true` when both coordinate cells carry text.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// `true` when every field is empty (blank spreadsheet line).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        *self == RawRow::default()
    }
}

/// Trim a cell and map empty text to `None`.
pub(crate) fn cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
