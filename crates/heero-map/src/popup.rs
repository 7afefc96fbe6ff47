//! Content of the selection popup. Empty fields are left out rather than
//! rendered blank.

use heero_core::{LngLat, LocationRecord, LocationType};
use serde::Serialize;

/// Subcategories shown before the list is cut off.
pub const MAX_SUBCATEGORIES: usize = 2;
/// Popup anchor offset above the marker.
pub const POPUP_OFFSET_PX: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStyle {
    Heero,
    Bosch,
    Mercedes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub style: BadgeStyle,
}

impl Badge {
    /// Fixed types only; discovered categories get no badge.
    #[must_use]
    pub fn for_type(location_type: LocationType) -> Option<Self> {
        let style = match location_type {
            LocationType::ServiceExcellence | LocationType::CertifiedHub => BadgeStyle::Heero,
            LocationType::Bosch => BadgeStyle::Bosch,
            LocationType::Mercedes => BadgeStyle::Mercedes,
            LocationType::Other => return None,
        };
        Some(Self {
            label: location_type.display_name()?.to_string(),
            style,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupContent {
    pub record_id: String,
    pub anchor: LngLat,
    pub offset_px: f64,
    pub title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub badge: Option<Badge>,
    pub rating: Option<f64>,
    /// Only present alongside a rating.
    pub review_count: Option<u32>,
    pub subcategories: Vec<String>,
    /// More subcategories exist than are shown.
    pub truncated: bool,
}

impl PopupContent {
    #[must_use]
    pub fn for_record(record: &LocationRecord) -> Self {
        let non_empty = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        let rating = record.rating.filter(|r| *r > 0.0);

        Self {
            record_id: record.id.clone(),
            anchor: record.lng_lat(),
            offset_px: POPUP_OFFSET_PX,
            title: non_empty(&record.company_name),
            address: non_empty(&record.address),
            phone: non_empty(&record.phone_number),
            website: non_empty(&record.url1),
            badge: Badge::for_type(record.location_type),
            rating,
            review_count: rating.and(record.review_count).filter(|c| *c > 0),
            subcategories: record
                .subcategories
                .iter()
                .take(MAX_SUBCATEGORIES)
                .cloned()
                .collect(),
            truncated: record.subcategories.len() > MAX_SUBCATEGORIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> LocationRecord {
        LocationRecord {
            id: "bosch-location-3".to_owned(),
            category: "Bosch Car Service".to_owned(),
            location_type: LocationType::Bosch,
            company_name: Some("Garage Keller AG".to_owned()),
            address: Some("Industriestrasse 9".to_owned()),
            city: Some("Winterthur".to_owned()),
            phone_number: Some("052 123 45 67".to_owned()),
            url1: Some("https://keller.example".to_owned()),
            lat: 47.5,
            lng: 8.72,
            rating: Some(4.6),
            review_count: Some(128),
            subcategories: vec!["Brakes".to_owned(), "Tyres".to_owned(), "AC".to_owned()],
            search_query: None,
        }
    }

    #[test]
    fn full_record_fills_every_field() {
        let popup = PopupContent::for_record(&full_record());
        assert_eq!(popup.title.as_deref(), Some("Garage Keller AG"));
        assert_eq!(popup.phone.as_deref(), Some("052 123 45 67"));
        assert_eq!(popup.badge.as_ref().map(|b| b.label.as_str()), Some("Bosch Car Service"));
        assert_eq!(popup.rating, Some(4.6));
        assert_eq!(popup.review_count, Some(128));
        assert_eq!(popup.subcategories, ["Brakes", "Tyres"]);
        assert!(popup.truncated);
        assert!((popup.offset_px - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_fields_are_omitted() {
        let record = LocationRecord {
            phone_number: Some("  ".to_owned()),
            url1: None,
            rating: None,
            review_count: Some(12),
            subcategories: vec!["Brakes".to_owned()],
            location_type: LocationType::Other,
            category: "Tyre Shop".to_owned(),
            ..full_record()
        };
        let popup = PopupContent::for_record(&record);
        assert!(popup.phone.is_none());
        assert!(popup.website.is_none());
        assert!(popup.badge.is_none());
        assert!(popup.rating.is_none());
        assert!(popup.review_count.is_none(), "review count needs a rating");
        assert_eq!(popup.subcategories, ["Brakes"]);
        assert!(!popup.truncated);
    }

    #[test]
    fn heero_types_share_badge_style() {
        let hub = Badge::for_type(LocationType::CertifiedHub).unwrap();
        let excellence = Badge::for_type(LocationType::ServiceExcellence).unwrap();
        assert_eq!(hub.style, BadgeStyle::Heero);
        assert_eq!(excellence.label, "Service Excellence Center HEERO MOTORS");
    }
}
