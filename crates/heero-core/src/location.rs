use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Canonical category tag for a service location.
///
/// The priority rank orders every list, legend and marker draw in the system;
/// lower ranks win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    ServiceExcellence,
    CertifiedHub,
    Bosch,
    Mercedes,
    Other,
}

impl LocationType {
    /// Every fixed type in priority order, followed by `Other`.
    pub const ALL: [LocationType; 5] = [
        LocationType::ServiceExcellence,
        LocationType::CertifiedHub,
        LocationType::Bosch,
        LocationType::Mercedes,
        LocationType::Other,
    ];

    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            LocationType::ServiceExcellence => 0,
            LocationType::CertifiedHub => 1,
            LocationType::Bosch => 2,
            LocationType::Mercedes => 3,
            LocationType::Other => 99,
        }
    }

    /// `true` for the two HEERO-operated types.
    #[must_use]
    pub fn is_heero(self) -> bool {
        matches!(
            self,
            LocationType::ServiceExcellence | LocationType::CertifiedHub
        )
    }

    /// Legend / badge label. `None` for `Other`, which is labelled by its raw category.
    #[must_use]
    pub fn display_name(self) -> Option<&'static str> {
        match self {
            LocationType::ServiceExcellence => Some("Service Excellence Center HEERO MOTORS"),
            LocationType::CertifiedHub => Some("Certified HEERO Hubs"),
            LocationType::Bosch => Some("Bosch Car Service"),
            LocationType::Mercedes => Some("Mercedes-Benz Van Service"),
            LocationType::Other => None,
        }
    }

    /// Marker color of a fixed type. These colors are reserved and never handed
    /// out to discovered categories.
    #[must_use]
    pub fn fixed_color(self) -> Option<&'static str> {
        match self {
            LocationType::ServiceExcellence | LocationType::CertifiedHub => Some("#F49D16"),
            LocationType::Bosch => Some("#000000"),
            LocationType::Mercedes => Some("#FF0000"),
            LocationType::Other => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::ServiceExcellence => "service_excellence",
            LocationType::CertifiedHub => "certified_hub",
            LocationType::Bosch => "bosch",
            LocationType::Mercedes => "mercedes",
            LocationType::Other => "other",
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "service_excellence" => Ok(LocationType::ServiceExcellence),
            "certified_hub" => Ok(LocationType::CertifiedHub),
            "bosch" => Ok(LocationType::Bosch),
            "mercedes" => Ok(LocationType::Mercedes),
            "other" => Ok(LocationType::Other),
            other => Err(CoreError::UnknownLocationType(other.to_string())),
        }
    }
}

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// One service point, normalized from any source.
///
/// Field names serialize in camelCase so persisted cache entries keep the
/// shape the map front-end reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Unique within one load; derived from source and row index.
    pub id: String,
    /// Raw trimmed category label (or the fixed type's display name).
    pub category: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub url1: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl LocationRecord {
    #[must_use]
    pub fn priority(&self) -> u8 {
        self.location_type.priority()
    }

    #[must_use]
    pub fn lng_lat(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }

    /// The label used for discovered-category filters and color assignment.
    /// `None` for fixed types.
    #[must_use]
    pub fn dynamic_category(&self) -> Option<&str> {
        (self.location_type == LocationType::Other).then_some(self.category.as_str())
    }
}

/// Returns `true` when the pair is usable as a marker position.
///
/// Rejects non-finite values, out-of-range values and any zero component:
/// spreadsheet exports write `0` for a missing coordinate.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn valid_coordinates(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && lat != 0.0
        && lng != 0.0
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

/// Stable sort by priority rank; records of equal rank keep source order.
pub fn sort_by_priority(records: &mut [LocationRecord]) {
    records.sort_by_key(LocationRecord::priority);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, location_type: LocationType) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            category: location_type.display_name().unwrap_or("Tyre Shop").to_string(),
            location_type,
            company_name: None,
            address: None,
            city: None,
            phone_number: None,
            url1: None,
            lat: 47.0,
            lng: 8.0,
            rating: None,
            review_count: None,
            subcategories: vec![],
            search_query: None,
        }
    }

    #[test]
    fn priorities_are_fixed() {
        assert_eq!(LocationType::ServiceExcellence.priority(), 0);
        assert_eq!(LocationType::CertifiedHub.priority(), 1);
        assert_eq!(LocationType::Bosch.priority(), 2);
        assert_eq!(LocationType::Mercedes.priority(), 3);
        assert_eq!(LocationType::Other.priority(), 99);
    }

    #[test]
    fn all_is_in_priority_order() {
        let ranks: Vec<u8> = LocationType::ALL.iter().map(|t| t.priority()).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn location_type_round_trips_through_str() {
        for t in LocationType::ALL {
            assert_eq!(t.as_str().parse::<LocationType>().unwrap(), t);
        }
        assert!("garage".parse::<LocationType>().is_err());
    }

    #[test]
    fn record_serializes_with_camel_case_and_type_key() {
        let rec = record("bosch-location-0", LocationType::Bosch);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "bosch");
        assert!(json.get("companyName").is_some());
        assert!(json.get("reviewCount").is_some());
        assert!(json.get("subcategories").is_none(), "empty list is skipped");
    }

    #[test]
    fn rejects_zero_and_non_finite_coordinates() {
        assert!(valid_coordinates(47.3769, 8.5417));
        assert!(!valid_coordinates(0.0, 0.0));
        assert!(!valid_coordinates(47.0, 0.0));
        assert!(!valid_coordinates(f64::NAN, 8.0));
        assert!(!valid_coordinates(91.0, 8.0));
        assert!(!valid_coordinates(47.0, 181.0));
    }

    #[test]
    fn sort_by_priority_is_stable() {
        let mut recs = vec![
            record("m-0", LocationType::Mercedes),
            record("b-0", LocationType::Bosch),
            record("o-0", LocationType::Other),
            record("b-1", LocationType::Bosch),
            record("s-0", LocationType::ServiceExcellence),
        ];
        sort_by_priority(&mut recs);
        let ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["s-0", "b-0", "b-1", "m-0", "o-0"]);
    }

    #[test]
    fn dynamic_category_only_for_other() {
        assert_eq!(
            record("o", LocationType::Other).dynamic_category(),
            Some("Tyre Shop")
        );
        assert_eq!(record("b", LocationType::Bosch).dynamic_category(), None);
    }
}
