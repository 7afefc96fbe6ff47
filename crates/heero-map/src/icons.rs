//! Marker icon selection per location type.

use heero_core::{CategoryColorMap, LocationRecord, LocationType};
use serde::Serialize;

/// Color for discovered categories that have no assigned color yet.
pub const UNASSIGNED_COLOR: &str = "#6B7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    /// HEERO roundel, used for both HEERO types at different sizes.
    HeeroLogo,
    BoschLogo,
    MercedesPin,
    /// Pin tinted with the category color.
    CategoryPin,
}

impl IconKind {
    #[must_use]
    pub fn for_type(location_type: LocationType) -> Self {
        match location_type {
            LocationType::ServiceExcellence | LocationType::CertifiedHub => IconKind::HeeroLogo,
            LocationType::Bosch => IconKind::BoschLogo,
            LocationType::Mercedes => IconKind::MercedesPin,
            LocationType::Other => IconKind::CategoryPin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub kind: IconKind,
    pub size_px: u32,
    pub color: String,
}

#[must_use]
pub fn size_px(location_type: LocationType) -> u32 {
    match location_type {
        LocationType::ServiceExcellence => 48,
        LocationType::CertifiedHub => 36,
        LocationType::Bosch | LocationType::Mercedes => 32,
        LocationType::Other => 28,
    }
}

/// Icon for a record. Fixed types use their reserved color; discovered
/// categories use the assigned one.
#[must_use]
pub fn icon_for(record: &LocationRecord, colors: &CategoryColorMap) -> MarkerIcon {
    let location_type = record.location_type;
    let color = location_type
        .fixed_color()
        .or_else(|| colors.get(&record.category))
        .unwrap_or(UNASSIGNED_COLOR);

    MarkerIcon {
        kind: IconKind::for_type(location_type),
        size_px: size_px(location_type),
        color: color.to_string(),
    }
}
