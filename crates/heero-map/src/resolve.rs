use heero_core::{LngLat, LocationRecord};

/// Map a click on a rendered feature back to its record.
///
/// The feature id is tried first. Features that lost their id in the renderer
/// fall back to the first record within `tolerance_deg` of the click on both
/// axes. A miss returns `None` and the caller leaves the selection alone.
pub fn resolve_click<'a, I>(
    records: I,
    feature_id: Option<&str>,
    at: LngLat,
    tolerance_deg: f64,
) -> Option<&'a LocationRecord>
where
    I: IntoIterator<Item = &'a LocationRecord>,
    I::IntoIter: Clone,
{
    let mut records = records.into_iter();

    if let Some(id) = feature_id {
        if let Some(hit) = records.clone().find(|r| r.id == id) {
            return Some(hit);
        }
    }

    let hit = records.find(|r| {
        (r.lat - at.lat).abs() < tolerance_deg && (r.lng - at.lng).abs() < tolerance_deg
    });
    if hit.is_none() {
        tracing::debug!(
            feature_id,
            lng = at.lng,
            lat = at.lat,
            "click did not resolve to a location"
        );
    }
    hit
}
