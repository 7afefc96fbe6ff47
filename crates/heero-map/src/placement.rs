//! Greedy marker de-overlap.

use heero_core::LocationRecord;

use crate::projection::{ScreenPoint, Viewport};

/// Whether two markers compete for the same screen space. HEERO markers are
/// only hidden by other HEERO markers, everything else only by non-HEERO ones.
fn conflicts(a: &LocationRecord, b: &LocationRecord) -> bool {
    a.location_type.is_heero() == b.location_type.is_heero()
}

/// Pick the markers to draw at `viewport`.
///
/// Records are visited by ascending priority (stable, so input order breaks
/// ties). A record is kept when every conflicting record already kept is at
/// least `min_distance_px` away on screen. The result is in visiting order and
/// deterministic for a given input and viewport.
#[must_use]
pub fn place_markers<'a>(
    records: &[&'a LocationRecord],
    viewport: &Viewport,
    min_distance_px: f64,
) -> Vec<&'a LocationRecord> {
    let mut ordered: Vec<&'a LocationRecord> = records.to_vec();
    ordered.sort_by_key(|r| r.priority());

    let mut kept: Vec<(&'a LocationRecord, ScreenPoint)> = Vec::new();
    for record in ordered {
        let pt = viewport.project(record.lng_lat());
        let blocked = kept
            .iter()
            .any(|(other, other_pt)| conflicts(record, other) && pt.distance(*other_pt) < min_distance_px);
        if !blocked {
            kept.push((record, pt));
        }
    }

    tracing::debug!(
        candidates = records.len(),
        placed = kept.len(),
        zoom = viewport.zoom,
        "markers placed"
    );
    kept.into_iter().map(|(r, _)| r).collect()
}
