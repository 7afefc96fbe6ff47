//! Radius clustering for the native-cluster rendering path.
//!
//! Points are visited in `(priority, id)` order. Each point not yet claimed
//! becomes a seed and claims every unclaimed point within the radius of it
//! at the current zoom. A cluster carries the best priority among its
//! members and that member type's icon, so a HEERO location inside a cluster
//! still shows as HEERO.

use heero_core::{LngLat, LocationRecord, LocationType};
use serde::Serialize;

use crate::icons::IconKind;
use crate::projection::{pixel_distance, MAX_ZOOM};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterOptions {
    pub radius_px: f64,
    /// Zoom at which clustering stops; expansion zooms never exceed it.
    pub max_zoom: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius_px: 50.0,
            max_zoom: 16.0,
        }
    }
}

/// A record as a point feature, with the properties the renderer styles on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointFeature {
    pub id: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub category: String,
    pub priority: u8,
    pub icon: IconKind,
    pub position: LngLat,
}

impl From<&LocationRecord> for PointFeature {
    fn from(record: &LocationRecord) -> Self {
        Self {
            id: record.id.clone(),
            location_type: record.location_type,
            category: record.category.clone(),
            priority: record.priority(),
            icon: IconKind::for_type(record.location_type),
            position: record.lng_lat(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// Member ids, seed first.
    pub members: Vec<String>,
    /// Mean position of the members.
    pub position: LngLat,
    pub priority: u8,
    pub icon: IconKind,
    /// First whole zoom level at which the members no longer all fit within
    /// the radius of the seed, capped at `max_zoom`.
    pub expansion_zoom: f64,
}

impl Cluster {
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterItem {
    Point(PointFeature),
    Cluster(Cluster),
}

/// Cluster `records` at `zoom`. At or above `options.max_zoom` every record is
/// returned as a plain point.
#[must_use]
pub fn cluster_points(records: &[&LocationRecord], zoom: f64, options: &ClusterOptions) -> Vec<ClusterItem> {
    let mut features: Vec<PointFeature> = records.iter().map(|r| PointFeature::from(*r)).collect();
    features.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));

    if zoom >= options.max_zoom {
        return features.into_iter().map(ClusterItem::Point).collect();
    }

    let mut claimed = vec![false; features.len()];
    let mut items = Vec::new();

    for seed in 0..features.len() {
        if claimed[seed] {
            continue;
        }
        claimed[seed] = true;
        let seed_pos = features[seed].position;

        let mut members = vec![seed];
        for (i, feature) in features.iter().enumerate().skip(seed + 1) {
            if !claimed[i] && pixel_distance(seed_pos, feature.position, zoom) <= options.radius_px {
                claimed[i] = true;
                members.push(i);
            }
        }

        if members.len() == 1 {
            items.push(ClusterItem::Point(features[seed].clone()));
        } else {
            items.push(ClusterItem::Cluster(build_cluster(&features, &members, zoom, options)));
        }
    }

    tracing::debug!(
        points = features.len(),
        items = items.len(),
        zoom,
        "clustered points"
    );
    items
}

fn build_cluster(features: &[PointFeature], members: &[usize], zoom: f64, options: &ClusterOptions) -> Cluster {
    let seed = &features[members[0]];
    let best = members
        .iter()
        .map(|&i| &features[i])
        .min_by_key(|f| f.priority)
        .unwrap_or(seed);

    #[allow(clippy::cast_precision_loss)]
    let n = members.len() as f64;
    let position = LngLat {
        lng: members.iter().map(|&i| features[i].position.lng).sum::<f64>() / n,
        lat: members.iter().map(|&i| features[i].position.lat).sum::<f64>() / n,
    };

    let cap = options.max_zoom.min(MAX_ZOOM);
    let mut expansion_zoom = zoom.floor() + 1.0;
    while expansion_zoom < cap
        && members
            .iter()
            .all(|&i| pixel_distance(seed.position, features[i].position, expansion_zoom) <= options.radius_px)
    {
        expansion_zoom += 1.0;
    }

    Cluster {
        members: members.iter().map(|&i| features[i].id.clone()).collect(),
        position,
        priority: best.priority,
        icon: best.icon,
        expansion_zoom: expansion_zoom.min(cap),
    }
}
