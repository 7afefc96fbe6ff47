//! Display colors for discovered (`Other`) categories.
//!
//! Colors are handed out from [`PALETTE`] in order, skipping anything a fixed
//! category or an earlier label already uses. Once a label has a color it is
//! never reassigned. After the palette runs out a random HSL color is used;
//! that fallback is not deterministic, so an overflow label can come back with
//! a different color if the persisted map is lost.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::location::LocationType;

/// Ordered palette for discovered categories.
pub const PALETTE: [&str; 12] = [
    "#2563EB", "#16A34A", "#9333EA", "#0891B2", "#DB2777", "#CA8A04", "#4F46E5", "#059669",
    "#EA580C", "#7C3AED", "#0D9488", "#BE123C",
];

/// Persisted mapping from raw category label to color string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryColorMap(BTreeMap<String, String>);

impl CategoryColorMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn used_colors(&self) -> HashSet<String> {
        self.0.values().map(|c| c.to_ascii_uppercase()).collect()
    }
}

impl FromIterator<(String, String)> for CategoryColorMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Returns `true` when `color` belongs to one of the fixed categories.
#[must_use]
pub fn is_reserved_color(color: &str) -> bool {
    LocationType::ALL
        .iter()
        .filter_map(|t| t.fixed_color())
        .any(|reserved| reserved.eq_ignore_ascii_case(color))
}

/// Assign colors to every label in `labels` not yet present in `current`.
///
/// Uses the thread-local RNG for the post-palette fallback.
#[must_use]
pub fn assign_colors<'a, I>(current: &CategoryColorMap, labels: I) -> CategoryColorMap
where
    I: IntoIterator<Item = &'a str>,
{
    assign_colors_with(current, labels, &mut rand::rng())
}

/// [`assign_colors`] with an explicit RNG for the fallback.
///
/// Existing entries are copied unchanged. New labels are processed in
/// first-seen order; empty labels are ignored.
#[must_use]
pub fn assign_colors_with<'a, I, R>(
    current: &CategoryColorMap,
    labels: I,
    rng: &mut R,
) -> CategoryColorMap
where
    I: IntoIterator<Item = &'a str>,
    R: Rng + ?Sized,
{
    let mut next = current.clone();
    let mut used = current.used_colors();

    for label in labels {
        let label = label.trim();
        if label.is_empty() || next.contains(label) {
            continue;
        }

        let color = PALETTE
            .iter()
            .find(|c| !is_reserved_color(c) && !used.contains(&c.to_ascii_uppercase()))
            .map_or_else(|| random_hsl(rng), |c| (*c).to_string());

        tracing::debug!(label, color = %color, "assigned category color");
        used.insert(color.to_ascii_uppercase());
        next.0.insert(label.to_string(), color);
    }

    next
}

fn random_hsl<R: Rng + ?Sized>(rng: &mut R) -> String {
    let hue: u16 = rng.random_range(0..360);
    format!("hsl({hue}, 65%, 50%)")
}
