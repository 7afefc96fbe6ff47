//! Per-category counts for the legend and sidebar headers.

use std::collections::BTreeMap;

use heero_core::{CategoryColorMap, LocationRecord, LocationType};
use serde::Serialize;

use crate::icons::UNASSIGNED_COLOR;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub color: String,
    pub count: usize,
}

/// The four fixed types first, in priority order and always present, then
/// discovered categories alphabetically.
pub fn legend<'a, I>(records: I, colors: &CategoryColorMap) -> Vec<LegendEntry>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let mut fixed = [0usize; 4];
    let mut dynamic: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        match record.dynamic_category() {
            Some(label) => *dynamic.entry(label).or_default() += 1,
            None => fixed[usize::from(record.priority())] += 1,
        }
    }

    let fixed_entries = LocationType::ALL
        .iter()
        .filter_map(|t| Some((*t, t.display_name()?, t.fixed_color()?)))
        .map(|(t, label, color)| LegendEntry {
            label: label.to_string(),
            location_type: t,
            color: color.to_string(),
            count: fixed[usize::from(t.priority())],
        });

    let dynamic_entries = dynamic.into_iter().map(|(label, count)| LegendEntry {
        label: label.to_string(),
        location_type: LocationType::Other,
        color: colors.get(label).unwrap_or(UNASSIGNED_COLOR).to_string(),
        count,
    });

    fixed_entries.chain(dynamic_entries).collect()
}
