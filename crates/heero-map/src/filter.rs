//! Filter state shared by the sidebar list and the map.

use std::collections::BTreeMap;

use heero_core::{LocationRecord, LocationType};
use serde::Serialize;

/// Which records are shown. Never persisted; every session starts with
/// everything visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub show_service_excellence: bool,
    pub show_certified_hub: bool,
    pub show_bosch: bool,
    pub show_mercedes: bool,
    /// Discovered category label -> shown. Labels missing here are shown.
    pub dynamic: BTreeMap<String, bool>,
    pub search_term: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            show_service_excellence: true,
            show_certified_hub: true,
            show_bosch: true,
            show_mercedes: true,
            dynamic: BTreeMap::new(),
            search_term: String::new(),
        }
    }
}

/// Partial update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub show_service_excellence: Option<bool>,
    pub show_certified_hub: Option<bool>,
    pub show_bosch: Option<bool>,
    pub show_mercedes: Option<bool>,
    pub dynamic: BTreeMap<String, bool>,
    pub search_term: Option<String>,
}

impl FilterPatch {
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn toggle_type(location_type: LocationType, shown: bool) -> Self {
        let mut patch = Self::default();
        match location_type {
            LocationType::ServiceExcellence => patch.show_service_excellence = Some(shown),
            LocationType::CertifiedHub => patch.show_certified_hub = Some(shown),
            LocationType::Bosch => patch.show_bosch = Some(shown),
            LocationType::Mercedes => patch.show_mercedes = Some(shown),
            LocationType::Other => {}
        }
        patch
    }

    #[must_use]
    pub fn toggle_category(label: impl Into<String>, shown: bool) -> Self {
        let mut patch = Self::default();
        patch.dynamic.insert(label.into(), shown);
        patch
    }
}

impl FilterState {
    pub fn apply(&mut self, patch: FilterPatch) {
        let FilterPatch {
            show_service_excellence,
            show_certified_hub,
            show_bosch,
            show_mercedes,
            dynamic,
            search_term,
        } = patch;

        if let Some(v) = show_service_excellence {
            self.show_service_excellence = v;
        }
        if let Some(v) = show_certified_hub {
            self.show_certified_hub = v;
        }
        if let Some(v) = show_bosch {
            self.show_bosch = v;
        }
        if let Some(v) = show_mercedes {
            self.show_mercedes = v;
        }
        self.dynamic.extend(dynamic);
        if let Some(term) = search_term {
            self.search_term = term;
        }
    }

    /// Add discovered labels as visible. Existing flags are kept. Returns the
    /// labels that were new.
    pub fn register_categories<'a, I>(&mut self, labels: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut added = Vec::new();
        for label in labels {
            if label.is_empty() || self.dynamic.contains_key(label) {
                continue;
            }
            self.dynamic.insert(label.to_string(), true);
            added.push(label.to_string());
        }
        added
    }

    /// Flag for a fixed type. `Other` is governed by the per-label flags.
    #[must_use]
    pub fn type_shown(&self, location_type: LocationType) -> bool {
        match location_type {
            LocationType::ServiceExcellence => self.show_service_excellence,
            LocationType::CertifiedHub => self.show_certified_hub,
            LocationType::Bosch => self.show_bosch,
            LocationType::Mercedes => self.show_mercedes,
            LocationType::Other => false,
        }
    }

    #[must_use]
    pub fn category_shown(&self, label: &str) -> bool {
        self.dynamic.get(label).copied().unwrap_or(true)
    }

    #[must_use]
    pub fn matches(&self, record: &LocationRecord) -> bool {
        let type_ok = self.type_shown(record.location_type)
            || record
                .dynamic_category()
                .is_some_and(|label| self.category_shown(label));

        type_ok && self.matches_search(record)
    }

    fn matches_search(&self, record: &LocationRecord) -> bool {
        let term = self.search_term.trim();
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        [&record.city, &record.company_name, &record.address]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Records passing `filter`, in input order.
pub fn visible<'a, I>(records: I, filter: &FilterState) -> Vec<&'a LocationRecord>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    records.into_iter().filter(|r| filter.matches(r)).collect()
}
