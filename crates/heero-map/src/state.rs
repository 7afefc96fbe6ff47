//! State behind the UI: the current records, filter, selection and colors.
//! The sidebar and the map both read from here and send selection events
//! back.

use std::sync::Arc;

use heero_core::{assign_colors, CategoryColorMap, LngLat, LocationRecord};

use crate::filter::{visible, FilterPatch, FilterState};
use crate::legend::{legend, LegendEntry};
use crate::resolve::resolve_click;

/// What changed when a new record set arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordsUpdate {
    /// Discovered labels that were added to the filter as visible.
    pub new_categories: Vec<String>,
    /// The color map gained entries and should be persisted.
    pub colors_changed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MapState {
    records: Arc<Vec<LocationRecord>>,
    filter: FilterState,
    selected: Option<String>,
    colors: CategoryColorMap,
}

impl MapState {
    #[must_use]
    pub fn new(colors: CategoryColorMap) -> Self {
        Self {
            colors,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn colors(&self) -> &CategoryColorMap {
        &self.colors
    }

    /// Swap in a new record set. Discovered categories become visible filter
    /// entries and get colors. A selection whose record is gone is cleared.
    pub fn replace_records(&mut self, records: impl Into<Arc<Vec<LocationRecord>>>) -> RecordsUpdate {
        self.records = records.into();

        let labels: Vec<&str> = self
            .records
            .iter()
            .filter_map(LocationRecord::dynamic_category)
            .collect();
        let new_categories = self.filter.register_categories(labels.iter().copied());

        let colors = assign_colors(&self.colors, labels.iter().copied());
        let colors_changed = colors != self.colors;
        self.colors = colors;

        if let Some(id) = &self.selected {
            if !self.records.iter().any(|r| &r.id == id) {
                tracing::debug!(id = %id, "selected location no longer present");
                self.selected = None;
            }
        }

        if !new_categories.is_empty() {
            tracing::info!(categories = ?new_categories, "discovered new categories");
        }
        RecordsUpdate {
            new_categories,
            colors_changed,
        }
    }

    #[must_use]
    pub fn visible_records(&self) -> Vec<&LocationRecord> {
        visible(self.records.iter(), &self.filter)
    }

    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filter.apply(patch);
    }

    #[must_use]
    pub fn selected(&self) -> Option<&LocationRecord> {
        let id = self.selected.as_deref()?;
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// `None` clears the highlight. An unknown id leaves the selection as it
    /// was and returns `None`.
    pub fn select_record(&mut self, id: Option<&str>) -> Option<&LocationRecord> {
        match id {
            None => {
                self.selected = None;
                None
            }
            Some(id) if self.records.iter().any(|r| r.id == id) => {
                self.selected = Some(id.to_string());
                self.selected()
            }
            Some(id) => {
                tracing::debug!(id, "ignoring selection of unknown location");
                None
            }
        }
    }

    /// Resolve a map click and select the hit. Misses change nothing.
    pub fn select_at(
        &mut self,
        feature_id: Option<&str>,
        at: LngLat,
        tolerance_deg: f64,
    ) -> Option<&LocationRecord> {
        let id = resolve_click(self.records.iter(), feature_id, at, tolerance_deg)?.id.clone();
        self.select_record(Some(&id))
    }

    /// Counts over all records, ignoring the filter.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry> {
        legend(self.records.iter(), &self.colors)
    }
}
