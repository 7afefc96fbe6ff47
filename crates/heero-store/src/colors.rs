//! Persisted category color map.

use heero_core::CategoryColorMap;

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::CATEGORY_COLORS_KEY;

/// Load the persisted map; an unreadable entry yields an empty map.
pub fn load_colors(store: &dyn KeyValueStore) -> CategoryColorMap {
    let result = store.get(CATEGORY_COLORS_KEY).and_then(|text| match text {
        Some(text) => serde_json::from_str(&text).map_err(StoreError::from),
        None => Ok(CategoryColorMap::new()),
    });
    result.unwrap_or_else(|e| {
        tracing::warn!(key = CATEGORY_COLORS_KEY, error = %e, "ignoring unreadable color map");
        CategoryColorMap::new()
    })
}

pub fn persist_colors(store: &dyn KeyValueStore, colors: &CategoryColorMap) {
    let result = serde_json::to_string(colors)
        .map_err(StoreError::from)
        .and_then(|json| store.set(CATEGORY_COLORS_KEY, &json));
    if let Err(e) = result {
        tracing::warn!(key = CATEGORY_COLORS_KEY, error = %e, "failed to persist color map");
    }
}

#[cfg(test)]
mod tests {
    use heero_core::assign_colors;
    use heero_core::colors::PALETTE;

    use super::*;
    use crate::kv::MemoryStore;

    #[test]
    fn missing_map_loads_empty() {
        assert!(load_colors(&MemoryStore::new()).is_empty());
    }

    #[test]
    fn persisted_map_round_trips() {
        let store = MemoryStore::new();
        let colors = assign_colors(&CategoryColorMap::new(), ["Tyre Shop"]);
        persist_colors(&store, &colors);
        assert_eq!(colors.get("Tyre Shop"), Some(PALETTE[0]));

        let reloaded = load_colors(&store);
        assert_eq!(reloaded, colors);
    }

    #[test]
    fn existing_colors_survive_reload_and_reassignment() {
        let store = MemoryStore::new();
        let first = assign_colors(&CategoryColorMap::new(), ["Tyre Shop", "Glass"]);
        persist_colors(&store, &first);
        let second = assign_colors(&load_colors(&store), ["Glass", "Paint", "Tyre Shop"]);
        assert_eq!(second.get("Tyre Shop"), first.get("Tyre Shop"));
        assert_eq!(second.get("Glass"), first.get("Glass"));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn corrupt_map_loads_empty() {
        let store = MemoryStore::new();
        store.set(CATEGORY_COLORS_KEY, "[1,2,3]").unwrap();
        assert!(load_colors(&store).is_empty());
    }
}
