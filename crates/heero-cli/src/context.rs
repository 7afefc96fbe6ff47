//! Shared setup for command handlers: the source loader, the on-disk store
//! and a cache-first record lookup.

use std::sync::Arc;

use heero_core::{AppConfig, LocationRecord};
use heero_loader::SourceLoader;
use heero_map::{MapState, RecordsUpdate};
use heero_store::{
    now_ms, persist_colors, read_cache, write_cache, CacheEntry, FileStore, KeyValueStore,
};

/// Build a loader for the sources listed in `config.sources_path`.
///
/// # Errors
///
/// Returns an error if the sources file is missing or invalid, or the HTTP
/// client cannot be constructed.
pub(crate) fn build_loader(config: &AppConfig) -> anyhow::Result<SourceLoader> {
    let file = heero_core::load_sources(&config.sources_path)?;
    SourceLoader::from_config(config, file.sources)
        .map_err(|e| anyhow::anyhow!("failed to build source loader: {e}"))
}

pub(crate) fn open_store(config: &AppConfig) -> FileStore {
    FileStore::new(&config.cache_dir)
}

/// Swap `records` into `state` and persist the color map when new categories
/// were colored.
pub(crate) fn apply_records(
    state: &mut MapState,
    store: &dyn KeyValueStore,
    records: impl Into<Arc<Vec<LocationRecord>>>,
) -> RecordsUpdate {
    let update = state.replace_records(records);
    if update.colors_changed {
        persist_colors(store, state.colors());
    }
    update
}

/// Load every source and write the result to the cache.
///
/// # Errors
///
/// Returns an error if no source could be loaded.
pub(crate) async fn load_and_cache(
    config: &AppConfig,
    store: &dyn KeyValueStore,
) -> anyhow::Result<Vec<LocationRecord>> {
    let records = build_loader(config)?.load_all().await?;
    write_cache(store, &CacheEntry::new(now_ms(), records.clone()));
    Ok(records)
}

/// Cached records when any exist, regardless of age; otherwise a fresh load.
///
/// # Errors
///
/// Returns an error if the cache is empty and no source could be loaded.
pub(crate) async fn records_cache_first(
    config: &AppConfig,
    store: &dyn KeyValueStore,
) -> anyhow::Result<Vec<LocationRecord>> {
    match read_cache(store) {
        Some(entry) if !entry.data.is_empty() => {
            tracing::info!(
                records = entry.data.len(),
                age_secs = entry.age(now_ms()).as_secs(),
                "using cached locations"
            );
            Ok(entry.data)
        }
        _ => load_and_cache(config, store).await,
    }
}

#[cfg(test)]
mod tests {
    use heero_core::{CategoryColorMap, LocationType};
    use heero_store::{load_colors, MemoryStore};

    use super::*;

    fn record(id: &str, category: &str) -> LocationRecord {
        LocationRecord {
            id: id.to_owned(),
            category: category.to_owned(),
            location_type: LocationType::Other,
            company_name: None,
            address: None,
            city: None,
            phone_number: None,
            url1: None,
            lat: 47.3769,
            lng: 8.5417,
            rating: None,
            review_count: None,
            subcategories: vec![],
            search_query: None,
        }
    }

    #[test]
    fn colors_persist_only_when_new_categories_appear() {
        let store = MemoryStore::new();
        let mut state = MapState::new(CategoryColorMap::new());

        let first = apply_records(&mut state, &store, vec![record("a", "Tyre Shop")]);
        assert!(first.colors_changed);
        assert_eq!(&load_colors(&store), state.colors());

        // A stale write is not repeated when nothing new shows up.
        store.remove(heero_store::CATEGORY_COLORS_KEY).unwrap();
        let second = apply_records(&mut state, &store, vec![record("b", "Tyre Shop")]);
        assert!(!second.colors_changed);
        assert!(load_colors(&store).is_empty());

        let third = apply_records(&mut state, &store, vec![record("c", "Glass")]);
        assert_eq!(third.new_categories, ["Glass"]);
        assert_eq!(load_colors(&store).len(), 2);
    }
}
