//! Persistence and stale-while-revalidate loading for location data.
//!
//! Storage is a flat key-value namespace of JSON text. The cache layer keeps
//! the last successful load under [`LOCATIONS_CACHE_KEY`] and the category
//! color map under [`CATEGORY_COLORS_KEY`]; read and write failures there are
//! logged and treated as a miss.

pub mod cache;
pub mod colors;
pub mod error;
pub mod kv;
pub mod revalidate;

pub use cache::{now_ms, read_cache, write_cache, CacheEntry};
pub use colors::{load_colors, persist_colors};
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use revalidate::{
    spawn, LoadState, LocationSource, Origin, RevalidationHandle, RevalidatorConfig,
};

pub const LOCATIONS_CACHE_KEY: &str = "locations_cache_v1";
pub const CATEGORY_COLORS_KEY: &str = "category_colors_v1";
