//! One-shot command handlers: load, place and colors.
//!
//! Each handler loads records (from the network or the cache), runs them
//! through the same map-side derivation the UI uses and prints the result.

use heero_core::{AppConfig, LngLat, LocationRecord, LocationType};
use heero_map::{
    cluster_points, icon_for, ClusterOptions, FilterPatch, LegendEntry, MapState, MarkerIcon,
    ScreenPoint, Viewport,
};
use heero_store::load_colors;
use serde::Serialize;

use crate::context::{apply_records, load_and_cache, open_store, records_cache_first};

/// Arguments of the `place` command.
#[derive(Debug, Clone)]
pub(crate) struct PlaceArgs {
    pub center: LngLat,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub cluster: bool,
    pub search: Option<String>,
}

/// A drawn marker with its screen position.
#[derive(Debug, Serialize)]
struct PlacedMarker<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    location_type: LocationType,
    category: &'a str,
    screen: ScreenPoint,
    icon: MarkerIcon,
}

/// Load every source, refresh the cache and print a per-category summary.
///
/// # Errors
///
/// Returns an error if the sources file is invalid or every source fails.
pub(crate) async fn run_load(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let store = open_store(config);
    let records = load_and_cache(config, &store).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let state = state_for(&store, records);
    println!("loaded {} locations", state.records().len());
    print!("{}", format_legend(&state.legend()));
    Ok(())
}

/// Print the markers that survive de-overlap (or the clusters) for a viewport.
///
/// # Errors
///
/// Returns an error if the cache is empty and no source could be loaded, or
/// the output cannot be serialized.
pub(crate) async fn run_place(config: &AppConfig, args: &PlaceArgs) -> anyhow::Result<()> {
    let store = open_store(config);
    let records = records_cache_first(config, &store).await?;
    let mut state = state_for(&store, records);
    if let Some(term) = &args.search {
        state.set_filter(FilterPatch::search(term.clone()));
    }

    let viewport = Viewport::new(args.center, args.zoom, args.width, args.height);
    let visible = state.visible_records();

    if args.cluster {
        let on_screen: Vec<&LocationRecord> = visible
            .into_iter()
            .filter(|r| viewport.contains(r.lng_lat()))
            .collect();
        let options = ClusterOptions {
            radius_px: config.cluster_radius_px,
            ..ClusterOptions::default()
        };
        let items = cluster_points(&on_screen, viewport.zoom, &options);
        let output = serde_json::json!({ "bounds": viewport.bounds(), "items": items });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let placed = placed_markers(&visible, &viewport, config.marker_min_distance_px, &state);
    tracing::info!(
        visible = visible.len(),
        placed = placed.len(),
        zoom = viewport.zoom,
        "placed markers"
    );
    let output = serde_json::json!({ "bounds": viewport.bounds(), "markers": placed });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Assign colors to every discovered category and print the color map.
///
/// # Errors
///
/// Returns an error if the cache is empty and no source could be loaded.
pub(crate) async fn run_colors(config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(config);
    let records = records_cache_first(config, &store).await?;
    let state = state_for(&store, records);

    if state.colors().is_empty() {
        println!("no discovered categories");
        return Ok(());
    }
    println!("{:<10}CATEGORY", "COLOR");
    for (label, color) in state.colors().iter() {
        println!("{color:<10}{label}");
    }
    Ok(())
}

/// Map state seeded with the persisted colors. Newly assigned colors are
/// written back.
fn state_for(store: &dyn heero_store::KeyValueStore, records: Vec<LocationRecord>) -> MapState {
    let mut state = MapState::new(load_colors(store));
    apply_records(&mut state, store, records);
    state
}

/// De-overlap against every visible record, then keep the ones on screen.
fn placed_markers<'a>(
    visible: &[&'a LocationRecord],
    viewport: &Viewport,
    min_distance_px: f64,
    state: &MapState,
) -> Vec<PlacedMarker<'a>> {
    heero_map::place_markers(visible, viewport, min_distance_px)
        .into_iter()
        .filter(|r| viewport.contains(r.lng_lat()))
        .map(|r| PlacedMarker {
            id: &r.id,
            location_type: r.location_type,
            category: &r.category,
            screen: viewport.project(r.lng_lat()),
            icon: icon_for(r, state.colors()),
        })
        .collect()
}

fn format_legend(entries: &[LegendEntry]) -> String {
    let mut out = format!("{:<45}{:<10}COUNT\n", "CATEGORY", "COLOR");
    for entry in entries {
        out.push_str(&format!(
            "{:<45}{:<10}{}\n",
            entry.label, entry.color, entry.count
        ));
    }
    out
}
