//! Map-side derivation: which records are visible, where their markers go,
//! how clicks map back to records, and what the selection popup shows.
//!
//! Nothing here draws. The rendering engine sits behind [`MapSurface`];
//! screen positions come from [`Viewport`].

pub mod cluster;
pub mod filter;
pub mod icons;
pub mod legend;
pub mod placement;
pub mod popup;
pub mod projection;
pub mod resolve;
pub mod state;
pub mod view;

pub use cluster::{cluster_points, Cluster, ClusterItem, ClusterOptions, PointFeature};
pub use filter::{visible, FilterPatch, FilterState};
pub use icons::{icon_for, IconKind, MarkerIcon};
pub use legend::{legend, LegendEntry};
pub use placement::place_markers;
pub use popup::{Badge, PopupContent};
pub use projection::{LngLatBounds, ScreenPoint, Viewport, TILE_SIZE};
pub use resolve::resolve_click;
pub use state::{MapState, RecordsUpdate};
pub use view::{Camera, MapSurface, MapView, ViewOptions};
