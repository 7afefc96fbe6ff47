//! Selection and marker lifecycle on top of an external map engine.

use std::time::Duration;

use heero_core::{AppConfig, CategoryColorMap, LngLat, LocationRecord};
use serde::Serialize;

use crate::icons::{icon_for, MarkerIcon};
use crate::placement::place_markers;
use crate::popup::PopupContent;
use crate::projection::{LngLatBounds, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
}

/// Camera on first load: Zurich at zoom 6.
pub const INITIAL_CAMERA: Camera = Camera {
    center: LngLat {
        lng: 8.5417,
        lat: 47.3769,
    },
    zoom: 6.0,
};

/// The rendering engine as seen from here. Handles returned by
/// `add_marker` and `open_popup` are owned by [`MapView`] and always handed
/// back through `remove_marker` and `close_popup`.
pub trait MapSurface {
    type Marker;
    type Popup;

    fn camera(&self) -> Camera;
    /// Canvas size in pixels, `(width, height)`.
    fn size(&self) -> (f64, f64);
    fn fly_to(&mut self, center: LngLat, zoom: f64, duration: Duration);
    fn fit_bounds(&mut self, bounds: &LngLatBounds, padding_px: f64);
    fn add_marker(&mut self, record: &LocationRecord, icon: &MarkerIcon) -> Self::Marker;
    fn remove_marker(&mut self, marker: Self::Marker);
    fn open_popup(&mut self, content: &PopupContent) -> Self::Popup;
    fn close_popup(&mut self, popup: Self::Popup);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub min_distance_px: f64,
    pub select_zoom: f64,
    pub fly_duration: Duration,
    pub fit_padding_px: f64,
    pub initial_camera: Camera,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            min_distance_px: 40.0,
            select_zoom: 12.0,
            fly_duration: Duration::from_millis(1000),
            fit_padding_px: 50.0,
            initial_camera: INITIAL_CAMERA,
        }
    }
}

impl ViewOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            min_distance_px: config.marker_min_distance_px,
            select_zoom: config.select_zoom,
            fly_duration: Duration::from_millis(config.fly_duration_ms),
            ..Self::default()
        }
    }
}

/// Owns every marker and popup handle it creates. Re-rendering releases the
/// previous markers first; dropping the view releases everything.
pub struct MapView<S: MapSurface> {
    surface: S,
    options: ViewOptions,
    markers: Vec<S::Marker>,
    popup: Option<S::Popup>,
}

impl<S: MapSurface> MapView<S> {
    #[must_use]
    pub fn new(surface: S, options: ViewOptions) -> Self {
        Self {
            surface,
            options,
            markers: Vec::new(),
            popup: None,
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn has_popup(&self) -> bool {
        self.popup.is_some()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        let camera = self.surface.camera();
        let (width, height) = self.surface.size();
        Viewport::new(camera.center, camera.zoom, width, height)
    }

    /// Replace the drawn markers with the de-overlapped subset of `visible`
    /// for the current camera. Call again after every camera move or filter
    /// change. Returns the number of markers drawn.
    pub fn render(&mut self, visible: &[&LocationRecord], colors: &CategoryColorMap) -> usize {
        self.clear_markers();

        let placed = place_markers(visible, &self.viewport(), self.options.min_distance_px);
        for record in placed {
            let icon = icon_for(record, colors);
            let marker = self.surface.add_marker(record, &icon);
            self.markers.push(marker);
        }
        self.markers.len()
    }

    /// Selecting a record flies to it and swaps the popup. Clearing the
    /// selection leaves camera and popup where they are.
    pub fn select(&mut self, record: Option<&LocationRecord>) {
        let Some(record) = record else {
            return;
        };

        self.surface
            .fly_to(record.lng_lat(), self.options.select_zoom, self.options.fly_duration);
        self.close_popup();
        let popup = self.surface.open_popup(&PopupContent::for_record(record));
        self.popup = Some(popup);
        tracing::debug!(id = %record.id, "location selected");
    }

    pub fn close_popup(&mut self) {
        if let Some(popup) = self.popup.take() {
            self.surface.close_popup(popup);
        }
    }

    /// Frame `visible` if the camera has not moved since startup. Returns
    /// whether the camera was moved.
    pub fn fit_initial_view(&mut self, visible: &[&LocationRecord]) -> bool {
        if !self.at_initial_camera() {
            return false;
        }
        let Some(bounds) = LngLatBounds::from_points(visible.iter().map(|r| r.lng_lat())) else {
            return false;
        };
        self.surface.fit_bounds(&bounds, self.options.fit_padding_px);
        true
    }

    fn at_initial_camera(&self) -> bool {
        const EPS: f64 = 1e-9;
        let camera = self.surface.camera();
        let initial = self.options.initial_camera;
        (camera.center.lng - initial.center.lng).abs() < EPS
            && (camera.center.lat - initial.center.lat).abs() < EPS
            && (camera.zoom - initial.zoom).abs() < EPS
    }

    fn clear_markers(&mut self) {
        for marker in self.markers.drain(..) {
            self.surface.remove_marker(marker);
        }
    }
}

impl<S: MapSurface> Drop for MapView<S> {
    fn drop(&mut self) {
        self.clear_markers();
        self.close_popup();
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
