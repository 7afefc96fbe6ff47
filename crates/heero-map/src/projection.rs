//! Web Mercator math on 512 px tiles.
//!
//! Marker placement works in screen pixels, never in geodesic distance. Two
//! points are "close" when their projected positions at the current zoom are.

use std::f64::consts::PI;

use heero_core::LngLat;
use serde::Serialize;

/// Edge length of one tile at zoom 0, in pixels.
pub const TILE_SIZE: f64 = 512.0;
/// Latitude beyond which Web Mercator is undefined; inputs are clamped.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;
pub const MAX_ZOOM: f64 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn distance(self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Absolute pixel position of `p` in the world image at `zoom`.
#[must_use]
pub fn world_point(p: LngLat, zoom: f64) -> ScreenPoint {
    let scale = TILE_SIZE * zoom.exp2();
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    ScreenPoint {
        x: (p.lng + 180.0) / 360.0 * scale,
        y: (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale,
    }
}

#[must_use]
pub fn world_to_lng_lat(pt: ScreenPoint, zoom: f64) -> LngLat {
    let scale = TILE_SIZE * zoom.exp2();
    let n = PI - 2.0 * PI * pt.y / scale;
    LngLat {
        lng: pt.x / scale * 360.0 - 180.0,
        lat: n.sinh().atan().to_degrees(),
    }
}

/// Screen distance between two coordinates at `zoom`. Independent of where
/// the camera is centered.
#[must_use]
pub fn pixel_distance(a: LngLat, b: LngLat, zoom: f64) -> f64 {
    world_point(a, zoom).distance(world_point(b, zoom))
}

/// Camera plus canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LngLat,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(center: LngLat, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, MAX_ZOOM),
            width,
            height,
        }
    }

    /// Position of `p` on the canvas, origin top-left.
    #[must_use]
    pub fn project(&self, p: LngLat) -> ScreenPoint {
        let origin = world_point(self.center, self.zoom);
        let world = world_point(p, self.zoom);
        ScreenPoint {
            x: world.x - origin.x + self.width / 2.0,
            y: world.y - origin.y + self.height / 2.0,
        }
    }

    #[must_use]
    pub fn unproject(&self, pt: ScreenPoint) -> LngLat {
        let origin = world_point(self.center, self.zoom);
        world_to_lng_lat(
            ScreenPoint {
                x: pt.x - self.width / 2.0 + origin.x,
                y: pt.y - self.height / 2.0 + origin.y,
            },
            self.zoom,
        )
    }

    #[must_use]
    pub fn distance(&self, a: LngLat, b: LngLat) -> f64 {
        pixel_distance(a, b, self.zoom)
    }

    #[must_use]
    pub fn contains(&self, p: LngLat) -> bool {
        self.bounds().contains(p)
    }

    /// Geographic box covered by the canvas.
    #[must_use]
    pub fn bounds(&self) -> LngLatBounds {
        let nw = self.unproject(ScreenPoint { x: 0.0, y: 0.0 });
        let se = self.unproject(ScreenPoint {
            x: self.width,
            y: self.height,
        });
        LngLatBounds {
            west: nw.lng,
            south: se.lat,
            east: se.lng,
            north: nw.lat,
        }
    }

    /// The viewport that shows `bounds` with `padding` pixels on every side,
    /// zoomed in no further than `max_zoom`.
    #[must_use]
    pub fn fit(bounds: &LngLatBounds, width: f64, height: f64, padding: f64, max_zoom: f64) -> Self {
        let nw = world_point(LngLat::new(bounds.west, bounds.north), 0.0);
        let se = world_point(LngLat::new(bounds.east, bounds.south), 0.0);
        let center = world_to_lng_lat(
            ScreenPoint {
                x: (nw.x + se.x) / 2.0,
                y: (nw.y + se.y) / 2.0,
            },
            0.0,
        );

        let avail_w = (width - 2.0 * padding).max(1.0);
        let avail_h = (height - 2.0 * padding).max(1.0);
        let zoom_x = (avail_w / (se.x - nw.x).abs()).log2();
        let zoom_y = (avail_h / (se.y - nw.y).abs()).log2();
        let zoom = zoom_x.min(zoom_y).clamp(0.0, max_zoom.min(MAX_ZOOM));

        Self::new(center, zoom, width, height)
    }
}

/// Axis-aligned geographic box. Does not handle the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LngLatBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl LngLatBounds {
    #[must_use]
    pub fn from_point(p: LngLat) -> Self {
        Self {
            west: p.lng,
            south: p.lat,
            east: p.lng,
            north: p.lat,
        }
    }

    /// Smallest box containing every point; `None` for no points.
    pub fn from_points<I: IntoIterator<Item = LngLat>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |mut b, p| {
            b.extend(p);
            b
        }))
    }

    pub fn extend(&mut self, p: LngLat) {
        self.west = self.west.min(p.lng);
        self.east = self.east.max(p.lng);
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
    }

    #[must_use]
    pub fn contains(&self, p: LngLat) -> bool {
        (self.west..=self.east).contains(&p.lng) && (self.south..=self.north).contains(&p.lat)
    }
}
