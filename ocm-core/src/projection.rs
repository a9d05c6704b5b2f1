//! Pixel to coordinate projection.
//!
//! The live map widget owns the real projection; [`WebMercator`] is a
//! self-contained stand-in with the same 256-px tile pyramid, used by the
//! CLI and tests.

use crate::bounds::{GeoBounds, LngLat};
use std::f64::consts::PI;

/// Side length of one map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Converts a point in the map container (pixels from the top-left corner)
/// to geographic coordinates at the current zoom.
///
/// Returns `None` when the map cannot answer, e.g. before it is laid out.
pub trait Projection {
    fn container_point_to_lng_lat(&self, x: f64, y: f64) -> Option<LngLat>;
}

/// A Web Mercator viewport of `width` x `height` pixels centred on `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    pub center: LngLat,
    pub zoom: u32,
    pub width: f64,
    pub height: f64,
}

fn world_size(zoom: u32) -> f64 {
    TILE_SIZE * 2f64.powi(zoom as i32)
}

/// Project to world pixel coordinates at `zoom`.
pub fn project(point: LngLat, zoom: u32) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, zoom: u32) -> LngLat {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
    LngLat::new(lng, lat)
}

impl WebMercator {
    pub fn new(center: LngLat, zoom: u32, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    pub fn point_to_lng_lat(&self, x: f64, y: f64) -> LngLat {
        let (cx, cy) = project(self.center, self.zoom);
        unproject(
            cx + x - self.width / 2.0,
            cy + y - self.height / 2.0,
            self.zoom,
        )
    }

    /// Visible bounds of the viewport.
    pub fn bounds(&self) -> GeoBounds {
        let south_west = self.point_to_lng_lat(0.0, self.height);
        let north_east = self.point_to_lng_lat(self.width, 0.0);
        GeoBounds {
            min_lng: south_west.lng,
            min_lat: south_west.lat,
            max_lng: north_east.lng,
            max_lat: north_east.lat,
        }
    }

    /// Re-centre on `bounds` at the deepest zoom (up to `max_zoom`) that shows all of it.
    pub fn fit_bounds(&mut self, bounds: &GeoBounds, max_zoom: u32) {
        let (x0, y0) = project(bounds.south_west(), 0);
        let (x1, y1) = project(bounds.north_east(), 0);
        let span_x = (x1 - x0).abs().max(f64::EPSILON);
        let span_y = (y0 - y1).abs().max(f64::EPSILON);
        let scale = (self.width / span_x).min(self.height / span_y);
        let zoom = scale.log2().floor().max(0.0) as u32;
        self.zoom = zoom.min(max_zoom);
        self.center = unproject((x0 + x1) / 2.0, (y0 + y1) / 2.0, 0);
    }
}

impl Projection for WebMercator {
    fn container_point_to_lng_lat(&self, x: f64, y: f64) -> Option<LngLat> {
        Some(self.point_to_lng_lat(x, y))
    }
}
