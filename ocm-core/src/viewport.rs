//! Viewport change detection.
//!
//! Geometries are fetched for a region somewhat larger than the visible map
//! so that small pans stay inside what was already downloaded. A new fetch
//! is only needed once the view leaves that padded region, or the zoom or
//! resolution changes.

use crate::bounds::GeoBounds;
use crate::projection::Projection;
use crate::resolution::ResolutionLevel;
use serde::{Deserialize, Serialize};

/// Smallest padding, in degrees, applied on any side.
const MIN_PADDING_DEGREES: f64 = 1e-9;

/// What the map shows once movement has settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportObservation {
    pub zoom: u32,
    pub bounds: GeoBounds,
    pub resolution: ResolutionLevel,
}

/// The last fetched geographic extent.
///
/// Replaced wholesale on every fetch. Serializes to the geometry request
/// body: `{geometrytype, zoom, xmin, ymin, xmax, ymax}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageRegion {
    #[serde(rename = "geometrytype")]
    pub resolution: ResolutionLevel,
    pub zoom: u32,
    #[serde(flatten)]
    pub bounds: GeoBounds,
}

impl CoverageRegion {
    /// Whether `observation` can be served from this region without a fetch.
    pub fn covers(&self, observation: &ViewportObservation) -> bool {
        self.zoom == observation.zoom
            && self.resolution == observation.resolution
            && self.bounds.contains(&observation.bounds)
    }
}

fn padding(delta: f64) -> f64 {
    let delta = delta.abs();
    if delta.is_finite() && delta > MIN_PADDING_DEGREES {
        delta
    } else {
        MIN_PADDING_DEGREES
    }
}

/// Decide whether the settled viewport needs new geometries.
///
/// Returns `None` when `last` already covers the observation at the same
/// zoom and resolution. Otherwise returns the visible bounds grown by
/// `pixel_padding` screen pixels on every side, converted to degrees with
/// `projection`. Longitude and latitude padding are measured separately
/// from the top-left corner since Mercator stretches them differently.
/// Returns `None` as well when `projection` cannot convert the corner.
pub fn next_coverage_region(
    observation: &ViewportObservation,
    last: Option<&CoverageRegion>,
    pixel_padding: f64,
    projection: &impl Projection,
) -> Option<CoverageRegion> {
    if let Some(last) = last {
        if last.covers(observation) {
            log::debug!(
                "Viewport within coverage region at zoom {}, no fetch needed",
                observation.zoom
            );
            return None;
        }
    }

    let bounds = observation.bounds;
    let Some(marker) = projection.container_point_to_lng_lat(pixel_padding, pixel_padding) else {
        log::warn!("Map projection unavailable, skipping geometry fetch");
        return None;
    };
    let pad_lat = padding(bounds.max_lat - marker.lat);
    let pad_lng = padding(marker.lng - bounds.min_lng);

    let region = CoverageRegion {
        resolution: observation.resolution,
        zoom: observation.zoom,
        bounds: bounds.expand(pad_lng, pad_lat),
    };
    log::info!(
        "New coverage region at zoom {} level {}: [{:.5}, {:.5}, {:.5}, {:.5}]",
        region.zoom,
        region.resolution,
        region.bounds.min_lng,
        region.bounds.min_lat,
        region.bounds.max_lng,
        region.bounds.max_lat
    );
    Some(region)
}
