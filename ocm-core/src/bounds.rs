use crate::error::GeoError;
use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// An axis-aligned geographic rectangle.
///
/// Serialized with the backend's field names (`xmin`, `ymin`, `xmax`, `ymax`).
///
/// Longitudes are compared numerically, so a rectangle crossing the
/// antimeridian is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    #[serde(rename = "xmin")]
    pub min_lng: f64,
    #[serde(rename = "ymin")]
    pub min_lat: f64,
    #[serde(rename = "xmax")]
    pub max_lng: f64,
    #[serde(rename = "ymax")]
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Result<Self, GeoError> {
        if !(min_lng <= max_lng && min_lat <= max_lat) {
            return Err(GeoError::InvalidBounds(format!(
                "[{min_lng}, {min_lat}, {max_lng}, {max_lat}]"
            )));
        }
        Ok(Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        })
    }

    /// Build from the backend's `[xmin, ymin, xmax, ymax]` extent.
    pub fn from_rect(rect: [f64; 4]) -> Result<Self, GeoError> {
        Self::new(rect[0], rect[1], rect[2], rect[3])
    }

    pub fn south_west(&self) -> LngLat {
        LngLat::new(self.min_lng, self.min_lat)
    }

    pub fn north_east(&self) -> LngLat {
        LngLat::new(self.max_lng, self.max_lat)
    }

    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// True if `other` lies entirely inside (or on the edge of) `self`.
    pub fn contains(&self, other: &GeoBounds) -> bool {
        other.min_lng >= self.min_lng
            && other.max_lng <= self.max_lng
            && other.min_lat >= self.min_lat
            && other.max_lat <= self.max_lat
    }

    /// True if `other` lies inside `self` without touching any edge.
    pub fn strictly_contains(&self, other: &GeoBounds) -> bool {
        other.min_lng > self.min_lng
            && other.max_lng < self.max_lng
            && other.min_lat > self.min_lat
            && other.max_lat < self.max_lat
    }

    /// Grow outward by `pad_lng` degrees east/west and `pad_lat` degrees north/south.
    pub fn expand(&self, pad_lng: f64, pad_lat: f64) -> GeoBounds {
        GeoBounds {
            min_lng: self.min_lng - pad_lng,
            min_lat: self.min_lat - pad_lat,
            max_lng: self.max_lng + pad_lng,
            max_lat: self.max_lat + pad_lat,
        }
    }
}
