//! Area metadata and the other small payloads of the backend API.

use crate::bounds::GeoBounds;
use crate::period::PeriodData;
use crate::resolution::ResolutionLevel;
use serde::{Deserialize, Serialize};

/// Metadata for one selectable area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaInfo {
    pub name: String,
    /// Opaque region code, e.g. "S12000047"
    pub code: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "geometrytype")]
    pub resolution: ResolutionLevel,
}

/// Body of an area data request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDataRequest {
    #[serde(rename = "periodstart")]
    pub period_start: i32,
    #[serde(rename = "periodend")]
    pub period_end: i32,
    #[serde(rename = "area")]
    pub code: String,
}

/// A successful area data response.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaData {
    pub info: AreaInfo,
    pub data: PeriodData,
}

/// Raw area data response; `result` is "success" or "failure".
#[derive(Debug, Clone, Deserialize)]
pub struct AreaDataResponse {
    pub result: String,
    pub area: Option<AreaInfo>,
    pub data: Option<PeriodData>,
}

impl AreaDataResponse {
    /// `None` unless the backend reported success with both fields present.
    pub fn into_area_data(self) -> Option<AreaData> {
        if self.result != "success" {
            return None;
        }
        match (self.area, self.data) {
            (Some(info), Some(data)) => Some(AreaData { info, data }),
            _ => None,
        }
    }
}

/// Extent of a single area, used to fit the map around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBounds {
    pub resolution: ResolutionLevel,
    pub bounds: GeoBounds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaBoundsResponse {
    #[serde(rename = "geometrytype")]
    pub resolution: ResolutionLevel,
    pub rect: Option<[f64; 4]>,
}

impl AreaBoundsResponse {
    pub fn into_area_bounds(self) -> Option<AreaBounds> {
        let bounds = GeoBounds::from_rect(self.rect?).ok()?;
        Some(AreaBounds {
            resolution: self.resolution,
            bounds,
        })
    }
}

/// Map position for a place name or postcode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationResponse {
    pub result: String,
    pub data: Option<LocationPoint>,
}

impl LocationResponse {
    pub fn into_point(self) -> Option<LocationPoint> {
        if self.result == "success" {
            self.data
        } else {
            None
        }
    }
}
