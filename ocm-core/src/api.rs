//! HTTP client for the dashboard backend.
//!
//! Failures are never retried: a transport error or non-success status is
//! reported as [`ApiError::Transient`]/[`ApiError::Status`], and a 2xx body
//! that is empty or lacks the expected fields as
//! [`ApiError::EmptyOrMalformed`].

use crate::area::{
    AreaBounds, AreaBoundsResponse, AreaData, AreaDataRequest, AreaDataResponse, LocationPoint,
    LocationResponse,
};
use crate::config::MapConfig;
use crate::error::ApiError;
use crate::geometry::{FeatureCollection, GeometrySegment};
use crate::viewport::CoverageRegion;
use log::{info, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

const GEOMETRIES_PATH: &str = "/geometries/";
const DATA_PATH: &str = "/data/";
const GEOMETRY_BOUNDS_PATH: &str = "/geometrybounds/";
const LOCATION_PATH: &str = "/locationposition";

#[derive(Serialize)]
struct AreaCodeRequest<'a> {
    areacode: &'a str,
}

/// Backend client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: MapConfig,
}

impl ApiClient {
    pub fn new(config: MapConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: MapConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    async fn send<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<R, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("Request for {} failed: {}", what, e);
            ApiError::Transient(e.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", what, status);
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.text().await.map_err(|e| {
            warn!("Failed to read response body for {}: {}", what, e);
            ApiError::Transient(e.to_string())
        })?;
        if body.trim().is_empty() {
            return Err(ApiError::EmptyOrMalformed(format!("empty body for {what}")));
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::EmptyOrMalformed(format!("{what}: {e}")))
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<R, ApiError> {
        let request = self.client.post(self.config.endpoint(path)).json(body);
        self.send(request, what).await
    }

    /// Fetch all geometries overlapping `region` at its zoom and resolution.
    pub async fn fetch_geometries(
        &self,
        region: &CoverageRegion,
    ) -> Result<FeatureCollection, ApiError> {
        let segments: Vec<GeometrySegment> = self
            .post(GEOMETRIES_PATH, region, "geometries")
            .await?;
        info!(
            "Fetched {} geometries at zoom {} level {}",
            segments.len(),
            region.zoom,
            region.resolution
        );
        Ok(FeatureCollection::from_segments(segments, region.resolution))
    }

    /// Fetch metadata and per-period emissions for one area.
    pub async fn fetch_area_data(
        &self,
        code: &str,
        period_start: i32,
        period_end: i32,
    ) -> Result<AreaData, ApiError> {
        let request = AreaDataRequest {
            period_start,
            period_end,
            code: code.to_string(),
        };
        let what = format!("area {code}");
        let response: AreaDataResponse = self.post(DATA_PATH, &request, &what).await?;
        let area = response
            .into_area_data()
            .ok_or_else(|| ApiError::EmptyOrMalformed(format!("no data for {what}")))?;
        info!(
            "Fetched {} periods for {} ({}-{})",
            area.data.len(),
            code,
            period_start,
            period_end
        );
        Ok(area)
    }

    /// Fetch the bounding rectangle of one area.
    pub async fn fetch_area_bounds(&self, code: &str) -> Result<AreaBounds, ApiError> {
        let what = format!("bounds of {code}");
        let response: AreaBoundsResponse = self
            .post(GEOMETRY_BOUNDS_PATH, &AreaCodeRequest { areacode: code }, &what)
            .await?;
        response
            .into_area_bounds()
            .ok_or_else(|| ApiError::EmptyOrMalformed(format!("no rectangle for {what}")))
    }

    /// Look up a place name or postcode.
    pub async fn fetch_location(&self, location: &str) -> Result<LocationPoint, ApiError> {
        let what = format!("location '{location}'");
        let request = self
            .client
            .get(self.config.endpoint(LOCATION_PATH))
            .query(&[("location", location)]);
        let response: LocationResponse = self.send(request, &what).await?;
        response
            .into_point()
            .ok_or_else(|| ApiError::EmptyOrMalformed(format!("{what} not found")))
    }
}
