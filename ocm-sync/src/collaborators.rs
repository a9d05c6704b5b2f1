//! Interfaces to the pieces the synchronizer drives but does not own.

use ocm_core::api::ApiClient;
use ocm_core::area::{AreaBounds, AreaData, LocationPoint};
use ocm_core::bounds::{GeoBounds, LngLat};
use ocm_core::error::ApiError;
use ocm_core::geometry::FeatureCollection;
use ocm_core::projection::Projection;
use ocm_core::viewport::CoverageRegion;

/// Backend endpoints used by the dashboard.
#[allow(async_fn_in_trait)]
pub trait DashboardApi {
    async fn fetch_geometries(&self, region: &CoverageRegion)
        -> Result<FeatureCollection, ApiError>;

    async fn fetch_area_data(
        &self,
        code: &str,
        period_start: i32,
        period_end: i32,
    ) -> Result<AreaData, ApiError>;

    async fn fetch_area_bounds(&self, code: &str) -> Result<AreaBounds, ApiError>;

    async fn fetch_location(&self, location: &str) -> Result<LocationPoint, ApiError>;
}

impl DashboardApi for ApiClient {
    async fn fetch_geometries(
        &self,
        region: &CoverageRegion,
    ) -> Result<FeatureCollection, ApiError> {
        ApiClient::fetch_geometries(self, region).await
    }

    async fn fetch_area_data(
        &self,
        code: &str,
        period_start: i32,
        period_end: i32,
    ) -> Result<AreaData, ApiError> {
        ApiClient::fetch_area_data(self, code, period_start, period_end).await
    }

    async fn fetch_area_bounds(&self, code: &str) -> Result<AreaBounds, ApiError> {
        ApiClient::fetch_area_bounds(self, code).await
    }

    async fn fetch_location(&self, location: &str) -> Result<LocationPoint, ApiError> {
        ApiClient::fetch_location(self, location).await
    }
}

/// The map widget.
///
/// Implementations report "move end" only once movement has settled; the
/// synchronizer never sees intermediate frames.
pub trait MapWidget: Projection {
    fn zoom(&self) -> u32;

    fn bounds(&self) -> GeoBounds;

    fn center(&self) -> LngLat;

    fn fit_bounds(&self, bounds: &GeoBounds);

    fn fly_to(&self, center: LngLat, zoom: u32);
}

/// The address bar.
pub trait UrlHistory {
    /// Current query string, with or without a leading `?`.
    fn search(&self) -> String;

    /// Replace the query in place, without a new history entry.
    fn replace(&self, query: &str);
}
