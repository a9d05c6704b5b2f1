use ocm_core::geometry::FeatureCollection;
use ocm_core::viewport::CoverageRegion;
use serde::Serialize;

/// Geometry cache consumed by the map renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapState {
    /// Region the cached geometries were fetched for
    pub coverage: Option<CoverageRegion>,
    pub geometries: Option<FeatureCollection>,
    /// Bumped whenever the geometry layer must be redrawn
    pub redraw_counter: u64,
}

impl MapState {
    /// Install freshly fetched geometries together with the region they cover.
    pub fn with_geometries(mut self, coverage: CoverageRegion, geometries: FeatureCollection) -> Self {
        self.coverage = Some(coverage);
        self.geometries = Some(geometries);
        self.redraw_counter += 1;
        self
    }

    pub fn redrawn(mut self) -> Self {
        self.redraw_counter += 1;
        self
    }
}
