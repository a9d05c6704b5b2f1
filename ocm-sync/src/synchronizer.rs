//! Fetch orchestration.
//!
//! Every user or map event ends up here. The synchronizer decides what to
//! fetch, applies results to the [`Store`] as whole actions and mirrors the
//! shareable part of the state into the URL. Backend failures never reach
//! the store: transient ones come back as a [`Notice`], empty or malformed
//! responses are dropped.

use crate::collaborators::{DashboardApi, MapWidget, UrlHistory};
use crate::notice::{classify, Notice};
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use ocm_core::area::AreaData;
use ocm_core::bounds::LngLat;
use ocm_core::config::MapConfig;
use ocm_core::error::ApiError;
use ocm_core::resolution::{resolution_for_zoom, ResolutionLevel};
use ocm_core::viewport::{next_coverage_region, ViewportObservation};
use ocm_store::{Action, Store};
use ocm_urlstate::{decode, encode, keys, remove, ShareableState, UrlParams};

/// Where the map should open, from the URL or the configured defaults.
pub fn initial_view(params: &UrlParams, config: &MapConfig) -> (LngLat, u32) {
    let center = LngLat::new(
        params.lng.unwrap_or(config.default_lng),
        params.lat.unwrap_or(config.default_lat),
    );
    (center, params.zoom.unwrap_or(config.default_zoom))
}

fn first_notice(outcomes: impl IntoIterator<Item = Result<(), Notice>>) -> Result<(), Notice> {
    outcomes.into_iter().find_map(Result::err).map_or(Ok(()), Err)
}

pub struct Synchronizer<A, M, H> {
    api: A,
    map: M,
    history: H,
    store: Store,
    config: MapConfig,
}

impl<A, M, H> Synchronizer<A, M, H>
where
    A: DashboardApi,
    M: MapWidget,
    H: UrlHistory,
{
    pub fn new(api: A, map: M, history: H, store: Store, config: MapConfig) -> Self {
        Self {
            api,
            map,
            history,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    fn write_url(&self, partial: ShareableState) {
        let query = encode(&partial, &self.history.search());
        self.history.replace(&query);
    }

    fn remove_from_url(&self, entries: ShareableState) {
        let query = remove(&entries, &self.history.search());
        self.history.replace(&query);
    }

    fn url_has_area(&self, code: &str) -> bool {
        decode(&self.history.search())
            .get_list(keys::AREAS)
            .iter()
            .any(|c| c == code)
    }

    /// Rebuild the dashboard from the URL.
    ///
    /// Scalar settings are applied first, then every listed area is fetched
    /// and added. The URL itself is not rewritten.
    pub async fn restore(&self) -> Result<(), Notice> {
        let params = UrlParams::from_query(&self.history.search(), &self.config);
        info!(
            "Restoring {} areas from URL (start {:?}, end {:?})",
            params.areas.len(),
            params.period_start,
            params.period_end
        );

        self.store.dispatch(Action::SetTimeRange {
            start: params.period_start.unwrap_or(self.config.default_period_start),
            end: params.period_end.unwrap_or(self.config.default_period_end),
        });
        if let Some(scale) = params.area_scale {
            self.store.dispatch(Action::SetAreaScale(scale));
        }
        if let Some(resolution) = params.resolution {
            self.store.dispatch(Action::SetResolution(resolution));
        }

        let outcomes = join_all(params.areas.iter().map(|code| async move {
            match self.fetch_for_current_period(code).await {
                Ok(area) => {
                    self.store.dispatch(Action::AddArea {
                        code: code.clone(),
                        info: area.info,
                        data: area.data,
                    });
                    Ok(())
                }
                Err(e) => classify(&format!("area {code}"), e),
            }
        }))
        .await;
        first_notice(outcomes)
    }

    fn period(&self) -> (i32, i32) {
        self.store
            .read(|s| (s.global.period_start, s.global.period_end))
    }

    /// Fetch `code` for the store's period, fetching again if the period
    /// changed while the request was in flight.
    async fn fetch_for_current_period(&self, code: &str) -> Result<AreaData, ApiError> {
        let mut period = self.period();
        loop {
            let area = self.api.fetch_area_data(code, period.0, period.1).await?;
            let now = self.period();
            if now == period {
                return Ok(area);
            }
            debug!(
                "Period changed while loading area {}, fetching {}-{}",
                code, now.0, now.1
            );
            period = now;
        }
    }

    fn observe(&self, resolution: ResolutionLevel) -> ViewportObservation {
        ViewportObservation {
            zoom: self.map.zoom(),
            bounds: self.map.bounds(),
            resolution,
        }
    }

    /// Handle a settled map move.
    ///
    /// Drops to a coarser resolution when zoomed out past its threshold,
    /// fetches geometries if the view left the coverage region, and writes
    /// the view to the URL.
    pub async fn on_move_end(&self) -> Result<(), Notice> {
        let zoom = self.map.zoom();
        let current = self.store.read(|s| s.global.resolution);
        let resolution = resolution_for_zoom(zoom, current, &self.config.zoom_thresholds);
        if resolution != current {
            info!("Zoom {} hides level {}, showing level {}", zoom, current, resolution);
            self.store.dispatch(Action::SetResolution(resolution));
        }

        let outcome = self.refresh_geometries(resolution).await;

        let center = self.map.center();
        self.write_url(
            ShareableState::new()
                .with(keys::LAT, center.lat.to_string())
                .with(keys::LNG, center.lng.to_string())
                .with(keys::ZOOM, zoom.to_string())
                .with(keys::RESOLUTION, resolution.level().to_string()),
        );
        outcome
    }

    async fn refresh_geometries(&self, resolution: ResolutionLevel) -> Result<(), Notice> {
        let observation = self.observe(resolution);
        let last = self.store.read(|s| s.map.coverage);
        let Some(region) = next_coverage_region(
            &observation,
            last.as_ref(),
            self.config.pixel_padding,
            &self.map,
        ) else {
            return Ok(());
        };

        match self.api.fetch_geometries(&region).await {
            Ok(geometries) => {
                // A later move may have finished first
                let now = self.observe(self.store.read(|s| s.global.resolution));
                if region.covers(&now) {
                    self.store.dispatch(Action::GeometriesFetched {
                        coverage: region,
                        geometries,
                    });
                } else {
                    debug!("Discarding geometries for a region the map has left");
                }
                Ok(())
            }
            Err(e) => classify("geometries", e),
        }
    }

    /// Switch to `resolution` if the current zoom reveals it.
    ///
    /// Returns `Ok(false)` when the level is not available yet.
    pub async fn set_resolution(&self, resolution: ResolutionLevel) -> Result<bool, Notice> {
        let zoom = self.map.zoom();
        if !resolution.is_available_at(zoom, &self.config.zoom_thresholds) {
            warn!("Level {} is not available at zoom {}", resolution, zoom);
            return Ok(false);
        }
        self.store.dispatch(Action::SetResolution(resolution));
        self.write_url(ShareableState::new().with(keys::RESOLUTION, resolution.level().to_string()));
        self.refresh_geometries(resolution).await?;
        Ok(true)
    }

    /// Select an area and load its data.
    ///
    /// The area is written to the URL straight away. If it is deselected
    /// before the data arrives, the data is discarded; if the fetch fails,
    /// the area is taken out of the URL again. Data is always for the period
    /// current when it is installed.
    pub async fn select_area(&self, code: &str) -> Result<(), Notice> {
        self.write_url(ShareableState::new().with(keys::AREAS, code));
        match self.fetch_for_current_period(code).await {
            Ok(area) if self.url_has_area(code) => {
                self.store.dispatch(Action::AddArea {
                    code: code.to_string(),
                    info: area.info,
                    data: area.data,
                });
                Ok(())
            }
            Ok(_) => {
                debug!("Area {} was deselected while loading", code);
                Ok(())
            }
            Err(e) => {
                self.remove_from_url(ShareableState::new().with(keys::AREAS, code));
                classify(&format!("area {code}"), e)
            }
        }
    }

    pub fn deselect_area(&self, code: &str) {
        self.store.dispatch(Action::RemoveArea {
            code: code.to_string(),
        });
        self.remove_from_url(ShareableState::new().with(keys::AREAS, code));
        self.store.dispatch(Action::RedrawGeometries);
    }

    /// Deselect `code` if selected, otherwise select it.
    pub async fn toggle_area(&self, code: &str) -> Result<(), Notice> {
        if self.store.read(|s| s.areas.contains(code)) {
            self.deselect_area(code);
            Ok(())
        } else {
            self.select_area(code).await
        }
    }

    /// Change the period range and refresh every selected area.
    ///
    /// Refreshes run concurrently and are applied as they complete. Results
    /// for areas deselected in the meantime, or for a range that has since
    /// been replaced, are dropped. Once every refresh has settled, an area
    /// that kept its old series still counts towards the maximum.
    pub async fn set_time_range(&self, start: i32, end: i32) -> Result<(), Notice> {
        self.store.dispatch(Action::SetTimeRange { start, end });
        let (start, end) = self.period();
        self.write_url(
            ShareableState::new()
                .with(keys::START, start.to_string())
                .with(keys::END, end.to_string()),
        );
        self.store.dispatch(Action::ResetMaxValue);

        let codes = self.store.read(|s| s.areas.codes());
        info!("Refreshing {} areas for {}-{}", codes.len(), start, end);

        let mut pending: FuturesUnordered<_> = codes
            .iter()
            .map(|code| async move { (code, self.api.fetch_area_data(code, start, end).await) })
            .collect();

        let mut outcome = Ok(());
        let mut missed = false;
        while let Some((code, result)) = pending.next().await {
            let step = match result {
                Ok(area) => {
                    let current = self.store.read(|s| {
                        s.areas.contains(code)
                            && s.global.period_start == start
                            && s.global.period_end == end
                    });
                    if current {
                        self.store.dispatch(Action::UpdateArea {
                            code: code.clone(),
                            data: area.data,
                        });
                    } else {
                        debug!("Dropping stale refresh for area {}", code);
                        missed = true;
                    }
                    Ok(())
                }
                Err(e) => {
                    missed = true;
                    classify(&format!("area {code}"), e)
                }
            };
            outcome = first_notice([outcome, step]);
        }
        if missed {
            self.store.dispatch(Action::RebuildMaxValue);
        }
        outcome
    }

    /// Set the number of charts per row, clamped to the configured range.
    pub fn set_area_scale(&self, scale: u32) {
        let scale = scale.clamp(1, self.config.area_scale_max.max(1));
        self.store.dispatch(Action::SetAreaScale(scale));
        self.write_url(ShareableState::new().with(keys::ROWGRAPHS, scale.to_string()));
    }

    /// Show `code` at its own resolution and fit the map around it.
    pub async fn zoom_to_area(&self, code: &str) -> Result<(), Notice> {
        match self.api.fetch_area_bounds(code).await {
            Ok(area) => {
                self.store.dispatch(Action::SetResolution(area.resolution));
                self.write_url(
                    ShareableState::new().with(keys::RESOLUTION, area.resolution.level().to_string()),
                );
                self.map.fit_bounds(&area.bounds);
                Ok(())
            }
            Err(e) => classify(&format!("bounds of {code}"), e),
        }
    }

    /// Fly to a place name or postcode. Unknown places are ignored.
    pub async fn go_to_location(&self, location: &str) -> Result<(), Notice> {
        match self.api.fetch_location(location).await {
            Ok(point) => {
                info!("Flying to '{}' at zoom {}", location, point.zoom);
                self.map.fly_to(LngLat::new(point.lng, point.lat), point.zoom);
                Ok(())
            }
            Err(e) => classify(&format!("location '{location}'"), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessMap, MemoryHistory};
    use ocm_core::area::{AreaBounds, AreaData, AreaInfo, LocationPoint};
    use ocm_core::bounds::GeoBounds;
    use ocm_core::error::ApiError;
    use ocm_core::geometry::FeatureCollection;
    use ocm_core::period::EnergyRecord;
    use ocm_core::projection::WebMercator;
    use ocm_core::viewport::CoverageRegion;
    use ocm_store::AppState;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    struct FakeApi {
        base: HashMap<&'static str, f64>,
        /// Number of scheduler yields before the area responds
        slow: HashMap<&'static str, usize>,
        errors: RefCell<HashMap<&'static str, ApiError>>,
        geometry_calls: Cell<usize>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                base: HashMap::from([("A", 10.0), ("B", 30.0), ("S1", 5.0)]),
                slow: HashMap::new(),
                errors: RefCell::new(HashMap::from([
                    ("DOWN", ApiError::Status(503)),
                    ("EMPTY", ApiError::EmptyOrMalformed("no data".into())),
                ])),
                geometry_calls: Cell::new(0),
            }
        }
    }

    impl DashboardApi for FakeApi {
        async fn fetch_geometries(
            &self,
            _region: &CoverageRegion,
        ) -> Result<FeatureCollection, ApiError> {
            self.geometry_calls.set(self.geometry_calls.get() + 1);
            Ok(FeatureCollection::default())
        }

        async fn fetch_area_data(
            &self,
            code: &str,
            period_start: i32,
            period_end: i32,
        ) -> Result<AreaData, ApiError> {
            for _ in 0..self.slow.get(code).copied().unwrap_or(0) {
                tokio::task::yield_now().await;
            }
            if let Some(e) = self.errors.borrow().get(code) {
                return Err(e.clone());
            }
            let base = self
                .base
                .get(code)
                .ok_or_else(|| ApiError::EmptyOrMalformed(format!("unknown {code}")))?;
            let span = f64::from(period_end - period_start + 1);
            Ok(AreaData {
                info: AreaInfo {
                    name: format!("Area {code}"),
                    code: code.to_string(),
                    kind: "lau1".to_string(),
                    resolution: ResolutionLevel::LocalAuthority,
                },
                data: vec![(period_start.to_string(), EnergyRecord::new(Some(base * span), None))]
                    .into_iter()
                    .collect(),
            })
        }

        async fn fetch_area_bounds(&self, code: &str) -> Result<AreaBounds, ApiError> {
            match code {
                "S1" => Ok(AreaBounds {
                    resolution: ResolutionLevel::DataZone,
                    bounds: GeoBounds::new(-3.3, 55.9, -3.1, 56.0).unwrap(),
                }),
                _ => Err(ApiError::EmptyOrMalformed("no rectangle".into())),
            }
        }

        async fn fetch_location(&self, location: &str) -> Result<LocationPoint, ApiError> {
            match location {
                "Fife" => Ok(LocationPoint {
                    lat: 56.2,
                    lng: -3.1,
                    zoom: 10,
                }),
                "down" => Err(ApiError::Transient("connection refused".into())),
                _ => Err(ApiError::EmptyOrMalformed("not found".into())),
            }
        }
    }

    type TestSync = Synchronizer<FakeApi, HeadlessMap, MemoryHistory>;

    fn setup(query: &str, zoom: u32) -> TestSync {
        setup_with(FakeApi::new(), query, zoom)
    }

    fn setup_with(api: FakeApi, query: &str, zoom: u32) -> TestSync {
        let config = MapConfig::default();
        let view = WebMercator::new(
            LngLat::new(config.default_lng, config.default_lat),
            zoom,
            800.0,
            600.0,
        );
        Synchronizer::new(
            api,
            HeadlessMap::new(view, config.max_zoom),
            MemoryHistory::new(query),
            Store::new(AppState::new(&config)),
            config,
        )
    }

    fn url(sync: &TestSync) -> ShareableState {
        decode(&sync.history().search())
    }

    #[tokio::test]
    async fn test_restore_from_url() {
        let sync = setup("?a=A&a=B&start=2012&end=2015&rowgraphs=2", 5);
        sync.restore().await.unwrap();

        let state = sync.store().snapshot();
        assert_eq!(state.areas.codes(), vec!["A", "B"]);
        assert_eq!((state.global.period_start, state.global.period_end), (2012, 2015));
        assert_eq!(state.global.area_scale, 2);
        assert_eq!(state.areas.max_value(), 120.0);
        assert_eq!(sync.history().replacements(), 0);
    }

    #[tokio::test]
    async fn test_restore_reports_transient_failure_and_keeps_others() {
        let sync = setup("a=A&a=DOWN&a=EMPTY", 5);
        let notice = sync.restore().await.unwrap_err();
        assert_eq!(notice.context, "area DOWN");
        assert_eq!(sync.store().read(|s| s.areas.codes()), vec!["A"]);
    }

    #[tokio::test]
    async fn test_move_end_fetches_only_outside_coverage() {
        let sync = setup("", 6);
        sync.on_move_end().await.unwrap();
        assert_eq!(sync.api.geometry_calls.get(), 1);
        assert!(sync.store().read(|s| s.map.coverage.is_some()));

        let written = url(&sync);
        assert_eq!(written.get_scalar(keys::ZOOM), Some("6"));
        assert_eq!(written.get_scalar(keys::RESOLUTION), Some("1"));
        assert!(written.get_scalar(keys::LAT).is_some());

        sync.on_move_end().await.unwrap();
        assert_eq!(sync.api.geometry_calls.get(), 1);

        sync.map().pan_to(LngLat::new(-1.0, 52.0));
        sync.on_move_end().await.unwrap();
        assert_eq!(sync.api.geometry_calls.get(), 2);
    }

    #[tokio::test]
    async fn test_zoom_out_downgrades_resolution() {
        let sync = setup("g=3&zoom=10", 10);
        sync.restore().await.unwrap();
        assert_eq!(sync.store().read(|s| s.global.resolution), ResolutionLevel::DataZone);

        sync.map().set_zoom(5);
        sync.on_move_end().await.unwrap();
        assert_eq!(
            sync.store().read(|s| s.global.resolution),
            ResolutionLevel::LocalAuthority
        );
        assert_eq!(url(&sync).get_scalar(keys::RESOLUTION), Some("1"));
    }

    #[tokio::test]
    async fn test_set_resolution_requires_zoom() {
        let sync = setup("", 5);
        assert!(!sync.set_resolution(ResolutionLevel::Intermediate).await.unwrap());
        assert_eq!(
            sync.store().read(|s| s.global.resolution),
            ResolutionLevel::LocalAuthority
        );
        assert_eq!(sync.api.geometry_calls.get(), 0);

        sync.map().set_zoom(9);
        assert!(sync.set_resolution(ResolutionLevel::DataZone).await.unwrap());
        assert_eq!(sync.store().read(|s| s.global.resolution), ResolutionLevel::DataZone);
        assert_eq!(url(&sync).get_scalar(keys::RESOLUTION), Some("3"));
        assert_eq!(sync.api.geometry_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_toggle_area() {
        let sync = setup("", 5);
        sync.toggle_area("A").await.unwrap();
        assert!(sync.store().read(|s| s.areas.contains("A")));
        assert_eq!(url(&sync).get_list(keys::AREAS), &["A"]);
        assert_eq!(
            sync.store().snapshot().feature_style("A"),
            ocm_store::FeatureStyle::Selected("#3f51b5")
        );

        let redraws = sync.store().read(|s| s.map.redraw_counter);
        sync.toggle_area("A").await.unwrap();
        assert!(sync.store().read(|s| s.areas.is_empty()));
        assert!(url(&sync).get_list(keys::AREAS).is_empty());
        assert_eq!(sync.store().read(|s| s.map.redraw_counter), redraws + 1);
    }

    #[tokio::test]
    async fn test_failed_selection_leaves_store_and_url() {
        let sync = setup("a=A", 5);
        sync.restore().await.unwrap();
        let before = sync.store().snapshot();

        assert!(sync.select_area("EMPTY").await.is_ok());
        let notice = sync.select_area("DOWN").await.unwrap_err();
        assert_eq!(notice.source_error, ApiError::Status(503));

        assert_eq!(sync.store().snapshot(), before);
        assert_eq!(url(&sync).get_list(keys::AREAS), &["A"]);
    }

    #[tokio::test]
    async fn test_time_range_resets_max() {
        let sync = setup("a=A&a=B", 5);
        sync.restore().await.unwrap();
        assert_eq!(sync.store().read(|s| s.areas.max_value()), 270.0);

        sync.set_time_range(2012, 2012).await.unwrap();
        let state = sync.store().snapshot();
        assert_eq!(state.areas.max_value(), 30.0);
        assert_eq!(state.areas.recompute_max(), 30.0);
        let written = url(&sync);
        assert_eq!(written.get_scalar(keys::START), Some("2012"));
        assert_eq!(written.get_scalar(keys::END), Some("2012"));
    }

    #[tokio::test]
    async fn test_time_range_drops_refresh_for_deselected_area() {
        let mut api = FakeApi::new();
        api.slow.insert("B", 5);
        let sync = setup_with(api, "a=A&a=B", 5);
        sync.restore().await.unwrap();

        let (outcome, ()) = tokio::join!(sync.set_time_range(2012, 2013), async {
            tokio::task::yield_now().await;
            sync.deselect_area("B");
        });
        outcome.unwrap();

        let state = sync.store().snapshot();
        assert_eq!(state.areas.codes(), vec!["A"]);
        assert_eq!(state.areas.max_value(), 20.0);
        assert_eq!(url(&sync).get_list(keys::AREAS), &["A"]);
    }

    #[tokio::test]
    async fn test_failed_refresh_still_counts_towards_max() {
        let sync = setup("a=A&a=B", 5);
        sync.restore().await.unwrap();
        assert_eq!(sync.store().read(|s| s.areas.max_value()), 270.0);

        sync.api.errors.borrow_mut().insert("B", ApiError::Status(503));
        let notice = sync.set_time_range(2012, 2012).await.unwrap_err();
        assert_eq!(notice.context, "area B");

        let state = sync.store().snapshot();
        assert_eq!(state.areas.codes(), vec!["A", "B"]);
        assert_eq!(state.areas.get("A").unwrap().series.labels, vec!["2012"]);
        assert_eq!(state.areas.max_value(), 270.0);
        assert_eq!(state.areas.max_value(), state.areas.recompute_max());
    }

    #[tokio::test]
    async fn test_selection_follows_range_change_in_flight() {
        let mut api = FakeApi::new();
        api.slow.insert("A", 5);
        let sync = setup_with(api, "", 5);

        let (outcome, refresh) = tokio::join!(sync.select_area("A"), async {
            tokio::task::yield_now().await;
            sync.set_time_range(2012, 2012).await
        });
        outcome.unwrap();
        refresh.unwrap();

        let state = sync.store().snapshot();
        assert_eq!((state.global.period_start, state.global.period_end), (2012, 2012));
        assert_eq!(state.areas.get("A").unwrap().series.labels, vec!["2012"]);
        assert_eq!(state.areas.max_value(), 10.0);
    }

    #[tokio::test]
    async fn test_zoom_to_area() {
        let sync = setup("", 5);
        sync.zoom_to_area("S1").await.unwrap();
        assert_eq!(sync.store().read(|s| s.global.resolution), ResolutionLevel::DataZone);
        assert_eq!(url(&sync).get_scalar(keys::RESOLUTION), Some("3"));
        assert!(sync.map().zoom() > 5);
        let area = GeoBounds::new(-3.3, 55.9, -3.1, 56.0).unwrap();
        assert!(sync.map().bounds().contains(&area));

        assert!(sync.zoom_to_area("nowhere").await.is_ok());
    }

    #[tokio::test]
    async fn test_go_to_location() {
        let sync = setup("", 5);
        sync.go_to_location("Fife").await.unwrap();
        assert_eq!(sync.map().center(), LngLat::new(-3.1, 56.2));
        assert_eq!(sync.map().zoom(), 10);

        assert!(sync.go_to_location("Atlantis").await.is_ok());
        assert_eq!(sync.map().zoom(), 10);
        assert!(sync.go_to_location("down").await.is_err());
    }

    #[tokio::test]
    async fn test_area_scale_clamped() {
        let sync = setup("", 5);
        sync.set_area_scale(7);
        assert_eq!(sync.store().read(|s| s.global.area_scale), 4);
        assert_eq!(url(&sync).get_scalar(keys::ROWGRAPHS), Some("4"));
    }

    #[test]
    fn test_initial_view() {
        let config = MapConfig::default();
        let params = UrlParams::from_query("lat=56&zoom=8", &config);
        let (center, zoom) = initial_view(&params, &config);
        assert_eq!(center, LngLat::new(config.default_lng, 56.0));
        assert_eq!(zoom, 8);
    }
}
