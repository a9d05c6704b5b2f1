//! The closed set of state transitions.

use crate::AppState;
use ocm_core::area::AreaInfo;
use ocm_core::geometry::FeatureCollection;
use ocm_core::period::PeriodData;
use ocm_core::resolution::ResolutionLevel;
use ocm_core::viewport::CoverageRegion;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show a different resolution level on the map
    SetResolution(ResolutionLevel),
    /// Change the period range used for area data
    SetTimeRange { start: i32, end: i32 },
    /// Change the number of charts per row
    SetAreaScale(u32),
    /// Install geometries fetched for `coverage`
    GeometriesFetched {
        coverage: CoverageRegion,
        geometries: FeatureCollection,
    },
    /// Redraw the geometry layer without new data
    RedrawGeometries,
    AddArea {
        code: String,
        info: AreaInfo,
        data: PeriodData,
    },
    /// Replace the data of an already selected area
    UpdateArea { code: String, data: PeriodData },
    ResetMaxValue,
    /// Recompute the shared maximum from the selected areas
    RebuildMaxValue,
    RemoveArea { code: String },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetResolution(_) => "SetResolution",
            Action::SetTimeRange { .. } => "SetTimeRange",
            Action::SetAreaScale(_) => "SetAreaScale",
            Action::GeometriesFetched { .. } => "GeometriesFetched",
            Action::RedrawGeometries => "RedrawGeometries",
            Action::AddArea { .. } => "AddArea",
            Action::UpdateArea { .. } => "UpdateArea",
            Action::ResetMaxValue => "ResetMaxValue",
            Action::RebuildMaxValue => "RebuildMaxValue",
            Action::RemoveArea { .. } => "RemoveArea",
        }
    }
}

/// Apply `action` to `state`, returning the next state.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SetResolution(resolution) => {
            state.global.resolution = resolution;
        }
        Action::SetTimeRange { start, end } => {
            state.global = state.global.with_time_range(start, end);
        }
        Action::SetAreaScale(scale) => {
            state.global.area_scale = scale;
        }
        Action::GeometriesFetched {
            coverage,
            geometries,
        } => {
            state.map = state.map.with_geometries(coverage, geometries);
        }
        Action::RedrawGeometries => {
            state.map = state.map.redrawn();
        }
        Action::AddArea { code, info, data } => {
            state.areas = state.areas.add_or_replace_area(&code, info, &data);
        }
        Action::UpdateArea { code, data } => {
            state.areas = state.areas.update_area_data(&code, &data);
        }
        Action::ResetMaxValue => {
            state.areas = state.areas.reset_max_value();
        }
        Action::RebuildMaxValue => {
            state.areas = state.areas.rebuild_max_value();
        }
        Action::RemoveArea { code } => {
            state.areas = state.areas.remove_area(&code);
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocm_core::bounds::GeoBounds;
    use ocm_core::period::EnergyRecord;

    fn info(code: &str) -> AreaInfo {
        AreaInfo {
            name: code.to_string(),
            code: code.to_string(),
            kind: "lau1".to_string(),
            resolution: ResolutionLevel::LocalAuthority,
        }
    }

    fn data(total: f64) -> PeriodData {
        vec![("2010", EnergyRecord::new(Some(total), None))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_global_actions() {
        let state = reduce(AppState::default(), Action::SetResolution(ResolutionLevel::DataZone));
        let state = reduce(state, Action::SetTimeRange { start: 2012, end: 2030 });
        let state = reduce(state, Action::SetAreaScale(3));
        assert_eq!(state.global.resolution, ResolutionLevel::DataZone);
        assert_eq!(state.global.period_start, 2012);
        assert_eq!(state.global.period_end, 2030);
        assert_eq!(state.global.area_scale, 3);
    }

    #[test]
    fn test_area_actions() {
        let mut state = AppState::default();
        for (code, total) in [("A", 10.0), ("B", 30.0)] {
            state = reduce(
                state,
                Action::AddArea {
                    code: code.to_string(),
                    info: info(code),
                    data: data(total),
                },
            );
        }
        assert_eq!(state.areas.max_value(), 30.0);

        state = reduce(state, Action::ResetMaxValue);
        state = reduce(
            state,
            Action::UpdateArea {
                code: "A".to_string(),
                data: data(4.0),
            },
        );
        assert_eq!(state.areas.max_value(), 4.0);
        let rebuilt = reduce(state.clone(), Action::RebuildMaxValue);
        assert_eq!(rebuilt.areas.max_value(), 30.0);

        state = reduce(state, Action::RemoveArea { code: "A".to_string() });
        assert_eq!(state.areas.max_value(), 30.0);
        assert_eq!(state.areas.codes(), vec!["B".to_string()]);
    }

    #[test]
    fn test_map_actions() {
        let coverage = CoverageRegion {
            resolution: ResolutionLevel::LocalAuthority,
            zoom: 6,
            bounds: GeoBounds::new(-5.0, 54.0, -2.0, 57.0).unwrap(),
        };
        let state = reduce(
            AppState::default(),
            Action::GeometriesFetched {
                coverage,
                geometries: FeatureCollection::default(),
            },
        );
        let state = reduce(state, Action::RedrawGeometries);
        assert_eq!(state.map.coverage, Some(coverage));
        assert_eq!(state.map.redraw_counter, 2);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::ResetMaxValue.name(), "ResetMaxValue");
        assert_eq!(Action::SetAreaScale(2).name(), "SetAreaScale");
    }
}
