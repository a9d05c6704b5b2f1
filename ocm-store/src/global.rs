use ocm_core::config::MapConfig;
use ocm_core::resolution::ResolutionLevel;
use serde::Serialize;

/// Dashboard-wide settings shared by the map and the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalState {
    /// Resolution level currently shown on the map
    pub resolution: ResolutionLevel,
    pub period_start: i32,
    pub period_end: i32,
    /// Number of charts per row
    pub area_scale: u32,
}

impl GlobalState {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            resolution: ResolutionLevel::LocalAuthority,
            period_start: config.default_period_start,
            period_end: config.default_period_end,
            area_scale: config.default_area_scale,
        }
    }

    /// Set the time range, ordering the endpoints.
    pub fn with_time_range(mut self, start: i32, end: i32) -> Self {
        self.period_start = start.min(end);
        self.period_end = start.max(end);
        self
    }
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::from_config(&MapConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_config() {
        let state = GlobalState::default();
        assert_eq!(state.resolution, ResolutionLevel::LocalAuthority);
        assert_eq!((state.period_start, state.period_end), (2010, 2018));
        assert_eq!(state.area_scale, 1);
    }

    #[test]
    fn test_time_range_is_ordered() {
        let state = GlobalState::default().with_time_range(2030, 2015);
        assert_eq!((state.period_start, state.period_end), (2015, 2030));
    }
}
